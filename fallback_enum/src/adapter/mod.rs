//! Adapter resolving unknown enum values on behalf of a validation layer.
//!
//! The adapter carries its own [`ResolveConfig`] and never touches the shared configuration
//! of the enumerations it validates. It can be used in two ways:
//!
//! - generic style: [`Adapted<E>`] as a field type, using the default adapter configuration, or
//!   `FallbackAdapter[E]` as a source type for [`FallbackAdapter::core_schema`].
//! - annotate style: a configured [`FallbackAdapter`] instance for a single field, or
//!   [`Adapted<E, O>`] with an [`AdapterOptions`] type carrying that configuration.
//!
//! ```ignore
//! adapter_options!(Missing { unknown_name: "MISSING" });
//!
//! #[derive(Deserialize)]
//! struct Message {
//!     kind: Adapted<MessageKind>,
//!     previous_kind: Adapted<MessageKind, Missing>,
//! }
//! ```

mod primitive;
mod schema;
mod source;

use std::{fmt, marker::PhantomData, ops::Deref};

use log::trace;
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub use self::{
    primitive::Primitive,
    schema::{FallbackSchema, SchemaInput, ValidationMode},
    source::SourceType,
};
use crate::{
    config::ResolveConfig,
    descriptor::EnumDescriptor,
    error::{FallbackError, FallbackResult},
    fallback::{Fallback, FallbackEnum},
    registry,
};

/// Per-field resolution settings for a validation layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackAdapter {
    config: ResolveConfig,
}

impl FallbackAdapter {
    /// Name of the adapter in type expressions, e.g. `FallbackAdapter[UserStatus]`.
    pub const TYPE_NAME: &'static str = "FallbackAdapter";

    pub fn new(config: ResolveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    pub fn schema<'a>(&self, descriptor: &'a EnumDescriptor) -> FallbackSchema<'a> {
        trace!(
            "FallbackAdapter::schema >> building schema for {} with {:?}",
            descriptor.name(),
            self.config
        );
        FallbackSchema::new(descriptor, self.config.clone())
    }

    pub fn schema_for<E>(&self) -> FallbackSchema<'static>
    where
        E: FallbackEnum,
    {
        self.schema(E::descriptor())
    }

    /// Builds the schema for a field declared with `source` as its type.
    ///
    /// The enumeration must be registered, see [`crate::registry`].
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Configuration`] if the enumeration cannot be determined.
    pub fn core_schema(&self, source: &SourceType) -> FallbackResult<FallbackSchema<'static>> {
        let descriptor = Self::enum_descriptor(source)?;
        Ok(self.schema(descriptor))
    }

    /// Lenient validation of `input` as a value of `E`.
    ///
    /// # Errors
    ///
    /// See [`FallbackSchema::validate_lenient`].
    pub fn validate<E>(&self, input: Value) -> FallbackResult<Fallback<E>>
    where
        E: FallbackEnum,
    {
        self.schema_for::<E>()
            .validate_lenient(input)
            .and_then(Fallback::from_member)
    }

    fn enum_descriptor(source: &SourceType) -> FallbackResult<&'static EnumDescriptor> {
        let name = match source {
            SourceType::Generic { origin, args } if origin == Self::TYPE_NAME => match args.as_slice() {
                [SourceType::Named(name)] => name,
                [arg] => {
                    return Err(FallbackError::configuration(format!(
                        "{arg} is not an enum; expected e.g. {}[MyEnum]",
                        Self::TYPE_NAME
                    )))
                }
                _ => {
                    return Err(FallbackError::configuration(format!(
                        "please specify exactly one enum type in generic args, e.g. {}[MyEnum], got {source}",
                        Self::TYPE_NAME
                    )))
                }
            },
            SourceType::Named(name) if name == Self::TYPE_NAME => {
                return Err(FallbackError::configuration(format!(
                    "please specify enum type in generic args, e.g. {}[MyEnum]",
                    Self::TYPE_NAME
                )))
            }
            SourceType::Named(name) => name,
            SourceType::Generic { .. } => {
                return Err(FallbackError::configuration(format!(
                    "{source} is neither an enum nor {}[MyEnum]",
                    Self::TYPE_NAME
                )))
            }
        };

        registry::get(name).ok_or_else(|| {
            FallbackError::configuration(format!("enum {name} is not registered"))
        })
    }
}

impl From<ResolveConfig> for FallbackAdapter {
    fn from(config: ResolveConfig) -> Self {
        Self::new(config)
    }
}

/// Type level [`FallbackAdapter`] configuration for [`Adapted`] fields.
pub trait AdapterOptions {
    fn adapter() -> FallbackAdapter;
}

/// The default adapter configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultOptions;

impl AdapterOptions for DefaultOptions {
    fn adapter() -> FallbackAdapter {
        FallbackAdapter::default()
    }
}

/// Declares an [`AdapterOptions`] type from [`ResolveConfig`] builder calls.
///
/// ```ignore
/// adapter_options!(pub Missing { unknown_name: "MISSING", enable_type_casting: false });
/// ```
#[macro_export]
macro_rules! adapter_options {
    ($(#[$meta:meta])* $vis:vis $name:ident { $($field:ident : $value:expr),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        $vis struct $name;

        impl $crate::adapter::AdapterOptions for $name {
            fn adapter() -> $crate::adapter::FallbackAdapter {
                $crate::adapter::FallbackAdapter::new(
                    $crate::ResolveConfig::builder()$(.$field($value))*.build(),
                )
            }
        }
    };
}

/// Field wrapper resolving a [`FallbackEnum`] through the adapter configured by `O`.
///
/// Deserialization takes the lenient wire path, serialization writes the member value.
pub struct Adapted<E, O = DefaultOptions> {
    inner: Fallback<E>,
    options: PhantomData<fn() -> O>,
}

impl<E, O> Adapted<E, O> {
    pub fn new(inner: Fallback<E>) -> Self {
        Self {
            inner,
            options: PhantomData,
        }
    }

    pub fn into_inner(self) -> Fallback<E> {
        self.inner
    }
}

impl<E, O> Deref for Adapted<E, O> {
    type Target = Fallback<E>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<E, O> From<Fallback<E>> for Adapted<E, O> {
    fn from(inner: Fallback<E>) -> Self {
        Self::new(inner)
    }
}

impl<E, O> Clone for Adapted<E, O>
where
    E: Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<E, O> fmt::Debug for Adapted<E, O>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Adapted").field(&self.inner).finish()
    }
}

impl<E, O> PartialEq for Adapted<E, O>
where
    E: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<E, O> Serialize for Adapted<E, O>
where
    E: FallbackEnum,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de, E, O> Deserialize<'de> for Adapted<E, O>
where
    E: FallbackEnum,
    O: AdapterOptions,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        O::adapter()
            .schema_for::<E>()
            .validate_wire(value, ValidationMode::Lax)
            .and_then(Fallback::from_member)
            .map(Self::new)
            .map_err(D::Error::custom)
    }
}
