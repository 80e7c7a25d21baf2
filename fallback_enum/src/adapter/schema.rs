use derive_more::From;
use serde_json::Value;

use super::primitive::Primitive;
use crate::{
    config::ResolveConfig,
    descriptor::EnumDescriptor,
    error::{FallbackError, FallbackResult},
    member::Member,
    resolver,
};

/// Whether the input shape gets coerced before resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
    #[default]
    Lax,
    Strict,
}

/// Input handed to a [`FallbackSchema`] by in-process callers.
#[derive(Clone, Debug, From, PartialEq)]
pub enum SchemaInput<'a> {
    /// An already constructed member.
    Member(Member<'a>),
    /// A raw value, e.g. straight out of a payload.
    Raw(Value),
}

/// The validators an adapter produces for one enumeration.
///
/// Three levels are available:
/// - lenient: raw values are coerced to the representation's primitive shape, then resolved.
/// - strict: only members of the enumeration are accepted, as they are.
/// - wire: JSON payloads, resolved like the lenient path or, in
///   [`ValidationMode::Strict`], without coercing the primitive shape.
#[derive(Clone, Debug)]
pub struct FallbackSchema<'a> {
    descriptor: &'a EnumDescriptor,
    config: ResolveConfig,
    primitive: Primitive,
}

impl<'a> FallbackSchema<'a> {
    pub(crate) fn new(descriptor: &'a EnumDescriptor, config: ResolveConfig) -> Self {
        Self {
            descriptor,
            config,
            primitive: Primitive::from(descriptor.repr()),
        }
    }

    pub fn descriptor(&self) -> &'a EnumDescriptor {
        self.descriptor
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// The validator function: canonical lookup, then resolution with the adapter configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Fabrication`] if no pseudo-member can carry the value.
    pub fn to_enum(&self, value: Value) -> FallbackResult<Member<'a>> {
        resolver::resolve(self.descriptor, value, &self.config)
    }

    /// # Errors
    ///
    /// Returns [`FallbackError::Validation`] if the input does not fit the primitive shape
    /// and [`FallbackError::Fabrication`] if no pseudo-member can carry it.
    pub fn validate_lenient<T>(&self, input: T) -> FallbackResult<Member<'a>>
    where
        T: Into<SchemaInput<'a>>,
    {
        match input.into() {
            SchemaInput::Member(member) if self.descriptor.owns_member(&member) => Ok(member),
            SchemaInput::Member(member) => {
                self.validate_wire(member.value().clone(), ValidationMode::Lax)
            }
            SchemaInput::Raw(value) => self.validate_wire(value, ValidationMode::Lax),
        }
    }

    /// # Errors
    ///
    /// Returns [`FallbackError::Validation`] unless the input is a member of the enumeration.
    pub fn validate_strict<T>(&self, input: T) -> FallbackResult<Member<'a>>
    where
        T: Into<SchemaInput<'a>>,
    {
        match input.into() {
            SchemaInput::Member(member) if self.descriptor.owns_member(&member) => Ok(member),
            SchemaInput::Member(member) => Err(FallbackError::validation(format!(
                "input should be an instance of {}, got {member}",
                self.descriptor.name()
            ))),
            SchemaInput::Raw(value) => Err(FallbackError::validation(format!(
                "input should be an instance of {}, got {value}",
                self.descriptor.name()
            ))),
        }
    }

    /// Validates a decoded JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Validation`] if the payload does not fit the primitive shape
    /// and [`FallbackError::Fabrication`] if no pseudo-member can carry it.
    pub fn validate_wire(
        &self,
        value: Value,
        mode: ValidationMode,
    ) -> FallbackResult<Member<'a>> {
        let value = match mode {
            ValidationMode::Lax => self.primitive.lax(value)?,
            ValidationMode::Strict => self.primitive.strict(value)?,
        };

        self.to_enum(value)
    }

    /// Decodes a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Json`] on malformed input, otherwise see
    /// [`FallbackSchema::validate_wire`].
    pub fn decode_wire(&self, text: &str, mode: ValidationMode) -> FallbackResult<Member<'a>> {
        let value = serde_json::from_str(text)?;
        self.validate_wire(value, mode)
    }

    /// Encodes a member as its wire value.
    pub fn encode_wire(&self, member: &Member<'_>) -> Value {
        member.value().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::repr::Repr;

    fn int_status() -> EnumDescriptor {
        EnumDescriptor::builder("Status", Repr::Int)
            .member("ACTIVE", 1)
            .member("INACTIVE", 2)
            .build()
            .unwrap()
    }

    fn str_codes() -> EnumDescriptor {
        EnumDescriptor::builder("Codes", Repr::Str)
            .member("A", "1")
            .member("B", "2")
            .build()
            .unwrap()
    }

    #[test]
    fn test_lenient_passes_members_through() {
        let descriptor = int_status();
        let schema = FallbackSchema::new(&descriptor, ResolveConfig::default());
        let active = Member::Canonical(descriptor.member("ACTIVE").unwrap());

        assert_eq!(schema.validate_lenient(active.clone()).unwrap(), active);

        let unknown = schema.to_enum(json!(9)).unwrap();
        assert_eq!(schema.validate_lenient(unknown.clone()).unwrap(), unknown);
    }

    #[test]
    fn test_lenient_coerces_primitive() {
        let descriptor = int_status();
        let schema = FallbackSchema::new(&descriptor, ResolveConfig::default());

        assert_eq!(schema.validate_lenient(json!("2")).unwrap().name(), "INACTIVE");

        let member = schema.validate_lenient(json!("3.0")).unwrap();
        assert!(member.is_unknown());
        assert_eq!(member.value(), &json!(3));

        let err = schema.validate_lenient(json!("INVALID")).unwrap_err();
        assert!(matches!(err, FallbackError::Validation(_)));
    }

    #[test]
    fn test_lenient_numeric_string_above_i64() {
        let descriptor = EnumDescriptor::builder("Big", Repr::Int)
            .member("MAX", u64::MAX)
            .build()
            .unwrap();
        let schema = FallbackSchema::new(&descriptor, ResolveConfig::default());

        let member = schema.validate_lenient(json!("18446744073709551615")).unwrap();
        assert_eq!(member.name(), "MAX");
    }

    #[test]
    fn test_lenient_str_rejects_numbers() {
        let descriptor = str_codes();
        let schema = FallbackSchema::new(&descriptor, ResolveConfig::default());

        assert_eq!(schema.validate_lenient(json!("1")).unwrap().name(), "A");
        assert!(schema.validate_lenient(json!(1)).is_err());

        let member = schema.validate_lenient(json!("INVALID")).unwrap();
        assert_eq!(member.value(), &json!("INVALID"));
    }

    #[test]
    fn test_lenient_foreign_member_uses_value() {
        let status = int_status();
        let codes = str_codes();
        let schema = FallbackSchema::new(&codes, ResolveConfig::default());

        let foreign = Member::Canonical(status.member("ACTIVE").unwrap());
        assert!(schema.validate_lenient(foreign).is_err());

        let status_schema = FallbackSchema::new(&status, ResolveConfig::default());
        let foreign = Member::Canonical(codes.member("B").unwrap());
        assert!(status_schema.validate_lenient(foreign).is_ok());
    }

    #[test]
    fn test_strict_requires_instance() {
        let descriptor = int_status();
        let schema = FallbackSchema::new(&descriptor, ResolveConfig::default());
        let active = Member::Canonical(descriptor.member("ACTIVE").unwrap());

        assert_eq!(schema.validate_strict(active.clone()).unwrap(), active);
        assert!(matches!(
            schema.validate_strict(json!(1)),
            Err(FallbackError::Validation(_))
        ));

        let other = int_status();
        let foreign = Member::Canonical(other.member("ACTIVE").unwrap());
        assert!(schema.validate_strict(foreign).is_err());
    }

    #[test]
    fn test_strict_tells_same_named_enums_apart() {
        let descriptor = int_status();
        let other = EnumDescriptor::builder("Status", Repr::Str)
            .member("ACTIVE", "active")
            .build()
            .unwrap();
        let schema = FallbackSchema::new(&descriptor, ResolveConfig::default());
        let other_schema = FallbackSchema::new(&other, ResolveConfig::default());

        let own = schema.to_enum(json!(9)).unwrap();
        assert_eq!(schema.validate_strict(own.clone()).unwrap(), own);

        let foreign = other_schema.to_enum(json!(9)).unwrap();
        assert_eq!(foreign.enum_name(), "Status");
        assert_ne!(foreign, own);
        assert!(matches!(
            schema.validate_strict(foreign),
            Err(FallbackError::Validation(_))
        ));
    }

    #[test]
    fn test_wire_strict_shapes() {
        let descriptor = int_status();
        let schema = FallbackSchema::new(&descriptor, ResolveConfig::default());

        let member = schema.validate_wire(json!(1), ValidationMode::Strict).unwrap();
        assert_eq!(member.name(), "ACTIVE");
        assert!(schema.validate_wire(json!("1"), ValidationMode::Strict).is_err());

        let member = schema.validate_wire(json!(5), ValidationMode::Strict).unwrap();
        assert!(member.is_unknown());
    }

    #[test]
    fn test_decode_and_encode_wire() {
        let descriptor = int_status();
        let schema = FallbackSchema::new(&descriptor, ResolveConfig::default());

        let member = schema.decode_wire("\"1\"", ValidationMode::Lax).unwrap();
        assert_eq!(member.name(), "ACTIVE");
        assert_eq!(schema.encode_wire(&member), json!(1));

        let member = schema.decode_wire("17", ValidationMode::Strict).unwrap();
        assert_eq!(schema.encode_wire(&member), json!(17));

        assert!(matches!(
            schema.decode_wire("{", ValidationMode::Lax),
            Err(FallbackError::Json(_))
        ));
    }
}
