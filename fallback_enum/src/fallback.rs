use std::fmt::{self, Display};

use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{
    config::ResolveConfig,
    descriptor::EnumDescriptor,
    error::{FallbackError, FallbackResult},
    member::{CanonicalMember, Member, UnknownMember},
};

/// Binds a Rust enum to the canonical table of an [`EnumDescriptor`].
///
/// Usually implemented through `#[derive(FallbackEnum)]`:
///
/// ```ignore
/// #[derive(Clone, Copy, Debug, PartialEq, FallbackEnum)]
/// #[fallback(repr = "int")]
/// enum UserStatus {
///     #[fallback(value = 1, name = "ACTIVE")]
///     Active,
///     #[fallback(value = 2, name = "INACTIVE")]
///     Inactive,
/// }
///
/// let status = UserStatus::construct(3)?;
/// assert!(status.is_unknown());
/// ```
///
/// The variants are the canonical members. Values outside of them are
/// represented by [`Fallback::Unknown`].
pub trait FallbackEnum: Copy + 'static {
    fn descriptor() -> &'static EnumDescriptor;

    /// The variant at `index` in definition order.
    fn from_index(index: usize) -> Option<Self>;

    fn index(self) -> usize;

    fn member(self) -> &'static CanonicalMember {
        &Self::descriptor().members()[self.index()]
    }

    fn name(self) -> &'static str {
        self.member().name()
    }

    fn value(self) -> &'static Value {
        self.member().value()
    }

    /// Standard lookup by value, without any fallback.
    fn lookup(value: &Value) -> Option<Self> {
        Self::descriptor()
            .lookup(value)
            .and_then(|m| Self::from_index(m.index()))
    }

    /// Construction by value, falling back to [`FallbackEnum::on_lookup_miss`].
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Fabrication`] if no pseudo-member can carry the value.
    fn construct<V>(value: V) -> FallbackResult<Fallback<Self>>
    where
        V: Into<Value>,
    {
        Self::descriptor()
            .construct(value.into())
            .and_then(Fallback::from_member)
    }

    /// Invoked when no variant matches `value`.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Fabrication`] if no pseudo-member can carry the value.
    fn on_lookup_miss(value: Value) -> FallbackResult<Fallback<Self>> {
        Self::descriptor()
            .on_lookup_miss(value)
            .and_then(Fallback::from_member)
    }

    fn config() -> ResolveConfig {
        Self::descriptor().config()
    }

    fn set_config(config: ResolveConfig) {
        Self::descriptor().set_config(config);
    }
}

/// A value of a [`FallbackEnum`] that may not be one of its variants.
///
/// Serializes to the member value and deserializes through
/// [`FallbackEnum::construct`], so unknown values survive a round trip.
#[derive(Clone, Debug, PartialEq)]
pub enum Fallback<E> {
    Known(E),
    Unknown(UnknownMember),
}

impl<E> Fallback<E>
where
    E: FallbackEnum,
{
    /// Shorthand for [`FallbackEnum::construct`].
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Fabrication`] if no pseudo-member can carry the value.
    pub fn new<V>(value: V) -> FallbackResult<Self>
    where
        V: Into<Value>,
    {
        E::construct(value)
    }

    /// Converts a [`Member`] of `E`'s descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Validation`] if the member belongs to another enumeration.
    pub fn from_member(member: Member<'_>) -> FallbackResult<Self> {
        let descriptor = E::descriptor();

        if !descriptor.owns_member(&member) {
            return Err(foreign_member(descriptor, member.name()));
        }

        match member {
            Member::Canonical(m) => E::from_index(m.index())
                .map(Self::Known)
                .ok_or_else(|| foreign_member(descriptor, m.name())),
            Member::Unknown(m) => Ok(Self::Unknown(m)),
        }
    }

    pub fn into_member(self) -> Member<'static> {
        match self {
            Self::Known(e) => Member::Canonical(e.member()),
            Self::Unknown(m) => Member::Unknown(m),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Known(e) => e.name(),
            Self::Unknown(m) => m.name(),
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::Known(e) => e.value(),
            Self::Unknown(m) => m.value(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    pub fn known(&self) -> Option<E> {
        match self {
            Self::Known(e) => Some(*e),
            Self::Unknown(_) => None,
        }
    }
}

fn foreign_member(descriptor: &EnumDescriptor, name: &str) -> FallbackError {
    FallbackError::validation(format!(
        "member {name} does not belong to {}",
        descriptor.name()
    ))
}

impl<E> From<E> for Fallback<E> {
    fn from(value: E) -> Self {
        Self::Known(value)
    }
}

impl<E> Display for Fallback<E>
where
    E: FallbackEnum,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(e) => write!(f, "{}.{}", E::descriptor().name(), e.name()),
            Self::Unknown(m) => Display::fmt(m, f),
        }
    }
}

impl<E> Serialize for Fallback<E>
where
    E: FallbackEnum,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value().serialize(serializer)
    }
}

impl<'de, E> Deserialize<'de> for Fallback<E>
where
    E: FallbackEnum,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        E::construct(value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{misc::test_utils, FallbackEnum};

    #[derive(Clone, Copy, Debug, PartialEq, FallbackEnum)]
    #[fallback(repr = "int")]
    enum UserStatus {
        #[fallback(value = 1, name = "ACTIVE")]
        Active,
        #[fallback(value = 2, name = "INACTIVE")]
        Inactive,
    }

    #[derive(Clone, Copy, Debug, PartialEq, FallbackEnum)]
    #[fallback(repr = "str", unknown_name = "MISSING", type_casting = false)]
    enum Color {
        Red,
        Green,
    }

    #[test]
    fn test_known_values() {
        assert_eq!(
            UserStatus::construct(1).unwrap(),
            Fallback::Known(UserStatus::Active)
        );
        assert_eq!(UserStatus::Inactive.value(), &json!(2));
        assert_eq!(UserStatus::Inactive.name(), "INACTIVE");
        assert_eq!(UserStatus::lookup(&json!(2)), Some(UserStatus::Inactive));
        assert_eq!(UserStatus::from_index(2), None);
    }

    #[test]
    fn test_string_cast_to_known() {
        let status = Fallback::<UserStatus>::new("1").unwrap();
        assert_eq!(status.known(), Some(UserStatus::Active));
    }

    #[test]
    fn test_unknown_value() {
        let status = Fallback::<UserStatus>::new(3).unwrap();

        assert!(status.is_unknown());
        assert_eq!(status.name(), "UNKNOWN");
        assert_eq!(status.value(), &json!(3));
        assert_eq!(status.to_string(), "UserStatus.UNKNOWN(3)");
    }

    #[test]
    fn test_type_level_config() {
        let color = Fallback::<Color>::new("Blue").unwrap();
        assert_eq!(color.name(), "MISSING");

        assert_eq!(Color::Red.value(), &json!("Red"));
        assert!(!Color::config().enable_type_casting);
    }

    #[test]
    fn test_serde_known() {
        test_utils::test_serde(Fallback::from(UserStatus::Active), json!(1));
    }

    #[test]
    fn test_serde_unknown() {
        let unknown = Fallback::<UserStatus>::new(7).unwrap();
        test_utils::test_serde(unknown, json!(7));
    }

    #[test]
    fn test_deserialize_fabrication_error() {
        let err = serde_json::from_value::<Fallback<UserStatus>>(json!({"a": 1})).unwrap_err();
        assert!(err.to_string().contains("Fabrication error"));
    }

    #[test]
    fn test_member_round_trip() {
        let member = Fallback::from(UserStatus::Inactive).into_member();
        assert_eq!(member.name(), "INACTIVE");
        assert_eq!(
            Fallback::<UserStatus>::from_member(member).unwrap(),
            Fallback::Known(UserStatus::Inactive)
        );
    }

    #[test]
    fn test_foreign_member_rejected() {
        let member = Fallback::from(Color::Red).into_member();
        let err = Fallback::<UserStatus>::from_member(member).unwrap_err();
        assert!(matches!(err, FallbackError::Validation(_)));

        let unknown = Fallback::<Color>::new("Blue").unwrap().into_member();
        assert!(Fallback::<UserStatus>::from_member(unknown).is_err());
    }
}
