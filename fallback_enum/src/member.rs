use std::{
    fmt::{self, Display},
    sync::Arc,
};

use derive_more::From;
use serde_json::Value;

/// A member of the closed set of an enumeration.
///
/// Owned by its [`crate::EnumDescriptor`]; lookups hand out references to the same
/// instance, so two canonical members are equal only if they are the same member.
#[derive(Debug)]
pub struct CanonicalMember {
    enum_name: Arc<str>,
    index: usize,
    name: String,
    value: Value,
}

impl CanonicalMember {
    pub(crate) fn new(enum_name: Arc<str>, index: usize, name: String, value: Value) -> Self {
        Self {
            enum_name,
            index,
            name,
            value,
        }
    }

    pub fn enum_name(&self) -> &str {
        &self.enum_name
    }

    /// Position of the member in the definition order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A pseudo-member standing in for a value the enumeration does not know about.
///
/// It is never registered with the enumeration: every resolution creates a
/// new one and hands ownership to the caller.
///
/// Two pseudo-members are equal when they come from the same enumeration and
/// carry the same name and value.
#[derive(Clone, Debug)]
pub struct UnknownMember {
    enum_name: Arc<str>,
    name: String,
    value: Value,
}

impl UnknownMember {
    pub(crate) fn new(enum_name: Arc<str>, name: &str, value: Value) -> Self {
        Self {
            enum_name,
            name: name.to_owned(),
            value,
        }
    }

    pub fn enum_name(&self) -> &str {
        &self.enum_name
    }

    /// Whether the member was fabricated for the enumeration owning `enum_name`.
    pub(crate) fn is_from(&self, enum_name: &Arc<str>) -> bool {
        Arc::ptr_eq(&self.enum_name, enum_name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl PartialEq for UnknownMember {
    fn eq(&self, other: &Self) -> bool {
        self.is_from(&other.enum_name) && self.name == other.name && self.value == other.value
    }
}

/// Outcome of a lookup: either a canonical member or a freshly fabricated pseudo-member.
#[derive(Clone, Debug, From)]
pub enum Member<'a> {
    Canonical(&'a CanonicalMember),
    Unknown(UnknownMember),
}

impl<'a> Member<'a> {
    pub fn enum_name(&self) -> &str {
        match self {
            Self::Canonical(m) => m.enum_name(),
            Self::Unknown(m) => m.enum_name(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Canonical(m) => m.name(),
            Self::Unknown(m) => m.name(),
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::Canonical(m) => m.value(),
            Self::Unknown(m) => m.value(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    pub fn as_canonical(&self) -> Option<&'a CanonicalMember> {
        match self {
            Self::Canonical(m) => Some(*m),
            Self::Unknown(_) => None,
        }
    }

    pub fn into_unknown(self) -> Option<UnknownMember> {
        match self {
            Self::Canonical(_) => None,
            Self::Unknown(m) => Some(m),
        }
    }
}

impl PartialEq for Member<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Canonical(a), Self::Canonical(b)) => std::ptr::eq(*a, *b),
            (Self::Unknown(a), Self::Unknown(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canonical(m) => write!(f, "{}.{}", m.enum_name(), m.name()),
            Self::Unknown(m) => Display::fmt(m, f),
        }
    }
}

impl Display for UnknownMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({})", self.enum_name, self.name, self.value)
    }
}
