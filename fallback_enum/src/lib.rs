#![allow(clippy::module_inception)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![deny(clippy::unwrap_used)]

//! Enumerations that decode values they do not know about into pseudo-members
//! instead of failing.
//!
//! APIs tend to introduce new enum values before their clients catch up. A
//! [`FallbackEnum`] keeps decoding such payloads: values with no canonical member
//! become an [`UnknownMember`] carrying the value as it was received.

extern crate self as fallback_enum;

pub mod adapter;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod fallback;
pub mod member;
#[cfg(test)]
mod misc;
pub mod registry;
pub mod repr;
pub mod resolver;

pub use config::{ResolveConfig, DEFAULT_UNKNOWN_NAME};
pub use descriptor::{EnumDescriptor, EnumDescriptorBuilder};
pub use error::{FallbackError, FallbackResult};
pub use fallback::{Fallback, FallbackEnum};
pub use fallback_enum_macros::FallbackEnum;
pub use member::{CanonicalMember, Member, UnknownMember};
pub use repr::{CastType, Repr};

#[doc(hidden)]
pub mod __private {
    pub use lazy_static::lazy_static;
    pub use serde_json;
}
