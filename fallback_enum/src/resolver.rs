//! Resolution of values that have no canonical member.
//!
//! A value that misses the canonical lookup is first converted to the cast type of
//! the enumeration, if casting is enabled and a cast type can be determined, and looked
//! up again. When that does not produce a canonical member either, a pseudo-member
//! carrying the original value is fabricated. The converted value is never kept.

use serde_json::Value;

use crate::{
    config::ResolveConfig,
    descriptor::EnumDescriptor,
    error::{FallbackError, FallbackResult},
    member::{CanonicalMember, Member, UnknownMember},
    repr::CastType,
};

/// Resolves `raw_value` to a member of the enumeration.
///
/// A canonical value resolves to its canonical member without casting.
/// Anything else goes through [`resolve_missing`].
///
/// # Errors
///
/// Returns [`FallbackError::Fabrication`] if the representation of the
/// enumeration cannot carry `raw_value`.
pub fn resolve<'a>(
    descriptor: &'a EnumDescriptor,
    raw_value: Value,
    config: &ResolveConfig,
) -> FallbackResult<Member<'a>> {
    match descriptor.lookup(&raw_value) {
        Some(member) => Ok(Member::Canonical(member)),
        None => resolve_missing(descriptor, raw_value, config),
    }
}

/// Resolves a value the standard lookup already failed to find.
///
/// # Errors
///
/// Returns [`FallbackError::Fabrication`] if the representation of the
/// enumeration cannot carry `raw_value`.
pub fn resolve_missing<'a>(
    descriptor: &'a EnumDescriptor,
    raw_value: Value,
    config: &ResolveConfig,
) -> FallbackResult<Member<'a>> {
    if config.enable_type_casting {
        if let Some(member) = cast_lookup(descriptor, &raw_value, config.casting_type) {
            return Ok(Member::Canonical(member));
        }
    }

    fabricate(descriptor, raw_value, &config.unknown_name).map(Member::Unknown)
}

/// Picks the type to convert raw values to.
///
/// An explicit `casting_type` wins, otherwise the one inferred from the
/// representation of the enumeration, if any.
pub fn select_cast_type(
    descriptor: &EnumDescriptor,
    casting_type: Option<CastType>,
) -> Option<CastType> {
    casting_type.or_else(|| descriptor.repr().cast_type())
}

fn cast_lookup<'a>(
    descriptor: &'a EnumDescriptor,
    raw_value: &Value,
    casting_type: Option<CastType>,
) -> Option<&'a CanonicalMember> {
    let cast_type = select_cast_type(descriptor, casting_type)?;

    if cast_type.is_instance(raw_value) {
        return None;
    }

    let cast_value = cast_type.cast(raw_value)?;
    descriptor.lookup(&cast_value)
}

fn fabricate(
    descriptor: &EnumDescriptor,
    raw_value: Value,
    unknown_name: &str,
) -> FallbackResult<UnknownMember> {
    let repr = descriptor.repr();

    if !repr.admits(&raw_value) {
        return Err(FallbackError::fabrication(
            descriptor.name(),
            repr,
            raw_value,
        ));
    }

    Ok(UnknownMember::new(
        descriptor.shared_name(),
        unknown_name,
        raw_value,
    ))
}
