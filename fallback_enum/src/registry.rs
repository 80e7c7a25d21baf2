use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use lazy_static::lazy_static;
use log::{debug, warn};

use crate::{
    descriptor::EnumDescriptor,
    error::{FallbackError, FallbackResult},
    fallback::FallbackEnum,
};

type RegistryMap = HashMap<String, &'static EnumDescriptor>;

lazy_static! {
    /// Enumerations an adapter can be pointed at by name.
    ///
    /// Registered descriptors live for the rest of the process.
    static ref ENUM_REGISTRY: RwLock<RegistryMap> = RwLock::new(HashMap::new());
}

/// Registers the descriptor of `E` under its enum name.
///
/// Registering the same type again is a no-op. Another descriptor
/// registered under the same name gets replaced.
pub fn register<E>() -> &'static EnumDescriptor
where
    E: FallbackEnum,
{
    let descriptor = E::descriptor();
    let mut registry = ENUM_REGISTRY.write().unwrap_or_else(PoisonError::into_inner);

    match registry.insert(descriptor.name().to_owned(), descriptor) {
        Some(previous) if !std::ptr::eq(previous, descriptor) => {
            warn!("registry::register >> replaced enum {}", descriptor.name());
        }
        Some(_) => {}
        None => debug!("registry::register >> registered enum {}", descriptor.name()),
    }

    descriptor
}

/// Registers an enumeration defined at runtime.
///
/// # Errors
///
/// Returns [`FallbackError::Definition`] if the name is already taken.
pub fn define(descriptor: EnumDescriptor) -> FallbackResult<&'static EnumDescriptor> {
    let mut registry = ENUM_REGISTRY.write().unwrap_or_else(PoisonError::into_inner);

    if registry.contains_key(descriptor.name()) {
        return Err(FallbackError::definition(format!(
            "enum {} is already registered",
            descriptor.name()
        )));
    }

    let descriptor: &'static EnumDescriptor = Box::leak(Box::new(descriptor));
    registry.insert(descriptor.name().to_owned(), descriptor);
    debug!("registry::define >> registered enum {}", descriptor.name());

    Ok(descriptor)
}

pub fn get(name: &str) -> Option<&'static EnumDescriptor> {
    ENUM_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .copied()
}

/// Names of all registered enumerations, sorted.
pub fn names() -> Vec<String> {
    let mut names: Vec<_> = ENUM_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect();

    names.sort();
    names
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{misc::test_utils, repr::Repr, FallbackEnum};

    #[derive(Clone, Copy, Debug, PartialEq, FallbackEnum)]
    #[fallback(repr = "int")]
    enum RegistryProbe {
        #[fallback(value = 1)]
        One,
    }

    #[test]
    fn test_register_typed() {
        test_utils::init_logging();

        let first = register::<RegistryProbe>();
        let second = register::<RegistryProbe>();

        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(get("RegistryProbe").unwrap(), first));
        assert!(names().contains(&"RegistryProbe".to_owned()));
    }

    #[test]
    fn test_define_runtime() {
        test_utils::init_logging();

        let descriptor = EnumDescriptor::builder("RegistryRuntime", Repr::Str)
            .member("A", "a")
            .build()
            .unwrap();
        let defined = define(descriptor).unwrap();

        assert_eq!(defined.lookup(&json!("a")).unwrap().name(), "A");
        assert!(std::ptr::eq(get("RegistryRuntime").unwrap(), defined));

        let again = EnumDescriptor::builder("RegistryRuntime", Repr::Str)
            .build()
            .unwrap();
        assert!(matches!(define(again), Err(FallbackError::Definition(_))));
    }

    #[test]
    fn test_get_missing() {
        assert!(get("RegistryNeverDefined").is_none());
    }
}
