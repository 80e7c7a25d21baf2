use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::repr::CastType;

/// Name given to pseudo-members unless configured otherwise.
pub const DEFAULT_UNKNOWN_NAME: &str = "UNKNOWN";

/// Controls how a value with no canonical member gets resolved.
///
/// Lives either on an [`crate::EnumDescriptor`] (shared by every lookup on the enum)
/// or on a [`crate::adapter::FallbackAdapter`] (scoped to a single field).
///
/// ```ignore
/// let config = ResolveConfig::builder()
///     .casting_type(CastType::Int)
///     .unknown_name("MISSING")
///     .build();
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct ResolveConfig {
    /// Try converting the raw value before giving up on the canonical lookup.
    #[builder(default = true)]
    pub enable_type_casting: bool,
    /// Type to convert to. Inferred from the enum representation when [`None`].
    #[builder(default, setter(strip_option))]
    pub casting_type: Option<CastType>,
    /// Name of the produced pseudo-members.
    #[builder(default = DEFAULT_UNKNOWN_NAME.to_owned(), setter(into))]
    pub unknown_name: String,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            enable_type_casting: true,
            casting_type: None,
            unknown_name: DEFAULT_UNKNOWN_NAME.to_owned(),
        }
    }
}
