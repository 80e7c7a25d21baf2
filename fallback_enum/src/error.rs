use serde_json::Value;
use thiserror::Error;

use crate::repr::Repr;

pub type FallbackResult<T> = Result<T, FallbackError>;

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Fabrication error: {repr} representation of {enum_name} rejects value {value}")]
    Fabrication {
        enum_name: String,
        repr: Repr,
        value: Value,
    },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Definition error: {0}")]
    Definition(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FallbackError {
    pub fn configuration<T>(msg: T) -> Self
    where
        T: Into<String>,
    {
        Self::Configuration(msg.into())
    }

    pub fn fabrication(enum_name: &str, repr: Repr, value: Value) -> Self {
        Self::Fabrication {
            enum_name: enum_name.to_owned(),
            repr,
            value,
        }
    }

    pub fn validation<T>(msg: T) -> Self
    where
        T: Into<String>,
    {
        Self::Validation(msg.into())
    }

    pub fn definition<T>(msg: T) -> Self
    where
        T: Into<String>,
    {
        Self::Definition(msg.into())
    }
}
