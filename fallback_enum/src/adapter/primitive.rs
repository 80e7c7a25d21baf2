use serde_json::{Number, Value};

use crate::{
    error::{FallbackError, FallbackResult},
    repr::{parse_int, truncate_float, Repr},
};

/// Primitive input shape an adapter checks before resolving a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Str,
    Int,
    Float,
    Any,
}

impl From<Repr> for Primitive {
    fn from(value: Repr) -> Self {
        match value {
            Repr::Str => Self::Str,
            Repr::Int => Self::Int,
            Repr::Float => Self::Float,
            Repr::Opaque => Self::Any,
        }
    }
}

impl Primitive {
    /// Checks `value` against the shape, coercing compatible inputs.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Validation`] when the input cannot take the shape.
    pub fn lax(self, value: Value) -> FallbackResult<Value> {
        match self {
            Self::Str => expect_str(value),
            Self::Int => lax_int(value),
            Self::Float => lax_float(value),
            Self::Any => Ok(value),
        }
    }

    /// Checks `value` against the shape without coercing anything but integers to floats.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::Validation`] when the input does not have the shape.
    pub fn strict(self, value: Value) -> FallbackResult<Value> {
        match self {
            Self::Str => expect_str(value),
            Self::Int if value.is_i64() || value.is_u64() => Ok(value),
            Self::Int => Err(invalid("a valid integer", &value)),
            Self::Float => match value.as_f64().and_then(Number::from_f64) {
                Some(number) => Ok(Value::Number(number)),
                None => Err(invalid("a valid number", &value)),
            },
            Self::Any => Ok(value),
        }
    }
}

fn expect_str(value: Value) -> FallbackResult<Value> {
    match value {
        Value::String(_) => Ok(value),
        _ => Err(invalid("a valid string", &value)),
    }
}

fn lax_int(value: Value) -> FallbackResult<Value> {
    if value.is_i64() || value.is_u64() {
        return Ok(value);
    }

    let int = match &value {
        Value::Number(n) => n.as_f64().and_then(integral_float).map(Value::from),
        Value::String(s) => parse_int(s).or_else(|| {
            s.trim()
                .parse::<f64>()
                .ok()
                .and_then(integral_float)
                .map(Value::from)
        }),
        Value::Bool(b) => Some(Value::from(i64::from(*b))),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };

    int.ok_or_else(|| invalid("a valid integer", &value))
}

fn lax_float(value: Value) -> FallbackResult<Value> {
    let float = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };

    float
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| invalid("a valid number", &value))
}

fn integral_float(float: f64) -> Option<i64> {
    if float.fract() == 0.0 {
        truncate_float(float)
    } else {
        None
    }
}

fn invalid(expected: &str, value: &Value) -> FallbackError {
    FallbackError::validation(format!("input should be {expected}, got {value}"))
}
