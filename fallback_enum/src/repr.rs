use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use strum_macros::{AsRefStr, Display, EnumString};

/// The type backing the values of an enumeration.
///
/// Canonical values of a [`Repr::Str`] enum are JSON strings, of a [`Repr::Int`] enum
/// JSON integers and of a [`Repr::Float`] enum JSON numbers. [`Repr::Opaque`] enums
/// can hold any JSON value and have no natural cast type.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Repr {
    Str,
    Int,
    Float,
    Opaque,
}

impl Repr {
    /// The cast type naturally associated with this representation.
    ///
    /// Checked in the order `str`, `int`, `float`.
    pub fn cast_type(self) -> Option<CastType> {
        match self {
            Self::Str => Some(CastType::Str),
            Self::Int => Some(CastType::Int),
            Self::Float => Some(CastType::Float),
            Self::Opaque => None,
        }
    }

    /// Whether a bare instance of this representation can carry `value`.
    ///
    /// Typed representations only carry scalars.
    pub fn admits(self, value: &Value) -> bool {
        match self {
            Self::Opaque => true,
            Self::Str | Self::Int | Self::Float => {
                matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
            }
        }
    }

    /// Whether `value` is a valid canonical value for this representation.
    pub(crate) fn holds_canonical(self, value: &Value) -> bool {
        match self {
            Self::Str => value.is_string(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Opaque => true,
        }
    }

    /// Brings a canonical value to the shape the representation stores.
    pub(crate) fn normalize(self, value: Value) -> Value {
        if self == Self::Float && (value.is_i64() || value.is_u64()) {
            if let Some(number) = value.as_f64().and_then(Number::from_f64) {
                return Value::Number(number);
            }
        }

        value
    }
}

/// Type a raw value gets converted to before the canonical lookup is retried.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CastType {
    Str,
    Int,
    Float,
}

impl CastType {
    pub fn is_instance(self, value: &Value) -> bool {
        match self {
            Self::Str => value.is_string(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_f64(),
        }
    }

    /// Converts `value` to this type, returning [`None`] if the conversion is not possible.
    pub fn cast(self, value: &Value) -> Option<Value> {
        match self {
            Self::Str => cast_str(value),
            Self::Int => cast_int(value),
            Self::Float => cast_float(value),
        }
    }
}

fn cast_str(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => Some(Value::String(s.clone())),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn cast_int(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64().and_then(truncate_float).map(Value::from),
        Value::Number(n) => Some(Value::Number(n.clone())),
        Value::String(s) => parse_int(s),
        Value::Bool(b) => Some(Value::from(i64::from(*b))),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parses an integer string, falling back to `u64` for values above `i64::MAX`.
pub(crate) fn parse_int(s: &str) -> Option<Value> {
    let s = s.trim();

    s.parse::<i64>()
        .map(Value::from)
        .or_else(|_| s.parse::<u64>().map(Value::from))
        .ok()
}

fn cast_float(value: &Value) -> Option<Value> {
    let float = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };

    float.and_then(Number::from_f64).map(Value::Number)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn truncate_float(float: f64) -> Option<i64> {
    let truncated = float.trunc();

    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

/// Equality used by the canonical-value index.
///
/// Numbers compare numerically (`1 == 1.0`), everything else structurally,
/// so a string never matches a number.
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
        return x == y;
    }

    if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
        return x == y;
    }

    #[allow(clippy::float_cmp)]
    let equal = x.as_f64() == y.as_f64();
    equal
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_cast_to_str() {
        assert_eq!(CastType::Str.cast(&json!(3)), Some(json!("3")));
        assert_eq!(CastType::Str.cast(&json!(3.0)), Some(json!("3.0")));
        assert_eq!(CastType::Str.cast(&json!(true)), Some(json!("true")));
        assert_eq!(CastType::Str.cast(&json!(null)), None);
        assert_eq!(CastType::Str.cast(&json!([1])), None);
    }

    #[test]
    fn test_cast_to_int() {
        assert_eq!(CastType::Int.cast(&json!("1")), Some(json!(1)));
        assert_eq!(CastType::Int.cast(&json!(" -7 ")), Some(json!(-7)));
        assert_eq!(CastType::Int.cast(&json!(1.2)), Some(json!(1)));
        assert_eq!(CastType::Int.cast(&json!(-1.9)), Some(json!(-1)));
        assert_eq!(CastType::Int.cast(&json!(false)), Some(json!(0)));
        assert_eq!(CastType::Int.cast(&json!("3.0")), None);
        assert_eq!(CastType::Int.cast(&json!("abc")), None);
        assert_eq!(CastType::Int.cast(&json!(1e300)), None);
        assert_eq!(CastType::Int.cast(&json!({})), None);
    }

    #[test]
    fn test_cast_to_int_above_i64() {
        assert_eq!(
            CastType::Int.cast(&json!("18446744073709551615")),
            Some(json!(u64::MAX))
        );
        assert_eq!(CastType::Int.cast(&json!("18446744073709551616")), None);
        assert_eq!(CastType::Int.cast(&json!("-18446744073709551615")), None);
    }

    #[test]
    fn test_cast_to_float() {
        assert_eq!(CastType::Float.cast(&json!("3")), Some(json!(3.0)));
        assert_eq!(CastType::Float.cast(&json!("3.5")), Some(json!(3.5)));
        assert_eq!(CastType::Float.cast(&json!(2)), Some(json!(2.0)));
        assert_eq!(CastType::Float.cast(&json!("inf")), None);
        assert_eq!(CastType::Float.cast(&json!("INVALID")), None);
    }

    #[test]
    fn test_instance_checks() {
        assert!(CastType::Int.is_instance(&json!(3)));
        assert!(!CastType::Int.is_instance(&json!(3.0)));
        assert!(CastType::Float.is_instance(&json!(3.0)));
        assert!(!CastType::Float.is_instance(&json!(3)));
        assert!(CastType::Str.is_instance(&json!("3")));
    }

    #[test]
    fn test_loose_equality() {
        assert!(loosely_equal(&json!(1), &json!(1.0)));
        assert!(loosely_equal(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(!loosely_equal(&json!(1), &json!("1")));
        assert!(!loosely_equal(&json!(1), &json!(true)));
        assert!(loosely_equal(&json!({"a": 1}), &json!({"a": 1})));
    }

    #[test]
    fn test_admits() {
        assert!(Repr::Int.admits(&json!("abc")));
        assert!(Repr::Str.admits(&json!(1.5)));
        assert!(!Repr::Int.admits(&json!(null)));
        assert!(!Repr::Float.admits(&json!([1.0])));
        assert!(Repr::Opaque.admits(&json!({"any": "thing"})));
    }

    #[test]
    fn test_float_normalization() {
        assert!(Repr::Float.normalize(json!(1)).is_f64());
        assert!(Repr::Int.normalize(json!(1)).is_i64());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Repr::from_str("opaque").unwrap(), Repr::Opaque);
        assert_eq!(CastType::from_str("int").unwrap(), CastType::Int);
        assert_eq!(CastType::Float.to_string(), "float");
        assert!(CastType::from_str("bytes").is_err());
    }
}
