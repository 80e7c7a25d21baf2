use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::error::{FallbackError, FallbackResult};

/// The declared type of a field an adapter is attached to.
///
/// Parsed from type expressions such as `UserStatus` or `FallbackAdapter[UserStatus]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceType {
    /// A plain type name, e.g. the enum itself.
    Named(String),
    /// A generic type with its type arguments.
    Generic { origin: String, args: Vec<SourceType> },
}

impl SourceType {
    pub fn named<T>(name: T) -> Self
    where
        T: Into<String>,
    {
        Self::Named(name.into())
    }

    pub fn generic<T, I>(origin: T, args: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = SourceType>,
    {
        Self::Generic {
            origin: origin.into(),
            args: args.into_iter().collect(),
        }
    }

    /// The type name, without any type arguments.
    pub fn origin(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Generic { origin, .. } => origin,
        }
    }

    pub fn args(&self) -> &[SourceType] {
        match self {
            Self::Named(_) => &[],
            Self::Generic { args, .. } => args,
        }
    }
}

impl Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Generic { origin, args } => {
                write!(f, "{origin}[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl FromStr for SourceType {
    type Err = FallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let Some(open) = s.find('[') else {
            return parse_name(s).map(Self::named);
        };

        let Some(inner) = s[open + 1..].strip_suffix(']') else {
            return Err(malformed(s));
        };

        let origin = parse_name(&s[..open])?;
        let args = split_args(inner)
            .ok_or_else(|| malformed(s))?
            .into_iter()
            .map(SourceType::from_str)
            .collect::<FallbackResult<Vec<_>>>()?;

        Ok(Self::Generic {
            origin: origin.to_owned(),
            args,
        })
    }
}

fn parse_name(s: &str) -> FallbackResult<&str> {
    let s = s.trim();
    let mut chars = s.chars();

    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return Err(malformed(s)),
    }

    if chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == ':') {
        Ok(s)
    } else {
        Err(malformed(s))
    }
}

/// Splits top level type arguments on commas, ignoring the ones in nested brackets.
fn split_args(inner: &str) -> Option<Vec<&str>> {
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut args = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }

    args.push(&inner[start..]);
    Some(args)
}

fn malformed(s: &str) -> FallbackError {
    FallbackError::configuration(format!("malformed type expression: {s:?}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named() {
        assert_eq!(
            "UserStatus".parse::<SourceType>().unwrap(),
            SourceType::named("UserStatus")
        );
    }

    #[test]
    fn test_parse_generic() {
        let source: SourceType = "FallbackAdapter[UserStatus]".parse().unwrap();

        assert_eq!(source.origin(), "FallbackAdapter");
        assert_eq!(source.args(), &[SourceType::named("UserStatus")]);
    }

    #[test]
    fn test_parse_nested() {
        let source: SourceType = "Map[str, FallbackAdapter[UserStatus]]".parse().unwrap();

        assert_eq!(
            source,
            SourceType::generic(
                "Map",
                [
                    SourceType::named("str"),
                    SourceType::generic("FallbackAdapter", [SourceType::named("UserStatus")]),
                ]
            )
        );
        assert_eq!(source.to_string(), "Map[str, FallbackAdapter[UserStatus]]");
    }

    #[test]
    fn test_parse_empty_args() {
        let source: SourceType = "FallbackAdapter[]".parse().unwrap();
        assert!(source.args().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        assert!("FallbackAdapter[UserStatus".parse::<SourceType>().is_err());
        assert!("A[B]]".parse::<SourceType>().is_err());
        assert!("".parse::<SourceType>().is_err());
        assert!("1abc".parse::<SourceType>().is_err());
    }
}
