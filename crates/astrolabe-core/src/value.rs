//! Scalar attribute values.
//!
//! Elements carry plain scalar attributes next to their links. The value
//! domain is small: booleans, integers, strings and UML's `UnlimitedNatural`.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::identifier::Id;

/// A non-negative integer or the unbounded value, written `*`.
///
/// # Examples
///
/// ```
/// use astrolabe_core::value::UnlimitedNatural;
///
/// let many: UnlimitedNatural = "*".parse().unwrap();
/// assert!(many.is_unbounded());
/// assert_eq!(many.to_string(), "*");
///
/// let three: UnlimitedNatural = "3".parse().unwrap();
/// assert_eq!(three, UnlimitedNatural::Finite(3));
/// assert!(three < many);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum UnlimitedNatural {
    Finite(u64),
    Unbounded,
}

impl UnlimitedNatural {
    /// Whether this is the `*` value.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Returns the finite value, if any.
    pub fn finite(&self) -> Option<u64> {
        match self {
            Self::Finite(value) => Some(*value),
            Self::Unbounded => None,
        }
    }
}

impl Ord for UnlimitedNatural {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => a.cmp(b),
            (Self::Finite(_), Self::Unbounded) => Ordering::Less,
            (Self::Unbounded, Self::Finite(_)) => Ordering::Greater,
            (Self::Unbounded, Self::Unbounded) => Ordering::Equal,
        }
    }
}

impl PartialOrd for UnlimitedNatural {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for UnlimitedNatural {
    fn from(value: u64) -> Self {
        Self::Finite(value)
    }
}

impl fmt::Display for UnlimitedNatural {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "{value}"),
            Self::Unbounded => f.write_str("*"),
        }
    }
}

/// Error returned when a string is neither `*` nor a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid unlimited natural `{0}`")]
pub struct ParseUnlimitedNaturalError(pub String);

impl FromStr for UnlimitedNatural {
    type Err = ParseUnlimitedNaturalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "*" {
            return Ok(Self::Unbounded);
        }
        trimmed
            .parse::<u64>()
            .map(Self::Finite)
            .map_err(|_| ParseUnlimitedNaturalError(s.to_string()))
    }
}

impl TryFrom<String> for UnlimitedNatural {
    type Error = ParseUnlimitedNaturalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The declared type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    Boolean,
    Integer,
    String,
    UnlimitedNatural,
    /// A string restricted to the listed literals.
    Enumeration(Vec<Id>),
}

impl AttributeType {
    /// Checks whether `value` is acceptable for this type.
    pub fn accepts(&self, value: &AttributeValue) -> bool {
        match (self, value) {
            (Self::Boolean, AttributeValue::Bool(_))
            | (Self::Integer, AttributeValue::Integer(_))
            | (Self::String, AttributeValue::String(_))
            | (Self::UnlimitedNatural, AttributeValue::UnlimitedNatural(_)) => true,
            (Self::Enumeration(literals), AttributeValue::String(s)) => {
                literals.iter().any(|literal| literal == s.as_str())
            }
            _ => false,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("Boolean"),
            Self::Integer => f.write_str("Integer"),
            Self::String => f.write_str("String"),
            Self::UnlimitedNatural => f.write_str("UnlimitedNatural"),
            Self::Enumeration(literals) => {
                let names: Vec<String> = literals.iter().map(Id::as_string).collect();
                write!(f, "enumeration({})", names.join("|"))
            }
        }
    }
}

/// A scalar attribute value.
///
/// Deserializes from a bare TOML/JSON scalar: booleans, integers and
/// strings map onto the matching variants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    String(String),
    UnlimitedNatural(UnlimitedNatural),
}

impl AttributeValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_unlimited_natural(&self) -> Option<UnlimitedNatural> {
        match self {
            Self::UnlimitedNatural(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
            Self::UnlimitedNatural(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<UnlimitedNatural> for AttributeValue {
    fn from(value: UnlimitedNatural) -> Self {
        Self::UnlimitedNatural(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_natural_parse() {
        assert_eq!("*".parse::<UnlimitedNatural>(), Ok(UnlimitedNatural::Unbounded));
        assert_eq!(" 7 ".parse::<UnlimitedNatural>(), Ok(UnlimitedNatural::Finite(7)));
        assert!("-1".parse::<UnlimitedNatural>().is_err());
        assert!("many".parse::<UnlimitedNatural>().is_err());
    }

    #[test]
    fn test_unlimited_natural_ordering() {
        let values = [
            UnlimitedNatural::Unbounded,
            UnlimitedNatural::Finite(10),
            UnlimitedNatural::Finite(0),
        ];
        let mut sorted = values;
        sorted.sort();
        assert_eq!(
            sorted,
            [
                UnlimitedNatural::Finite(0),
                UnlimitedNatural::Finite(10),
                UnlimitedNatural::Unbounded
            ]
        );
    }

    #[test]
    fn test_enumeration_accepts_listed_literals() {
        let aggregation = AttributeType::Enumeration(vec![
            Id::new("none"),
            Id::new("shared"),
            Id::new("composite"),
        ]);

        assert!(aggregation.accepts(&"composite".into()));
        assert!(!aggregation.accepts(&"aggregate".into()));
        assert!(!aggregation.accepts(&AttributeValue::Bool(true)));
    }

    #[test]
    fn test_type_checks() {
        assert!(AttributeType::Integer.accepts(&AttributeValue::Integer(1)));
        assert!(!AttributeType::Integer.accepts(&AttributeValue::String("1".into())));
        assert!(
            AttributeType::UnlimitedNatural
                .accepts(&AttributeValue::UnlimitedNatural(UnlimitedNatural::Unbounded))
        );
    }

    #[test]
    fn test_attribute_value_display() {
        assert_eq!(AttributeValue::Bool(false).to_string(), "false");
        assert_eq!(AttributeValue::Integer(-4).to_string(), "-4");
        assert_eq!(
            AttributeValue::UnlimitedNatural(UnlimitedNatural::Unbounded).to_string(),
            "*"
        );
    }
}
