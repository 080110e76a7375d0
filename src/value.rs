use derive_more::From;
use serde::{Deserialize, Serialize};

/// Enum representing possible values of a feature flag.
///
/// Conveniently implements `From` conversions for `bool`, `f64`, `String`, and `&str`.
///
/// # Examples
/// ```
/// # use flagwrap::FlagValue;
/// let enabled: FlagValue = true.into();
/// let threshold: FlagValue = 3.5.into();
/// let frequency: FlagValue = "weekly".into();
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, From, Clone)]
#[serde(untagged)]
pub enum FlagValue {
    /// A boolean value.
    Boolean(bool),
    /// A numeric value (floating-point).
    Number(f64),
    /// A string value.
    String(String),
}

impl FlagValue {
    /// Returns the value as a boolean if it is of type Boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FlagValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as a number if it is of type Number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FlagValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is of type String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            FlagValue::Boolean(_) => ValueKind::Boolean,
            FlagValue::Number(_) => ValueKind::Number,
            FlagValue::String(_) => ValueKind::String,
        }
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// Expected type of a flag value.
///
/// Used as a hint when parsing overrides: only [`ValueKind::Number`] changes how an override is
/// interpreted (see [`parse_override`][crate::parse_override]).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// A boolean flag.
    Boolean,
    /// A numeric flag.
    Number,
    /// A string flag.
    String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_untagged() {
        assert_eq!(
            serde_json::from_str::<FlagValue>("true").unwrap(),
            FlagValue::Boolean(true)
        );
        assert_eq!(
            serde_json::from_str::<FlagValue>("3.5").unwrap(),
            FlagValue::Number(3.5)
        );
        assert_eq!(
            serde_json::from_str::<FlagValue>("\"weekly\"").unwrap(),
            FlagValue::String("weekly".to_owned())
        );
    }

    #[test]
    fn accessors_match_variants() {
        assert_eq!(FlagValue::Boolean(true).as_boolean(), Some(true));
        assert_eq!(FlagValue::Number(1.0).as_str(), None);
        assert_eq!(FlagValue::from("weekly").kind(), ValueKind::String);
    }
}
