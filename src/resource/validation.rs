//! Attribute validators
//!
//! Validators run against configured values before any remote call is made.

use regex::Regex;
use serde::{Serialize, Serializer};

/// A check applied to a string attribute value
#[derive(Debug, Clone)]
pub enum Validator {
    /// Length in characters must fall within `min..=max`
    StringLenBetween { min: usize, max: usize },
    /// Value must match the pattern; `message` explains the rule
    StringMatch {
        pattern: &'static Regex,
        message: String,
    },
    /// Every inner validator must pass
    All(Vec<Validator>),
}

impl Validator {
    /// Check `value` for attribute `key`, collecting error messages
    pub fn validate(&self, key: &str, value: &str) -> Vec<String> {
        match self {
            Validator::StringLenBetween { min, max } => {
                let len = value.chars().count();
                if len < *min || len > *max {
                    vec![format!(
                        "expected length of {} to be in the range ({} - {}), got {}",
                        key, min, max, value
                    )]
                } else {
                    Vec::new()
                }
            }
            Validator::StringMatch { pattern, message } => {
                if pattern.is_match(value) {
                    Vec::new()
                } else {
                    vec![format!("invalid value for {} ({})", key, message)]
                }
            }
            Validator::All(validators) => validators
                .iter()
                .flat_map(|v| v.validate(key, value))
                .collect(),
        }
    }

    /// Short human readable description, used in schema output
    pub fn describe(&self) -> String {
        match self {
            Validator::StringLenBetween { min, max } => format!("length {}..={}", min, max),
            Validator::StringMatch { pattern, .. } => format!("matches {}", pattern.as_str()),
            Validator::All(validators) => validators
                .iter()
                .map(Validator::describe)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl Serialize for Validator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.describe())
    }
}

pub fn string_len_between(min: usize, max: usize) -> Validator {
    Validator::StringLenBetween { min, max }
}

/// Pattern match validator
///
/// Patterns live in statics so each is compiled once.
pub fn string_match(pattern: &'static Regex, message: &str) -> Validator {
    Validator::StringMatch {
        pattern,
        message: message.to_string(),
    }
}

pub fn all(validators: Vec<Validator>) -> Validator {
    Validator::All(validators)
}
