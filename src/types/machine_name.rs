// ABOUTME: DNS-compatible machine name validation.
// ABOUTME: Ensures host names follow RFC 1123 label requirements.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MachineNameError {
    #[error("machine name cannot be empty")]
    Empty,

    #[error("machine name exceeds maximum length of 63 characters")]
    TooLong,

    #[error("machine name cannot start with a hyphen")]
    StartsWithHyphen,

    #[error("machine name cannot end with a hyphen")]
    EndsWithHyphen,

    #[error("machine name must be lowercase")]
    NotLowercase,

    #[error("invalid character in machine name: '{0}'")]
    InvalidChar(char),
}

/// A validated docker-machine host name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MachineName(String);

impl MachineName {
    pub fn new(value: &str) -> Result<Self, MachineNameError> {
        if value.is_empty() {
            return Err(MachineNameError::Empty);
        }

        if value.len() > 63 {
            return Err(MachineNameError::TooLong);
        }

        if value.starts_with('-') {
            return Err(MachineNameError::StartsWithHyphen);
        }

        if value.ends_with('-') {
            return Err(MachineNameError::EndsWithHyphen);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(MachineNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(MachineNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MachineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
