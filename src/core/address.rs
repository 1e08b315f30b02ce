//! Address - wallet account identifiers as delivered by the provider
//!
//! Addresses are kept exactly as the provider returns them (EIP-55 checksum
//! casing included). Authorization compares them ASCII case-insensitively.

use serde::{Deserialize, Serialize};
use std::fmt;

const SHORT_HEAD: usize = 6;
const SHORT_TAIL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, the only equality used for access checks.
    pub fn matches(&self, other: &Address) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// Display form: "0x6e7B...BcDb4" style (first 6, "...", last 4).
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let head: String = chars.iter().take(SHORT_HEAD).collect();
        let tail: String = chars[chars.len().saturating_sub(SHORT_TAIL)..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}
