//! App Configuration - passed from the application root

use crate::core::address::Address;
use crate::core::paths::env;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// The account allowed into `/admin` unless configured otherwise.
pub const DEFAULT_ADMIN_ADDRESS: &str = "0x6e7BCbD91a8560E7Dc44F9c2179eae315B9BcDb4";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid admin address '{0}': expected 0x followed by 40 hex digits")]
    InvalidAdminAddress(String),
}

fn address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("static regex"))
}

/// Check that `value` looks like an EVM account address.
pub fn parse_admin_address(value: &str) -> Result<Address, ConfigError> {
    let trimmed = value.trim();
    if address_re().is_match(trimmed) {
        Ok(Address::new(trimmed))
    } else {
        Err(ConfigError::InvalidAdminAddress(value.into()))
    }
}

/// App configuration. One instance feeds both the router guard and the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub admin_address: Address,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { admin_address: Address::new(DEFAULT_ADMIN_ADDRESS) }
    }
}

impl AppConfig {
    pub fn new() -> Self { Self::default() }

    pub fn with_admin_address(mut self, address: impl Into<Address>) -> Self {
        self.admin_address = address.into();
        self
    }

    /// Defaults, overridden by `BOOKMART_ADMIN_ADDRESS` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(env::ADMIN_ADDRESS) {
            Ok(value) => Ok(Self { admin_address: parse_admin_address(&value)? }),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn is_admin(&self, account: &Address) -> bool {
        account.matches(&self.admin_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_admin_is_valid() {
        assert!(parse_admin_address(DEFAULT_ADMIN_ADDRESS).is_ok());
    }

    #[test]
    fn test_parse_admin_address_rejects_garbage() {
        assert!(parse_admin_address("0x1234").is_err());
        assert!(parse_admin_address("6e7BCbD91a8560E7Dc44F9c2179eae315B9BcDb4").is_err());
        assert!(parse_admin_address("0xZZ7BCbD91a8560E7Dc44F9c2179eae315B9BcDb4").is_err());
    }

    #[test]
    fn test_parse_admin_address_trims() {
        let addr = parse_admin_address("  0x6e7bcbd91a8560e7dc44f9c2179eae315b9bcdb4\n").unwrap();
        assert_eq!(addr.as_str(), "0x6e7bcbd91a8560e7dc44f9c2179eae315b9bcdb4");
    }

    #[test]
    fn test_is_admin_case_insensitive() {
        let config = AppConfig::new();
        assert!(config.is_admin(&Address::from("0x6E7BCBD91A8560E7DC44F9C2179EAE315B9BCDB4")));
        assert!(!config.is_admin(&Address::from("0x0000000000000000000000000000000000000000")));
    }
}
