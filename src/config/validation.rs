//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject zero addresses and an unset schema UID
//! - Check that the schema string parses
//! - Detect duplicate badge entries
//!
//! Each [`ValidationScope`] checks only what its command uses. Returns all
//! validation errors, not just the first.

use std::collections::HashSet;
use std::fmt;

use alloy::primitives::Address;

use crate::badges::normalize_address;
use crate::config::schema::AttesterConfig;
use crate::eas::schema::SchemaEncoder;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Which part of the configuration a command depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScope {
    /// Badge signing: the server and `badge-cli attest`.
    Attestation,
    /// Referral signing: `badge-cli referral`.
    Referral,
}

/// Validate a fully assembled configuration for badge signing.
pub fn validate_config(config: &AttesterConfig) -> Result<(), Vec<ValidationError>> {
    validate_scope(config, ValidationScope::Attestation)
}

/// Validate the parts of `config` that `scope` depends on.
pub fn validate_scope(
    config: &AttesterConfig,
    scope: ValidationScope,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_common(config, &mut errors);
    match scope {
        ValidationScope::Attestation => check_attestation(config, &mut errors),
        ValidationScope::Referral => check_referral(config, &mut errors),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_common(config: &AttesterConfig, errors: &mut Vec<ValidationError>) {
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than 0"));
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.chain.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new("chain.rpc_url", "not a valid URL"));
    }
}

fn check_attestation(config: &AttesterConfig, errors: &mut Vec<ValidationError>) {
    if config.eas.schema_uid.is_zero() {
        errors.push(ValidationError::new("eas.schema_uid", "must be set"));
    }
    if let Err(e) = SchemaEncoder::new(&config.eas.schema) {
        errors.push(ValidationError::new("eas.schema", e.to_string()));
    }
    if config.eas.deadline_secs == 0 {
        errors.push(ValidationError::new("eas.deadline_secs", "must be greater than 0"));
    }

    let mut seen = HashSet::new();
    for (i, badge) in config.badges.iter().enumerate() {
        if badge.address == Address::ZERO {
            errors.push(ValidationError::new(format!("badges[{i}].address"), "must not be the zero address"));
        }
        if badge.proxy == Address::ZERO {
            errors.push(ValidationError::new(format!("badges[{i}].proxy"), "must not be the zero address"));
        }
        if !seen.insert(normalize_address(&badge.address.to_string())) {
            errors.push(ValidationError::new(
                format!("badges[{i}].address"),
                format!("duplicate badge {}", badge.address),
            ));
        }
    }
}

fn check_referral(config: &AttesterConfig, errors: &mut Vec<ValidationError>) {
    if config.referral.profile_registry == Address::ZERO {
        errors.push(ValidationError::new(
            "referral.profile_registry",
            "must not be the zero address",
        ));
    }
    if config.referral.deadline_secs == 0 {
        errors.push(ValidationError::new("referral.deadline_secs", "must be greater than 0"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{BadgeConfig, EligibilityRule};
    use alloy::primitives::{address, B256};

    fn badge(addr: Address) -> BadgeConfig {
        BadgeConfig {
            name: "Simple Badge".to_string(),
            address: addr,
            proxy: address!("0x0000000000000000000000000000000000000abc"),
            rule: EligibilityRule::Open,
            proxy_domain: None,
        }
    }

    fn valid_config() -> AttesterConfig {
        let mut config = AttesterConfig::default();
        config.eas.schema_uid = B256::repeat_byte(0x11);
        config.badges.push(badge(address!("0x0000000000000000000000000000000000000001")));
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.eas.schema_uid = B256::ZERO;
        config.eas.schema = "address".to_string();
        config.server.request_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(errors.len(), 3);
        assert!(fields.contains(&"eas.schema_uid"));
        assert!(fields.contains(&"eas.schema"));
        assert!(fields.contains(&"server.request_timeout_secs"));
    }

    #[test]
    fn test_referral_scope_ignores_badge_settings() {
        let mut config = AttesterConfig::default();
        config.referral.profile_registry = address!("0x0000000000000000000000000000000000000def");

        assert!(validate_scope(&config, ValidationScope::Referral).is_ok());
        // schema_uid is unset, which only matters for badge signing
        assert!(validate_scope(&config, ValidationScope::Attestation).is_err());
    }

    #[test]
    fn test_referral_scope_rejects_zero_registry() {
        let mut config = valid_config();
        config.referral.deadline_secs = 0;

        let errors = validate_scope(&config, ValidationScope::Referral).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["referral.profile_registry", "referral.deadline_secs"]);
    }

    #[test]
    fn test_duplicate_badges_rejected() {
        let mut config = valid_config();
        config.badges.push(badge(address!("0x0000000000000000000000000000000000000001")));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("duplicate badge"));
    }
}
