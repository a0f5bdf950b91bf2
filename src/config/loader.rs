//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use alloy::primitives::{Address, B256};

use crate::config::schema::{AttesterConfig, BadgeConfig, EligibilityRule};
use crate::config::validation::{validate_scope, ValidationError, ValidationScope};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Display name of the badge assembled from `SIMPLE_BADGE_*` variables.
pub const SIMPLE_BADGE_NAME: &str = "Simple Badge";

/// Load configuration for badge signing: defaults, then the optional TOML
/// file, then the process environment (including a `.env` file), then
/// validation.
pub fn load_config(path: Option<&Path>) -> Result<AttesterConfig, ConfigError> {
    load_config_for(path, ValidationScope::Attestation)
}

/// Like [`load_config`], validating only what `scope` depends on.
pub fn load_config_for(
    path: Option<&Path>,
    scope: ValidationScope,
) -> Result<AttesterConfig, ConfigError> {
    let base = match path {
        Some(path) => read_config_file(path)?,
        None => AttesterConfig::default(),
    };

    // A missing .env file is fine.
    let _ = dotenv::dotenv();
    resolve_config(base, |key| std::env::var(key).ok(), scope)
}

/// Overlay `lookup` onto `base` and validate the result for `scope`.
pub fn resolve_config<F>(
    mut config: AttesterConfig,
    lookup: F,
    scope: ValidationScope,
) -> Result<AttesterConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env(&mut config, lookup)?;
    validate_scope(&config, scope).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse a TOML file without applying the environment or validating.
pub fn read_config_file(path: &Path) -> Result<AttesterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts `std::env::var` so the mapping can be exercised
/// without touching the process environment.
pub fn apply_env<F>(config: &mut AttesterConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("RPC_ENDPOINT") {
        config.chain.rpc_url = url;
    }
    if let Some(raw) = lookup("CHAIN_ID") {
        let id = raw.trim().parse::<u64>().map_err(|e| ConfigError::Env {
            var: "CHAIN_ID",
            message: e.to_string(),
        })?;
        config.chain.chain_id = Some(id);
    }

    let port = lookup("SERVER_PORT")
        .map(|v| ("SERVER_PORT", v))
        .or_else(|| lookup("EXPRESS_SERVER_PORT").map(|v| ("EXPRESS_SERVER_PORT", v)));
    if let Some((var, raw)) = port {
        config.server.port = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Env { var, message: e.to_string() }
        })?;
    }

    if let Some(raw) = lookup("EAS_MAIN_CONTRACT_ADDRESS") {
        config.eas.eas_address = parse_address("EAS_MAIN_CONTRACT_ADDRESS", &raw)?;
    }
    if let Some(schema) = lookup("SCROLL_BADGE_SCHEMA") {
        config.eas.schema = schema;
    }
    if let Some(raw) = lookup("SCROLL_BADGE_SCHEMA_UID") {
        config.eas.schema_uid = raw.trim().parse::<B256>().map_err(|e| ConfigError::Env {
            var: "SCROLL_BADGE_SCHEMA_UID",
            message: e.to_string(),
        })?;
    }
    if let Some(raw) = lookup("SCROLL_PROFILE_REGISTRY_PROXY_CONTRACT_ADDRESS") {
        config.referral.profile_registry =
            parse_address("SCROLL_PROFILE_REGISTRY_PROXY_CONTRACT_ADDRESS", &raw)?;
    }

    let badge = lookup("SIMPLE_BADGE_CONTRACT_ADDRESS");
    let proxy = lookup("SIMPLE_BADGE_ATTESTER_PROXY_CONTRACT_ADDRESS");
    if let (Some(badge), Some(proxy)) = (badge, proxy) {
        let address = parse_address("SIMPLE_BADGE_CONTRACT_ADDRESS", &badge)?;
        let proxy = parse_address("SIMPLE_BADGE_ATTESTER_PROXY_CONTRACT_ADDRESS", &proxy)?;

        // The file may already describe the same badge in more detail.
        if !config.badges.iter().any(|b| b.address == address) {
            config.badges.push(BadgeConfig {
                name: SIMPLE_BADGE_NAME.to_string(),
                address,
                proxy,
                rule: EligibilityRule::Open,
                proxy_domain: None,
            });
        }
    }

    Ok(())
}

fn parse_address(var: &'static str, raw: &str) -> Result<Address, ConfigError> {
    raw.trim().parse::<Address>().map_err(|e| ConfigError::Env {
        var,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overlay() {
        let mut config = AttesterConfig::default();
        apply_env(
            &mut config,
            env(&[
                ("RPC_ENDPOINT", "https://sepolia-rpc.scroll.io"),
                ("EXPRESS_SERVER_PORT", "4000"),
                ("SCROLL_BADGE_SCHEMA_UID", "0xd57de4f41c3d3cc855eadef68f98c0d4edd22d57161d96b7c06d2f4336cc3b49"),
                ("SIMPLE_BADGE_CONTRACT_ADDRESS", "0xA51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0"),
                ("SIMPLE_BADGE_ATTESTER_PROXY_CONTRACT_ADDRESS", "0x0000000000000000000000000000000000000abc"),
            ]),
        )
        .unwrap();

        assert_eq!(config.chain.rpc_url, "https://sepolia-rpc.scroll.io");
        assert_eq!(config.server.port, 4000);
        assert!(!config.eas.schema_uid.is_zero());
        assert_eq!(config.badges.len(), 1);
        assert_eq!(config.badges[0].name, SIMPLE_BADGE_NAME);
        assert_eq!(config.badges[0].rule, EligibilityRule::Open);
    }

    #[test]
    fn test_server_port_wins_over_legacy_name() {
        let mut config = AttesterConfig::default();
        apply_env(
            &mut config,
            env(&[("SERVER_PORT", "5000"), ("EXPRESS_SERVER_PORT", "4000")]),
        )
        .unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_invalid_address_reports_variable() {
        let mut config = AttesterConfig::default();
        let err = apply_env(&mut config, env(&[("EAS_MAIN_CONTRACT_ADDRESS", "0x1234")]))
            .unwrap_err();
        assert!(err.to_string().contains("EAS_MAIN_CONTRACT_ADDRESS"));
    }

    #[test]
    fn test_referral_only_environment_resolves() {
        let lookup = || {
            env(&[
                ("RPC_ENDPOINT", "https://sepolia-rpc.scroll.io"),
                ("SCROLL_PROFILE_REGISTRY_PROXY_CONTRACT_ADDRESS", "0x0000000000000000000000000000000000000def"),
            ])
        };

        let config =
            resolve_config(AttesterConfig::default(), lookup(), ValidationScope::Referral).unwrap();
        assert_eq!(
            config.referral.profile_registry,
            "0x0000000000000000000000000000000000000def".parse::<Address>().unwrap()
        );

        // Badge signing still requires a schema UID.
        let err = resolve_config(AttesterConfig::default(), lookup(), ValidationScope::Attestation)
            .unwrap_err();
        assert!(err.to_string().contains("eas.schema_uid"));
    }

    #[test]
    fn test_referral_without_registry_is_rejected() {
        let err = resolve_config(
            AttesterConfig::default(),
            env(&[("RPC_ENDPOINT", "https://sepolia-rpc.scroll.io")]),
            ValidationScope::Referral,
        )
        .unwrap_err();
        assert!(err.to_string().contains("referral.profile_registry"));
    }

    #[test]
    fn test_simple_badge_not_duplicated_when_file_lists_it() {
        let raw = r#"
            [[badges]]
            name = "Early Adopter"
            address = "0xA51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0"
            proxy = "0x0000000000000000000000000000000000000abc"
            rule = { kind = "allowlist", recipients = [] }
        "#;
        let mut config: AttesterConfig = toml::from_str(raw).unwrap();
        apply_env(
            &mut config,
            env(&[
                ("SIMPLE_BADGE_CONTRACT_ADDRESS", "0xa51c1fc2f0d1a1b8494ed1fe312d7c3a78ed91c0"),
                ("SIMPLE_BADGE_ATTESTER_PROXY_CONTRACT_ADDRESS", "0x0000000000000000000000000000000000000abc"),
            ]),
        )
        .unwrap();

        assert_eq!(config.badges.len(), 1);
        assert_eq!(config.badges[0].name, "Early Adopter");
        assert!(matches!(config.badges[0].rule, EligibilityRule::Allowlist { .. }));
    }

    #[test]
    fn test_simple_badge_needs_both_addresses() {
        let mut config = AttesterConfig::default();
        apply_env(
            &mut config,
            env(&[("SIMPLE_BADGE_CONTRACT_ADDRESS", "0xA51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0")]),
        )
        .unwrap();
        assert!(config.badges.is_empty());
    }
}
