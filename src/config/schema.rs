//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the attester.
//! All types derive Serde traits for deserialization from config files.
//! Private keys are deliberately absent: they are read from the environment
//! by [`crate::chain::Wallet`] only.

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Schema string of the badge attestation schema.
pub const DEFAULT_BADGE_SCHEMA: &str = "address badge, bytes payload";

/// Root configuration for the badge attester.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AttesterConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// JSON-RPC connection settings.
    pub chain: ChainConfig,

    /// EAS contract and schema settings.
    pub eas: EasConfig,

    /// Badge registry entries.
    pub badges: Vec<BadgeConfig>,

    /// Referral signing settings.
    pub referral: ReferralConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host (e.g., "0.0.0.0").
    pub host: String,

    /// Listening port.
    pub port: u16,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Socket address string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Pinned chain ID. When unset it is queried from the RPC.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: None,
            rpc_timeout_secs: 10,
        }
    }
}

/// EAS contract and badge schema configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EasConfig {
    /// Main EAS contract (emits `Attested`).
    pub eas_address: Address,

    /// Badge schema definition string.
    pub schema: String,

    /// Registered UID of the badge schema.
    pub schema_uid: B256,

    /// Validity window of a delegated signature, in seconds.
    pub deadline_secs: u64,
}

impl Default for EasConfig {
    fn default() -> Self {
        Self {
            eas_address: Address::ZERO,
            schema: DEFAULT_BADGE_SCHEMA.to_string(),
            schema_uid: B256::ZERO,
            deadline_secs: 3600,
        }
    }
}

/// A single badge registry entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BadgeConfig {
    /// Display name.
    pub name: String,

    /// Badge contract address.
    pub address: Address,

    /// EIP712Proxy the badge attests through.
    pub proxy: Address,

    /// Eligibility rule.
    #[serde(default)]
    pub rule: EligibilityRule,

    /// Pinned EIP-712 domain of the proxy; skips the RPC lookup.
    #[serde(default)]
    pub proxy_domain: Option<ProxyDomainConfig>,
}

/// Who may claim a badge.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EligibilityRule {
    /// Anyone may claim.
    #[default]
    Open,
    /// Only listed recipients may claim.
    Allowlist { recipients: Vec<Address> },
}

/// Statically known EIP-712 domain name/version of a proxy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProxyDomainConfig {
    pub name: String,
    pub version: String,
}

/// Referral signing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferralConfig {
    /// Profile registry proxy used as the verifying contract.
    pub profile_registry: Address,

    /// Validity window of a referral signature, in seconds.
    pub deadline_secs: u64,
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            profile_registry: Address::ZERO,
            deadline_secs: 3600,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json_logs: bool,

    /// Prometheus exporter bind address; disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "badge_attester=debug,tower_http=debug".to_string(),
            json_logs: false,
            metrics_address: None,
        }
    }
}
