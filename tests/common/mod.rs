//! Shared fixtures for the badge API integration tests.

use std::sync::Arc;

use alloy::primitives::{address, b256, Address, Bytes, B256};
use async_trait::async_trait;

use badge_attester::badges::{
    AllowlistBadge, Badge, BadgeError, BadgeRegistry, BadgeResult, BadgeRules, OpenBadge,
};
use badge_attester::chain::Wallet;
use badge_attester::config::{EasConfig, ProxyDomainConfig};
use badge_attester::eas::{DelegatedAttester, ProxyDomains};
use badge_attester::http::AppState;

/// Anvil account #0.
pub const SIGNER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub const CHAIN_ID: u64 = 534351;
pub const SCHEMA_UID: B256 =
    b256!("0xd57de4f41c3d3cc855eadef68f98c0d4edd22d57161d96b7c06d2f4336cc3b49");

pub const PROXY: Address = address!("0x0000000000000000000000000000000000000abc");
pub const UNPINNED_PROXY: Address = address!("0x0000000000000000000000000000000000000fed");
pub const OPEN_BADGE: Address = address!("0xA51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0");
pub const ALLOWLIST_BADGE: Address = address!("0x00000000000000000000000000000000000000b2");

pub const ALLOWED: Address = address!("0x0000000000000000000000000000000000000001");
pub const STRANGER: Address = address!("0x0000000000000000000000000000000000000002");

pub fn signer() -> Wallet {
    Wallet::from_private_key(SIGNER_KEY).unwrap()
}

/// Rules that fail every check, as a backend outage would.
pub struct FailingRules;

#[async_trait]
impl BadgeRules for FailingRules {
    async fn is_eligible(&self, _recipient: Address) -> BadgeResult<bool> {
        Err(BadgeError::Rule("eligibility backend unavailable".to_string()))
    }

    async fn create_payload(&self, _recipient: Address) -> BadgeResult<Bytes> {
        Err(BadgeError::Rule("eligibility backend unavailable".to_string()))
    }
}

/// State with an open badge and an allowlist badge behind one pinned proxy.
/// Needs no RPC.
pub fn test_state() -> AppState {
    state_with(vec![
        Badge::new("Simple Badge", OPEN_BADGE, PROXY, Box::new(OpenBadge)),
        Badge::new(
            "Allowlist Badge",
            ALLOWLIST_BADGE,
            PROXY,
            Box::new(AllowlistBadge::new([ALLOWED])),
        ),
    ])
}

/// State serving `badges`. Only [`PROXY`] has a pinned domain and there is
/// no RPC client.
pub fn state_with(badges: Vec<Badge>) -> AppState {
    let mut domains = ProxyDomains::new(None, Some(CHAIN_ID));
    domains.pin(
        PROXY,
        ProxyDomainConfig {
            name: "ScrollBadgeAttesterProxy".to_string(),
            version: "1.3.0".to_string(),
        },
    );

    let mut registry = BadgeRegistry::new();
    for badge in badges {
        registry.insert(badge).unwrap();
    }

    let eas = EasConfig {
        schema_uid: SCHEMA_UID,
        ..EasConfig::default()
    };
    let attester = DelegatedAttester::new(&eas, Arc::new(domains)).unwrap();

    AppState {
        registry: Arc::new(registry),
        attester: Arc::new(attester),
        signer: signer(),
    }
}
