//! Badge registry.
//!
//! Maps lower-cased badge contract addresses to their descriptor. Built once
//! from configuration at startup and shared read-only afterwards.

pub mod rules;

use std::collections::HashMap;
use std::fmt;

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::BadgeConfig;

pub use rules::{AllowlistBadge, BadgeRules, OpenBadge};

#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("duplicate badge \"{0}\"")]
    Duplicate(String),

    #[error("badge rule failed: {0}")]
    Rule(String),
}

pub type BadgeResult<T> = Result<T, BadgeError>;

/// Registry key for an address string.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// A claimable badge.
pub struct Badge {
    pub name: String,
    pub address: Address,
    /// EIP712Proxy the badge is attested through.
    pub proxy: Address,
    pub rules: Box<dyn BadgeRules>,
}

impl Badge {
    pub fn new(name: impl Into<String>, address: Address, proxy: Address, rules: Box<dyn BadgeRules>) -> Self {
        Self {
            name: name.into(),
            address,
            proxy,
            rules,
        }
    }
}

impl fmt::Debug for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Badge")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("proxy", &self.proxy)
            .finish()
    }
}

/// Read-only lookup of badges by address.
#[derive(Debug, Default)]
pub struct BadgeRegistry {
    badges: HashMap<String, Badge>,
}

impl BadgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from configuration entries.
    pub fn from_config(entries: &[BadgeConfig]) -> BadgeResult<Self> {
        let mut registry = Self::new();
        for entry in entries {
            registry.insert(Badge::new(
                entry.name.clone(),
                entry.address,
                entry.proxy,
                rules::rules_for(&entry.rule),
            ))?;
        }

        tracing::info!(badges = registry.len(), "Badge registry loaded");
        Ok(registry)
    }

    /// Add a badge. Keys are unique.
    pub fn insert(&mut self, badge: Badge) -> BadgeResult<()> {
        let key = normalize_address(&badge.address.to_string());
        if self.badges.contains_key(&key) {
            return Err(BadgeError::Duplicate(key));
        }
        self.badges.insert(key, badge);
        Ok(())
    }

    /// Look up a badge by address string in any letter case.
    pub fn get(&self, address: &str) -> Option<&Badge> {
        self.badges.get(&normalize_address(address))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Badge> {
        self.badges.values()
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EligibilityRule;
    use alloy::primitives::address;

    const BADGE: Address = address!("0xA51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0");
    const PROXY: Address = address!("0x0000000000000000000000000000000000000abc");

    fn entry(address: Address) -> BadgeConfig {
        BadgeConfig {
            name: "Simple Badge".to_string(),
            address,
            proxy: PROXY,
            rule: EligibilityRule::Open,
            proxy_domain: None,
        }
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("0xA51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0"),
            "0xa51c1fc2f0d1a1b8494ed1fe312d7c3a78ed91c0"
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = BadgeRegistry::from_config(&[entry(BADGE)]).unwrap();

        let badge = registry
            .get("0xa51c1fc2f0d1a1b8494ed1fe312d7c3a78ed91c0")
            .unwrap();
        assert_eq!(badge.name, "Simple Badge");
        assert_eq!(badge.proxy, PROXY);
        assert!(registry.get("0xA51C1FC2F0D1A1B8494ED1FE312D7C3A78ED91C0").is_some());
        assert!(registry.get("0x0000000000000000000000000000000000000001").is_none());
    }

    #[test]
    fn test_duplicate_badge_rejected() {
        let err = BadgeRegistry::from_config(&[entry(BADGE), entry(BADGE)]).unwrap_err();
        assert!(matches!(err, BadgeError::Duplicate(_)));
    }
}
