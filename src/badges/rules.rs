//! Badge eligibility rules and payload generation.

use std::collections::HashSet;

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::badges::BadgeResult;
use crate::config::EligibilityRule;

/// Per-badge claim logic.
#[async_trait]
pub trait BadgeRules: Send + Sync {
    /// Whether `recipient` may claim the badge.
    async fn is_eligible(&self, recipient: Address) -> BadgeResult<bool>;

    /// Badge-specific payload attested alongside the badge address.
    async fn create_payload(&self, recipient: Address) -> BadgeResult<Bytes>;
}

/// Anyone may claim; no payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenBadge;

#[async_trait]
impl BadgeRules for OpenBadge {
    async fn is_eligible(&self, _recipient: Address) -> BadgeResult<bool> {
        Ok(true)
    }

    async fn create_payload(&self, _recipient: Address) -> BadgeResult<Bytes> {
        Ok(Bytes::new())
    }
}

/// Only a fixed set of recipients may claim; no payload.
#[derive(Debug, Clone, Default)]
pub struct AllowlistBadge {
    recipients: HashSet<Address>,
}

impl AllowlistBadge {
    pub fn new(recipients: impl IntoIterator<Item = Address>) -> Self {
        Self {
            recipients: recipients.into_iter().collect(),
        }
    }
}

#[async_trait]
impl BadgeRules for AllowlistBadge {
    async fn is_eligible(&self, recipient: Address) -> BadgeResult<bool> {
        Ok(self.recipients.contains(&recipient))
    }

    async fn create_payload(&self, _recipient: Address) -> BadgeResult<Bytes> {
        Ok(Bytes::new())
    }
}

/// Instantiate the rules described by a configuration entry.
pub fn rules_for(rule: &EligibilityRule) -> Box<dyn BadgeRules> {
    match rule {
        EligibilityRule::Open => Box::new(OpenBadge),
        EligibilityRule::Allowlist { recipients } => {
            Box::new(AllowlistBadge::new(recipients.iter().copied()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const ALICE: Address = address!("0x0000000000000000000000000000000000000001");
    const BOB: Address = address!("0x0000000000000000000000000000000000000002");

    #[tokio::test]
    async fn test_open_badge() {
        let rules = OpenBadge;
        assert!(rules.is_eligible(ALICE).await.unwrap());
        assert!(rules.create_payload(ALICE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_allowlist_badge() {
        let rules = rules_for(&EligibilityRule::Allowlist {
            recipients: vec![ALICE],
        });
        assert!(rules.is_eligible(ALICE).await.unwrap());
        assert!(!rules.is_eligible(BOB).await.unwrap());
        assert!(rules.create_payload(ALICE).await.unwrap().is_empty());
    }
}
