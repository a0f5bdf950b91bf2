//! EIP-712 domain resolution for attester proxies.
//!
//! A proxy signs over `{ name, version, chainId, verifyingContract }`. Name
//! and version come from pinned configuration or, failing that, from the
//! proxy's `getName()` / `version()` views. Resolved domains are cached per
//! proxy for the lifetime of the process.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::Eip712Domain;
use dashmap::DashMap;
use tokio::time::timeout;

use crate::chain::{ChainClient, ChainError};
use crate::config::schema::ProxyDomainConfig;
use crate::config::AttesterConfig;
use crate::eas::contracts::EIP712Proxy;
use crate::eas::types::{EasError, EasResult};

/// Resolved signing domain of one proxy.
#[derive(Debug, Clone)]
pub struct ProxyDomain {
    pub domain: Eip712Domain,
    pub name: String,
    pub version: String,
    /// Proxy predates the `attester` field in the `Attest` type.
    pub legacy: bool,
}

impl ProxyDomain {
    pub fn new(proxy: Address, chain_id: u64, name: String, version: String) -> Self {
        let legacy = is_legacy_version(&version);
        let domain = Eip712Domain::new(
            Some(Cow::Owned(name.clone())),
            Some(Cow::Owned(version.clone())),
            Some(U256::from(chain_id)),
            Some(proxy),
            None,
        );

        Self {
            domain,
            name,
            version,
            legacy,
        }
    }
}

/// Whether a proxy version signs the `Attest` type without `attester`.
///
/// Unparseable versions are treated as current.
pub fn is_legacy_version(version: &str) -> bool {
    let mut parts = version
        .trim()
        .trim_start_matches('v')
        .split('.')
        .map(|p| p.parse::<u64>());

    match (parts.next(), parts.next()) {
        (Some(Ok(major)), Some(Ok(minor))) => (major, minor) < (1, 3),
        _ => false,
    }
}

/// Per-proxy domain resolver with static pins and a lookup cache.
pub struct ProxyDomains {
    client: Option<ChainClient>,
    chain_id: Option<u64>,
    pinned: HashMap<Address, ProxyDomainConfig>,
    cache: DashMap<Address, Arc<ProxyDomain>>,
}

impl ProxyDomains {
    /// Create a resolver. Without a client, every proxy must be pinned and
    /// `chain_id` must be set.
    pub fn new(client: Option<ChainClient>, chain_id: Option<u64>) -> Self {
        Self {
            client,
            chain_id,
            pinned: HashMap::new(),
            cache: DashMap::new(),
        }
    }

    /// Build a resolver with every pinned proxy domain from `config`.
    pub fn from_config(config: &AttesterConfig, client: Option<ChainClient>) -> Self {
        let mut domains = Self::new(client, config.chain.chain_id);
        for badge in &config.badges {
            if let Some(pin) = &badge.proxy_domain {
                domains.pin(badge.proxy, pin.clone());
            }
        }
        domains
    }

    /// Pin the name/version of a proxy.
    pub fn pin(&mut self, proxy: Address, domain: ProxyDomainConfig) {
        self.pinned.insert(proxy, domain);
    }

    /// Resolve the signing domain of `proxy`.
    pub async fn resolve(&self, proxy: Address) -> EasResult<Arc<ProxyDomain>> {
        let cached = self.cache.get(&proxy).map(|hit| hit.value().clone());
        if let Some(hit) = cached {
            return Ok(hit);
        }

        let (name, version) = match self.pinned.get(&proxy) {
            Some(pin) => (pin.name.clone(), pin.version.clone()),
            None => self.fetch_identity(proxy).await?,
        };
        let chain_id = self.chain_id(proxy).await?;

        let resolved = Arc::new(ProxyDomain::new(proxy, chain_id, name, version));
        tracing::debug!(
            proxy = %proxy,
            name = %resolved.name,
            version = %resolved.version,
            chain_id = chain_id,
            legacy = resolved.legacy,
            "Resolved proxy domain"
        );

        self.cache.insert(proxy, resolved.clone());
        Ok(resolved)
    }

    async fn chain_id(&self, proxy: Address) -> EasResult<u64> {
        if let Some(id) = self.chain_id {
            return Ok(id);
        }
        let client = self.client(proxy)?;
        Ok(client.chain_id().await?.0)
    }

    async fn fetch_identity(&self, proxy: Address) -> EasResult<(String, String)> {
        let client = self.client(proxy)?;
        let contract = EIP712Proxy::new(proxy, client.provider().clone());
        let limit = client.timeout();

        let name = timeout(limit, contract.getName().call())
            .await
            .map_err(|_| ChainError::Timeout(limit.as_secs()))?
            .map_err(|e| ChainError::Contract(format!("getName() on {}: {}", proxy, e)))?;
        let version = timeout(limit, contract.version().call())
            .await
            .map_err(|_| ChainError::Timeout(limit.as_secs()))?
            .map_err(|e| ChainError::Contract(format!("version() on {}: {}", proxy, e)))?;

        Ok((name, version))
    }

    fn client(&self, proxy: Address) -> EasResult<&ChainClient> {
        self.client.as_ref().ok_or_else(|| EasError::Domain {
            proxy,
            reason: "not pinned and no RPC client configured".to_string(),
        })
    }
}

impl std::fmt::Debug for ProxyDomains {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyDomains")
            .field("chain_id", &self.chain_id)
            .field("pinned", &self.pinned.len())
            .field("cached", &self.cache.len())
            .finish()
    }
}
