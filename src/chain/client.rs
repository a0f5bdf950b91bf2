//! Chain RPC client with timeout and failover handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Query chain state (chain ID, receipts)
//! - Bound every call with the configured timeout

use std::future::Future;
use std::time::Duration;

use alloy::primitives::TxHash;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use tokio::time::timeout;

use crate::chain::types::{ChainConfig, ChainError, ChainId, ChainResult};

/// Read-only chain client with failover support.
#[derive(Clone)]
pub struct ChainClient {
    /// Providers in priority order (primary first).
    providers: Vec<DynProvider>,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a new chain client.
    ///
    /// Does not touch the network; use [`ChainClient::verify_chain_id`] to
    /// check the endpoint against a pinned chain ID.
    pub fn new(config: ChainConfig) -> ChainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(ProviderBuilder::new().connect_http(primary_url).erased());

        for url_str in &config.failover_urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => providers.push(ProviderBuilder::new().connect_http(url).erased()),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            failovers = providers.len() - 1,
            "Chain client initialized"
        );

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Run `call` against each provider in turn until one succeeds.
    async fn with_failover<T, E, F, Fut>(&self, what: &str, call: F) -> ChainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider")
                }
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout, trying next provider"),
            }
        }

        if self.providers.len() == 1 {
            return Err(ChainError::Rpc(format!("Failed to {}", what)));
        }
        Err(ChainError::Rpc(format!("All RPC providers failed to {}", what)))
    }

    /// Get the chain ID reported by the RPC.
    pub async fn get_chain_id(&self) -> ChainResult<ChainId> {
        self.with_failover("get chain id", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    /// The pinned chain ID if configured, otherwise the RPC's.
    pub async fn chain_id(&self) -> ChainResult<ChainId> {
        match self.config.chain_id {
            Some(id) => Ok(ChainId(id)),
            None => self.get_chain_id().await,
        }
    }

    /// Verify the connected chain matches the pinned chain ID, if any.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let Some(expected) = self.config.chain_id else {
            return Ok(());
        };
        let actual = self.get_chain_id().await?;
        if actual.0 != expected {
            return Err(ChainError::ChainMismatch {
                expected,
                actual: actual.0,
            });
        }
        Ok(())
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ChainResult<Option<TransactionReceipt>> {
        self.with_failover("get receipt", move |p| async move {
            p.get_transaction_receipt(tx_hash).await
        })
        .await
    }

    /// The primary provider, for contract calls.
    pub fn provider(&self) -> &DynProvider {
        &self.providers[0]
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout_duration
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ChainConfig {
        ChainConfig {
            // Nothing listens on port 1.
            rpc_url: "http://127.0.0.1:1".to_string(),
            failover_urls: Vec::new(),
            chain_id: Some(31337), // Anvil default
            rpc_timeout_secs: 2,
        }
    }

    #[test]
    fn test_invalid_rpc_url() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let err = ChainClient::new(config).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_pinned_chain_id_skips_rpc() {
        let client = ChainClient::new(test_config()).unwrap();
        assert_eq!(client.chain_id().await.unwrap(), ChainId(31337));
    }

    #[tokio::test]
    async fn test_rpc_failover() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());
        config.failover_urls.push("not a url".to_string());

        let client = ChainClient::new(config).unwrap();
        let result = client.get_chain_id().await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("All RPC providers failed"));
    }
}
