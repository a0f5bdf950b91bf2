//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the chain client
//! - Build proxy domains, badge registry and delegated attester
//! - Load the attester key
//!
//! Fail fast: any startup error is fatal. A chain ID mismatch is only
//! logged, since pinned domains never consult the RPC.

use std::sync::Arc;

use thiserror::Error;

use crate::badges::{BadgeError, BadgeRegistry};
use crate::chain::wallet::SIGNER_KEY_ENV_VAR;
use crate::chain::{ChainClient, ChainError, Wallet};
use crate::config::AttesterConfig;
use crate::eas::{DelegatedAttester, EasError, ProxyDomains};
use crate::http::AppState;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("chain setup failed: {0}")]
    Chain(#[from] ChainError),

    #[error("badge registry: {0}")]
    Badges(#[from] BadgeError),

    #[error("attester setup failed: {0}")]
    Eas(#[from] EasError),
}

/// Build the shared application state from validated configuration.
///
/// Reads the attester key from `SIGNER_PRIVATE_KEY`.
pub async fn build_state(config: &AttesterConfig) -> Result<AppState, StartupError> {
    let signer = Wallet::from_env(SIGNER_KEY_ENV_VAR)?;
    build_state_with_signer(config, signer).await
}

/// Build the shared application state with an explicit attester key.
pub async fn build_state_with_signer(
    config: &AttesterConfig,
    signer: Wallet,
) -> Result<AppState, StartupError> {
    let client = ChainClient::new(config.chain.clone())?;
    if let Err(e) = client.verify_chain_id().await {
        tracing::warn!(error = %e, "Chain ID verification failed");
    }

    let domains = Arc::new(ProxyDomains::from_config(config, Some(client)));
    let registry = Arc::new(BadgeRegistry::from_config(&config.badges)?);
    for badge in registry.iter() {
        tracing::info!(name = %badge.name, badge = %badge.address, proxy = %badge.proxy, "Badge registered");
    }
    let attester = Arc::new(DelegatedAttester::new(&config.eas, domains)?);

    tracing::info!(
        signer = %signer.address(),
        badges = registry.len(),
        schema_uid = %attester.schema_uid(),
        "Attester ready"
    );

    Ok(AppState {
        registry,
        attester,
        signer,
    })
}
