//! Wallet management and hash signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, Signer};

use crate::chain::types::{ChainError, ChainResult};

/// Attester key: signs delegated attestations and referrals.
pub const SIGNER_KEY_ENV_VAR: &str = "SIGNER_PRIVATE_KEY";

/// Claimer key: submits delegated attestations on-chain.
pub const CLAIMER_KEY_ENV_VAR: &str = "CLAIMER_PRIVATE_KEY";

/// Deployer key: acts as the referrer in the referral flow.
pub const DEPLOYER_KEY_ENV_VAR: &str = "DEPLOYER_PRIVATE_KEY";

/// Local key wallet.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// Accepts keys with or without the `0x` prefix. The key is never logged.
    pub fn from_private_key(private_key_hex: &str) -> ChainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Wallet loaded");

        Ok(Self { signer })
    }

    /// Load a wallet from the named environment variable.
    pub fn from_env(var: &str) -> ChainResult<Self> {
        let private_key = std::env::var(var)
            .map_err(|_| ChainError::Wallet(format!("Environment variable {} not set", var)))?;

        Self::from_private_key(&private_key)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a 32-byte digest (e.g. an EIP-712 signing hash).
    pub async fn sign_hash(&self, hash: B256) -> ChainResult<Signature> {
        self.signer
            .sign_hash(&hash)
            .await
            .map_err(|e| ChainError::Wallet(format!("Signing failed: {}", e)))
    }

    /// Network wallet for providers that submit transactions.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}
