//! EAS error and transport types.

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::ChainError;

/// Errors raised while building, signing or submitting attestations.
#[derive(Debug, Error)]
pub enum EasError {
    /// Schema string or schema values are malformed.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The proxy's EIP-712 domain could not be determined.
    #[error("Cannot resolve EIP-712 domain of proxy {proxy}: {reason}")]
    Domain { proxy: Address, reason: String },

    /// The transaction reverted with the given revert data.
    #[error("Transaction reverted with data {0}")]
    Reverted(Bytes),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Result type for EAS operations.
pub type EasResult<T> = Result<T, EasError>;

/// An unsigned transaction ready to be signed and sent by the claimer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulatedTransaction {
    /// Contract to call.
    pub to: Address,
    /// ABI-encoded calldata.
    pub data: Bytes,
}
