//! Profile registry referral signatures.
//!
//! A referral lets a new profile owner mint with a referrer. The signer
//! signs `Referral(address referral,address owner,uint256 deadline)` over the
//! `ProfileRegistry` domain, and the owner passes
//! `abi.encode(owner, deadline, signature)` to the mint call. Replay
//! protection lives in the registry: one wallet can only mint one profile.

use std::borrow::Cow;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol;
use alloy::sol_types::{Eip712Domain, SolStruct, SolValue};
use serde::Serialize;

use crate::chain::{ChainResult, Wallet};

/// EIP-712 domain name of the profile registry.
pub const REFERRAL_DOMAIN_NAME: &str = "ProfileRegistry";

/// EIP-712 domain version of the profile registry.
pub const REFERRAL_DOMAIN_VERSION: &str = "1";

sol! {
    #[derive(Debug)]
    struct Referral {
        // referrer, receives the fee reward
        address referral;
        // mint transaction sender, owner of the new profile
        address owner;
        uint256 deadline;
    }
}

/// A signed referral ready to hand to the profile owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedReferral {
    pub referrer: Address,
    pub owner: Address,
    pub deadline: u64,
    /// 65-byte `r || s || v` signature.
    pub signature: Bytes,
    /// `abi.encode(owner, deadline, signature)`.
    pub encoded: Bytes,
}

/// Signing domain for a profile registry deployment.
pub fn referral_domain(registry: Address, chain_id: u64) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed(REFERRAL_DOMAIN_NAME)),
        Some(Cow::Borrowed(REFERRAL_DOMAIN_VERSION)),
        Some(U256::from(chain_id)),
        Some(registry),
        None,
    )
}

/// EIP-712 signing hash of a referral.
pub fn referral_signing_hash(
    registry: Address,
    chain_id: u64,
    referrer: Address,
    owner: Address,
    deadline: u64,
) -> B256 {
    let message = Referral {
        referral: referrer,
        owner,
        deadline: U256::from(deadline),
    };
    message.eip712_signing_hash(&referral_domain(registry, chain_id))
}

/// Sign a referral of `owner` by `referrer`.
pub async fn sign_referral(
    signer: &Wallet,
    registry: Address,
    chain_id: u64,
    referrer: Address,
    owner: Address,
    deadline: u64,
) -> ChainResult<SignedReferral> {
    let hash = referral_signing_hash(registry, chain_id, referrer, owner, deadline);
    let signature = Bytes::from(signer.sign_hash(hash).await?.as_bytes().to_vec());

    let encoded = (owner, U256::from(deadline), signature.clone()).abi_encode_params();

    tracing::debug!(
        registry = %registry,
        chain_id = chain_id,
        referrer = %referrer,
        owner = %owner,
        "Signed referral"
    );

    Ok(SignedReferral {
        referrer,
        owner,
        deadline,
        signature,
        encoded: encoded.into(),
    })
}
