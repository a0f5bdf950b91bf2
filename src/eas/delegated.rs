//! Delegated proxy attestations.
//!
//! # Data Flow
//! ```text
//! badge + payload
//!     → SchemaEncoder (abi.encode(badge, payload))
//!     → Attest typed data, signed by the attester over the proxy domain
//!     → DelegatedProxyAttestationRequest
//!     → attestByDelegation calldata (PopulatedTransaction)
//! ```

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::{SolCall, SolStruct};

use crate::chain::Wallet;
use crate::config::EasConfig;
use crate::eas::contracts::{typed, typed_legacy, EIP712Proxy};
use crate::eas::domain::ProxyDomains;
use crate::eas::schema::SchemaEncoder;
use crate::eas::types::{EasResult, PopulatedTransaction};
use crate::observability::metrics;

pub use crate::eas::contracts::EIP712Proxy::{
    AttestationRequestData, DelegatedProxyAttestationRequest,
};

/// `expirationTime` value meaning "never expires".
pub const NO_EXPIRATION: u64 = 0;

/// Current unix time plus `window_secs`, saturating at `u64::MAX`.
pub fn deadline_from_now(window_secs: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    now.saturating_add(window_secs)
}

/// Builds and signs badge attestations for a fixed schema.
#[derive(Debug, Clone)]
pub struct DelegatedAttester {
    domains: Arc<ProxyDomains>,
    encoder: SchemaEncoder,
    schema_uid: B256,
    deadline_secs: u64,
}

impl DelegatedAttester {
    pub fn new(config: &EasConfig, domains: Arc<ProxyDomains>) -> EasResult<Self> {
        Ok(Self {
            domains,
            encoder: SchemaEncoder::new(&config.schema)?,
            schema_uid: config.schema_uid,
            deadline_secs: config.deadline_secs,
        })
    }

    pub fn schema_uid(&self) -> B256 {
        self.schema_uid
    }

    /// Sign a delegated attestation of `data` under `schema` for `recipient`.
    ///
    /// The attestation is revocable, has no expiration, no reference and
    /// carries no value. `signer` becomes the attester.
    pub async fn create_attestation(
        &self,
        schema: B256,
        recipient: Address,
        data: Bytes,
        deadline: u64,
        proxy: Address,
        signer: &Wallet,
    ) -> EasResult<DelegatedProxyAttestationRequest> {
        let request = AttestationRequestData {
            recipient,
            expirationTime: NO_EXPIRATION,
            revocable: true,
            refUID: B256::ZERO,
            data,
            value: U256::ZERO,
        };
        let attester = signer.address();

        let domain = self.domains.resolve(proxy).await?;
        let hash = if domain.legacy {
            typed_legacy::Attest {
                schema,
                recipient: request.recipient,
                expirationTime: request.expirationTime,
                revocable: request.revocable,
                refUID: request.refUID,
                data: request.data.clone(),
                value: request.value,
                deadline,
            }
            .eip712_signing_hash(&domain.domain)
        } else {
            typed::Attest {
                attester,
                schema,
                recipient: request.recipient,
                expirationTime: request.expirationTime,
                revocable: request.revocable,
                refUID: request.refUID,
                data: request.data.clone(),
                value: request.value,
                deadline,
            }
            .eip712_signing_hash(&domain.domain)
        };

        let signature = signer.sign_hash(hash).await?;
        metrics::record_attestation_signed();

        tracing::debug!(
            proxy = %proxy,
            recipient = %recipient,
            attester = %attester,
            deadline = deadline,
            "Signed delegated attestation"
        );

        Ok(DelegatedProxyAttestationRequest {
            schema,
            data: request,
            signature: EIP712Proxy::Signature {
                v: 27 + u8::from(signature.v()),
                r: B256::from(signature.r().to_be_bytes::<32>()),
                s: B256::from(signature.s().to_be_bytes::<32>()),
            },
            attester,
            deadline,
        })
    }

    /// Sign a badge attestation: encodes `(badge, payload)` with the badge
    /// schema and sets the deadline to now plus the configured window.
    pub async fn create_badge(
        &self,
        badge: Address,
        recipient: Address,
        payload: Bytes,
        proxy: Address,
        signer: &Wallet,
    ) -> EasResult<DelegatedProxyAttestationRequest> {
        let data = self.encoder.encode_badge(badge, payload)?;
        let deadline = deadline_from_now(self.deadline_secs);

        self.create_attestation(self.schema_uid, recipient, data, deadline, proxy, signer)
            .await
    }
}

/// Build the `attestByDelegation` transaction for `request`.
pub fn populate_attest_tx(
    proxy: Address,
    request: &DelegatedProxyAttestationRequest,
) -> PopulatedTransaction {
    let call = EIP712Proxy::attestByDelegationCall {
        delegatedRequest: request.clone(),
    };

    PopulatedTransaction {
        to: proxy,
        data: call.abi_encode().into(),
    }
}
