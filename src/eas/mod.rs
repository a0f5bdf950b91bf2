//! Ethereum Attestation Service integration.
//!
//! # Data Flow
//! ```text
//! EasConfig (schema, schema UID)
//!     → schema.rs (SchemaEncoder)
//!     → domain.rs (proxy EIP-712 domain, pinned or via RPC)
//!     → delegated.rs (sign DelegatedProxyAttestationRequest, populate tx)
//!     → submit.rs (claimer sends attestByDelegation, receipt via ChainClient)
//!     → uids.rs (UIDs from Attested logs)
//! ```

pub mod contracts;
pub mod delegated;
pub mod domain;
pub mod schema;
pub mod submit;
pub mod types;
pub mod uids;

pub use delegated::{deadline_from_now, populate_attest_tx, DelegatedAttester};
pub use domain::{ProxyDomain, ProxyDomains};
pub use schema::{SchemaEncoder, SchemaItem};
pub use submit::{confirm_attestation, submit_attestation};
pub use types::{EasError, EasResult, PopulatedTransaction};
pub use uids::{uids_from_logs, uids_from_receipt};
