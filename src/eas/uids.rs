//! Attestation UID extraction from transaction logs.

use alloy::primitives::{Address, B256};
use alloy::rpc::types::{Log, TransactionReceipt};

use crate::eas::contracts::Attested;

/// UIDs of every `Attested` event in `logs`, in log order.
///
/// Logs are restricted to those emitted by `eas`, unless it is the zero
/// address, in which case any emitter is accepted.
pub fn uids_from_logs(eas: Address, logs: &[Log]) -> Vec<B256> {
    logs.iter()
        .filter(|log| eas.is_zero() || log.address() == eas)
        .filter_map(|log| log.log_decode::<Attested>().ok())
        .map(|decoded| decoded.inner.data.uid)
        .collect()
}

/// UIDs created by a (multi-)attestation transaction.
pub fn uids_from_receipt(eas: Address, receipt: &TransactionReceipt) -> Vec<B256> {
    uids_from_logs(eas, receipt.inner.logs())
}
