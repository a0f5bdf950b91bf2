//! On-chain submission of delegated attestations by the claimer.

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::ProviderBuilder;
use alloy::rpc::types::TransactionReceipt;

use crate::chain::{ChainClient, ChainError, Wallet};
use crate::eas::contracts::EIP712Proxy;
use crate::eas::delegated::DelegatedProxyAttestationRequest;
use crate::eas::types::{EasError, EasResult};

/// Send `attestByDelegation` from `claimer` and wait until it is mined.
///
/// A revert during gas estimation surfaces as [`EasError::Reverted`] so
/// callers can decode the custom error.
pub async fn submit_attestation(
    rpc_url: &str,
    claimer: &Wallet,
    proxy: Address,
    request: DelegatedProxyAttestationRequest,
) -> EasResult<TxHash> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e| ChainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
    let provider = ProviderBuilder::new()
        .wallet(claimer.ethereum_wallet())
        .connect_http(url);
    let contract = EIP712Proxy::new(proxy, &provider);

    tracing::info!(
        proxy = %proxy,
        claimer = %claimer.address(),
        attester = %request.attester,
        "Submitting delegated attestation"
    );

    let pending = contract
        .attestByDelegation(request)
        .send()
        .await
        .map_err(contract_error)?;
    let tx_hash = *pending.tx_hash();

    pending
        .watch()
        .await
        .map_err(|e| ChainError::Rpc(format!("Waiting for {}: {}", tx_hash, e)))?;

    Ok(tx_hash)
}

/// Fetch the receipt of a mined attestation and check its status.
pub async fn confirm_attestation(
    client: &ChainClient,
    tx_hash: TxHash,
) -> EasResult<TransactionReceipt> {
    let receipt = client
        .get_transaction_receipt(tx_hash)
        .await?
        .ok_or_else(|| ChainError::Rpc(format!("No receipt for {}", tx_hash)))?;

    check_receipt(receipt)
}

/// A failed receipt carries no revert data.
fn check_receipt(receipt: TransactionReceipt) -> EasResult<TransactionReceipt> {
    if !receipt.status() {
        return Err(EasError::Reverted(Bytes::new()));
    }

    tracing::info!(
        tx_hash = %receipt.transaction_hash,
        block_number = ?receipt.block_number,
        "Attestation confirmed"
    );
    Ok(receipt)
}

fn contract_error(err: alloy::contract::Error) -> EasError {
    match err.as_revert_data() {
        Some(data) => EasError::Reverted(data),
        None => EasError::Chain(ChainError::Contract(err.to_string())),
    }
}
