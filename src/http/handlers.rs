//! Badge API route handlers.

use alloy::primitives::Address;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use crate::badges::{Badge, BadgeError};
use crate::eas::{populate_attest_tx, EasError, PopulatedTransaction};
use crate::http::response::{BadgeClaimResponse, CheckResponse, ClaimResponse, HealthStatus};
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Deserialize)]
pub struct RecipientQuery {
    pub recipient: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BadgeQuery {
    pub badge: Option<String>,
    pub recipient: Option<String>,
}

/// Failure while evaluating or signing a claim.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error(transparent)]
    Badge(#[from] BadgeError),

    #[error(transparent)]
    Eas(#[from] EasError),
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_recipient(raw: &str) -> Result<Address, String> {
    raw.trim()
        .parse::<Address>()
        .map_err(|_| format!("invalid recipient \"{}\"", raw))
}

/// Sign a delegated attestation of `badge` for `recipient` and wrap it in an
/// `attestByDelegation` transaction.
async fn sign_claim(
    state: &AppState,
    badge: &Badge,
    recipient: Address,
) -> Result<PopulatedTransaction, ClaimError> {
    let payload = badge.rules.create_payload(recipient).await?;
    let request = state
        .attester
        .create_badge(badge.address, recipient, payload, badge.proxy, &state.signer)
        .await?;
    Ok(populate_attest_tx(badge.proxy, &request))
}

/// `GET /api/badge/{address}/claim?recipient=<addr>`
pub async fn claim_badge(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<RecipientQuery>,
) -> Json<BadgeClaimResponse> {
    const ROUTE: &str = "badge_claim";

    let Some(recipient) = present(query.recipient) else {
        metrics::record_request(ROUTE, "bad_request");
        return Json(BadgeClaimResponse::error("missing query parameter \"recipient\""));
    };
    let Some(badge) = state.registry.get(&address) else {
        metrics::record_request(ROUTE, "unknown_badge");
        return Json(BadgeClaimResponse::error(format!("unknown badge \"{}\"", address)));
    };
    let recipient = match parse_recipient(&recipient) {
        Ok(r) => r,
        Err(message) => {
            metrics::record_request(ROUTE, "bad_request");
            return Json(BadgeClaimResponse::error(message));
        }
    };

    match badge.rules.is_eligible(recipient).await {
        Ok(true) => {}
        Ok(false) => {
            metrics::record_request(ROUTE, "not_eligible");
            return Json(BadgeClaimResponse::not_eligible());
        }
        Err(e) => {
            tracing::warn!(badge = %badge.address, recipient = %recipient, error = %e, "Eligibility check failed");
            metrics::record_request(ROUTE, "error");
            return Json(BadgeClaimResponse::error(e.to_string()));
        }
    }

    match sign_claim(&state, badge, recipient).await {
        Ok(tx) => {
            tracing::info!(badge = %badge.address, recipient = %recipient, "Issued badge claim");
            metrics::record_request(ROUTE, "eligible");
            Json(BadgeClaimResponse::eligible(tx))
        }
        Err(e) => {
            tracing::error!(badge = %badge.address, recipient = %recipient, error = %e, "Failed to sign badge claim");
            metrics::record_request(ROUTE, "error");
            Json(BadgeClaimResponse::error(e.to_string()))
        }
    }
}

/// Resolve the `badge` and `recipient` query parameters.
fn lookup<'a>(state: &'a AppState, query: BadgeQuery) -> Result<(&'a Badge, Address), String> {
    let badge = present(query.badge).ok_or("missing query parameter \"badge\"")?;
    let recipient = present(query.recipient).ok_or("missing query parameter \"recipient\"")?;

    let badge = state
        .registry
        .get(&badge)
        .ok_or_else(|| format!("unknown badge \"{}\"", badge))?;
    let recipient = parse_recipient(&recipient)?;

    Ok((badge, recipient))
}

/// `GET /api/check?badge=<addr>&recipient=<addr>`
pub async fn check(
    State(state): State<AppState>,
    Query(query): Query<BadgeQuery>,
) -> Json<CheckResponse> {
    const ROUTE: &str = "check";

    let (badge, recipient) = match lookup(&state, query) {
        Ok(found) => found,
        Err(message) => {
            metrics::record_request(ROUTE, "bad_request");
            return Json(CheckResponse::error(message));
        }
    };

    match badge.rules.is_eligible(recipient).await {
        Ok(eligible) => {
            tracing::debug!(badge = %badge.address, recipient = %recipient, eligible, "Eligibility checked");
            metrics::record_request(ROUTE, if eligible { "eligible" } else { "not_eligible" });
            Json(CheckResponse::success(eligible))
        }
        Err(e) => {
            tracing::warn!(badge = %badge.address, recipient = %recipient, error = %e, "Eligibility check failed");
            metrics::record_request(ROUTE, "error");
            Json(CheckResponse::error(e.to_string()))
        }
    }
}

/// `GET /api/claim?badge=<addr>&recipient=<addr>`
pub async fn claim(
    State(state): State<AppState>,
    Query(query): Query<BadgeQuery>,
) -> Json<ClaimResponse> {
    const ROUTE: &str = "claim";

    let (badge, recipient) = match lookup(&state, query) {
        Ok(found) => found,
        Err(message) => {
            metrics::record_request(ROUTE, "bad_request");
            return Json(ClaimResponse::error(message));
        }
    };

    match badge.rules.is_eligible(recipient).await {
        Ok(true) => {}
        Ok(false) => {
            metrics::record_request(ROUTE, "not_eligible");
            return Json(ClaimResponse::error("not eligible"));
        }
        Err(e) => {
            metrics::record_request(ROUTE, "error");
            return Json(ClaimResponse::error(e.to_string()));
        }
    }

    match sign_claim(&state, badge, recipient).await {
        Ok(tx) => {
            tracing::info!(badge = %badge.address, recipient = %recipient, "Issued badge claim");
            metrics::record_request(ROUTE, "eligible");
            Json(ClaimResponse::success(tx))
        }
        Err(e) => {
            tracing::error!(badge = %badge.address, recipient = %recipient, error = %e, "Failed to sign badge claim");
            metrics::record_request(ROUTE, "error");
            Json(ClaimResponse::error(e.to_string()))
        }
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "operational".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        badges: state.registry.len(),
    })
}
