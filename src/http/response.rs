//! JSON response bodies of the badge API.
//!
//! Every handler answers `200 OK`; success and failure are carried in the
//! body. The `/api/badge/{address}/claim` route reports failures in an
//! `error` string, the `/api/check` and `/api/claim` routes in a numeric
//! `code`.

use serde::{Deserialize, Serialize};

use crate::eas::PopulatedTransaction;

/// `code` of a successful response.
pub const CODE_SUCCESS: u8 = 1;

/// `code` of a failed response.
pub const CODE_ERROR: u8 = 0;

/// Status string for an eligible recipient.
pub const STATUS_ELIGIBLE: &str = "eligible";

/// Status string for an ineligible recipient.
pub const STATUS_NOT_ELIGIBLE: &str = "not eligible";

/// Body of `GET /api/badge/{address}/claim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeClaimResponse {
    /// `null` unless the request failed.
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<PopulatedTransaction>,
}

impl BadgeClaimResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            status: None,
            tx: None,
        }
    }

    pub fn not_eligible() -> Self {
        Self {
            error: None,
            status: Some(STATUS_NOT_ELIGIBLE.to_string()),
            tx: None,
        }
    }

    pub fn eligible(tx: PopulatedTransaction) -> Self {
        Self {
            error: None,
            status: Some(STATUS_ELIGIBLE.to_string()),
            tx: Some(tx),
        }
    }
}

/// Body of `GET /api/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub code: u8,
    pub message: String,
    pub eligibility: bool,
}

impl CheckResponse {
    pub fn success(eligibility: bool) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: "success".to_string(),
            eligibility,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: CODE_ERROR,
            message: message.into(),
            eligibility: false,
        }
    }
}

/// Body of `GET /api/claim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub code: u8,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<PopulatedTransaction>,
}

impl ClaimResponse {
    pub fn success(tx: PopulatedTransaction) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: "success".to_string(),
            tx: Some(tx),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: CODE_ERROR,
            message: message.into(),
            tx: None,
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub badges: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{bytes, Address};
    use serde_json::json;

    fn tx() -> PopulatedTransaction {
        PopulatedTransaction {
            to: Address::ZERO,
            data: bytes!("1234"),
        }
    }

    #[test]
    fn test_badge_claim_shapes() {
        assert_eq!(
            serde_json::to_value(BadgeClaimResponse::error("unknown badge \"0x1\"")).unwrap(),
            json!({ "error": "unknown badge \"0x1\"" })
        );
        assert_eq!(
            serde_json::to_value(BadgeClaimResponse::not_eligible()).unwrap(),
            json!({ "error": null, "status": "not eligible" })
        );
        assert_eq!(
            serde_json::to_value(BadgeClaimResponse::eligible(tx())).unwrap(),
            json!({
                "error": null,
                "status": "eligible",
                "tx": { "to": "0x0000000000000000000000000000000000000000", "data": "0x1234" }
            })
        );
    }

    #[test]
    fn test_code_shapes() {
        assert_eq!(
            serde_json::to_value(CheckResponse::success(true)).unwrap(),
            json!({ "code": 1, "message": "success", "eligibility": true })
        );
        assert_eq!(
            serde_json::to_value(ClaimResponse::error("not eligible")).unwrap(),
            json!({ "code": 0, "message": "not eligible" })
        );
    }
}
