//! Custom contract error decoding.
//!
//! Maps the 4-byte selector at the start of revert data to one of the known
//! badge, profile and EAS errors and decodes its arguments.

use std::collections::HashMap;
use std::fmt;

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::hex;
use alloy::json_abi::Error as AbiError;
use alloy::primitives::Selector;
use thiserror::Error;

/// Custom errors of the badge, profile registry and EAS resolver contracts.
pub const KNOWN_ERRORS: &[&str] = &[
    "error Unauthorized()",
    // badges
    "error BadgeNotAllowed(address badge)",
    "error BadgeNotFound(address badge)",
    "error ExpirationDisabled()",
    "error MissingPayload()",
    "error ResolverPaymentsDisabled()",
    "error RevocationDisabled()",
    "error SingletonBadge()",
    "error UnknownSchema()",
    // attestations
    "error AttestationBadgeMismatch(bytes32 uid)",
    "error AttestationExpired(bytes32 uid)",
    "error AttestationNotFound(bytes32 uid)",
    "error AttestationOwnerMismatch(bytes32 uid)",
    "error AttestationRevoked(bytes32 uid)",
    "error AttestationSchemaMismatch(bytes32 uid)",
    // profile
    "error BadgeCountReached()",
    "error LengthMismatch()",
    "error TokenNotOwnedByUser(address token, uint256 tokenId)",
    // profile registry
    "error CallerIsNotUserProfile()",
    "error DuplicatedUsername()",
    "error ExpiredSignature()",
    "error ImplementationNotContract()",
    "error InvalidReferrer()",
    "error InvalidSignature()",
    "error InvalidUsername()",
    "error MsgValueMismatchWithMintFee()",
    "error ProfileAlreadyMinted()",
];

#[derive(Debug, Error)]
pub enum RevertError {
    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("revert data too short ({0} bytes)")]
    TooShort(usize),

    #[error("unknown error selector {0}")]
    UnknownSelector(Selector),

    #[error("cannot decode arguments of {name}: {reason}")]
    Arguments { name: String, reason: String },

    #[error("invalid error signature \"{signature}\": {reason}")]
    Signature { signature: String, reason: String },
}

/// A decoded custom error.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedError {
    pub name: String,
    /// Canonical signature, e.g. `BadgeNotFound(address)`.
    pub signature: String,
    pub selector: Selector,
    pub args: Vec<(String, DynSolValue)>,
}

impl DecodedError {
    /// Argument names with their values formatted for display.
    pub fn rendered_args(&self) -> Vec<(&str, String)> {
        self.args
            .iter()
            .map(|(name, value)| (name.as_str(), format_value(value)))
            .collect()
    }
}

impl fmt::Display for DecodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, (name, value)) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, format_value(value))?;
        }
        write!(f, ")")
    }
}

fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(a) => a.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
        DynSolValue::Bytes(b) => hex::encode_prefixed(b),
        DynSolValue::String(s) => format!("{:?}", s),
        other => format!("{:?}", other),
    }
}

/// Selector-indexed table of custom errors.
#[derive(Debug, Clone)]
pub struct RevertDecoder {
    errors: HashMap<Selector, AbiError>,
}

impl RevertDecoder {
    /// Decoder for [`KNOWN_ERRORS`].
    pub fn known() -> Self {
        // The table is a compile-time constant covered by tests.
        Self::from_signatures(KNOWN_ERRORS).unwrap_or_else(|_| Self {
            errors: HashMap::new(),
        })
    }

    /// Build a decoder from human-readable error declarations.
    pub fn from_signatures(signatures: &[&str]) -> Result<Self, RevertError> {
        let mut errors = HashMap::with_capacity(signatures.len());
        for signature in signatures {
            let error = AbiError::parse(signature).map_err(|e| RevertError::Signature {
                signature: signature.to_string(),
                reason: e.to_string(),
            })?;
            errors.insert(error.selector(), error);
        }
        Ok(Self { errors })
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Decode raw revert data.
    pub fn decode(&self, data: &[u8]) -> Result<DecodedError, RevertError> {
        if data.len() < 4 {
            return Err(RevertError::TooShort(data.len()));
        }
        let selector = Selector::from_slice(&data[..4]);
        let error = self
            .errors
            .get(&selector)
            .ok_or(RevertError::UnknownSelector(selector))?;

        let values = error
            .abi_decode_input(&data[4..])
            .map_err(|e| RevertError::Arguments {
                name: error.name.clone(),
                reason: e.to_string(),
            })?;
        let args = error
            .inputs
            .iter()
            .map(|param| param.name.clone())
            .zip(values)
            .collect();

        Ok(DecodedError {
            name: error.name.clone(),
            signature: error.signature(),
            selector,
            args,
        })
    }

    /// Decode `0x`-prefixed (or bare) hex revert data.
    pub fn decode_hex(&self, data: &str) -> Result<DecodedError, RevertError> {
        let bytes = hex::decode(data.trim()).map_err(|e| RevertError::Hex(e.to_string()))?;
        self.decode(&bytes)
    }
}

impl Default for RevertDecoder {
    fn default() -> Self {
        Self::known()
    }
}

/// Decode revert data against [`KNOWN_ERRORS`].
pub fn decode_revert(data: &[u8]) -> Result<DecodedError, RevertError> {
    RevertDecoder::known().decode(data)
}

/// Decode hex revert data against [`KNOWN_ERRORS`].
pub fn decode_revert_hex(data: &str) -> Result<DecodedError, RevertError> {
    RevertDecoder::known().decode_hex(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, keccak256, Address, B256, U256};
    use alloy::sol_types::SolValue;

    fn selector(signature: &str) -> Vec<u8> {
        keccak256(signature.as_bytes())[..4].to_vec()
    }

    #[test]
    fn test_known_table_parses() {
        let decoder = RevertDecoder::from_signatures(KNOWN_ERRORS).unwrap();
        assert_eq!(decoder.len(), KNOWN_ERRORS.len());
    }

    #[test]
    fn test_decode_invalid_signature() {
        let decoded = decode_revert_hex("0x8baa579f").unwrap();
        assert_eq!(decoded.name, "InvalidSignature");
        assert_eq!(decoded.signature, "InvalidSignature()");
        assert!(decoded.args.is_empty());
        assert_eq!(decoded.to_string(), "InvalidSignature()");
    }

    #[test]
    fn test_decode_with_arguments() {
        let badge = address!("0xA51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0");
        let mut data = selector("BadgeNotFound(address)");
        data.extend(badge.abi_encode());

        let decoded = decode_revert(&data).unwrap();
        assert_eq!(decoded.name, "BadgeNotFound");
        assert_eq!(decoded.args, vec![("badge".to_string(), DynSolValue::Address(badge))]);
        assert!(decoded.to_string().starts_with("BadgeNotFound(badge=0x"));
    }

    #[test]
    fn test_decode_two_arguments() {
        let mut data = selector("TokenNotOwnedByUser(address,uint256)");
        data.extend((Address::ZERO, U256::from(7)).abi_encode_params());

        let decoded = decode_revert(&data).unwrap();
        assert_eq!(decoded.name, "TokenNotOwnedByUser");
        assert_eq!(decoded.args.len(), 2);
        assert!(decoded.to_string().ends_with("tokenId=7)"));
        assert_eq!(
            decoded.rendered_args(),
            vec![("token", Address::ZERO.to_string()), ("tokenId", "7".to_string())]
        );
    }

    #[test]
    fn test_decode_bytes32_argument() {
        let uid = B256::repeat_byte(0xab);
        let mut data = selector("AttestationRevoked(bytes32)");
        data.extend(uid.abi_encode());

        let decoded = decode_revert(&data).unwrap();
        assert_eq!(decoded.to_string(), format!("AttestationRevoked(uid={})", uid));
    }

    #[test]
    fn test_unknown_and_short_data() {
        assert!(matches!(
            decode_revert_hex("0xdeadbeef"),
            Err(RevertError::UnknownSelector(_))
        ));
        assert!(matches!(decode_revert_hex("0x8baa"), Err(RevertError::TooShort(2))));
        assert!(matches!(decode_revert_hex("0xzz"), Err(RevertError::Hex(_))));
    }

    #[test]
    fn test_truncated_arguments() {
        let data = selector("BadgeNotFound(address)");
        assert!(matches!(
            decode_revert(&data),
            Err(RevertError::Arguments { .. })
        ));
    }
}
