//! Solidity bindings for the EAS contracts this crate talks to.

use alloy::sol;

sol! {
    /// EAS attester proxy that verifies an EIP-712 signature and forwards
    /// the attestation to the main EAS contract.
    #[sol(rpc)]
    contract EIP712Proxy {
        #[derive(Debug, PartialEq, Eq)]
        struct AttestationRequestData {
            address recipient;
            uint64 expirationTime;
            bool revocable;
            bytes32 refUID;
            bytes data;
            uint256 value;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct Signature {
            uint8 v;
            bytes32 r;
            bytes32 s;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct DelegatedProxyAttestationRequest {
            bytes32 schema;
            AttestationRequestData data;
            Signature signature;
            address attester;
            uint64 deadline;
        }

        function attestByDelegation(DelegatedProxyAttestationRequest calldata delegatedRequest)
            external payable returns (bytes32);

        function getName() external view returns (string memory);

        function version() external view returns (string memory);
    }
}

sol! {
    /// Emitted by the main EAS contract for every new attestation.
    #[derive(Debug)]
    event Attested(
        address indexed recipient,
        address indexed attester,
        bytes32 uid,
        bytes32 indexed schemaUID
    );
}

/// EIP-712 `Attest` layout of proxies at version 1.3.0 and later.
pub mod typed {
    alloy::sol! {
        #[derive(Debug)]
        struct Attest {
            address attester;
            bytes32 schema;
            address recipient;
            uint64 expirationTime;
            bool revocable;
            bytes32 refUID;
            bytes data;
            uint256 value;
            uint64 deadline;
        }
    }
}

/// EIP-712 `Attest` layout of proxies before 1.3.0 (no `attester` field).
pub mod typed_legacy {
    alloy::sol! {
        #[derive(Debug)]
        struct Attest {
            bytes32 schema;
            address recipient;
            uint64 expirationTime;
            bool revocable;
            bytes32 refUID;
            bytes data;
            uint256 value;
            uint64 deadline;
        }
    }
}
