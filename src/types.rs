//! Common value types shared by the hasher, codec and assembler.

use alloy_primitives::{hex, Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::core::{RelayerError, Result};

/// Zero address as used in the relayer wire format.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Safe operation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OperationType {
    /// Callee runs in its own storage context
    #[default]
    Call = 0,
    /// Callee runs in the wallet's storage context
    DelegateCall = 1,
}

impl From<OperationType> for u8 {
    fn from(op: OperationType) -> Self {
        op as u8
    }
}

impl TryFrom<u8> for OperationType {
    type Error = RelayerError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Call),
            1 => Ok(Self::DelegateCall),
            other => Err(RelayerError::invalid_field(
                "operation",
                format!("unknown operation code {other}"),
            )),
        }
    }
}

/// One contract invocation executed through a Safe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Call {
    /// Target contract
    pub to: Address,
    /// Native value in wei
    pub value: U256,
    /// Call data
    pub data: Bytes,
    /// Call or delegate call
    pub operation: OperationType,
}

impl Call {
    /// Create a call with every field given.
    #[must_use]
    pub fn new(to: Address, value: U256, data: impl Into<Bytes>, operation: OperationType) -> Self {
        Self {
            to,
            value,
            data: data.into(),
            operation,
        }
    }

    /// Create a plain call carrying no value.
    #[must_use]
    pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
        Self::new(to, U256::ZERO, data, OperationType::Call)
    }

    /// Build a call from wire-style strings.
    ///
    /// `value` accepts decimal or `0x` hex, empty means zero. `data` accepts
    /// hex with or without prefix, `""` and `"0x"` mean empty.
    pub fn from_strings(to: &str, value: &str, data: &str, operation: OperationType) -> Result<Self> {
        Ok(Self {
            to: parse_address("to", to)?,
            value: parse_u256("value", value)?,
            data: parse_hex_bytes("data", data)?,
            operation,
        })
    }
}

/// An ordered batch of calls for one Safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// Calls in execution order
    pub calls: Vec<Call>,
    /// Safe executing the calls
    pub wallet: Address,
    /// Safe nonce assigned by the relayer
    pub nonce: U256,
    /// Free-text metadata forwarded to the relayer
    pub metadata: Option<String>,
}

impl BatchRequest {
    #[must_use]
    pub fn new(wallet: Address, calls: Vec<Call>, nonce: U256) -> Self {
        Self {
            calls,
            wallet,
            nonce,
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

/// A request to deploy the Safe owned by `owner`.
///
/// The nonce is always zero; the relayer tracks the deployment nonce itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletCreationRequest {
    /// Controlling signer
    pub owner: Address,
    /// CREATE2-derived Safe address
    pub wallet: Address,
    /// Free-text metadata forwarded to the relayer
    pub metadata: Option<String>,
}

impl WalletCreationRequest {
    /// Nonce carried by every creation request.
    pub const NONCE: &'static str = "0";

    #[must_use]
    pub fn new(owner: Address, wallet: Address) -> Self {
        Self {
            owner,
            wallet,
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

/// Parse a 0x-prefixed address, naming the field on failure.
pub fn parse_address(field: &str, value: &str) -> Result<Address> {
    value
        .trim()
        .parse()
        .map_err(|e| RelayerError::invalid_field(field, format!("invalid address '{value}': {e}")))
}

/// Parse a decimal or 0x-hex unsigned integer; empty input is zero.
pub fn parse_u256(field: &str, value: &str) -> Result<U256> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(U256::ZERO);
    }
    value
        .parse()
        .map_err(|e| RelayerError::invalid_field(field, format!("invalid integer '{value}': {e}")))
}

/// Parse hex bytes with or without 0x prefix; `""` and `"0x"` are empty.
pub fn parse_hex_bytes(field: &str, value: &str) -> Result<Bytes> {
    let value = value.trim();
    if value.is_empty() || value == "0x" {
        return Ok(Bytes::new());
    }
    hex::decode(value)
        .map(Bytes::from)
        .map_err(|e| RelayerError::invalid_field(field, format!("invalid hex: {e}")))
}
