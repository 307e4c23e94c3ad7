//! Safe signature packing.
//!
//! The Safe contract reads `v` in 31/32 as "eth_sign style" and recovers
//! from the prefixed hash with `v - 4`. Every signature submitted through the
//! relayer carries that form.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{hex, B256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::core::{RelayerError, Result};
use crate::signer::SIGNATURE_LEN;

/// `v` for recovery id 0 in packed form
pub const PACKED_V_EVEN: u8 = 31;

/// `v` for recovery id 1 in packed form
pub const PACKED_V_ODD: u8 = 32;

/// Map a signer's `v` (0/1 or 27/28) to the packed 31/32 form.
pub fn remap_recovery_id(v: u8) -> Result<u8> {
    match v {
        0 | 27 => Ok(PACKED_V_EVEN),
        1 | 28 => Ok(PACKED_V_ODD),
        other => Err(RelayerError::UnexpectedRecoveryId { v: other }),
    }
}

/// A 65-byte `r ‖ s ‖ v` signature whose `v` is 31 or 32.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedSignature([u8; SIGNATURE_LEN]);

impl PackedSignature {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    #[must_use]
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// The same signature with `v` back in 27/28 form, for recovery.
    #[must_use]
    pub fn unpack(&self) -> [u8; SIGNATURE_LEN] {
        let mut bytes = self.0;
        bytes[64] -= 4;
        bytes
    }
}

impl fmt::Debug for PackedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedSignature({self})")
    }
}

impl fmt::Display for PackedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_prefixed(self.0))
    }
}

impl TryFrom<&[u8]> for PackedSignature {
    type Error = RelayerError;

    /// Accepts an already packed signature only.
    fn try_from(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
            RelayerError::invalid_signature(format!(
                "expected {SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        match bytes[64] {
            PACKED_V_EVEN | PACKED_V_ODD => Ok(Self(bytes)),
            other => Err(RelayerError::UnexpectedRecoveryId { v: other }),
        }
    }
}

impl FromStr for PackedSignature {
    type Err = RelayerError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| RelayerError::invalid_signature(format!("invalid hex: {e}")))?;
        Self::try_from(bytes.as_slice())
    }
}

impl Serialize for PackedSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackedSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Repack a signer's output with `v` in 31/32.
pub fn pack_signature(signature: &[u8]) -> Result<PackedSignature> {
    let mut bytes: [u8; SIGNATURE_LEN] = signature.try_into().map_err(|_| {
        RelayerError::invalid_signature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        ))
    })?;
    let original_v = bytes[64];
    bytes[64] = remap_recovery_id(original_v)?;
    debug!(original_v, packed_v = bytes[64], "Packed signature");
    Ok(PackedSignature(bytes))
}

/// `r`, `s` and the packed `v` of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitSignature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

/// Split a signer's output into its components, remapping `v`.
pub fn split_signature(signature: &[u8]) -> Result<SplitSignature> {
    let packed = pack_signature(signature)?;
    let bytes = packed.as_bytes();
    Ok(SplitSignature {
        r: B256::from_slice(&bytes[..32]),
        s: B256::from_slice(&bytes[32..64]),
        v: packed.v(),
    })
}

/// Undo packing so the signature can be fed to standard recovery.
pub fn unpack_signature(packed: &[u8]) -> Result<[u8; SIGNATURE_LEN]> {
    Ok(PackedSignature::try_from(packed)?.unpack())
}
