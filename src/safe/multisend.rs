//! MultiSend batch codec.
//!
//! Each entry is packed (not ABI-encoded):
//!
//! ```text
//! operation (1) ‖ to (20) ‖ value (32) ‖ data length (32) ‖ data
//! ```
//!
//! The packed blob is then wrapped as the single `bytes` argument of
//! `multiSend(bytes)` and executed by the Safe as a delegate call.

use alloy_primitives::{Address, Bytes, U256};
use tracing::debug;

use super::abi::{encode_dynamic_bytes, uint_word, usize_word, WORD};
use crate::core::{RelayerError, Result};
use crate::types::{Call, OperationType};

/// `multiSend(bytes)`
pub const MULTISEND_SIGNATURE: &str = "multiSend(bytes)";

/// Selector of `multiSend(bytes)`.
pub const MULTISEND_SELECTOR: [u8; 4] = [0x8d, 0x80, 0xff, 0x0a];

/// Fixed bytes preceding each entry's call data.
pub const ENTRY_HEADER_LEN: usize = 1 + 20 + WORD + WORD;

/// Pack `calls` into a MultiSend transaction blob.
pub fn encode(calls: &[Call]) -> Result<Bytes> {
    if calls.is_empty() {
        return Err(RelayerError::EmptyBatch);
    }

    let total: usize = calls.iter().map(|c| ENTRY_HEADER_LEN + c.data.len()).sum();
    let mut out = Vec::with_capacity(total);
    for call in calls {
        out.push(u8::from(call.operation));
        out.extend_from_slice(call.to.as_slice());
        out.extend_from_slice(&uint_word(call.value));
        out.extend_from_slice(&usize_word(call.data.len()));
        out.extend_from_slice(&call.data);
    }
    Ok(Bytes::from(out))
}

/// Parse a packed MultiSend blob back into calls.
pub fn decode(data: &[u8]) -> Result<Vec<Call>> {
    let mut calls = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let header = take(data, offset, ENTRY_HEADER_LEN)?;
        let operation = OperationType::try_from(header[0])?;
        let to = Address::from_slice(&header[1..21]);
        let value = U256::from_be_slice(&header[21..21 + WORD]);
        let declared = U256::from_be_slice(&header[21 + WORD..]);
        offset += ENTRY_HEADER_LEN;

        let available = data.len() - offset;
        let len = usize::try_from(declared).map_err(|_| RelayerError::TruncatedData {
            offset,
            needed: usize::MAX,
            available,
        })?;
        let payload = take(data, offset, len)?;
        offset += len;

        calls.push(Call::new(to, value, Bytes::copy_from_slice(payload), operation));
    }

    Ok(calls)
}

fn take(data: &[u8], offset: usize, needed: usize) -> Result<&[u8]> {
    let available = data.len().saturating_sub(offset);
    if needed > available {
        return Err(RelayerError::TruncatedData {
            offset,
            needed,
            available,
        });
    }
    Ok(&data[offset..offset + needed])
}

/// `multiSend(bytes)` call data carrying `transactions`.
#[must_use]
pub fn multisend_call_data(transactions: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(4 + 2 * WORD + transactions.len() + WORD);
    out.extend_from_slice(&MULTISEND_SELECTOR);
    out.extend_from_slice(&usize_word(WORD));
    encode_dynamic_bytes(&mut out, transactions);
    Bytes::from(out)
}

/// Delegate call to `multisend` executing the packed `transactions`.
#[must_use]
pub fn wrap_as_outer_call(transactions: &[u8], multisend: Address) -> Call {
    Call::new(
        multisend,
        U256::ZERO,
        multisend_call_data(transactions),
        OperationType::DelegateCall,
    )
}

/// Extract the packed blob from `multiSend(bytes)` call data.
pub fn unwrap_outer_call(call_data: &[u8]) -> Result<Bytes> {
    let prefix = take(call_data, 0, 4 + 2 * WORD)?;
    if prefix[..4] != MULTISEND_SELECTOR {
        return Err(RelayerError::invalid_field("data", "not a multiSend(bytes) call"));
    }
    let args = &prefix[4..];
    if U256::from_be_slice(&args[..WORD]) != U256::from(WORD) {
        return Err(RelayerError::invalid_field(
            "data",
            "unexpected multiSend argument offset",
        ));
    }
    let len = usize::try_from(U256::from_be_slice(&args[WORD..]))
        .map_err(|_| RelayerError::invalid_field("data", "multiSend length out of range"))?;
    let content = take(call_data, 4 + 2 * WORD, len)?;
    Ok(Bytes::copy_from_slice(content))
}

/// Collapse `calls` into the single call the Safe will execute.
///
/// One call is returned unchanged. Several become a delegate call to
/// `multisend` carrying the packed batch.
pub fn aggregate(calls: &[Call], multisend: Address) -> Result<Call> {
    match calls {
        [] => Err(RelayerError::EmptyBatch),
        [single] => Ok(single.clone()),
        many => {
            let packed = encode(many)?;
            debug!(calls = many.len(), packed_len = packed.len(), "Aggregated multisend batch");
            Ok(wrap_as_outer_call(&packed, multisend))
        }
    }
}
