//! Minimal ABI word helpers for the handful of calls this crate encodes.

use alloy_primitives::{keccak256, Address, U256};

/// ABI word size.
pub(crate) const WORD: usize = 32;

/// First four bytes of `keccak256(signature)`.
pub(crate) fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Address left-padded to a word.
pub(crate) fn address_word(address: Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_slice());
    word
}

/// Big-endian unsigned word.
pub(crate) fn uint_word(value: U256) -> [u8; WORD] {
    value.to_be_bytes::<WORD>()
}

/// Word for a length or offset.
pub(crate) fn usize_word(value: usize) -> [u8; WORD] {
    uint_word(U256::from(value))
}

/// Length-prefixed dynamic bytes, content right-padded to a word boundary.
pub(crate) fn encode_dynamic_bytes(out: &mut Vec<u8>, content: &[u8]) {
    out.extend_from_slice(&usize_word(content.len()));
    out.extend_from_slice(content);
    out.resize(out.len() + padding_len(content.len()), 0);
}

/// Zero bytes needed to reach the next word boundary.
pub(crate) fn padding_len(len: usize) -> usize {
    (WORD - len % WORD) % WORD
}
