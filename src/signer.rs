//! secp256k1 signer for Safe transaction digests.
//!
//! Wallet calls sign the EIP-712 digest directly ([`Signer::sign_raw`]);
//! wallet creation signs the EIP-191 personal-message hash of the digest
//! ([`Signer::sign_with_eth_prefix`]). The two are separate operations on
//! purpose: swapping them yields a signature the relayer rejects.

use std::fmt;

use alloy_primitives::{eip191_hash_message, hex, Address, Signature, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use tracing::debug;

use crate::core::{RelayerError, Result};

/// Length of an `r ‖ s ‖ v` signature.
pub const SIGNATURE_LEN: usize = 65;

/// Environment variable holding the signer's private key.
pub const PRIVATE_KEY_ENV: &str = "PK";

/// Holds one private key and the chain id it signs for.
#[derive(Clone)]
pub struct Signer {
    inner: PrivateKeySigner,
    chain_id: u64,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("address", &self.address())
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl Signer {
    /// Wrap an existing alloy signer.
    #[must_use]
    pub fn new(inner: PrivateKeySigner, chain_id: u64) -> Self {
        Self { inner, chain_id }
    }

    /// Parse a hex private key (with or without `0x`).
    pub fn from_private_key(private_key: &str, chain_id: u64) -> Result<Self> {
        let inner: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|_| RelayerError::invalid_field("private_key", "invalid secp256k1 private key"))?;
        Ok(Self::new(inner, chain_id))
    }

    /// Load the private key from the `PK` environment variable.
    pub fn from_env(chain_id: u64) -> Result<Self> {
        let key = std::env::var(PRIVATE_KEY_ENV)
            .map_err(|_| RelayerError::config(format!("{PRIVATE_KEY_ENV} is not set")))?;
        Self::from_private_key(&key, chain_id)
    }

    /// Address controlled by this key.
    #[must_use]
    pub fn address(&self) -> Address {
        self.inner.address()
    }

    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign a 32-byte digest as-is. `v` is 27 or 28.
    pub fn sign_raw(&self, digest: &[u8]) -> Result<[u8; SIGNATURE_LEN]> {
        let hash = digest_from_slice(digest)?;
        self.sign_hash(&hash)
    }

    /// Sign `keccak256("\x19Ethereum Signed Message:\n32" ‖ digest)`. `v` is 27 or 28.
    pub fn sign_with_eth_prefix(&self, digest: &[u8]) -> Result<[u8; SIGNATURE_LEN]> {
        let hash = eth_message_hash(digest)?;
        self.sign_hash(&hash)
    }

    fn sign_hash(&self, hash: &B256) -> Result<[u8; SIGNATURE_LEN]> {
        let signature = self
            .inner
            .sign_hash_sync(hash)
            .map_err(|e| RelayerError::signing(format!("failed to sign digest {hash}"), e))?;
        let bytes = signature.as_bytes();
        debug!(signer = %self.address(), v = bytes[64], "Signed digest");
        Ok(bytes)
    }

    /// Recover the signing address of `signature` over `digest`.
    ///
    /// Accepts `v` in {0, 1} or {27, 28}.
    pub fn recover_address(digest: &[u8], signature: &[u8]) -> Result<Address> {
        let hash = digest_from_slice(digest)?;
        if signature.len() != SIGNATURE_LEN {
            return Err(RelayerError::invalid_signature(format!(
                "expected {SIGNATURE_LEN} bytes, got {}",
                signature.len()
            )));
        }

        let v = signature[64];
        let parity = match if v >= 27 { v - 27 } else { v } {
            0 => false,
            1 => true,
            other => {
                return Err(RelayerError::invalid_signature(format!(
                    "recovery id {other} (from v = {v}) is not 0 or 1"
                )))
            }
        };

        let r = U256::from_be_slice(&signature[..32]);
        let s = U256::from_be_slice(&signature[32..64]);
        Signature::new(r, s, parity)
            .recover_address_from_prehash(&hash)
            .map_err(|e| RelayerError::invalid_signature(format!("recovery failed: {e}")))
    }

    /// Whether `signature` over `digest` was produced by `expected`.
    ///
    /// A mismatch is `Ok(false)`; only malformed input errors.
    pub fn verify(digest: &[u8], signature: &[u8], expected: Address) -> Result<bool> {
        let recovered = Self::recover_address(digest, signature)?;
        debug!(
            recovered = %recovered,
            expected = %expected,
            signature = %hex::encode_prefixed(signature),
            "Signature verification"
        );
        Ok(recovered == expected)
    }
}

/// EIP-191 personal-message hash of a 32-byte digest.
pub fn eth_message_hash(digest: &[u8]) -> Result<B256> {
    let hash = digest_from_slice(digest)?;
    Ok(eip191_hash_message(hash))
}

fn digest_from_slice(digest: &[u8]) -> Result<B256> {
    if digest.len() != 32 {
        return Err(RelayerError::invalid_field(
            "digest",
            format!("digest must be 32 bytes, got {}", digest.len()),
        ));
    }
    Ok(B256::from_slice(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, keccak256};

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_DIGEST: B256 =
        b256!("06d5102c3e356b62a75f8203cd5ce7ab1fa8fdab33875ef621eee102220d90b8");

    fn signer() -> Signer {
        Signer::from_private_key(TEST_KEY, 137).unwrap()
    }

    #[test]
    fn test_address_from_key() {
        assert_eq!(
            signer().address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", signer());
        assert!(rendered.contains("address"));
        assert!(!rendered.contains("ac0974bec39a17e36ba4a6b4d238ff944bacb478"));
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(Signer::from_private_key("0x1234", 137).is_err());
    }

    #[test]
    fn test_sign_raw_known_vector() {
        let sig = signer().sign_raw(TEST_DIGEST.as_slice()).unwrap();
        assert_eq!(
            hex::encode(sig),
            "88b28dd2103d25561d0c4436da53e64b39b297408f235a59f838f4f1318277a4\
             2ff41cbaeed60aecbf2a05b8ba1ac9624bd66ee1e63ac43d0d9caa31e3fdadd6\
             1c"
        );
    }

    #[test]
    fn test_sign_with_eth_prefix_known_vector() {
        let sig = signer().sign_with_eth_prefix(TEST_DIGEST.as_slice()).unwrap();
        assert_eq!(
            hex::encode(sig),
            "ad62657208a0d885f91bba7490de238741bf7c51eb792f00856171aafc9e0123\
             73156fb672e55d840733c8bf723ec458545fcd5749aa5e547f808c222e7e1170\
             1c"
        );
    }

    #[test]
    fn test_signing_asymmetry() {
        let signer = signer();
        let raw = signer.sign_raw(TEST_DIGEST.as_slice()).unwrap();
        let prefixed = signer.sign_with_eth_prefix(TEST_DIGEST.as_slice()).unwrap();
        assert_ne!(raw, prefixed);

        let recovered_raw = Signer::recover_address(TEST_DIGEST.as_slice(), &raw).unwrap();
        let prefixed_digest = eth_message_hash(TEST_DIGEST.as_slice()).unwrap();
        let recovered_prefixed =
            Signer::recover_address(prefixed_digest.as_slice(), &prefixed).unwrap();

        assert_eq!(recovered_raw, signer.address());
        assert_eq!(recovered_prefixed, signer.address());
    }

    #[test]
    fn test_eth_message_hash_layout() {
        let mut preimage = b"\x19Ethereum Signed Message:\n32".to_vec();
        preimage.extend_from_slice(TEST_DIGEST.as_slice());
        assert_eq!(
            eth_message_hash(TEST_DIGEST.as_slice()).unwrap(),
            keccak256(&preimage)
        );
    }

    #[test]
    fn test_recover_accepts_zero_based_v() {
        let signer = signer();
        let mut sig = signer.sign_raw(TEST_DIGEST.as_slice()).unwrap();
        sig[64] -= 27;
        let recovered = Signer::recover_address(TEST_DIGEST.as_slice(), &sig).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn test_verify_mismatch_is_false() {
        let sig = signer().sign_raw(TEST_DIGEST.as_slice()).unwrap();
        let other = address!("1111111111111111111111111111111111111111");
        assert!(!Signer::verify(TEST_DIGEST.as_slice(), &sig, other).unwrap());
        assert!(Signer::verify(TEST_DIGEST.as_slice(), &sig, signer().address()).unwrap());
    }

    #[test]
    fn test_wrong_digest_length() {
        let err = signer().sign_raw(&[0u8; 31]).unwrap_err();
        assert!(matches!(err, RelayerError::InvalidInput { .. }));
        let err = signer().sign_with_eth_prefix(&[0u8; 33]).unwrap_err();
        assert!(matches!(err, RelayerError::InvalidInput { .. }));
    }

    #[test]
    fn test_wrong_signature_length() {
        let err = Signer::recover_address(TEST_DIGEST.as_slice(), &[0u8; 64]).unwrap_err();
        assert!(matches!(err, RelayerError::InvalidSignature { .. }));
    }

    #[test]
    fn test_recover_rejects_bad_v() {
        let mut sig = signer().sign_raw(TEST_DIGEST.as_slice()).unwrap();
        sig[64] = 31;
        let err = Signer::recover_address(TEST_DIGEST.as_slice(), &sig).unwrap_err();
        assert!(matches!(err, RelayerError::InvalidSignature { .. }));
    }
}
