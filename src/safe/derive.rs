//! Deterministic Safe address derivation (CREATE2) and the Safe `setup`
//! initializer.
//!
//! The address depends only on the owner and the chain's factory, so chains
//! sharing a deployment derive the same address for the same owner.

use alloy_primitives::{b256, keccak256, Address, Bytes, B256, U256};
use serde::Serialize;
use tracing::debug;

use super::abi::{address_word, encode_dynamic_bytes, selector, uint_word, usize_word, WORD};
use crate::chain::{ChainRegistry, ContractConfig};
use crate::core::Result;

/// Proxy init code hash for the reference factory/singleton pair.
///
/// Taken from the deployed factory; never recompute it from bytecode.
pub const SAFE_INIT_CODE_HASH: B256 =
    b256!("2bce2127ff07fb632d16c8347c4ebf501f4841168bed00d9e6ef715ddb6fcecf");

/// Canonical signature of the Safe `setup` function.
pub const SETUP_SIGNATURE: &str =
    "setup(address[],uint256,address,bytes,address,address,uint256,address)";

/// Number of head slots in the `setup` parameter block.
const SETUP_HEAD_SLOTS: usize = 8;

/// Parameters of the Safe `setup` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupParams {
    pub owners: Vec<Address>,
    pub threshold: U256,
    pub to: Address,
    pub data: Bytes,
    pub fallback_handler: Address,
    pub payment_token: Address,
    pub payment: U256,
    pub payment_receiver: Address,
}

impl SetupParams {
    /// Single owner, threshold one, no module call, no payment.
    #[must_use]
    pub fn single_owner(owner: Address, fallback_handler: Address) -> Self {
        Self {
            owners: vec![owner],
            threshold: U256::from(1),
            to: Address::ZERO,
            data: Bytes::new(),
            fallback_handler,
            payment_token: Address::ZERO,
            payment: U256::ZERO,
            payment_receiver: Address::ZERO,
        }
    }

    /// ABI-encoded `setup(...)` call data.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let head_len = SETUP_HEAD_SLOTS * WORD;
        let owners_offset = head_len;
        let data_offset = owners_offset + WORD + WORD * self.owners.len();

        let mut out = Vec::with_capacity(4 + data_offset + WORD * 2 + self.data.len());
        out.extend_from_slice(&selector(SETUP_SIGNATURE));

        out.extend_from_slice(&usize_word(owners_offset));
        out.extend_from_slice(&uint_word(self.threshold));
        out.extend_from_slice(&address_word(self.to));
        out.extend_from_slice(&usize_word(data_offset));
        out.extend_from_slice(&address_word(self.fallback_handler));
        out.extend_from_slice(&address_word(self.payment_token));
        out.extend_from_slice(&uint_word(self.payment));
        out.extend_from_slice(&address_word(self.payment_receiver));

        out.extend_from_slice(&usize_word(self.owners.len()));
        for owner in &self.owners {
            out.extend_from_slice(&address_word(*owner));
        }
        encode_dynamic_bytes(&mut out, &self.data);

        Bytes::from(out)
    }
}

/// `setup` call data for a single-owner Safe on `config`'s chain.
#[must_use]
pub fn build_initializer(owner: Address, config: &ContractConfig) -> Bytes {
    SetupParams::single_owner(owner, config.safe_fallback_handler).encode()
}

/// `keccak256(left_pad_32(owner))`.
#[must_use]
pub fn wallet_salt(owner: Address) -> B256 {
    keccak256(address_word(owner))
}

/// Last 20 bytes of `keccak256(0xff ‖ deployer ‖ salt ‖ init_code_hash)`.
#[must_use]
pub fn compute_create2_address(deployer: Address, salt: B256, init_code_hash: B256) -> Address {
    let mut bytes = Vec::with_capacity(1 + 20 + 32 + 32);
    bytes.push(0xff);
    bytes.extend_from_slice(deployer.as_slice());
    bytes.extend_from_slice(salt.as_slice());
    bytes.extend_from_slice(init_code_hash.as_slice());

    let hash = keccak256(&bytes);
    Address::from_slice(&hash[12..])
}

/// Safe address for `owner` under an explicit factory.
#[must_use]
pub fn derive_wallet_address_with_factory(owner: Address, factory: Address) -> Address {
    compute_create2_address(factory, wallet_salt(owner), SAFE_INIT_CODE_HASH)
}

/// Safe address for `owner` on `chain_id`.
///
/// Fails with `UnsupportedChain` when the chain is not registered.
pub fn derive_wallet_address(owner: Address, chain_id: u64, registry: &ChainRegistry) -> Result<Address> {
    let config = registry.get(chain_id)?;
    let wallet = derive_wallet_address_with_factory(owner, config.safe_factory);
    debug!(owner = %owner, chain_id, wallet = %wallet, "Derived Safe address");
    Ok(wallet)
}

/// Whether `expected` is the Safe address of `owner` on `chain_id`.
pub fn verify_wallet_address(
    owner: Address,
    expected: Address,
    chain_id: u64,
    registry: &ChainRegistry,
) -> Result<bool> {
    Ok(derive_wallet_address(owner, chain_id, registry)? == expected)
}

/// Everything needed to inspect a Safe deployment before submitting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCreationData {
    pub owner: Address,
    pub wallet: Address,
    pub factory: Address,
    pub singleton: Address,
    pub fallback_handler: Address,
    pub initializer: Bytes,
    pub chain_id: u64,
}

/// Creation parameters of `owner`'s Safe on `chain_id`.
pub fn wallet_creation_data(
    owner: Address,
    chain_id: u64,
    registry: &ChainRegistry,
) -> Result<WalletCreationData> {
    let config = registry.get(chain_id)?;
    Ok(WalletCreationData {
        owner,
        wallet: derive_wallet_address_with_factory(owner, config.safe_factory),
        factory: config.safe_factory,
        singleton: config.safe_singleton,
        fallback_handler: config.safe_fallback_handler,
        initializer: build_initializer(owner, &config),
        chain_id,
    })
}
