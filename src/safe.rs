//! Safe wallet transactions for the relayer.
//!
//! ## Features
//!
//! - **Address Derivation**: CREATE2 Safe address and the `setup` initializer
//! - **MultiSend**: packing several calls into one delegate call
//! - **Signature Packing**: `v` remapped to the Safe's 31/32 form
//! - **Assembly**: signed EXECUTE and CREATE payloads
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use safe_relayer_sdk::prelude::*;
//!
//! let registry = Arc::new(ChainRegistry::new());
//! let signer = Signer::from_env(POLYGON_CHAIN_ID)?;
//! let assembler = TransactionAssembler::new(POLYGON_CHAIN_ID, registry).with_signer(signer);
//!
//! let wallet = assembler.expected_wallet()?;
//! let request = BatchRequest::new(wallet, vec![Call::call(target, data)], nonce);
//! let payload = assembler.build_execute(&request)?;
//! ```

mod abi;
pub mod assembler;
pub mod derive;
pub mod multisend;
pub mod payload;
pub mod signature;

pub use assembler::{
    create_proxy_typed_data, safe_tx_typed_data, DeploymentSource, NonceSource,
    TransactionAssembler, CREATE_PROXY_TYPE, PROXY_FACTORY_NAME, SAFE_SIGNER_TYPE, SAFE_TX_TYPE,
};
pub use derive::{
    build_initializer, compute_create2_address, derive_wallet_address,
    derive_wallet_address_with_factory, verify_wallet_address, wallet_creation_data, wallet_salt,
    SetupParams, WalletCreationData, SAFE_INIT_CODE_HASH, SETUP_SIGNATURE,
};
pub use multisend::{MULTISEND_SELECTOR, MULTISEND_SIGNATURE};
pub use payload::{
    PayloadSignature, SignatureEntry, SignatureParams, TransactionRequest, TransactionType,
    WireField,
};
pub use signature::{
    pack_signature, remap_recovery_id, split_signature, unpack_signature, PackedSignature,
    SplitSignature,
};
