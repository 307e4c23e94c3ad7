//! Commonly used types for quick imports.
//!
//! # Example
//!
//! ```rust,ignore
//! use safe_relayer_sdk::prelude::*;
//!
//! let signer = Signer::from_env(POLYGON_CHAIN_ID)?;
//! let wallet = derive_wallet_address(signer.address(), POLYGON_CHAIN_ID, &ChainRegistry::new())?;
//! ```

// Core
pub use crate::core::{Endpoints, Error, RelayerError, Result};

// Common types
pub use crate::types::{BatchRequest, Call, OperationType, WalletCreationRequest};

// Chains and signing
pub use crate::chain::{ChainRegistry, ContractConfig, AMOY_CHAIN_ID, POLYGON_CHAIN_ID};
pub use crate::eip712::{typed_data_digest, TypedDataSpec, TypedRecord, TypedValue};
pub use crate::signer::Signer;

// Safe (if enabled)
#[cfg(feature = "safe")]
pub use crate::safe::{
    derive_wallet_address, PackedSignature, TransactionAssembler, TransactionRequest,
    TransactionType,
};

// Auth (if enabled)
#[cfg(feature = "auth")]
pub use crate::auth::{BuilderApiKeyCreds, BuilderSigner};

// Client (if enabled)
#[cfg(feature = "client")]
pub use crate::client::{
    RelayerClient, RelayerConfig, RelayerTransaction, SubmitResponse, TransactionState,
};
