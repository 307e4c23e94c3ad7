//! # Safe Relayer SDK
//!
//! Prepare, sign and submit Safe wallet transactions through a gas-sponsoring
//! relayer.
//!
//! ## Features
//!
//! - **Address Derivation** - CREATE2 Safe address from the owner key
//! - **EIP-712** - Typed-data hashing for Safe transactions and proxy creation
//! - **MultiSend** - Batch several calls into one delegate call
//! - **Authentication** - Builder API HMAC headers
//! - **Relayer Client** - Nonce, deployment status, submission and polling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use safe_relayer_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = RelayerClient::from_env()?;
//!     println!("Safe: {}", client.expected_wallet()?);
//!
//!     let submitted = client.deploy().await?;
//!     client.wait_until_mined(&submitted.transaction_id).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`core`] - Error handling and endpoint configuration
//! - [`types`] - Calls, batch and creation requests
//! - [`chain`] - Per-chain contract addresses
//! - [`signer`] - secp256k1 signing and recovery
//! - [`eip712`] - Typed-data hashing
//! - [`safe`] - Address derivation, multisend and transaction assembly
//! - [`auth`] - Builder API authentication
//! - [`client`] - Relayer REST client

#![cfg_attr(docsrs, feature(doc_cfg))]

// Core infrastructure
pub mod core;

// Type definitions
pub mod types;

// Contract configuration
pub mod chain;

// Signing
pub mod eip712;
pub mod signer;

// Safe wallet
#[cfg(feature = "safe")]
#[cfg_attr(docsrs, doc(cfg(feature = "safe")))]
pub mod safe;

// Authentication
#[cfg(feature = "auth")]
#[cfg_attr(docsrs, doc(cfg(feature = "auth")))]
pub mod auth;

// Relayer client
#[cfg(feature = "client")]
#[cfg_attr(docsrs, doc(cfg(feature = "client")))]
pub mod client;

// Prelude for convenient imports
pub mod prelude;
