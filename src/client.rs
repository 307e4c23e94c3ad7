//! Relayer REST API client.
//!
//! | Endpoint | Method | Auth |
//! |----------|--------|------|
//! | `/nonce` | [`RelayerClient::get_nonce`] | none |
//! | `/deployed` | [`RelayerClient::get_deployed`] | none |
//! | `/transaction` | [`RelayerClient::get_transaction`] | none |
//! | `/transactions` | [`RelayerClient::get_transactions`] | builder |
//! | `/submit` | [`RelayerClient::submit`] | builder |
//!
//! ## Example
//!
//! ```rust,ignore
//! use safe_relayer_sdk::prelude::*;
//!
//! let client = RelayerClient::from_env()?;
//! let submitted = client.execute(vec![Call::call(target, data)], None).await?;
//! let mined = client.wait_until_mined(&submitted.transaction_id).await?;
//! ```

mod models;
mod relayer;

pub use models::{RelayerTransaction, SubmitResponse, TransactionState};
pub use relayer::{RelayerClient, RelayerConfig, CHAIN_ID_ENV};
