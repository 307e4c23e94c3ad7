//! Core infrastructure: error handling and endpoint configuration.

mod endpoints;
mod error;

pub use endpoints::{relayer_api_url, Endpoints, RELAYER_API_BASE, RELAYER_URL_ENV};
pub use error::{Error, RelayerError, Result};
