//! Relayer API endpoint configuration.
//!
//! The base URL can be overridden with the `RELAYER_URL` environment variable.

/// Default relayer API base URL.
pub const RELAYER_API_BASE: &str = "https://relayer-v2.polymarket.com";

/// Environment variable overriding [`RELAYER_API_BASE`].
pub const RELAYER_URL_ENV: &str = "RELAYER_URL";

/// Relayer base URL, honoring the `RELAYER_URL` override.
#[must_use]
pub fn relayer_api_url() -> String {
    std::env::var(RELAYER_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| RELAYER_API_BASE.to_string())
}

/// Relayer API paths.
#[derive(Debug, Clone, Copy)]
pub struct Endpoints;

impl Endpoints {
    /// Current nonce for a signer
    pub const NONCE: &'static str = "/nonce";
    /// Whether a Safe is deployed
    pub const DEPLOYED: &'static str = "/deployed";
    /// A single transaction by id
    pub const TRANSACTION: &'static str = "/transaction";
    /// All transactions for the builder
    pub const TRANSACTIONS: &'static str = "/transactions";
    /// Submit a signed transaction
    pub const SUBMIT: &'static str = "/submit";
}
