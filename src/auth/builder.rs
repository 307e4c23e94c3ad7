//! Builder API authentication.
//!
//! Relayer endpoints that submit or list transactions require four
//! `POLY_BUILDER_*` headers carrying an HMAC-SHA256 over
//! `timestamp ‖ method ‖ path ‖ body`.
//!
//! # Example
//!
//! ```rust,ignore
//! use safe_relayer_sdk::auth::{BuilderApiKeyCreds, BuilderSigner};
//!
//! let creds = BuilderApiKeyCreds::from_env()?;
//! let signer = BuilderSigner::new(creds)?;
//! let headers = signer.create_builder_header_payload("POST", "/submit", Some(&body), None)?;
//! ```

// Signing scheme follows builder_signing_sdk_rs from
// https://github.com/polymarket/polymarket-rs-sdk (MIT OR Apache-2.0).

use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::core::{RelayerError, Result};

/// HMAC-SHA256 type alias.
pub type HmacSha256 = Hmac<Sha256>;

pub const BUILDER_API_KEY_HEADER: &str = "POLY_BUILDER_API_KEY";
pub const BUILDER_PASSPHRASE_HEADER: &str = "POLY_BUILDER_PASSPHRASE";
pub const BUILDER_SIGNATURE_HEADER: &str = "POLY_BUILDER_SIGNATURE";
pub const BUILDER_TIMESTAMP_HEADER: &str = "POLY_BUILDER_TIMESTAMP";

pub const BUILDER_API_KEY_ENV: &str = "BUILDER_API_KEY";
pub const BUILDER_SECRET_ENV: &str = "BUILDER_SECRET";
pub const BUILDER_PASSPHRASE_ENV: &str = "BUILDER_PASS_PHRASE";

/// Builder API credentials for authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BuilderApiKeyCreds {
    /// API key identifier.
    pub key: String,
    /// URL-safe base64 secret for HMAC signing.
    pub secret: String,
    pub passphrase: String,
}

impl fmt::Debug for BuilderApiKeyCreds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderApiKeyCreds")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

impl BuilderApiKeyCreds {
    /// Create new Builder API credentials.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Load from `BUILDER_API_KEY`, `BUILDER_SECRET` and `BUILDER_PASS_PHRASE`.
    ///
    /// Returns `Ok(None)` when none of them is set.
    pub fn from_env() -> Result<Option<Self>> {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        match (
            read(BUILDER_API_KEY_ENV),
            read(BUILDER_SECRET_ENV),
            read(BUILDER_PASSPHRASE_ENV),
        ) {
            (None, None, None) => Ok(None),
            (Some(key), Some(secret), Some(passphrase)) => {
                let creds = Self::new(key, secret, passphrase);
                creds.validate()?;
                Ok(Some(creds))
            }
            _ => Err(RelayerError::config(format!(
                "{BUILDER_API_KEY_ENV}, {BUILDER_SECRET_ENV} and {BUILDER_PASSPHRASE_ENV} must be set together"
            ))),
        }
    }

    /// Reject empty fields and a secret that is not base64.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("key", &self.key),
            ("secret", &self.secret),
            ("passphrase", &self.passphrase),
        ] {
            if value.trim().is_empty() {
                return Err(RelayerError::auth(format!("builder {field} is empty")));
            }
        }
        decode_secret(&self.secret).map(|_| ())
    }
}

fn decode_secret(secret_b64: &str) -> Result<Vec<u8>> {
    // Secrets are URL-safe base64; accept the standard alphabet too.
    base64::engine::general_purpose::URL_SAFE
        .decode(secret_b64)
        .or_else(|_| base64::engine::general_purpose::STANDARD.decode(secret_b64))
        .map_err(|e| RelayerError::auth(format!("Invalid base64 secret: {e}")))
}

/// Build URL-safe base64 HMAC-SHA256 signature.
///
/// # Errors
///
/// Returns an error if the secret is not valid base64.
pub fn build_builder_hmac_signature(
    secret_b64: &str,
    timestamp: i64,
    method: &str,
    request_path: &str,
    body: Option<&str>,
) -> Result<String> {
    let mut message = format!("{timestamp}{method}{request_path}");
    if let Some(b) = body {
        message.push_str(b);
    }

    let secret_bytes = decode_secret(secret_b64)?;
    let mut mac = HmacSha256::new_from_slice(&secret_bytes)
        .map_err(|e| RelayerError::auth(format!("HMAC initialization failed: {e}")))?;

    mac.update(message.as_bytes());
    let sig_b64 = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

    // URL-safe alphabet, '=' padding kept
    Ok(sig_b64.replace('+', "-").replace('/', "_"))
}

/// Builder API request signer.
#[derive(Clone, Debug)]
pub struct BuilderSigner {
    creds: BuilderApiKeyCreds,
}

impl BuilderSigner {
    /// Create a signer after validating `creds`.
    pub fn new(creds: BuilderApiKeyCreds) -> Result<Self> {
        creds.validate()?;
        Ok(Self { creds })
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.creds.key
    }

    /// Authentication headers for one request.
    ///
    /// `timestamp` defaults to the current unix time in seconds.
    pub fn create_builder_header_payload(
        &self,
        method: &str,
        path: &str,
        body: Option<&str>,
        timestamp: Option<i64>,
    ) -> Result<HashMap<String, String>> {
        let ts = timestamp.unwrap_or_else(current_unix_time_secs);
        let sig = build_builder_hmac_signature(&self.creds.secret, ts, method, path, body)?;

        Ok(HashMap::from([
            (BUILDER_API_KEY_HEADER.to_string(), self.creds.key.clone()),
            (
                BUILDER_PASSPHRASE_HEADER.to_string(),
                self.creds.passphrase.clone(),
            ),
            (BUILDER_SIGNATURE_HEADER.to_string(), sig),
            (BUILDER_TIMESTAMP_HEADER.to_string(), ts.to_string()),
        ]))
    }
}

fn current_unix_time_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "dGVzdC1zZWNyZXQ=";

    fn creds() -> BuilderApiKeyCreds {
        BuilderApiKeyCreds::new("test-key", SECRET, "test-passphrase")
    }

    #[test]
    fn test_hmac_signature_known_vectors() {
        let sig = build_builder_hmac_signature(SECRET, 1_700_000_000, "GET", "/transactions", None)
            .unwrap();
        assert_eq!(sig, "VBx_tVXNWJ2pqamyroxB2tKhlBfbEaMHfcpRAmuC3Sg=");

        let sig = build_builder_hmac_signature(
            SECRET,
            1_700_000_000,
            "POST",
            "/submit",
            Some(r#"{"a":1}"#),
        )
        .unwrap();
        assert_eq!(sig, "-b5MpkVlyyRgE8iyNbh6_WDNRatC3gmMoEL4v0ZZo-E=");
        assert!(!sig.contains('+'));
        assert!(!sig.contains('/'));
    }

    #[test]
    fn test_invalid_secret() {
        let err = build_builder_hmac_signature("not base64!", 0, "GET", "/", None).unwrap_err();
        assert!(matches!(err, RelayerError::Auth { .. }));
    }

    #[test]
    fn test_builder_signer_headers() {
        let signer = BuilderSigner::new(creds()).unwrap();
        let headers = signer
            .create_builder_header_payload("GET", "/transactions", None, Some(1_700_000_000))
            .unwrap();

        assert_eq!(headers[BUILDER_API_KEY_HEADER], "test-key");
        assert_eq!(headers[BUILDER_PASSPHRASE_HEADER], "test-passphrase");
        assert_eq!(headers[BUILDER_TIMESTAMP_HEADER], "1700000000");
        assert_eq!(
            headers[BUILDER_SIGNATURE_HEADER],
            "VBx_tVXNWJ2pqamyroxB2tKhlBfbEaMHfcpRAmuC3Sg="
        );
    }

    #[test]
    fn test_validate() {
        assert!(creds().validate().is_ok());
        assert!(BuilderApiKeyCreds::new("", SECRET, "p").validate().is_err());
        assert!(BuilderApiKeyCreds::new("k", SECRET, " ").validate().is_err());
        assert!(BuilderApiKeyCreds::new("k", "***", "p").validate().is_err());
        assert!(BuilderSigner::new(BuilderApiKeyCreds::new("k", "", "p")).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", creds());
        assert!(rendered.contains("test-key"));
        assert!(!rendered.contains(SECRET));
        assert!(!rendered.contains("test-passphrase"));
    }
}
