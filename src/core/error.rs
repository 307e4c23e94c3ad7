//! Error types for the Safe relayer SDK.
//!
//! Encoding and signing failures are never retryable; network and API
//! failures carry retry hints.

use std::time::Duration;
use thiserror::Error;

/// Main error type for the SDK.
#[derive(Error, Debug)]
pub enum RelayerError {
    /// Malformed caller input (wrong digest length, bad hex, bad address)
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// No contract configuration registered for the chain
    #[error("Unsupported chain: no contract config registered for chain id {chain_id}")]
    UnsupportedChain { chain_id: u64 },

    /// Typed-data field type the hasher cannot encode
    #[error("Unsupported typed-data type: {type_name}")]
    UnsupportedType { type_name: String },

    /// Declared typed-data field missing from the value record
    #[error("Missing field '{field}' in typed-data struct {type_name}")]
    MissingField { type_name: String, field: String },

    /// The ECDSA signing primitive failed
    #[error("Signing error: {message}")]
    Signing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed signature bytes
    #[error("Invalid signature: {message}")]
    InvalidSignature { message: String },

    /// Recovery id outside {0, 1, 27, 28}
    #[error("Unexpected recovery id {v}: expected one of 0, 1, 27, 28")]
    UnexpectedRecoveryId { v: u8 },

    /// Operation needs a signer but none is configured
    #[error("Signer required for {operation}")]
    SignerRequired { operation: String },

    /// Operation needs Builder API credentials but none are configured
    #[error("Builder API credentials required for {operation}")]
    BuilderCredentialsRequired { operation: String },

    /// A batch must contain at least one call
    #[error("Empty batch: at least one call is required")]
    EmptyBatch,

    /// Multisend blob ended in the middle of an entry
    #[error("Truncated multisend data at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Network-related errors (typically retryable)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Non-success HTTP status from the relayer
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        error_code: Option<String>,
    },

    /// Builder API authentication errors
    #[error("Auth error: {message}")]
    Auth { message: String },

    /// Configuration errors
    #[error("Config error: {message}")]
    Config { message: String },

    /// Parsing/serialization errors
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Timeout errors
    #[error("Timeout: {operation} timed out after {duration:?}")]
    Timeout {
        duration: Duration,
        operation: String,
    },

    /// Relayer reported a failure state for the transaction
    #[error("Transaction {transaction_id} failed with state {state}")]
    TransactionFailed {
        transaction_id: String,
        state: String,
    },

    /// Polling gave up before the transaction reached a target state
    #[error("Transaction {transaction_id} did not reach a target state after {attempts} polls")]
    PollingTimeout {
        transaction_id: String,
        attempts: u32,
    },

    /// Wallet already deployed, creation would be redundant
    #[error("Safe already deployed at {wallet}")]
    AlreadyDeployed { wallet: String },

    /// Internal errors (bugs)
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RelayerError {
    /// Check if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Api { status, .. } => *status == 429 || (*status >= 500 && *status < 600),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Get suggested retry delay.
    #[must_use]
    pub fn retry_delay(&self) -> Option<Duration> {
        match self {
            Self::Network { .. } => Some(Duration::from_millis(100)),
            Self::Api { status, .. } if *status == 429 => Some(Duration::from_secs(1)),
            Self::Api { status, .. } if *status >= 500 => Some(Duration::from_millis(500)),
            Self::Timeout { .. } => Some(Duration::from_millis(50)),
            _ => None,
        }
    }

    /// Check if this error indicates a programming or configuration defect
    /// rather than a runtime condition.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType { .. }
                | Self::MissingField { .. }
                | Self::UnexpectedRecoveryId { .. }
                | Self::SignerRequired { .. }
                | Self::BuilderCredentialsRequired { .. }
                | Self::Config { .. }
                | Self::Internal { .. }
        )
    }

    /// Get error category for metrics.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::UnsupportedChain { .. } => "unsupported_chain",
            Self::UnsupportedType { .. } | Self::MissingField { .. } => "typed_data",
            Self::Signing { .. } => "signing",
            Self::InvalidSignature { .. } | Self::UnexpectedRecoveryId { .. } => "signature",
            Self::SignerRequired { .. } | Self::BuilderCredentialsRequired { .. } => {
                "configuration"
            }
            Self::EmptyBatch | Self::TruncatedData { .. } => "multisend",
            Self::Network { .. } => "network",
            Self::Api { .. } => "api",
            Self::Auth { .. } => "auth",
            Self::Config { .. } => "config",
            Self::Parse { .. } => "parse",
            Self::Timeout { .. } => "timeout",
            Self::TransactionFailed { .. } | Self::PollingTimeout { .. } => "transaction",
            Self::AlreadyDeployed { .. } => "deployment",
            Self::Internal { .. } => "internal",
        }
    }
}

// Convenience constructors
impl RelayerError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error naming the offending field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a signing error with source.
    pub fn signing<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Signing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid signature error.
    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::InvalidSignature {
            message: message.into(),
        }
    }

    /// Create a signer-required error for the named operation.
    pub fn signer_required(operation: impl Into<String>) -> Self {
        Self::SignerRequired {
            operation: operation.into(),
        }
    }

    /// Create a builder-credentials-required error for the named operation.
    pub fn builder_credentials_required(operation: impl Into<String>) -> Self {
        Self::BuilderCredentialsRequired {
            operation: operation.into(),
        }
    }

    /// Create a network error with source.
    pub fn network<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            error_code: None,
        }
    }

    /// Create an auth error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a parse error with source.
    pub fn parse_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with source.
    pub fn internal_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for RelayerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                duration: Duration::from_secs(60),
                operation: "HTTP request".to_string(),
            }
        } else if err.is_connect() || err.is_request() {
            Self::network("HTTP request failed", err)
        } else if err.is_decode() {
            Self::parse_with_source("Failed to decode relayer response", err)
        } else {
            Self::internal_with_source("Unexpected reqwest error", err)
        }
    }
}

impl From<serde_json::Error> for RelayerError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_with_source(format!("JSON parsing failed: {err}"), err)
    }
}

#[cfg(feature = "client")]
impl From<url::ParseError> for RelayerError {
    fn from(err: url::ParseError) -> Self {
        Self::config(format!("Invalid URL: {err}"))
    }
}

// Manual Clone implementation since Box<dyn Error> doesn't implement Clone
impl Clone for RelayerError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidInput { message, field } => Self::InvalidInput {
                message: message.clone(),
                field: field.clone(),
            },
            Self::UnsupportedChain { chain_id } => Self::UnsupportedChain {
                chain_id: *chain_id,
            },
            Self::UnsupportedType { type_name } => Self::UnsupportedType {
                type_name: type_name.clone(),
            },
            Self::MissingField { type_name, field } => Self::MissingField {
                type_name: type_name.clone(),
                field: field.clone(),
            },
            Self::Signing { message, .. } => Self::Signing {
                message: message.clone(),
                source: None,
            },
            Self::InvalidSignature { message } => Self::InvalidSignature {
                message: message.clone(),
            },
            Self::UnexpectedRecoveryId { v } => Self::UnexpectedRecoveryId { v: *v },
            Self::SignerRequired { operation } => Self::SignerRequired {
                operation: operation.clone(),
            },
            Self::BuilderCredentialsRequired { operation } => Self::BuilderCredentialsRequired {
                operation: operation.clone(),
            },
            Self::EmptyBatch => Self::EmptyBatch,
            Self::TruncatedData {
                offset,
                needed,
                available,
            } => Self::TruncatedData {
                offset: *offset,
                needed: *needed,
                available: *available,
            },
            Self::Network { message, .. } => Self::Network {
                message: message.clone(),
                source: None,
            },
            Self::Api {
                status,
                message,
                error_code,
            } => Self::Api {
                status: *status,
                message: message.clone(),
                error_code: error_code.clone(),
            },
            Self::Auth { message } => Self::Auth {
                message: message.clone(),
            },
            Self::Config { message } => Self::Config {
                message: message.clone(),
            },
            Self::Parse { message, .. } => Self::Parse {
                message: message.clone(),
                source: None,
            },
            Self::Timeout {
                duration,
                operation,
            } => Self::Timeout {
                duration: *duration,
                operation: operation.clone(),
            },
            Self::TransactionFailed {
                transaction_id,
                state,
            } => Self::TransactionFailed {
                transaction_id: transaction_id.clone(),
                state: state.clone(),
            },
            Self::PollingTimeout {
                transaction_id,
                attempts,
            } => Self::PollingTimeout {
                transaction_id: transaction_id.clone(),
                attempts: *attempts,
            },
            Self::AlreadyDeployed { wallet } => Self::AlreadyDeployed {
                wallet: wallet.clone(),
            },
            Self::Internal { message, .. } => Self::Internal {
                message: message.clone(),
                source: None,
            },
        }
    }
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, RelayerError>;

/// Alias for brevity in downstream code.
pub type Error = RelayerError;
