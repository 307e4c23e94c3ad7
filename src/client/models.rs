//! Relayer API response types.

use serde::{Deserialize, Serialize};

use crate::safe::TransactionType;

/// Transaction state from Relayer API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionState {
    #[serde(rename = "STATE_NEW")]
    New,
    #[serde(rename = "STATE_EXECUTED")]
    Executed,
    /// Included in a block
    #[serde(rename = "STATE_MINED")]
    Mined,
    /// Enough confirmations on top of the mined block
    #[serde(rename = "STATE_CONFIRMED")]
    Confirmed,
    #[serde(rename = "STATE_FAILED")]
    Failed,
    #[serde(rename = "STATE_INVALID")]
    Invalid,
    /// Any state this client does not know about
    #[serde(other)]
    Unknown,
}

impl TransactionState {
    /// No further transitions are expected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed | Self::Invalid)
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed | Self::Invalid)
    }

    /// Mined or confirmed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Mined | Self::Confirmed)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "STATE_NEW",
            Self::Executed => "STATE_EXECUTED",
            Self::Mined => "STATE_MINED",
            Self::Confirmed => "STATE_CONFIRMED",
            Self::Failed => "STATE_FAILED",
            Self::Invalid => "STATE_INVALID",
            Self::Unknown => "STATE_UNKNOWN",
        }
    }
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction as tracked by the relayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayerTransaction {
    #[serde(alias = "transactionID", alias = "id")]
    pub transaction_id: String,
    #[serde(alias = "status")]
    pub state: TransactionState,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<TransactionType>,
    /// Safe address
    #[serde(
        alias = "safeAddress",
        alias = "proxyAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub proxy_wallet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// On-chain hash once mined
    #[serde(
        alias = "transactionHash",
        alias = "txHash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl RelayerTransaction {
    /// Whether an on-chain hash has been assigned.
    #[must_use]
    pub fn is_mined(&self) -> bool {
        self.hash.as_deref().is_some_and(|hash| !hash.is_empty())
    }
}

/// Response of `POST /submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    #[serde(alias = "transactionID", alias = "id")]
    pub transaction_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TransactionState>,
    #[serde(
        alias = "transactionHash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hash: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NonceResponse {
    pub nonce: NonceValue,
}

/// The relayer has returned the nonce both as a string and as a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NonceValue {
    Text(String),
    Number(u64),
}

impl NonceValue {
    pub(crate) fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeployedResponse {
    pub deployed: bool,
}

/// `/transaction` answers with either an object or a one-element array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TransactionLookup {
    Many(Vec<RelayerTransaction>),
    One(Box<RelayerTransaction>),
}

impl TransactionLookup {
    pub(crate) fn into_first(self) -> Option<RelayerTransaction> {
        match self {
            Self::Many(transactions) => transactions.into_iter().next(),
            Self::One(transaction) => Some(*transaction),
        }
    }
}

/// `/transactions` answers with a bare array or a wrapper object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TransactionListing {
    Bare(Vec<RelayerTransaction>),
    Wrapped { transactions: Vec<RelayerTransaction> },
}

impl TransactionListing {
    pub(crate) fn into_vec(self) -> Vec<RelayerTransaction> {
        match self {
            Self::Bare(transactions) | Self::Wrapped { transactions } => transactions,
        }
    }
}

/// Error body returned by the relayer.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(alias = "message")]
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_names() {
        let state: TransactionState = serde_json::from_value(json!("STATE_MINED")).unwrap();
        assert_eq!(state, TransactionState::Mined);
        assert_eq!(serde_json::to_value(TransactionState::Failed).unwrap(), "STATE_FAILED");

        let unknown: TransactionState = serde_json::from_value(json!("STATE_QUEUED")).unwrap();
        assert_eq!(unknown, TransactionState::Unknown);
    }

    #[test]
    fn test_state_predicates() {
        assert!(TransactionState::Confirmed.is_terminal());
        assert!(!TransactionState::Mined.is_terminal());
        assert!(TransactionState::Mined.is_success());
        assert!(TransactionState::Invalid.is_failed());
        assert!(!TransactionState::New.is_failed());
    }

    #[test]
    fn test_transaction_aliases() {
        let tx: RelayerTransaction = serde_json::from_value(json!({
            "transactionID": "abc",
            "state": "STATE_NEW",
            "type": "SAFE-CREATE",
            "safeAddress": "0xd93B25cb943D14d0d34FBaF01Fc93a0f8b5F6E47",
            "chainId": 80002,
            "transactionHash": "",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(tx.transaction_id, "abc");
        assert_eq!(tx.r#type, Some(TransactionType::SafeCreate));
        assert_eq!(tx.chain_id, Some(80002));
        assert!(!tx.is_mined());
    }

    #[test]
    fn test_lookup_shapes() {
        let array: TransactionLookup =
            serde_json::from_value(json!([{ "transactionID": "a", "state": "STATE_MINED" }])).unwrap();
        assert_eq!(array.into_first().unwrap().transaction_id, "a");

        let object: TransactionLookup =
            serde_json::from_value(json!({ "transactionId": "b", "state": "STATE_NEW" })).unwrap();
        assert_eq!(object.into_first().unwrap().transaction_id, "b");

        let empty: TransactionLookup = serde_json::from_value(json!([])).unwrap();
        assert!(empty.into_first().is_none());
    }

    #[test]
    fn test_listing_shapes() {
        let wrapped: TransactionListing = serde_json::from_value(json!({
            "transactions": [{ "transactionId": "a", "state": "STATE_NEW" }],
            "total": 1
        }))
        .unwrap();
        assert_eq!(wrapped.into_vec().len(), 1);

        let bare: TransactionListing = serde_json::from_value(json!([])).unwrap();
        assert!(bare.into_vec().is_empty());
    }

    #[test]
    fn test_nonce_value_shapes() {
        let text: NonceResponse = serde_json::from_value(json!({ "nonce": "12" })).unwrap();
        assert_eq!(text.nonce.into_string(), "12");
        let number: NonceResponse = serde_json::from_value(json!({ "nonce": 7 })).unwrap();
        assert_eq!(number.nonce.into_string(), "7");
    }
}
