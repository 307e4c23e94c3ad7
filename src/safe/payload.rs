//! Relayer submission payload.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use super::signature::PackedSignature;
use crate::types::{Call, OperationType};

/// Transaction type for Relayer API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Call executed by an existing Safe
    #[serde(rename = "SAFE")]
    Safe,
    /// Safe deployment
    #[serde(rename = "SAFE-CREATE")]
    SafeCreate,
}

impl TransactionType {
    /// Wire name, also used as the nonce query `type`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::SafeCreate => "SAFE-CREATE",
        }
    }
}

/// A payload field that is either one value or one value per call.
///
/// The assembler aggregates batches before signing, so it only ever emits
/// [`WireField::Single`]; the array form is accepted when reading payloads
/// back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireField<T> {
    Single(T),
    Batch(Vec<T>),
}

impl<T> WireField<T> {
    #[must_use]
    pub fn as_single(&self) -> Option<&T> {
        match self {
            Self::Single(value) => Some(value),
            Self::Batch(_) => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Single(value) => vec![value],
            Self::Batch(values) => values,
        }
    }
}

impl<T> From<T> for WireField<T> {
    fn from(value: T) -> Self {
        Self::Single(value)
    }
}

/// EIP-55 checksummed address serialization, matching the address `Display`
/// used in query strings. Deserialization accepts either case.
mod checksummed {
    use alloy_primitives::Address;
    use serde::Serializer;

    use super::WireField;

    pub(super) fn address<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&address.to_checksum(None))
    }

    pub(super) fn option<S: Serializer>(
        address: &Option<Address>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match address {
            Some(address) => serializer.serialize_some(&address.to_checksum(None)),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn wire<S: Serializer>(
        field: &WireField<Address>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match field {
            WireField::Single(address) => self::address(address, serializer),
            WireField::Batch(addresses) => {
                serializer.collect_seq(addresses.iter().map(|address| address.to_checksum(None)))
            }
        }
    }
}

/// One owner's signature over a Safe transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    #[serde(serialize_with = "checksummed::address")]
    pub signer: Address,
    pub data: PackedSignature,
}

/// Signature slot of a payload: an array for wallet calls, a single value for
/// deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadSignature {
    #[serde(rename = "signatures")]
    Owners(Vec<SignatureEntry>),
    #[serde(rename = "signature")]
    Single(PackedSignature),
}

impl PayloadSignature {
    /// First signature regardless of shape.
    #[must_use]
    pub fn primary(&self) -> Option<&PackedSignature> {
        match self {
            Self::Owners(entries) => entries.first().map(|entry| &entry.data),
            Self::Single(signature) => Some(signature),
        }
    }
}

/// Parameters the relayer replays when calling the Safe contracts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureParams {
    /// Payment token (deployment)
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "checksummed::option")]
    pub payment_token: Option<Address>,
    /// Payment amount (deployment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<String>,
    /// Payment receiver (deployment)
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "checksummed::option")]
    pub payment_receiver: Option<Address>,
    /// Operation code (wallet call)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<OperationType>,
    /// Safe transaction gas (wallet call)
    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "safeTxGas",
        alias = "safeTxnGas"
    )]
    pub safe_tx_gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "checksummed::option")]
    pub gas_token: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "checksummed::option")]
    pub refund_receiver: Option<Address>,
}

impl SignatureParams {
    /// Zero gas settings for a wallet call.
    #[must_use]
    pub fn safe_tx(operation: OperationType) -> Self {
        Self {
            operation: Some(operation),
            safe_tx_gas: Some("0".to_string()),
            base_gas: Some("0".to_string()),
            gas_price: Some("0".to_string()),
            gas_token: Some(Address::ZERO),
            refund_receiver: Some(Address::ZERO),
            ..Self::default()
        }
    }

    /// Zero payment settings for a deployment.
    #[must_use]
    pub fn safe_create() -> Self {
        Self {
            payment_token: Some(Address::ZERO),
            payment: Some("0".to_string()),
            payment_receiver: Some(Address::ZERO),
            ..Self::default()
        }
    }
}

/// Transaction request for Relayer API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(rename = "type")]
    pub r#type: TransactionType,
    /// Owner address (signer)
    #[serde(serialize_with = "checksummed::address")]
    pub from: Address,
    /// Safe address
    #[serde(alias = "safeAddress", serialize_with = "checksummed::address")]
    pub proxy_wallet: Address,
    #[serde(serialize_with = "checksummed::wire")]
    pub to: WireField<Address>,
    /// Decimal wei
    pub value: WireField<String>,
    pub data: WireField<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<WireField<OperationType>>,
    #[serde(flatten)]
    pub signature: PayloadSignature,
    pub signature_params: SignatureParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    pub chain_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl TransactionRequest {
    /// Wallet-call request for the already aggregated `call`.
    #[must_use]
    pub fn safe(
        owner: Address,
        wallet: Address,
        call: &Call,
        signature: PackedSignature,
        nonce: U256,
        chain_id: u64,
    ) -> Self {
        Self {
            r#type: TransactionType::Safe,
            from: owner,
            proxy_wallet: wallet,
            to: call.to.into(),
            value: call.value.to_string().into(),
            data: call.data.clone().into(),
            operation: Some(call.operation.into()),
            signature: PayloadSignature::Owners(vec![SignatureEntry {
                signer: owner,
                data: signature,
            }]),
            signature_params: SignatureParams::safe_tx(call.operation),
            nonce: Some(nonce.to_string()),
            chain_id,
            metadata: None,
        }
    }

    /// Deployment request for `wallet` through `factory`.
    #[must_use]
    pub fn safe_create(
        owner: Address,
        wallet: Address,
        factory: Address,
        signature: PackedSignature,
        chain_id: u64,
    ) -> Self {
        Self {
            r#type: TransactionType::SafeCreate,
            from: owner,
            proxy_wallet: wallet,
            to: factory.into(),
            value: "0".to_string().into(),
            data: Bytes::new().into(),
            operation: None,
            signature: PayloadSignature::Single(signature),
            signature_params: SignatureParams::safe_create(),
            nonce: None,
            chain_id,
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Option<String>) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safe::signature::pack_signature;
    use alloy_primitives::address;
    use serde_json::json;

    const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const WALLET: Address = address!("d93B25cb943D14d0d34FBaF01Fc93a0f8b5F6E47");

    fn signature() -> PackedSignature {
        let mut raw = [0x22u8; 65];
        raw[64] = 27;
        pack_signature(&raw).unwrap()
    }

    #[test]
    fn test_wire_field_shapes() {
        let single: WireField<String> = serde_json::from_value(json!("0")).unwrap();
        assert_eq!(single, WireField::Single("0".to_string()));

        let batch: WireField<String> = serde_json::from_value(json!(["0", "1"])).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.as_single().is_none());
        assert_eq!(batch.into_vec(), vec!["0".to_string(), "1".to_string()]);
    }

    #[test]
    fn test_safe_request_json() {
        let call = Call::call(address!("1111111111111111111111111111111111111111"), Bytes::new());
        let request = TransactionRequest::safe(OWNER, WALLET, &call, signature(), U256::from(5), 137)
            .with_metadata(Some("approve".to_string()));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["type"], "SAFE");
        assert_eq!(value["from"], "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(value["proxyWallet"], "0xd93B25cb943D14d0d34FBaF01Fc93a0f8b5F6E47");
        assert_eq!(value["to"], "0x1111111111111111111111111111111111111111");
        assert_eq!(value["value"], "0");
        assert_eq!(value["data"], "0x");
        assert_eq!(value["operation"], 0);
        assert_eq!(value["nonce"], "5");
        assert_eq!(value["chainId"], 137);
        assert_eq!(value["metadata"], "approve");
        assert!(value.get("signature").is_none());

        let entries = value["signatures"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["signer"], value["from"]);
        assert!(entries[0]["data"].as_str().unwrap().ends_with("1f"));

        let params = &value["signatureParams"];
        assert_eq!(params["safeTxGas"], "0");
        assert_eq!(params["gasToken"], "0x0000000000000000000000000000000000000000");
        assert!(params.get("paymentToken").is_none());
    }

    #[test]
    fn test_create_request_json() {
        let factory = crate::chain::SAFE_FACTORY;
        let request = TransactionRequest::safe_create(OWNER, WALLET, factory, signature(), 80002);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["type"], "SAFE-CREATE");
        assert_eq!(value["to"], "0xaacFeEa03eb1561C4e67d661e40682Bd20E3541b");
        assert_eq!(value["data"], "0x");
        assert!(value.get("nonce").is_none());
        assert!(value.get("operation").is_none());
        assert!(value.get("signatures").is_none());
        assert!(value["signature"].as_str().unwrap().starts_with("0x2222"));
        assert_eq!(value["signatureParams"]["payment"], "0");
        assert!(value["signatureParams"].get("safeTxGas").is_none());
    }

    #[test]
    fn test_addresses_serialize_checksummed() {
        let mut params = SignatureParams::safe_create();
        params.payment_receiver = Some(WALLET);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["paymentReceiver"], WALLET.to_string());
        assert_eq!(value["paymentToken"], "0x0000000000000000000000000000000000000000");

        let to: WireField<Address> = WireField::Batch(vec![OWNER, WALLET]);
        let call = Call::call(OWNER, Bytes::new());
        let mut request = TransactionRequest::safe(OWNER, WALLET, &call, signature(), U256::ZERO, 137);
        request.to = to;
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["to"],
            json!(["0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266", "0xd93B25cb943D14d0d34FBaF01Fc93a0f8b5F6E47"])
        );
        assert_eq!(value["signatures"][0]["signer"], "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(value["from"], OWNER.to_string());
    }

    #[test]
    fn test_request_reads_back() {
        let call = Call::call(address!("1111111111111111111111111111111111111111"), Bytes::new());
        let request = TransactionRequest::safe(OWNER, WALLET, &call, signature(), U256::from(5), 137);
        let json = serde_json::to_string(&request).unwrap();
        let back: TransactionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_request_accepts_safe_address_alias() {
        let value = json!({
            "type": "SAFE",
            "from": OWNER,
            "safeAddress": WALLET,
            "to": ["0x1111111111111111111111111111111111111111"],
            "value": ["0"],
            "data": ["0x"],
            "signatures": [{ "signer": OWNER, "data": signature() }],
            "signatureParams": { "safeTxnGas": "0" },
            "nonce": "1",
            "chainId": 137
        });
        let request: TransactionRequest = serde_json::from_value(value).unwrap();
        assert_eq!(request.proxy_wallet, WALLET);
        assert_eq!(request.to.len(), 1);
        assert_eq!(request.signature_params.safe_tx_gas.as_deref(), Some("0"));
        assert_eq!(request.signature.primary(), Some(&signature()));
    }
}
