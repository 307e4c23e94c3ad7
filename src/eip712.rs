//! Generic EIP-712 typed-data hashing.
//!
//! Values are passed as an explicit [`TypedRecord`] (field name →
//! [`TypedValue`]) so any struct and any domain shape can be hashed without
//! special-casing. Two strictness rules differ on purpose:
//!
//! - [`hash_struct`] fails with [`RelayerError::MissingField`] when a declared
//!   field has no value.
//! - [`hash_domain`] skips declared domain fields that have no value, so a
//!   `verifyingContract`-only domain and a `name`/`chainId`/`verifyingContract`
//!   domain go through the same code.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{keccak256, Address, Bytes, B256, I256, U256};
use serde::{Deserialize, Serialize};

use crate::core::{RelayerError, Result};

/// Type name under which the domain fields are declared.
pub const DOMAIN_TYPE: &str = "EIP712Domain";

/// One `type name` entry of a struct definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
}

impl TypedField {
    #[must_use]
    pub fn new(name: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
        }
    }
}

/// Struct definitions keyed by type name.
pub type TypeMap = BTreeMap<String, Vec<TypedField>>;

/// A value to be encoded against a declared field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Address(Address),
    Uint(U256),
    Int(I256),
    Bool(bool),
    String(String),
    /// Dynamic `bytes` or fixed `bytesN`
    Bytes(Bytes),
    /// `T[]` or `T[N]`
    Array(Vec<TypedValue>),
    /// Nested struct
    Struct(TypedRecord),
}

impl From<Address> for TypedValue {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl From<U256> for TypedValue {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<u64> for TypedValue {
    fn from(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<u8> for TypedValue {
    fn from(value: u8) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<I256> for TypedValue {
    fn from(value: I256) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Bytes> for TypedValue {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<B256> for TypedValue {
    fn from(value: B256) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value.as_slice()))
    }
}

impl From<TypedRecord> for TypedValue {
    fn from(value: TypedRecord) -> Self {
        Self::Struct(value)
    }
}

/// Field name → value map for one struct instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedRecord(BTreeMap<String, TypedValue>);

impl TypedRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<TypedValue>) {
        self.0.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.0.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Complete typed-data payload: definitions, domain and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedDataSpec {
    /// Struct definitions, including [`DOMAIN_TYPE`]
    pub types: TypeMap,
    pub primary_type: String,
    pub domain: TypedRecord,
    pub message: TypedRecord,
}

impl TypedDataSpec {
    #[must_use]
    pub fn new(primary_type: impl Into<String>) -> Self {
        Self {
            types: TypeMap::new(),
            primary_type: primary_type.into(),
            domain: TypedRecord::new(),
            message: TypedRecord::new(),
        }
    }

    /// Declare a struct type from `(name, type)` pairs.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>, fields: &[(&str, &str)]) -> Self {
        let fields = fields
            .iter()
            .map(|(name, ty)| TypedField::new(*name, *ty))
            .collect();
        self.types.insert(type_name.into(), fields);
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: TypedRecord) -> Self {
        self.domain = domain;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: TypedRecord) -> Self {
        self.message = message;
        self
    }

    /// The digest to sign. See [`hash_typed_data`].
    pub fn hash(&self) -> Result<B256> {
        hash_typed_data(self)
    }
}

/// `Name(type1 name1,type2 name2,...)` for a single struct.
#[must_use]
pub fn encode_type_string(type_name: &str, fields: &[TypedField]) -> String {
    let members: Vec<String> = fields
        .iter()
        .map(|field| format!("{} {}", field.r#type, field.name))
        .collect();
    format!("{type_name}({})", members.join(","))
}

/// Full type encoding: the struct itself followed by every struct it
/// references, sorted by name.
pub fn encode_type(type_name: &str, types: &TypeMap) -> Result<String> {
    let fields = lookup_type(type_name, types)?;

    let mut deps = BTreeSet::new();
    collect_dependencies(type_name, types, &mut deps);
    deps.remove(type_name);

    let mut encoded = encode_type_string(type_name, fields);
    for dep in deps {
        encoded.push_str(&encode_type_string(&dep, lookup_type(&dep, types)?));
    }
    Ok(encoded)
}

/// `keccak256(encode_type(type_name))`.
pub fn type_hash(type_name: &str, types: &TypeMap) -> Result<B256> {
    Ok(keccak256(encode_type(type_name, types)?.as_bytes()))
}

/// Encode one value into its 32-byte slot.
pub fn encode_value(field_type: &str, value: &TypedValue, types: &TypeMap) -> Result<[u8; 32]> {
    if let Some(element_type) = array_element_type(field_type) {
        let TypedValue::Array(items) = value else {
            return Err(type_mismatch(field_type, value));
        };
        let mut encoded = Vec::with_capacity(items.len() * 32);
        for item in items {
            encoded.extend_from_slice(&encode_value(element_type, item, types)?);
        }
        return Ok(keccak256(&encoded).0);
    }

    if types.contains_key(field_type) {
        let TypedValue::Struct(record) = value else {
            return Err(type_mismatch(field_type, value));
        };
        return Ok(hash_struct(field_type, record, types)?.0);
    }

    let mut slot = [0u8; 32];
    match (field_type, value) {
        ("string", TypedValue::String(s)) => slot = keccak256(s.as_bytes()).0,
        ("bytes", TypedValue::Bytes(b)) => slot = keccak256(b).0,
        ("address", TypedValue::Address(a)) => slot[12..].copy_from_slice(a.as_slice()),
        ("bool", TypedValue::Bool(b)) => slot[31] = u8::from(*b),
        ("string" | "bytes" | "address" | "bool", value) => {
            return Err(type_mismatch(field_type, value))
        }
        (ty, value) if ty.starts_with("bytes") => {
            let size = type_size(ty, "bytes", 1..=32)?;
            let TypedValue::Bytes(b) = value else {
                return Err(type_mismatch(ty, value));
            };
            if b.len() > size {
                return Err(RelayerError::invalid_input(format!(
                    "{ty} value has {} bytes",
                    b.len()
                )));
            }
            slot[..b.len()].copy_from_slice(b);
        }
        (ty, value) if ty.starts_with("uint") => {
            let bits = type_size(ty, "uint", 8..=256)?;
            let TypedValue::Uint(n) = value else {
                return Err(type_mismatch(ty, value));
            };
            if n.bit_len() > bits {
                return Err(RelayerError::invalid_input(format!("{n} overflows {ty}")));
            }
            slot = n.to_be_bytes::<32>();
        }
        (ty, value) if ty.starts_with("int") => {
            type_size(ty, "int", 8..=256)?;
            slot = match value {
                TypedValue::Int(n) => n.to_be_bytes::<32>(),
                TypedValue::Uint(n) => I256::try_from(*n)
                    .map_err(|_| RelayerError::invalid_input(format!("{n} overflows {ty}")))?
                    .to_be_bytes::<32>(),
                other => return Err(type_mismatch(ty, other)),
            };
        }
        _ => {
            return Err(RelayerError::UnsupportedType {
                type_name: field_type.to_string(),
            })
        }
    }
    Ok(slot)
}

/// Concatenated slots of every declared field, in declaration order.
pub fn encode_struct_data(type_name: &str, record: &TypedRecord, types: &TypeMap) -> Result<Vec<u8>> {
    let fields = lookup_type(type_name, types)?;
    let mut encoded = Vec::with_capacity(fields.len() * 32);
    for field in fields {
        let value = record.get(&field.name).ok_or_else(|| RelayerError::MissingField {
            type_name: type_name.to_string(),
            field: field.name.clone(),
        })?;
        encoded.extend_from_slice(&encode_value(&field.r#type, value, types)?);
    }
    Ok(encoded)
}

/// `keccak256(type_hash ‖ encode_struct_data)`.
pub fn hash_struct(type_name: &str, record: &TypedRecord, types: &TypeMap) -> Result<B256> {
    let mut encoded = type_hash(type_name, types)?.to_vec();
    encoded.extend_from_slice(&encode_struct_data(type_name, record, types)?);
    Ok(keccak256(&encoded))
}

/// Domain separator. Declared domain fields absent from `domain` are skipped.
pub fn hash_domain(domain: &TypedRecord, types: &TypeMap) -> Result<B256> {
    let fields = lookup_type(DOMAIN_TYPE, types)?;
    let mut encoded = keccak256(encode_type_string(DOMAIN_TYPE, fields).as_bytes()).to_vec();
    for field in fields {
        if let Some(value) = domain.get(&field.name) {
            encoded.extend_from_slice(&encode_value(&field.r#type, value, types)?);
        }
    }
    Ok(keccak256(&encoded))
}

/// `keccak256(0x19 ‖ 0x01 ‖ hash_domain ‖ hash_struct(primary_type, message))`.
pub fn hash_typed_data(spec: &TypedDataSpec) -> Result<B256> {
    let domain_separator = hash_domain(&spec.domain, &spec.types)?;
    let struct_hash = hash_struct(&spec.primary_type, &spec.message, &spec.types)?;
    Ok(typed_data_digest(domain_separator, struct_hash))
}

/// Final EIP-712 digest from its two halves.
#[must_use]
pub fn typed_data_digest(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut preimage = [0u8; 66];
    preimage[0] = 0x19;
    preimage[1] = 0x01;
    preimage[2..34].copy_from_slice(domain_separator.as_slice());
    preimage[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(preimage)
}

fn lookup_type<'a>(type_name: &str, types: &'a TypeMap) -> Result<&'a [TypedField]> {
    types
        .get(type_name)
        .map(Vec::as_slice)
        .ok_or_else(|| RelayerError::UnsupportedType {
            type_name: type_name.to_string(),
        })
}

fn collect_dependencies(type_name: &str, types: &TypeMap, found: &mut BTreeSet<String>) {
    let base = strip_array_suffixes(type_name);
    let Some(fields) = types.get(base) else {
        return;
    };
    if !found.insert(base.to_string()) {
        return;
    }
    for field in fields {
        collect_dependencies(&field.r#type, types, found);
    }
}

fn strip_array_suffixes(mut ty: &str) -> &str {
    while let Some(element) = array_element_type(ty) {
        ty = element;
    }
    ty
}

/// `T` for `T[]` / `T[N]`.
fn array_element_type(ty: &str) -> Option<&str> {
    if !ty.ends_with(']') {
        return None;
    }
    ty.rfind('[').map(|open| &ty[..open])
}

fn type_size(ty: &str, prefix: &str, range: std::ops::RangeInclusive<usize>) -> Result<usize> {
    let unsupported = || RelayerError::UnsupportedType {
        type_name: ty.to_string(),
    };
    let digits = &ty[prefix.len()..];
    if digits.is_empty() && prefix != "bytes" {
        return Ok(256);
    }
    let size: usize = digits.parse().map_err(|_| unsupported())?;
    if !range.contains(&size) || (prefix != "bytes" && size % 8 != 0) {
        return Err(unsupported());
    }
    Ok(size)
}

fn type_mismatch(field_type: &str, value: &TypedValue) -> RelayerError {
    let kind = match value {
        TypedValue::Address(_) => "address",
        TypedValue::Uint(_) => "uint",
        TypedValue::Int(_) => "int",
        TypedValue::Bool(_) => "bool",
        TypedValue::String(_) => "string",
        TypedValue::Bytes(_) => "bytes",
        TypedValue::Array(_) => "array",
        TypedValue::Struct(_) => "struct",
    };
    RelayerError::invalid_input(format!("cannot encode {kind} value as {field_type}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, hex};

    fn safe_tx_spec(nonce: u64, data: Bytes, domain: TypedRecord, domain_fields: &[(&str, &str)]) -> TypedDataSpec {
        TypedDataSpec::new("SafeTx")
            .with_type(DOMAIN_TYPE, domain_fields)
            .with_type(
                "SafeTx",
                &[
                    ("to", "address"),
                    ("value", "uint256"),
                    ("data", "bytes"),
                    ("operation", "uint8"),
                    ("safeTxGas", "uint256"),
                    ("baseGas", "uint256"),
                    ("gasPrice", "uint256"),
                    ("gasToken", "address"),
                    ("refundReceiver", "address"),
                    ("nonce", "uint256"),
                ],
            )
            .with_domain(domain)
            .with_message(
                TypedRecord::new()
                    .with("to", address!("A238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761"))
                    .with("value", U256::ZERO)
                    .with("data", data)
                    .with("operation", 1u8)
                    .with("safeTxGas", U256::ZERO)
                    .with("baseGas", U256::ZERO)
                    .with("gasPrice", U256::ZERO)
                    .with("gasToken", Address::ZERO)
                    .with("refundReceiver", Address::ZERO)
                    .with("nonce", nonce),
            )
    }

    // Multisend wrapper of two USDC approvals
    fn approvals_data() -> Bytes {
        Bytes::copy_from_slice(&hex!(
            "8d80ff0a"
            "0000000000000000000000000000000000000000000000000000000000000020"
            "0000000000000000000000000000000000000000000000000000000000000132"
            "002791bca1f2de4661ed88a30c99a7a9449aa84174"
            "0000000000000000000000000000000000000000000000000000000000000000"
            "0000000000000000000000000000000000000000000000000000000000000044"
            "095ea7b3"
            "0000000000000000000000004d97dcd97ec945f40cf65f87097ace5ea0476045"
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
            "002791bca1f2de4661ed88a30c99a7a9449aa84174"
            "0000000000000000000000000000000000000000000000000000000000000000"
            "0000000000000000000000000000000000000000000000000000000000000044"
            "095ea7b3"
            "0000000000000000000000004d97dcd97ec945f40cf65f87097ace5ea0476045"
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
            "0000000000000000000000000000"
        ))
    }

    const SAFE: Address = address!("d93B25cb943D14d0d34FBaF01Fc93a0f8b5F6E47");

    #[test]
    fn test_encode_type_string() {
        let fields = vec![
            TypedField::new("paymentToken", "address"),
            TypedField::new("payment", "uint256"),
            TypedField::new("paymentReceiver", "address"),
        ];
        assert_eq!(
            encode_type_string("CreateProxy", &fields),
            "CreateProxy(address paymentToken,uint256 payment,address paymentReceiver)"
        );
    }

    #[test]
    fn test_safe_tx_type_hash() {
        let spec = safe_tx_spec(0, Bytes::new(), TypedRecord::new(), &[]);
        assert_eq!(
            type_hash("SafeTx", &spec.types).unwrap(),
            b256!("bb8310d486368db6bd6f849402fdd73ad53d316b5a4b2644ad6efe0f941286d8")
        );
    }

    #[test]
    fn test_safe_tx_struct_hash() {
        let spec = safe_tx_spec(8, approvals_data(), TypedRecord::new(), &[]);
        assert_eq!(
            hash_struct("SafeTx", &spec.message, &spec.types).unwrap(),
            b256!("d2a5400b32a92a8e79c62dadf5b5838e4a6b28344604dbeefd0c11f5d2344c9e")
        );
    }

    #[test]
    fn test_verifying_contract_only_domain() {
        let spec = safe_tx_spec(
            8,
            approvals_data(),
            TypedRecord::new().with("verifyingContract", SAFE),
            &[("verifyingContract", "address")],
        );
        assert_eq!(
            spec.hash().unwrap(),
            b256!("734e3b5cdbb6e268683c8be81c180193b791c9d40b85767a2dec344664256733")
        );
    }

    #[test]
    fn test_chain_id_and_verifying_contract_domain() {
        let spec = safe_tx_spec(
            8,
            approvals_data(),
            TypedRecord::new()
                .with("chainId", 137u64)
                .with("verifyingContract", SAFE),
            &[("chainId", "uint256"), ("verifyingContract", "address")],
        );
        assert_eq!(
            spec.hash().unwrap(),
            b256!("06d5102c3e356b62a75f8203cd5ce7ab1fa8fdab33875ef621eee102220d90b8")
        );
    }

    #[test]
    fn test_named_domain_with_chain_id() {
        let spec = TypedDataSpec::new("CreateProxy")
            .with_type(
                DOMAIN_TYPE,
                &[
                    ("name", "string"),
                    ("chainId", "uint256"),
                    ("verifyingContract", "address"),
                ],
            )
            .with_type(
                "CreateProxy",
                &[
                    ("paymentToken", "address"),
                    ("payment", "uint256"),
                    ("paymentReceiver", "address"),
                ],
            )
            .with_domain(
                TypedRecord::new()
                    .with("name", "Polymarket Contract Proxy Factory")
                    .with("chainId", 137u64)
                    .with(
                        "verifyingContract",
                        address!("aacFeEa03eb1561C4e67d661e40682Bd20E3541b"),
                    ),
            )
            .with_message(
                TypedRecord::new()
                    .with("paymentToken", Address::ZERO)
                    .with("payment", U256::ZERO)
                    .with("paymentReceiver", Address::ZERO),
            );

        assert_eq!(
            type_hash("CreateProxy", &spec.types).unwrap(),
            b256!("dee5f5588156b735c3bff14a54c9acefc845807cec91b7fd0809fa3deccab363")
        );
        assert_eq!(
            spec.hash().unwrap(),
            b256!("563ac315294c5be01ab1f3b04a5abdfa39e8317a9d90679d4e63caf760b126a4")
        );
    }

    #[test]
    fn test_absent_domain_field_is_skipped() {
        let declared = &[("chainId", "uint256"), ("verifyingContract", "address")];
        let with_both = safe_tx_spec(
            1,
            Bytes::new(),
            TypedRecord::new().with("chainId", 137u64).with("verifyingContract", SAFE),
            declared,
        );
        let without_chain = safe_tx_spec(
            1,
            Bytes::new(),
            TypedRecord::new().with("verifyingContract", SAFE),
            declared,
        );
        assert!(without_chain.hash().is_ok());
        assert_ne!(with_both.hash().unwrap(), without_chain.hash().unwrap());
    }

    #[test]
    fn test_nested_struct() {
        let types: TypeMap = TypedDataSpec::new("Mail")
            .with_type(
                DOMAIN_TYPE,
                &[
                    ("name", "string"),
                    ("version", "string"),
                    ("chainId", "uint256"),
                    ("verifyingContract", "address"),
                ],
            )
            .with_type("Person", &[("name", "string"), ("wallet", "address")])
            .with_type(
                "Mail",
                &[("from", "Person"), ("to", "Person"), ("contents", "string")],
            )
            .types;

        let spec = TypedDataSpec {
            types,
            primary_type: "Mail".to_string(),
            domain: TypedRecord::new()
                .with("name", "Ether Mail")
                .with("version", "1")
                .with("chainId", 1u64)
                .with(
                    "verifyingContract",
                    address!("CcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"),
                ),
            message: TypedRecord::new()
                .with(
                    "from",
                    TypedRecord::new()
                        .with("name", "Cow")
                        .with("wallet", address!("CD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826")),
                )
                .with(
                    "to",
                    TypedRecord::new()
                        .with("name", "Bob")
                        .with("wallet", address!("bBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB")),
                )
                .with("contents", "Hello, Bob!"),
        };

        assert_eq!(
            encode_type("Mail", &spec.types).unwrap(),
            "Mail(Person from,Person to,string contents)Person(string name,address wallet)"
        );
        assert_eq!(
            hash_domain(&spec.domain, &spec.types).unwrap(),
            b256!("f2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f")
        );
        assert_eq!(
            hash_struct("Mail", &spec.message, &spec.types).unwrap(),
            b256!("c52c0ee5d84264471806290a3f2c4cecfc5490626bf912d01f240d7a274b371e")
        );
        assert_eq!(
            spec.hash().unwrap(),
            b256!("be609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2")
        );
    }

    #[test]
    fn test_missing_field() {
        let mut spec = safe_tx_spec(1, Bytes::new(), TypedRecord::new(), &[]);
        spec.message = TypedRecord::new().with("to", Address::ZERO);
        let err = spec.hash().unwrap_err();
        assert!(matches!(
            err,
            RelayerError::MissingField { ref type_name, ref field } if type_name == "SafeTx" && field == "value"
        ));
    }

    #[test]
    fn test_unsupported_type() {
        let types = TypeMap::new();
        for ty in ["float", "uint7", "uint512", "bytes33", "Unknown"] {
            let err = encode_value(ty, &TypedValue::Uint(U256::ZERO), &types).unwrap_err();
            assert!(
                matches!(err, RelayerError::UnsupportedType { ref type_name } if type_name == ty),
                "{ty} should be unsupported"
            );
        }
    }

    #[test]
    fn test_encode_value_layouts() {
        let types = TypeMap::new();

        let addr = encode_value(
            "address",
            &address!("1111111111111111111111111111111111111111").into(),
            &types,
        )
        .unwrap();
        assert_eq!(&addr[..12], &[0u8; 12]);
        assert_eq!(&addr[12..], &[0x11u8; 20]);

        let fixed = encode_value("bytes4", &TypedValue::Bytes(Bytes::from(vec![0xde, 0xad])), &types).unwrap();
        assert_eq!(&fixed[..2], &[0xde, 0xad]);
        assert_eq!(&fixed[2..], &[0u8; 30]);

        let flag = encode_value("bool", &true.into(), &types).unwrap();
        assert_eq!(flag[31], 1);
        assert_eq!(&flag[..31], &[0u8; 31]);

        let small = encode_value("uint8", &1u8.into(), &types).unwrap();
        assert_eq!(small, U256::from(1).to_be_bytes::<32>());

        let negative = encode_value("int256", &TypedValue::Int(I256::MINUS_ONE), &types).unwrap();
        assert_eq!(negative, [0xffu8; 32]);

        let text = encode_value("string", &"abc".into(), &types).unwrap();
        assert_eq!(text, keccak256(b"abc").0);
    }

    #[test]
    fn test_encode_value_rejects_mismatch_and_overflow() {
        let types = TypeMap::new();
        assert!(matches!(
            encode_value("address", &TypedValue::Bool(true), &types),
            Err(RelayerError::InvalidInput { .. })
        ));
        assert!(matches!(
            encode_value("uint8", &TypedValue::Uint(U256::from(256)), &types),
            Err(RelayerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_array_values() {
        let types = TypeMap::new();
        let items = vec![TypedValue::Uint(U256::from(1)), TypedValue::Uint(U256::from(2))];
        let encoded = encode_value("uint256[]", &TypedValue::Array(items), &types).unwrap();

        let mut expected = U256::from(1).to_be_bytes::<32>().to_vec();
        expected.extend_from_slice(&U256::from(2).to_be_bytes::<32>());
        assert_eq!(encoded, keccak256(&expected).0);
    }

    #[test]
    fn test_hashing_is_deterministic() {
        let spec = safe_tx_spec(
            3,
            approvals_data(),
            TypedRecord::new().with("verifyingContract", SAFE),
            &[("verifyingContract", "address")],
        );
        assert_eq!(spec.hash().unwrap(), spec.clone().hash().unwrap());
    }
}
