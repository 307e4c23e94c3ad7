//! Signed relayer payloads for wallet calls (EXECUTE) and wallet deployment
//! (CREATE).
//!
//! The two paths sign differently. A wallet call signs the Safe's EIP-712
//! digest as-is; a deployment signs the EIP-191 hash of the factory's EIP-712
//! digest. Both pack `v` to 31/32 before submission.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::{debug, info, instrument, warn};

use super::derive::{derive_wallet_address, verify_wallet_address};
use super::multisend;
use super::payload::TransactionRequest;
use super::signature::pack_signature;
use crate::chain::{ChainRegistry, ContractConfig};
use crate::core::{RelayerError, Result};
use crate::eip712::{TypedDataSpec, TypedRecord, DOMAIN_TYPE};
use crate::signer::Signer;
use crate::types::{parse_u256, BatchRequest, Call, WalletCreationRequest};

/// Primary type of a Safe wallet call.
pub const SAFE_TX_TYPE: &str = "SafeTx";

/// Primary type of a factory deployment.
pub const CREATE_PROXY_TYPE: &str = "CreateProxy";

/// EIP-712 domain name of the proxy factory.
pub const PROXY_FACTORY_NAME: &str = "Polymarket Contract Proxy Factory";

/// Signer type sent when querying the relayer nonce.
pub const SAFE_SIGNER_TYPE: &str = "SAFE";

const SAFE_TX_FIELDS: &[(&str, &str)] = &[
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
];

const CREATE_PROXY_FIELDS: &[(&str, &str)] = &[
    ("paymentToken", "address"),
    ("payment", "uint256"),
    ("paymentReceiver", "address"),
];

/// Supplies the relayer-tracked nonce for an address.
pub trait NonceSource {
    /// Decimal nonce for `address` under `signer_type`.
    fn get_nonce(
        &self,
        address: Address,
        signer_type: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Answers whether a Safe is already deployed.
pub trait DeploymentSource {
    fn is_deployed(&self, wallet: Address) -> impl Future<Output = Result<bool>> + Send;
}

/// SafeTx typed data for `call` executed by `wallet`.
///
/// The domain carries only `verifyingContract`, matching the Safe's own
/// domain declaration.
#[must_use]
pub fn safe_tx_typed_data(wallet: Address, call: &Call, nonce: U256) -> TypedDataSpec {
    TypedDataSpec::new(SAFE_TX_TYPE)
        .with_type(DOMAIN_TYPE, &[("verifyingContract", "address")])
        .with_type(SAFE_TX_TYPE, SAFE_TX_FIELDS)
        .with_domain(TypedRecord::new().with("verifyingContract", wallet))
        .with_message(
            TypedRecord::new()
                .with("to", call.to)
                .with("value", call.value)
                .with("data", call.data.clone())
                .with("operation", u8::from(call.operation))
                .with("safeTxGas", U256::ZERO)
                .with("baseGas", U256::ZERO)
                .with("gasPrice", U256::ZERO)
                .with("gasToken", Address::ZERO)
                .with("refundReceiver", Address::ZERO)
                .with("nonce", nonce),
        )
}

/// CreateProxy typed data for a zero-payment deployment through `factory`.
#[must_use]
pub fn create_proxy_typed_data(chain_id: u64, factory: Address) -> TypedDataSpec {
    TypedDataSpec::new(CREATE_PROXY_TYPE)
        .with_type(
            DOMAIN_TYPE,
            &[
                ("name", "string"),
                ("chainId", "uint256"),
                ("verifyingContract", "address"),
            ],
        )
        .with_type(CREATE_PROXY_TYPE, CREATE_PROXY_FIELDS)
        .with_domain(
            TypedRecord::new()
                .with("name", PROXY_FACTORY_NAME)
                .with("chainId", chain_id)
                .with("verifyingContract", factory),
        )
        .with_message(
            TypedRecord::new()
                .with("paymentToken", Address::ZERO)
                .with("payment", U256::ZERO)
                .with("paymentReceiver", Address::ZERO),
        )
}

/// Builds signed [`TransactionRequest`]s for one chain.
#[derive(Debug, Clone)]
pub struct TransactionAssembler {
    chain_id: u64,
    registry: Arc<ChainRegistry>,
    signer: Option<Signer>,
}

impl TransactionAssembler {
    /// Assembler without a signer; only read-only helpers work until
    /// [`with_signer`](Self::with_signer) is called.
    #[must_use]
    pub fn new(chain_id: u64, registry: Arc<ChainRegistry>) -> Self {
        Self {
            chain_id,
            registry,
            signer: None,
        }
    }

    /// Attach the signing key.
    ///
    /// A signer bound to another chain is accepted here but rejected by
    /// [`build_execute`](Self::build_execute) and
    /// [`build_create`](Self::build_create).
    #[must_use]
    pub fn with_signer(mut self, signer: Signer) -> Self {
        if signer.chain_id() != self.chain_id {
            warn!(
                signer_chain_id = signer.chain_id(),
                chain_id = self.chain_id,
                "Signer chain id differs from assembler chain id"
            );
        }
        self.signer = Some(signer);
        self
    }

    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    #[must_use]
    pub fn signer(&self) -> Option<&Signer> {
        self.signer.as_ref()
    }

    #[must_use]
    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Contract addresses for this assembler's chain.
    pub fn contracts(&self) -> Result<ContractConfig> {
        self.registry.get(self.chain_id)
    }

    fn require_signer(&self, operation: &str) -> Result<&Signer> {
        self.signer
            .as_ref()
            .ok_or_else(|| RelayerError::signer_required(operation))
    }

    /// The signer, provided it signs for this assembler's chain.
    fn signing_key(&self, operation: &str) -> Result<&Signer> {
        let signer = self.require_signer(operation)?;
        if signer.chain_id() != self.chain_id {
            return Err(RelayerError::invalid_field(
                "chain_id",
                format!(
                    "signer chain id {} does not match chain id {}",
                    signer.chain_id(),
                    self.chain_id
                ),
            ));
        }
        Ok(signer)
    }

    /// Safe address of the configured signer.
    pub fn expected_wallet(&self) -> Result<Address> {
        let signer = self.require_signer("expected_wallet")?;
        derive_wallet_address(signer.address(), self.chain_id, &self.registry)
    }

    /// Sign and package a (possibly batched) wallet call.
    #[instrument(skip(self, request), fields(wallet = %request.wallet, calls = request.calls.len()))]
    pub fn build_execute(&self, request: &BatchRequest) -> Result<TransactionRequest> {
        let signer = self.signing_key("execute")?;
        let config = self.contracts()?;
        let call = multisend::aggregate(&request.calls, config.safe_multisend)?;

        let digest = safe_tx_typed_data(request.wallet, &call, request.nonce).hash()?;
        debug!(digest = %digest, operation = ?call.operation, "Computed SafeTx digest");

        let signature = pack_signature(&signer.sign_raw(digest.as_slice())?)?;
        info!(nonce = %request.nonce, "Assembled Safe transaction");

        Ok(TransactionRequest::safe(
            signer.address(),
            request.wallet,
            &call,
            signature,
            request.nonce,
            self.chain_id,
        )
        .with_metadata(request.metadata.clone()))
    }

    /// Sign and package a Safe deployment.
    #[instrument(skip(self, request), fields(owner = %request.owner, wallet = %request.wallet))]
    pub fn build_create(&self, request: &WalletCreationRequest) -> Result<TransactionRequest> {
        let signer = self.signing_key("create")?;
        if signer.address() != request.owner {
            return Err(RelayerError::invalid_field(
                "owner",
                format!(
                    "owner {} does not match signer {}",
                    request.owner,
                    signer.address()
                ),
            ));
        }
        if !verify_wallet_address(request.owner, request.wallet, self.chain_id, &self.registry)? {
            return Err(RelayerError::invalid_field(
                "wallet",
                format!(
                    "wallet {} is not the Safe of owner {}",
                    request.wallet, request.owner
                ),
            ));
        }
        let config = self.contracts()?;

        let digest = create_proxy_typed_data(self.chain_id, config.safe_factory).hash()?;
        debug!(digest = %digest, "Computed CreateProxy digest");

        let signature = pack_signature(&signer.sign_with_eth_prefix(digest.as_slice())?)?;
        info!("Assembled Safe deployment");

        Ok(TransactionRequest::safe_create(
            request.owner,
            request.wallet,
            config.safe_factory,
            signature,
            self.chain_id,
        )
        .with_metadata(request.metadata.clone()))
    }

    /// Fetch the signer's nonce and assemble a wallet call for its Safe.
    pub async fn prepare_execute<N>(
        &self,
        nonces: &N,
        calls: Vec<Call>,
        metadata: Option<String>,
    ) -> Result<TransactionRequest>
    where
        N: NonceSource + Sync,
    {
        if calls.is_empty() {
            return Err(RelayerError::EmptyBatch);
        }
        let owner = self.require_signer("execute")?.address();
        let wallet = derive_wallet_address(owner, self.chain_id, &self.registry)?;

        let nonce = nonces.get_nonce(owner, SAFE_SIGNER_TYPE).await?;
        let nonce = parse_u256("nonce", &nonce)?;

        let mut request = BatchRequest::new(wallet, calls, nonce);
        request.metadata = metadata;
        self.build_execute(&request)
    }

    /// Assemble the deployment of the signer's Safe, refusing one that exists.
    pub async fn prepare_create<D>(&self, deployments: &D) -> Result<TransactionRequest>
    where
        D: DeploymentSource + Sync,
    {
        let owner = self.require_signer("create")?.address();
        let wallet = derive_wallet_address(owner, self.chain_id, &self.registry)?;

        if deployments.is_deployed(wallet).await? {
            return Err(RelayerError::AlreadyDeployed {
                wallet: wallet.to_string(),
            });
        }
        self.build_create(&WalletCreationRequest::new(owner, wallet))
    }
}
