//! Relayer API client.
//!
//! Wraps the HTTP endpoints of the relayer and drives the
//! [`TransactionAssembler`] for deploy and execute.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use governor::{Quota, RateLimiter as GovRateLimiter};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::models::{
    DeployedResponse, ErrorBody, NonceResponse, RelayerTransaction, SubmitResponse,
    TransactionListing, TransactionLookup, TransactionState,
};
use crate::auth::{BuilderApiKeyCreds, BuilderSigner};
use crate::chain::{ChainRegistry, POLYGON_CHAIN_ID};
use crate::core::{relayer_api_url, Endpoints, RelayerError, Result};
use crate::safe::{
    derive_wallet_address, DeploymentSource, NonceSource, TransactionAssembler,
    TransactionRequest,
};
use crate::signer::{Signer, PRIVATE_KEY_ENV};
use crate::types::Call;

type RateLimiter = GovRateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Environment variable holding the chain id.
pub const CHAIN_ID_ENV: &str = "CHAIN_ID";

/// Relayer API configuration
#[derive(Debug, Clone)]
pub struct RelayerConfig {
    /// Relayer API base URL
    pub base_url: String,
    /// Chain the signer and contracts belong to
    pub chain_id: u64,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limit (requests per second)
    pub rate_limit_per_second: u32,
    /// User agent string
    pub user_agent: String,
    /// Default attempts for [`RelayerClient::poll_until_state`]
    pub max_polls: u32,
    /// Default delay between polls
    pub poll_interval: Duration,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            base_url: relayer_api_url(),
            chain_id: POLYGON_CHAIN_ID,
            timeout: Duration::from_secs(60),
            rate_limit_per_second: 2,
            user_agent: concat!("safe-relayer-sdk/", env!("CARGO_PKG_VERSION")).to_string(),
            max_polls: 100,
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl RelayerConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    /// Defaults plus `CHAIN_ID` from the environment.
    ///
    /// The base URL already honors `RELAYER_URL` through the default.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(CHAIN_ID_ENV) {
            config.chain_id = raw
                .trim()
                .parse()
                .map_err(|e| RelayerError::config(format!("Invalid {CHAIN_ID_ENV} '{raw}': {e}")))?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set rate limit (requests per second)
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit_per_second = rate_limit;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Default polling budget used by [`RelayerClient::wait_until_mined`].
    #[must_use]
    pub fn with_polling(mut self, max_polls: u32, poll_interval: Duration) -> Self {
        self.max_polls = max_polls;
        self.poll_interval = poll_interval;
        self
    }
}

/// Relayer API client for Safe deployment and execution
#[derive(Clone)]
pub struct RelayerClient {
    config: RelayerConfig,
    client: Client,
    rate_limiter: Arc<RateLimiter>,
    assembler: TransactionAssembler,
    builder: Option<BuilderSigner>,
}

impl std::fmt::Debug for RelayerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayerClient")
            .field("config", &self.config)
            .field("signer", &self.assembler.signer())
            .field("builder", &self.builder.as_ref().map(BuilderSigner::api_key))
            .finish_non_exhaustive()
    }
}

impl RelayerClient {
    /// Create a client with the default chain registry.
    pub fn new(config: RelayerConfig) -> Result<Self> {
        Self::with_registry(config, Arc::new(ChainRegistry::new()))
    }

    /// Create a client sharing `registry`.
    pub fn with_registry(config: RelayerConfig, registry: Arc<ChainRegistry>) -> Result<Self> {
        Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| RelayerError::config(format!("Failed to create HTTP client: {e}")))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_second).unwrap_or(NonZeroU32::MIN),
        );
        let rate_limiter = Arc::new(GovRateLimiter::direct(quota));
        let assembler = TransactionAssembler::new(config.chain_id, registry);

        Ok(Self {
            config,
            client,
            rate_limiter,
            assembler,
            builder: None,
        })
    }

    /// Build everything from the environment.
    ///
    /// `PK` and the builder credentials are optional; operations that need
    /// them fail with `SignerRequired` / `BuilderCredentialsRequired`.
    pub fn from_env() -> Result<Self> {
        let config = RelayerConfig::from_env()?;
        let chain_id = config.chain_id;
        let mut client = Self::new(config)?;

        if std::env::var(PRIVATE_KEY_ENV).is_ok_and(|key| !key.trim().is_empty()) {
            client = client.with_signer(Signer::from_env(chain_id)?);
        }
        if let Some(creds) = BuilderApiKeyCreds::from_env()? {
            client = client.with_builder_credentials(creds)?;
        }
        Ok(client)
    }

    /// Attach the signing key; it must sign for the configured chain.
    #[must_use]
    pub fn with_signer(mut self, signer: Signer) -> Self {
        self.assembler = self.assembler.with_signer(signer);
        self
    }

    /// Attach Builder API credentials after validating them.
    pub fn with_builder_credentials(mut self, creds: BuilderApiKeyCreds) -> Result<Self> {
        self.builder = Some(BuilderSigner::new(creds)?);
        Ok(self)
    }

    #[must_use]
    pub fn config(&self) -> &RelayerConfig {
        &self.config
    }

    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    #[must_use]
    pub fn signer(&self) -> Option<&Signer> {
        self.assembler.signer()
    }

    #[must_use]
    pub fn assembler(&self) -> &TransactionAssembler {
        &self.assembler
    }

    async fn wait_for_rate_limit(&self) {
        self.rate_limiter.until_ready().await;
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.config.base_url, path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn require_builder(&self, operation: &str) -> Result<&BuilderSigner> {
        self.builder
            .as_ref()
            .ok_or_else(|| RelayerError::builder_credentials_required(operation))
    }

    /// Attach builder headers signed over `path` (no query string).
    fn authenticate(
        &self,
        mut request: RequestBuilder,
        builder: &BuilderSigner,
        method: &Method,
        path: &str,
        body: Option<&str>,
    ) -> Result<RequestBuilder> {
        let headers = builder.create_builder_header_payload(method.as_str(), path, body, None)?;
        for (key, value) in headers {
            request = request.header(key, value);
        }
        Ok(request)
    }

    /// GET `path`, signing the request when credentials are configured.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        builder: Option<&BuilderSigner>,
    ) -> Result<T> {
        self.wait_for_rate_limit().await;

        let url = self.url(path, query)?;
        debug!(url = %url, "Relayer GET");

        let mut request = self.client.get(url);
        if let Some(builder) = builder.or(self.builder.as_ref()) {
            request = self.authenticate(request, builder, &Method::GET, path, None)?;
        }
        Self::read_json(request.send().await?, path).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = %status, path = %path, body = %body, "Relayer request failed");
            return Err(match serde_json::from_str::<ErrorBody>(&body) {
                Ok(error) => RelayerError::Api {
                    status: status.as_u16(),
                    message: error.error,
                    error_code: error.code,
                },
                Err(_) => RelayerError::api(status.as_u16(), body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            RelayerError::parse_with_source(format!("Failed to parse {path} response: {e}"), e)
        })
    }

    /// Relayer nonce for `address`.
    ///
    /// `GET /nonce?address=..&type=..`
    #[instrument(skip(self))]
    pub async fn get_nonce(&self, address: Address, signer_type: &str) -> Result<String> {
        let address = address.to_string();
        let response: NonceResponse = self
            .get_json(
                Endpoints::NONCE,
                &[("address", address.as_str()), ("type", signer_type)],
                None,
            )
            .await?;
        let nonce = response.nonce.into_string();
        debug!(nonce = %nonce, "Got nonce");
        Ok(nonce)
    }

    /// Whether `wallet` is deployed.
    ///
    /// `GET /deployed?address=..`
    #[instrument(skip(self))]
    pub async fn get_deployed(&self, wallet: Address) -> Result<bool> {
        let wallet = wallet.to_string();
        let response: DeployedResponse = self
            .get_json(Endpoints::DEPLOYED, &[("address", wallet.as_str())], None)
            .await?;
        Ok(response.deployed)
    }

    /// One transaction by id.
    ///
    /// `GET /transaction?id=..`
    #[instrument(skip(self))]
    pub async fn get_transaction(&self, transaction_id: &str) -> Result<RelayerTransaction> {
        let lookup: TransactionLookup = self
            .get_json(Endpoints::TRANSACTION, &[("id", transaction_id)], None)
            .await?;
        lookup.into_first().ok_or_else(|| {
            RelayerError::api(404, format!("Transaction not found: {transaction_id}"))
        })
    }

    /// Every transaction submitted with the configured builder key.
    #[instrument(skip(self))]
    pub async fn get_transactions(&self) -> Result<Vec<RelayerTransaction>> {
        let builder = self.require_builder("get_transactions")?;
        let listing: TransactionListing = self
            .get_json(Endpoints::TRANSACTIONS, &[], Some(builder))
            .await?;
        Ok(listing.into_vec())
    }

    /// Submit a signed payload.
    #[instrument(skip(self, payload), fields(tx_type = payload.r#type.as_str(), wallet = %payload.proxy_wallet))]
    pub async fn submit(&self, payload: &TransactionRequest) -> Result<SubmitResponse> {
        let builder = self.require_builder("submit")?;
        self.wait_for_rate_limit().await;

        let body = serde_json::to_string(payload)?;
        debug!(body = %body, "Submitting transaction");

        let request = self
            .client
            .post(self.url(Endpoints::SUBMIT, &[])?)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        let request = self.authenticate(request, builder, &Method::POST, Endpoints::SUBMIT, Some(&body))?;

        let response: SubmitResponse =
            Self::read_json(request.body(body).send().await?, Endpoints::SUBMIT).await?;
        info!(transaction_id = %response.transaction_id, "Transaction submitted");
        Ok(response)
    }

    /// Safe address of the configured signer.
    pub fn expected_wallet(&self) -> Result<Address> {
        self.assembler.expected_wallet()
    }

    /// Deploy the signer's Safe.
    ///
    /// Fails with `AlreadyDeployed` when the relayer reports it exists.
    #[instrument(skip(self))]
    pub async fn deploy(&self) -> Result<SubmitResponse> {
        self.require_builder("deploy")?;
        let payload = self.assembler.prepare_create(self).await?;
        self.submit(&payload).await
    }

    /// Execute `calls` through the signer's Safe, batching when needed.
    #[instrument(skip(self, calls), fields(calls = calls.len()))]
    pub async fn execute(&self, calls: Vec<Call>, metadata: Option<String>) -> Result<SubmitResponse> {
        self.require_builder("execute")?;
        let payload = self.assembler.prepare_execute(self, calls, metadata).await?;
        self.submit(&payload).await
    }

    /// Poll `transaction_id` until it reaches one of `targets`.
    ///
    /// Stops early with `TransactionFailed` on `fail_state` or any failed
    /// state, and with `PollingTimeout` after `max_polls` lookups.
    #[instrument(skip(self, targets))]
    pub async fn poll_until_state(
        &self,
        transaction_id: &str,
        targets: &[TransactionState],
        fail_state: Option<TransactionState>,
        max_polls: u32,
        poll_interval: Duration,
    ) -> Result<RelayerTransaction> {
        info!(?targets, max_polls, "Waiting for transaction state");

        for attempt in 1..=max_polls {
            let transaction = self.get_transaction(transaction_id).await?;

            if targets.contains(&transaction.state) {
                info!(state = %transaction.state, attempt, "Transaction reached target state");
                return Ok(transaction);
            }
            if fail_state == Some(transaction.state) || transaction.state.is_failed() {
                warn!(state = %transaction.state, error = ?transaction.error, "Transaction failed");
                return Err(RelayerError::TransactionFailed {
                    transaction_id: transaction_id.to_string(),
                    state: transaction.state.to_string(),
                });
            }

            debug!(state = %transaction.state, attempt, "Pending, continuing poll");
            if attempt < max_polls {
                tokio::time::sleep(poll_interval).await;
            }
        }

        warn!("Polling attempts exhausted");
        Err(RelayerError::PollingTimeout {
            transaction_id: transaction_id.to_string(),
            attempts: max_polls,
        })
    }

    /// [`poll_until_state`](Self::poll_until_state) for mined/confirmed with
    /// the configured polling budget.
    pub async fn wait_until_mined(&self, transaction_id: &str) -> Result<RelayerTransaction> {
        self.poll_until_state(
            transaction_id,
            &[TransactionState::Mined, TransactionState::Confirmed],
            Some(TransactionState::Failed),
            self.config.max_polls,
            self.config.poll_interval,
        )
        .await
    }

    /// Derive `owner`'s Safe on this client's chain.
    pub fn wallet_for(&self, owner: Address) -> Result<Address> {
        derive_wallet_address(owner, self.config.chain_id, self.assembler.registry())
    }
}

impl NonceSource for RelayerClient {
    async fn get_nonce(&self, address: Address, signer_type: &str) -> Result<String> {
        RelayerClient::get_nonce(self, address, signer_type).await
    }
}

impl DeploymentSource for RelayerClient {
    async fn is_deployed(&self, wallet: Address) -> Result<bool> {
        self.get_deployed(wallet).await
    }
}
