//! Per-chain Safe contract addresses.
//!
//! [`ChainRegistry`] is an explicit object rather than global state. Lookups
//! take a read lock; [`ChainRegistry::register`] takes the write lock, so new
//! chains can be added at runtime while other threads keep hashing.

use std::collections::HashMap;
use std::sync::RwLock;

use alloy_primitives::{address, Address};
use tracing::{debug, info};

use crate::core::{RelayerError, Result};

/// Polygon mainnet chain id
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Polygon Amoy testnet chain id
pub const AMOY_CHAIN_ID: u64 = 80002;

/// Safe proxy factory (Polygon and Amoy)
pub const SAFE_FACTORY: Address = address!("aacFeEa03eb1561C4e67d661e40682Bd20E3541b");

/// Safe singleton implementation (Polygon and Amoy)
pub const SAFE_SINGLETON: Address = address!("3E5c63644E683549055b9Be8653de26E0B4CD36E");

/// Safe fallback handler (Polygon and Amoy)
pub const SAFE_FALLBACK_HANDLER: Address = address!("f48f2B2d2a534e402487b3ee7C18c33Aec0Fe5e4");

/// MultiSend contract (Polygon and Amoy)
pub const SAFE_MULTISEND: Address = address!("A238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761");

/// Safe contract addresses for one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractConfig {
    pub chain_id: u64,
    pub safe_factory: Address,
    pub safe_singleton: Address,
    pub safe_fallback_handler: Address,
    pub safe_multisend: Address,
}

impl ContractConfig {
    /// Reference deployment shared by Polygon and Amoy.
    #[must_use]
    pub const fn reference(chain_id: u64) -> Self {
        Self {
            chain_id,
            safe_factory: SAFE_FACTORY,
            safe_singleton: SAFE_SINGLETON,
            safe_fallback_handler: SAFE_FALLBACK_HANDLER,
            safe_multisend: SAFE_MULTISEND,
        }
    }

    /// Polygon mainnet.
    #[must_use]
    pub const fn polygon() -> Self {
        Self::reference(POLYGON_CHAIN_ID)
    }

    /// Polygon Amoy testnet.
    #[must_use]
    pub const fn amoy() -> Self {
        Self::reference(AMOY_CHAIN_ID)
    }

    /// Reject a zero chain id or any zero contract address.
    pub fn validate(&self) -> Result<()> {
        if self.chain_id == 0 {
            return Err(RelayerError::invalid_field("chain_id", "chain id must be non-zero"));
        }
        let addresses = [
            ("safe_factory", self.safe_factory),
            ("safe_singleton", self.safe_singleton),
            ("safe_fallback_handler", self.safe_fallback_handler),
            ("safe_multisend", self.safe_multisend),
        ];
        for (field, value) in addresses {
            if value.is_zero() {
                return Err(RelayerError::invalid_field(
                    field,
                    format!("{field} must be set for chain {}", self.chain_id),
                ));
            }
        }
        Ok(())
    }
}

/// Chain id → [`ContractConfig`] lookup table.
#[derive(Debug)]
pub struct ChainRegistry {
    configs: RwLock<HashMap<u64, ContractConfig>>,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        let configs = HashMap::from([
            (POLYGON_CHAIN_ID, ContractConfig::polygon()),
            (AMOY_CHAIN_ID, ContractConfig::amoy()),
        ]);
        Self {
            configs: RwLock::new(configs),
        }
    }
}

impl ChainRegistry {
    /// Registry pre-loaded with Polygon and Amoy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with no chains.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
        }
    }

    /// Add or replace the configuration for `config.chain_id`.
    pub fn register(&self, config: ContractConfig) -> Result<()> {
        config.validate()?;
        let mut configs = self
            .configs
            .write()
            .map_err(|_| RelayerError::internal("chain registry lock poisoned"))?;
        let replaced = configs.insert(config.chain_id, config).is_some();
        info!(chain_id = config.chain_id, replaced, "Registered chain contract config");
        Ok(())
    }

    /// Look up the configuration for `chain_id`.
    pub fn get(&self, chain_id: u64) -> Result<ContractConfig> {
        let configs = self
            .configs
            .read()
            .map_err(|_| RelayerError::internal("chain registry lock poisoned"))?;
        configs.get(&chain_id).copied().ok_or_else(|| {
            debug!(chain_id, "Chain not registered");
            RelayerError::UnsupportedChain { chain_id }
        })
    }

    /// Whether `chain_id` is registered.
    #[must_use]
    pub fn contains(&self, chain_id: u64) -> bool {
        self.configs
            .read()
            .map(|configs| configs.contains_key(&chain_id))
            .unwrap_or(false)
    }

    /// Registered chain ids in ascending order.
    #[must_use]
    pub fn supported_chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .configs
            .read()
            .map(|configs| configs.keys().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }
}
