//! Application configuration
//!
//! Configuration for the session core: which ledger contract to bind, where
//! the "was connected" flag lives, and which chain the frontend expects.
//! Every field has a default so an empty TOML document is a valid config.

use medledger_core::{ChainId, WalletAddress};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default ledger contract address
pub const DEFAULT_CONTRACT_ADDRESS: WalletAddress = WalletAddress::from_bytes([
    0x46, 0xdd, 0x2d, 0x25, 0x00, 0xd0, 0x38, 0xc8, 0x92, 0x89, 0xf8, 0xf9, 0x8d, 0x37, 0x3d, 0x6a,
    0x97, 0x08, 0x0d, 0xd8,
]);

/// Default storage key of the persisted connection flag
pub const DEFAULT_PERSISTENCE_KEY: &str = "isWalletConnected";

fn default_contract_address() -> WalletAddress {
    DEFAULT_CONTRACT_ADDRESS
}

fn default_persistence_key() -> String {
    DEFAULT_PERSISTENCE_KEY.to_string()
}

/// Configuration loading failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Document did not parse
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Document parsed but holds an unusable value
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Session core configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ledger contract bound at connect
    #[serde(default = "default_contract_address")]
    pub contract_address: WalletAddress,

    /// Storage key of the persisted "was connected" flag
    #[serde(default = "default_persistence_key")]
    pub persistence_key: String,

    /// Chain the frontend was deployed against
    ///
    /// Informational: a chain change always invalidates the session, this
    /// only affects what gets logged.
    #[serde(default)]
    pub expected_chain_id: Option<ChainId>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            contract_address: default_contract_address(),
            persistence_key: default_persistence_key(),
            expected_chain_id: None,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&document)
    }

    /// Builder-style override of the contract address
    #[must_use]
    pub fn with_contract_address(mut self, contract_address: WalletAddress) -> Self {
        self.contract_address = contract_address;
        self
    }

    /// Builder-style override of the persistence key
    #[must_use]
    pub fn with_persistence_key(mut self, key: impl Into<String>) -> Self {
        self.persistence_key = key.into();
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.persistence_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "persistence_key must not be empty".to_string(),
            ));
        }
        if self.contract_address.is_zero() {
            return Err(ConfigError::Invalid(
                "contract_address must not be the zero address".to_string(),
            ));
        }
        Ok(())
    }
}
