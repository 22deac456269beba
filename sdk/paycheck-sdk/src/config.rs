//! Dispatch configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration for devnet:
//!
//! ```toml
//! cluster = "devnet"
//! commitment = "confirmed"
//! confirm_timeout_ms = 60000
//! poll_interval_ms = 500
//! ```

use crate::core::constants::{
    DEFAULT_CONFIRM_TIMEOUT, DEFAULT_POLL_INTERVAL, EXPLORER_BASE_URL, MIN_POLL_INTERVAL,
};
use crate::error::ConfigError;
use serde::Deserialize;
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::signature::Signature;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Solana cluster the session is connected to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
}

impl Cluster {
    /// Public RPC endpoint for the cluster
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Localnet => "localnet",
        }
    }

    /// Block explorer link for a transaction signature
    pub fn explorer_url(&self, signature: &Signature) -> String {
        match self {
            Cluster::MainnetBeta => format!("{}/tx/{}", EXPLORER_BASE_URL, signature),
            Cluster::Localnet => format!(
                "{}/tx/{}?cluster=custom&customUrl={}",
                EXPLORER_BASE_URL,
                signature,
                self.rpc_url()
            ),
            _ => format!(
                "{}/tx/{}?cluster={}",
                EXPLORER_BASE_URL,
                signature,
                self.name()
            ),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl From<Commitment> for CommitmentConfig {
    fn from(commitment: Commitment) -> Self {
        let commitment = match commitment {
            Commitment::Processed => CommitmentLevel::Processed,
            Commitment::Confirmed => CommitmentLevel::Confirmed,
            Commitment::Finalized => CommitmentLevel::Finalized,
        };
        CommitmentConfig { commitment }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub cluster: Cluster,
    /// Overrides the cluster's public endpoint
    pub rpc_url: Option<String>,
    pub commitment: Commitment,
    pub confirm_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::default(),
            rpc_url: None,
            commitment: Commitment::default(),
            confirm_timeout_ms: DEFAULT_CONFIRM_TIMEOUT.as_millis() as u64,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl DispatchConfig {
    pub fn for_cluster(cluster: Cluster) -> Self {
        Self {
            cluster,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.confirm_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "confirm_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than 0".into(),
            ));
        }
        if self.poll_interval() >= self.confirm_timeout() {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be shorter than the confirmation timeout".into(),
            ));
        }
        Ok(())
    }

    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.cluster.rpc_url().to_string())
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_millis(self.confirm_timeout_ms)
    }

    /// Never shorter than [`MIN_POLL_INTERVAL`], even for an unvalidated config
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms).max(MIN_POLL_INTERVAL)
    }

    pub fn with_timings(mut self, confirm_timeout: Duration, poll_interval: Duration) -> Self {
        self.confirm_timeout_ms = confirm_timeout.as_millis() as u64;
        self.poll_interval_ms = poll_interval.as_millis() as u64;
        self
    }
}
