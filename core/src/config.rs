//! Configuration management for the auction agent
//!
//! Configuration replaces module-level globals: everything the adapter and
//! the JSON-RPC wallet need is carried by an [`AgentConfig`] passed to their
//! constructors. Values are resolved in this order:
//! 1. Command line arguments (highest priority)
//! 2. Configuration files (YAML/JSON)
//! 3. Default values
//!
//! # Example
//!
//! ```no_run
//! use auction_agent_core::config::AgentConfig;
//!
//! let config = AgentConfig::builder()
//!     .with_rpc_url("http://127.0.0.1:8545")
//!     .with_auction_contract("0xA0f0b923532fdbcd85A11ccAED1362691C7931fA")
//!     .build();
//!
//! let from_disk = AgentConfig::from_file("config.yaml")?;
//! # Ok::<(), auction_agent_core::Error>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::parse_address;

/// Auction contract deployed on Base Sepolia
pub const DEFAULT_AUCTION_CONTRACT: &str = "0xA0f0b923532fdbcd85A11ccAED1362691C7931fA";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Chain access settings
    pub network: NetworkSettings,
    /// Auction contract settings
    pub auction: AuctionSettings,
    /// NFT collection settings
    pub nft: NftSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Chain access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Chain id of the endpoint
    pub chain_id: u64,
    /// Block explorer base URL used for transaction links
    pub explorer_url: String,
    /// Sending account; the node's first account when unset
    pub from_address: Option<String>,
    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,
    /// Interval between receipt polls in milliseconds
    pub poll_interval_ms: u64,
    /// Upper bound on waiting for a receipt in seconds
    pub confirmation_timeout_seconds: u64,
}

/// Auction contract settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionSettings {
    /// Address of the deployed auction contract
    pub contract_address: String,
}

/// NFT collection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NftSettings {
    /// Creation bytecode of the ERC-721 collection contract, hex with an
    /// optional `0x` prefix; deployments are unavailable when unset
    pub collection_bytecode: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,
}

/// Log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            rpc_url: "https://sepolia.base.org".to_string(),
            chain_id: 84_532,
            explorer_url: "https://sepolia.basescan.org".to_string(),
            from_address: None,
            request_timeout_seconds: 30,
            poll_interval_ms: 2_000,
            confirmation_timeout_seconds: 300,
        }
    }
}

impl Default for AuctionSettings {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_AUCTION_CONTRACT.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
        }
    }
}

impl AgentConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::new()
    }

    /// Default configuration file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("auction-agent")
            .join("config.yaml")
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse YAML config: {}", e)))
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse JSON config: {}", e)))
    }

    /// Load configuration from a file (auto-detects format by extension)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match ConfigFormat::from_path(path)? {
            ConfigFormat::Yaml => Self::from_yaml_file(path),
            ConfigFormat::Json => Self::from_json_file(path),
        }
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_yaml()?;
        write_config(path.as_ref(), content)
    }

    /// Save configuration to a JSON file
    pub fn save_to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_json()?;
        write_config(path.as_ref(), content)
    }

    /// Save configuration to a file (auto-detects format by extension)
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match ConfigFormat::from_path(path)? {
            ConfigFormat::Yaml => self.save_to_yaml_file(path),
            ConfigFormat::Json => self.save_to_json_file(path),
        }
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::config(format!("Failed to serialize config to YAML: {}", e)))
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Check values that would otherwise fail at first use
    pub fn validate(&self) -> Result<()> {
        if self.network.rpc_url.trim().is_empty() {
            return Err(Error::config("network.rpc_url must not be empty"));
        }
        if self.network.poll_interval_ms == 0 {
            return Err(Error::config("network.poll_interval_ms must be positive"));
        }
        if let Some(from) = &self.network.from_address {
            parse_address(from)
                .map_err(|e| Error::config(format!("network.from_address: {}", e)))?;
        }
        parse_address(&self.auction.contract_address)
            .map_err(|e| Error::config(format!("auction.contract_address: {}", e)))?;
        self.nft.collection_bytecode()?;
        Ok(())
    }
}

impl NetworkSettings {
    /// HTTP request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Interval between receipt polls
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Upper bound on waiting for a receipt
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_seconds)
    }

    /// Explorer link for a transaction hash
    pub fn transaction_link(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), hash)
    }
}

impl NftSettings {
    /// Decoded collection bytecode, `None` when unset or blank
    pub fn collection_bytecode(&self) -> Result<Option<Vec<u8>>> {
        let Some(raw) = self.collection_bytecode.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        let digits = raw.strip_prefix("0x").unwrap_or(raw);
        hex::decode(digits)
            .map(Some)
            .map_err(|e| Error::config(format!("nft.collection_bytecode: {}", e)))
    }
}

impl LogLevel {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(Error::config(format!(
                "Unsupported config file format: {}. Supported: .yaml, .yml, .json",
                extension
            ))),
        }
    }
}

fn write_config(path: &Path, content: String) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::config(format!("Failed to create config directory: {}", e)))?;
        }
    }
    std::fs::write(path, content)
        .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))
}

/// Builder for AgentConfig with fluent interface
pub struct AgentConfigBuilder {
    config: AgentConfig,
}

impl AgentConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: AgentConfig::default(),
        }
    }

    /// Set the JSON-RPC endpoint
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.config.network.rpc_url = url.into();
        self
    }

    /// Set the chain id
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.config.network.chain_id = chain_id;
        self
    }

    /// Set the block explorer base URL
    pub fn with_explorer_url(mut self, url: impl Into<String>) -> Self {
        self.config.network.explorer_url = url.into();
        self
    }

    /// Set the sending account
    pub fn with_from_address(mut self, address: impl Into<String>) -> Self {
        self.config.network.from_address = Some(address.into());
        self
    }

    /// Set the receipt poll interval in milliseconds
    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.network.poll_interval_ms = ms;
        self
    }

    /// Set the receipt wait bound in seconds
    pub fn with_confirmation_timeout(mut self, seconds: u64) -> Self {
        self.config.network.confirmation_timeout_seconds = seconds;
        self
    }

    /// Set the auction contract address
    pub fn with_auction_contract(mut self, address: impl Into<String>) -> Self {
        self.config.auction.contract_address = address.into();
        self
    }

    /// Set the ERC-721 collection creation bytecode
    pub fn with_collection_bytecode(mut self, bytecode: impl Into<String>) -> Self {
        self.config.nft.collection_bytecode = Some(bytecode.into());
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> AgentConfig {
        self.config
    }
}

impl Default for AgentConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
