//! Configuration types for coin-cache

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// CoinGecko public API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Environment variable overriding the listening port
pub const PORT_ENV: &str = "PORT";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// `PORT` is set but is not a port number
    #[error("Invalid PORT value: {0:?}")]
    InvalidPort(String),
    /// Bind address could not be built from host and port
    #[error("Invalid bind address {0}")]
    InvalidAddress(String),
    /// A value is out of its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}

/// Upstream price API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL of the CoinGecko-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Quote currency for market listing and prices
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    /// Page size for the market-cap listing
    #[serde(default = "default_per_page")]
    pub per_page: usize,

    /// Maximum ids sent in one price request (URL length limit)
    #[serde(default = "default_max_price_ids")]
    pub max_price_ids: usize,
}

fn default_base_url() -> String {
    COINGECKO_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("coin-cache/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_vs_currency() -> String {
    "usd".to_string()
}
fn default_per_page() -> usize {
    100
}
fn default_max_price_ids() -> usize {
    50
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            vs_currency: default_vs_currency(),
            per_page: default_per_page(),
            max_price_ids: default_max_price_ids(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Refresh scheduling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshConfig {
    /// Seconds between scheduled refreshes
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Run one refresh before the server starts accepting requests
    #[serde(default = "default_true")]
    pub refresh_on_start: bool,
}

fn default_interval_secs() -> u64 {
    15 * 60
}
fn default_true() -> bool {
    true
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            refresh_on_start: true,
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus exporter port; metrics are not exported when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply the `PORT` environment variable, if set
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(port) = std::env::var(PORT_ENV) {
            self.apply_port_override(&port)?;
        }
        Ok(())
    }

    fn apply_port_override(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.server.port = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;
        Ok(())
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::Invalid("refresh.interval_secs must be > 0"));
        }
        if self.upstream.per_page == 0 {
            return Err(ConfigError::Invalid("upstream.per_page must be > 0"));
        }
        if self.upstream.max_price_ids == 0 {
            return Err(ConfigError::Invalid("upstream.max_price_ids must be > 0"));
        }
        Ok(())
    }
}
