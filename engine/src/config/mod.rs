//! Configuration management
//!
//! This module handles loading, validation, and management of the gateway
//! configuration. Configuration is stored in TOML format at
//! ~/.medarion/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **gateway**: AI mode, provider endpoints, self-hosted model
//! - **gateway.direct**: Direct remote API tier (off unless enabled)
//! - **gateway.timeouts**: Per-tier timeout budgets
//!
//! # Reading at call time
//!
//! The store behind the configuration may change between calls, so the
//! gateway never caches a `GatewayConfig`. It asks its `ConfigSource` for a
//! fresh value on every capability call and hands that value to the
//! dispatcher explicitly.
//!
//! # Examples
//!
//! ```no_run
//! use medarion_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("AI mode: {}", config.gateway.ai_mode);
//! println!("Primary endpoint: {}", config.gateway.primary_endpoint);
//! # Ok(())
//! # }
//! ```

use sdk::errors::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Allowed timeout window for the primary tier, in seconds
pub const PRIMARY_TIMEOUT_RANGE: (u64, u64) = (10, 45);
/// Allowed timeout window for the self-hosted and direct tiers, in seconds
pub const SECONDARY_TIMEOUT_RANGE: (u64, u64) = (10, 15);

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Gateway settings
    pub gateway: GatewayConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Whether non-primary tiers may be attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiMode {
    /// Primary gateway only
    #[default]
    Demo,
    /// Primary gateway, then self-hosted and direct tiers
    Live,
}

impl fmt::Display for AiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiMode::Demo => write!(f, "demo"),
            AiMode::Live => write!(f, "live"),
        }
    }
}

impl FromStr for AiMode {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(AiMode::Demo),
            "live" => Ok(AiMode::Live),
            other => Err(GatewayError::InvalidAiMode(other.to_string())),
        }
    }
}

/// Gateway configuration consumed by the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Controls whether non-primary tiers are attempted
    #[serde(default)]
    pub ai_mode: AiMode,

    /// Full URL of the primary gateway query endpoint
    #[serde(default = "default_primary_endpoint")]
    pub primary_endpoint: String,

    /// Base URL of the self-hosted inference server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_endpoint: Option<String>,

    /// Self-hosted model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Direct remote API tier
    #[serde(default)]
    pub direct: DirectConfig,

    /// Per-tier timeout budgets
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

/// Direct remote API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectConfig {
    /// Attempt the direct tier at all
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the direct API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Name of the environment variable holding the API key; the key is read from there
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for DirectConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl DirectConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

/// Timeout budgets in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_primary_timeout")]
    pub primary_secs: u64,

    #[serde(default = "default_secondary_timeout")]
    pub self_hosted_secs: u64,

    #[serde(default = "default_secondary_timeout")]
    pub direct_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            primary_secs: default_primary_timeout(),
            self_hosted_secs: default_secondary_timeout(),
            direct_secs: default_secondary_timeout(),
        }
    }
}

impl TimeoutConfig {
    pub fn primary(&self) -> Duration {
        Duration::from_secs(self.primary_secs)
    }

    pub fn self_hosted(&self) -> Duration {
        Duration::from_secs(self.self_hosted_secs)
    }

    pub fn direct(&self) -> Duration {
        Duration::from_secs(self.direct_secs)
    }

    /// Worst-case latency when every tier times out
    pub fn worst_case(&self) -> Duration {
        self.primary() + self.self_hosted() + self.direct()
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_primary_endpoint() -> String {
    "http://localhost:3001/api/ai/query".to_string()
}

fn default_api_key_env() -> String {
    "MEDARION_DIRECT_API_KEY".to_string()
}

fn default_primary_timeout() -> u64 {
    45
}

fn default_secondary_timeout() -> u64 {
    15
}

/// Default self-hosted model when `model_name` is absent
pub const DEFAULT_MODEL_NAME: &str = "mistral";

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            ai_mode: AiMode::Demo,
            primary_endpoint: default_primary_endpoint(),
            secondary_endpoint: None,
            model_name: None,
            direct: DirectConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Self-hosted model, falling back to the default
    pub fn model_name(&self) -> &str {
        self.model_name
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL_NAME)
    }

    /// Apply `MEDARION_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), GatewayError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), GatewayError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(mode) = get("MEDARION_AI_MODE") {
            self.ai_mode = mode.parse()?;
        }
        if let Some(endpoint) = get("MEDARION_PRIMARY_ENDPOINT") {
            self.primary_endpoint = endpoint;
        }
        if let Some(endpoint) = get("MEDARION_SECONDARY_ENDPOINT") {
            self.secondary_endpoint = Some(endpoint);
        }
        if let Some(model) = get("MEDARION_MODEL_NAME") {
            self.model_name = Some(model);
        }
        Ok(())
    }

    /// Validate endpoints and timeout windows
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `primary_endpoint` is empty or not an http(s) URL
    /// - an optional endpoint is present but not an http(s) URL
    /// - the direct tier is enabled without an endpoint
    /// - a timeout is outside its tier's window
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.primary_endpoint.trim().is_empty() {
            return Err(GatewayError::Config(
                "gateway.primary_endpoint is required".to_string(),
            ));
        }
        check_url("gateway.primary_endpoint", &self.primary_endpoint)?;

        if let Some(endpoint) = &self.secondary_endpoint {
            check_url("gateway.secondary_endpoint", endpoint)?;
        }

        if self.direct.enabled {
            match &self.direct.endpoint {
                Some(endpoint) => check_url("gateway.direct.endpoint", endpoint)?,
                None => {
                    return Err(GatewayError::Config(
                        "gateway.direct.enabled requires gateway.direct.endpoint".to_string(),
                    ))
                }
            }
        }

        check_timeout("primary", self.timeouts.primary_secs, PRIMARY_TIMEOUT_RANGE)?;
        check_timeout(
            "self_hosted",
            self.timeouts.self_hosted_secs,
            SECONDARY_TIMEOUT_RANGE,
        )?;
        check_timeout("direct", self.timeouts.direct_secs, SECONDARY_TIMEOUT_RANGE)?;

        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> Result<(), GatewayError> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(GatewayError::Config(format!(
            "{} must be an http(s) URL, got '{}'",
            field, value
        )))
    }
}

fn check_timeout(tier: &str, secs: u64, (min, max): (u64, u64)) -> Result<(), GatewayError> {
    if (min..=max).contains(&secs) {
        Ok(())
    } else {
        Err(GatewayError::TimeoutOutOfRange {
            tier: tier.to_string(),
            secs,
            min,
            max,
        })
    }
}

impl Config {
    /// Load configuration from the default location (~/.medarion/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails or
    /// validation fails.
    pub fn load_or_create() -> Result<Self, GatewayError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, GatewayError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&contents)
    }

    /// Parse, apply environment overrides and validate
    pub fn from_toml_str(contents: &str) -> Result<Self, GatewayError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?;

        config.gateway.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, GatewayError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GatewayError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default_config();
        config.validate()?;

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| GatewayError::Serialization(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| GatewayError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.medarion/config.toml)
    pub fn default_config_path() -> Result<PathBuf, GatewayError> {
        let home = dirs::home_dir()
            .ok_or_else(|| GatewayError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".medarion").join("config.toml"))
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            core: CoreConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }

    fn validate(&self) -> Result<(), GatewayError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(GatewayError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        self.gateway.validate()
    }
}

/// Supplies a fresh `GatewayConfig` for each capability call
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<GatewayConfig, GatewayError>;
}

/// Re-reads a TOML file on every call
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Source backed by ~/.medarion/config.toml
    pub fn default_location() -> Result<Self, GatewayError> {
        Ok(Self::new(Config::default_config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<GatewayConfig, GatewayError> {
        Config::load_from_path(&self.path).map(|c| c.gateway)
    }
}

/// Always returns the same value
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource {
    config: GatewayConfig,
}

impl StaticConfigSource {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }
}

impl ConfigSource for StaticConfigSource {
    fn load(&self) -> Result<GatewayConfig, GatewayError> {
        Ok(self.config.clone())
    }
}
