//! Error types and handling
//!
//! This module provides the error types surfaced by the gateway's outer
//! layers (configuration loading, CLI plumbing). Capability calls themselves
//! never return these: provider failures are absorbed by the dispatcher and
//! extraction misses degrade to defaults.
//!
//! All errors implement the `GatewayErrorExt` trait which provides
//! user-friendly hints and indicates whether errors are recoverable.
//!
//! # Examples
//!
//! ```
//! use sdk::errors::{GatewayError, GatewayErrorExt};
//!
//! let error = GatewayError::Config("primary_endpoint is empty".to_string());
//! println!("Hint: {}", error.user_hint());
//! assert!(error.is_recoverable());
//! ```

use thiserror::Error;

/// Trait for gateway error extensions
pub trait GatewayErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is safe to display to end users and does not contain
    /// API keys or endpoint credentials.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    fn is_recoverable(&self) -> bool;
}

/// Main gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid AI mode '{0}'. Must be one of: demo, live")]
    InvalidAiMode(String),

    #[error("Timeout out of range for {tier}: {secs}s (allowed {min}-{max}s)")]
    TimeoutOutOfRange {
        tier: String,
        secs: u64,
        min: u64,
        max: u64,
    },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayErrorExt for GatewayError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::InvalidAiMode(_) => "Set gateway.ai_mode to \"demo\" or \"live\"",
            Self::TimeoutOutOfRange { .. } => "Adjust the [gateway.timeouts] section",
            Self::Serialization(_) => "Failed to encode or decode data",
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
