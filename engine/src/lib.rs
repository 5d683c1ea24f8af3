//! Medarion Engine Library
//!
//! The AI query gateway: provider chain, dispatcher, response extraction
//! and canned fallbacks. It is used by both the main binary and integration
//! tests.

/// Configuration management module
pub mod config;

/// Inference provider chain and dispatcher
pub mod llm;

/// Response extractors
pub mod extract;

/// Canned answers for an exhausted provider chain
pub mod fallback;

/// Typed capability inputs and prompt templates
pub mod prompts;

/// Public capability functions
pub mod gateway;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
