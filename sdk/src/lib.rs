//! Medarion SDK
//!
//! Shared library providing the query and result vocabulary of the AI query
//! gateway. This crate is used by the engine and by any embedding service.

/// Error types and handling
pub mod errors;

/// Query types
pub mod types;

/// Capability result types
pub mod results;

// Re-export commonly used types
pub use errors::{GatewayError, GatewayErrorExt};
pub use results::{
    CompetitorList, DealsSummary, ExtractionResult, FreeformAnswer, FundraisingSteps,
    GatewayAnswer, GrantSuggestions, ImpactStatement, InvestorMatches, IntroEmail,
    MarketEntryReport, PitchDeckFeedback, Provenance, RiskAssessment, SwotSummary, TrendEntry,
    TrendList, ValuationRange,
};
pub use types::{Query, QueryKind};
