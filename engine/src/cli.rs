//! CLI interface for Medarion
//!
//! This module provides the command-line interface using clap's derive API.
//! Every gateway capability has its own subcommand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Medarion AI Query Gateway
///
/// Answers healthcare market-intelligence questions through a chain of
/// inference providers, with canned answers when none is reachable.
#[derive(Parser, Debug)]
#[command(name = "medarion")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assess market risk for a country
    Risk {
        /// Country to assess
        country: String,

        /// Company the assessment is for
        #[arg(long)]
        company_id: Option<String>,
    },

    /// List the main competitors of a company
    Competitors {
        company: String,
    },

    /// Estimate a valuation range
    Valuation {
        #[arg(long)]
        sector: String,

        #[arg(long)]
        stage: String,
    },

    /// SWOT summary and key questions for a company
    DueDiligence {
        company: String,
    },

    /// Emerging healthcare trends
    Trends {
        /// Period to cover (e.g., "2025")
        #[arg(long, default_value = "the next 12 months")]
        timeframe: String,
    },

    /// Feedback on a pitch deck
    PitchFeedback {
        /// Text extracted from the deck
        #[arg(long)]
        deck: Option<String>,
    },

    /// Fundraising strategy steps
    Fundraising {
        #[arg(long)]
        sector: String,

        #[arg(long)]
        stage: String,

        /// Target raise in USD
        #[arg(long)]
        amount: f64,
    },

    /// Ask a free-form question
    Ask {
        question: String,
    },

    /// Market entry opportunities and challenges
    MarketEntry {
        #[arg(long)]
        country: String,

        #[arg(long)]
        sector: String,
    },

    /// Impact statement for a solution
    Impact {
        /// Number of users served
        #[arg(long)]
        users: u64,

        /// Condition the solution addresses
        #[arg(long)]
        condition: String,
    },

    /// Summary of recent deals
    Deals {
        #[arg(long)]
        sector: Option<String>,

        #[arg(long)]
        stage: Option<String>,

        #[arg(long)]
        country: Option<String>,
    },

    /// Grant suggestions
    Grants {
        #[arg(long)]
        sector: Option<String>,

        #[arg(long = "type")]
        grant_type: Option<String>,

        #[arg(long)]
        country: Option<String>,
    },

    /// Investors matching a profile
    Investors {
        #[arg(long)]
        sector: Option<String>,

        #[arg(long)]
        stage: Option<String>,

        #[arg(long)]
        country: Option<String>,
    },

    /// Draft an introduction email to an investor
    IntroEmail {
        #[arg(long)]
        investor: String,

        #[arg(long)]
        company: String,

        #[arg(long)]
        sector: String,

        #[arg(long)]
        stage: String,
    },

    /// Probe every configured provider
    Health,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
}
