// Medarion AI Query Gateway
// Main entry point for the medarion binary

use clap::Parser;
use medarion_engine::cli::{Cli, Command, ConfigAction};
use medarion_engine::config::{Config, FileConfigSource};
use medarion_engine::gateway::Gateway;
use medarion_engine::handlers::{handle_config_show, handle_health, handle_query, OutputFormat};
use medarion_engine::prompts::{
    self, CompetitorInput, DealFilters, DueDiligenceInput, FundraisingInput, GrantFilters,
    ImpactInput, IntroEmailInput, MarketEntryInput, PitchDeckInput, RiskInput, TrendInput,
    ValuationInput,
};
use medarion_engine::telemetry::init_telemetry_with_level;
use sdk::Query;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let (config, source) = match &cli.config {
        Some(path) => (Config::load_from_path(path)?, FileConfigSource::new(path)),
        None => (Config::load_or_create()?, FileConfigSource::default_location()?),
    };

    // Priority: RUST_LOG > --log > config
    init_telemetry_with_level(cli.log.as_deref().unwrap_or(&config.core.log_level));

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");

    tracing::info!("Medarion v{} ({} - {})", version, commit, timestamp);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let gateway = Gateway::new(Arc::new(source));

    let query = match cli.command {
        Command::Health => {
            tracing::info!("Checking provider health...");
            return handle_health(&gateway, format).await;
        }
        Command::Config { action } => {
            tracing::info!("Config management: {:?}", action);
            return match action {
                ConfigAction::Show => handle_config_show(&config, format),
            };
        }
        command => build_query(command),
    };
    let Some(query) = query else {
        return Ok(());
    };

    // Ctrl-C aborts the in-flight provider call; the canned answer is printed instead
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling query");
            on_interrupt.cancel();
        }
    });

    tracing::info!("Answering {} query", query.kind());
    handle_query(&gateway, query, &cancel, format).await
}

/// Render the query for a capability command
fn build_query(command: Command) -> Option<Query> {
    let query = match command {
        Command::Risk {
            country,
            company_id,
        } => RiskInput {
            country,
            company_id,
        }
        .to_query(),
        Command::Competitors { company } => CompetitorInput { company }.to_query(),
        Command::Valuation { sector, stage } => ValuationInput { sector, stage }.to_query(),
        Command::DueDiligence { company } => DueDiligenceInput { company }.to_query(),
        Command::Trends { timeframe } => TrendInput { timeframe }.to_query(),
        Command::PitchFeedback { deck } => PitchDeckInput { deck_summary: deck }.to_query(),
        Command::Fundraising {
            sector,
            stage,
            amount,
        } => FundraisingInput {
            sector,
            stage,
            amount,
        }
        .to_query(),
        Command::Ask { question } => prompts::freeform_query(&question),
        Command::MarketEntry { country, sector } => MarketEntryInput { country, sector }.to_query(),
        Command::Impact { users, condition } => ImpactInput { users, condition }.to_query(),
        Command::Deals {
            sector,
            stage,
            country,
        } => DealFilters {
            sector,
            stage,
            country,
        }
        .to_deals_query(),
        Command::Grants {
            sector,
            grant_type,
            country,
        } => GrantFilters {
            sector,
            grant_type,
            country,
        }
        .to_query(),
        Command::Investors {
            sector,
            stage,
            country,
        } => DealFilters {
            sector,
            stage,
            country,
        }
        .to_investor_query(),
        Command::IntroEmail {
            investor,
            company,
            sector,
            stage,
        } => IntroEmailInput {
            investor,
            company,
            sector,
            stage,
        }
        .to_query(),
        Command::Health | Command::Config { .. } => return None,
    };
    Some(query)
}
