//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - capability commands: answer one query through the gateway
//! - health: probe every configured provider
//! - config show: print the effective configuration

use anyhow::Result;
use sdk::{ExtractionResult, GatewayAnswer, Provenance, Query};
use serde_json::json;
use std::fmt::Write as _;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::gateway::Gateway;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Answer one query and print the result
pub async fn handle_query(
    gateway: &Gateway,
    query: Query,
    cancel: &CancellationToken,
    format: OutputFormat,
) -> Result<()> {
    let answer = gateway.run(&query, cancel).await;

    match format {
        OutputFormat::Text => {
            print!("{}", render_text(&answer.result));
            println!();
            println!("[{}]", describe_provenance(&answer.provenance));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
    }

    Ok(())
}

/// Probe providers and print their status
pub async fn handle_health(gateway: &Gateway, format: OutputFormat) -> Result<()> {
    let results = gateway.check_health().await;

    match format {
        OutputFormat::Text => {
            println!("Provider Health");
            println!("============================");
            println!();

            for (id, tier, healthy) in &results {
                println!(
                    "  {:<25} {}",
                    format!("{} ({}):", id, tier),
                    if *healthy { "Available" } else { "Unavailable" }
                );
            }

            println!();

            if results.iter().any(|(_, _, healthy)| *healthy) {
                println!("✓ At least one provider is reachable");
            } else {
                println!("⚠ No provider is reachable; answers will be canned");
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "providers": results.iter().map(|(id, tier, healthy)| {
                    json!({
                        "id": id,
                        "tier": tier.to_string(),
                        "healthy": healthy
                    })
                }).collect::<Vec<_>>(),
                "healthy": results.iter().any(|(_, _, healthy)| *healthy)
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Print the effective configuration
pub fn handle_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", toml::to_string_pretty(config)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}

fn describe_provenance(provenance: &Provenance) -> String {
    match provenance {
        Provenance::Live { provider } => format!("answered by {}", provider),
        Provenance::Defaulted { provider } => {
            format!("answered by {}, unparseable; default shown", provider)
        }
        Provenance::Fallback => "no provider available; canned answer".to_string(),
    }
}

/// Human-readable rendering of a capability result
pub fn render_text(result: &ExtractionResult) -> String {
    let mut out = String::new();

    match result {
        ExtractionResult::RiskAssessment(risk) => {
            let _ = writeln!(out, "Risk score: {}/100", risk.score);
            push_list(&mut out, "Risk factors", &risk.factors);
        }
        ExtractionResult::CompetitorList(list) => {
            push_list(&mut out, "Competitors", &list.competitors)
        }
        ExtractionResult::ValuationRange(range) => {
            let _ = writeln!(
                out,
                "Valuation: {} {} - {}",
                range.currency,
                crate::prompts::group_thousands(range.low_usd),
                crate::prompts::group_thousands(range.high_usd)
            );
        }
        ExtractionResult::DueDiligenceSummary(swot) => {
            push_list(&mut out, "Strengths", &swot.strengths);
            push_list(&mut out, "Weaknesses", &swot.weaknesses);
            push_list(&mut out, "Opportunities", &swot.opportunities);
            push_list(&mut out, "Threats", &swot.threats);
            push_list(&mut out, "Key questions", &swot.questions);
        }
        ExtractionResult::TrendList(trends) => {
            let _ = writeln!(out, "Trends:");
            for entry in &trends.entries {
                let _ = writeln!(out, "  - {} ({})", entry.topic, entry.change);
            }
        }
        ExtractionResult::PitchDeckFeedback(feedback) => {
            push_list(&mut out, "Feedback", &feedback.feedback)
        }
        ExtractionResult::FundraisingSteps(steps) => push_list(&mut out, "Steps", &steps.steps),
        ExtractionResult::FreeformAnswer(answer) => {
            let _ = writeln!(out, "{}", answer.answer);
            if !answer.sources.is_empty() {
                push_list(&mut out, "Sources", &answer.sources);
            }
        }
        ExtractionResult::MarketEntryReport(report) => {
            push_list(&mut out, "Opportunities", &report.opportunities);
            push_list(&mut out, "Challenges", &report.challenges);
        }
        ExtractionResult::ImpactStatement(impact) => {
            let _ = writeln!(out, "{}", impact.statement);
        }
        ExtractionResult::DealsSummary(deals) => {
            let _ = writeln!(out, "{}", deals.summary);
        }
        ExtractionResult::GrantSuggestions(grants) => push_list(&mut out, "Grants", &grants.grants),
        ExtractionResult::InvestorMatches(matches) => {
            push_list(&mut out, "Investors", &matches.investors)
        }
        ExtractionResult::IntroEmail(email) => {
            if let Some(subject) = &email.subject {
                let _ = writeln!(out, "Subject: {}", subject);
                let _ = writeln!(out);
            }
            let _ = writeln!(out, "{}", email.body);
        }
    }

    out
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "{}:", title);
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}
