use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use veris_models::config::VerisConfig;
use veris_models::profile::{RiskProfile, RiskTier};
use veris_models::property::Property;
use veris_store::SqliteProperties;

#[derive(Parser, Debug)]
#[command(name = "veris", about = "Valuation Engine for Real-estate Investment Scoring")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/veris.toml")]
    config: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Load a property dataset (JSON array) into the listings database
    Load {
        /// Path to the dataset, e.g. pune_properties.json
        input: String,
    },
    /// Apply an assistant reply to a fresh session and print the
    /// resulting filter state and marker projection
    Apply {
        /// Read the raw reply from a file instead of stdin
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Score one property and print the full investment memo
    Score {
        /// Property id, e.g. PROP_0001
        id: String,

        /// Investor risk tier (conservative | moderate | aggressive)
        #[arg(short, long, default_value = "moderate")]
        tier: RiskTier,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        CliCommand::Load { input } => load(&config, &input),
        CliCommand::Apply { input, pretty } => apply(&config, input.as_deref(), pretty).await,
        CliCommand::Score { id, tier, pretty } => score(&config, &id, tier, pretty).await,
    }
}

fn load_config(path: &str) -> Result<VerisConfig> {
    if !Path::new(path).exists() {
        tracing::info!(path, "no config file found; using defaults");
        return Ok(VerisConfig::default());
    }
    let config_str =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    toml::from_str(&config_str).with_context(|| "Failed to parse config")
}

fn load(config: &VerisConfig, input: &str) -> Result<()> {
    let dataset = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read dataset: {input}"))?;
    let properties: Vec<Property> =
        serde_json::from_str(&dataset).context("Failed to parse property dataset JSON")?;

    let mut sqlite = SqliteProperties::open_writable(&config.store.sqlite_path)
        .with_context(|| format!("Failed to open listings DB: {}", config.store.sqlite_path))?;
    let written = sqlite
        .upsert_batch(&properties)
        .context("Failed to write properties")?;

    tracing::info!(written, db = %config.store.sqlite_path, "dataset loaded");
    println!("{written}");
    Ok(())
}

async fn apply(config: &VerisConfig, input: Option<&str>, pretty: bool) -> Result<()> {
    let raw = if let Some(input_path) = input {
        std::fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read input: {input_path}"))?
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    };

    let mut session = veris::build_session(config, RiskProfile::default())
        .context("Failed to build session")?;

    let outcome = session
        .apply_reply(&raw)
        .map_err(|e| anyhow::anyhow!("Reply rejected: {e}"))?;
    let projection = session
        .refresh()
        .await
        .map_err(|e| anyhow::anyhow!("Refresh failed: {e}"))?
        .clone();

    let output = serde_json::json!({
        "reply": outcome.reply,
        "filter_state": session.filter_state(),
        "projection": projection,
    });
    print_json(&output, pretty)
}

async fn score(config: &VerisConfig, id: &str, tier: RiskTier, pretty: bool) -> Result<()> {
    let sqlite = SqliteProperties::open(&config.store.sqlite_path)
        .with_context(|| format!("Failed to open listings DB: {}", config.store.sqlite_path))?;
    let property = sqlite
        .get_by_id(id)
        .map_err(|e| anyhow::anyhow!("Lookup failed: {e}"))?
        .with_context(|| format!("No property with id {id}"))?;

    let profile = RiskProfile {
        tier,
        risk_score: None,
    };
    let memo = veris_engine::investment_memo(&property, &profile, &config.finance)
        .map_err(|e| anyhow::anyhow!("Scoring failed: {e}"))?;

    print_json(&serde_json::to_value(&memo)?, pretty)
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}
