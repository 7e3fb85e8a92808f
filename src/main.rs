//! Strictly Scratch - Unified CLI
//!
//! Plays scratch-card sessions and reports their results.

#![warn(missing_docs)]

mod cli;

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use strictly_scratch::{
    AutoPlayer, JsonLinesReporter, PlayerProfile, ReportingObserver, SessionConfig,
    SessionController,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            seed,
            name,
            email,
            phone,
            report,
        } => run_play(config, seed, name, email, phone, report),
        Command::CheckConfig { config } => run_check_config(config),
    }
}

/// Play one session with the automatic player
#[instrument]
fn run_play(
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    report: Option<PathBuf>,
) -> Result<()> {
    let config = match &config_path {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SessionConfig::default(),
    };

    let mut session = match seed {
        Some(seed) => SessionController::start_seeded(config, seed)?,
        None => SessionController::start(config)?,
    };
    info!(budget = session.budget(), "Session dealt");

    let defaults = PlayerProfile::default();
    let profile = PlayerProfile::new(
        name.unwrap_or_else(|| defaults.name().clone()),
        email.unwrap_or_else(|| defaults.email().clone()),
        phone.unwrap_or_else(|| defaults.phone().clone()),
    );

    match report {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open report file {}", path.display()))?;
            session.subscribe(Box::new(ReportingObserver::new(
                JsonLinesReporter::new(file),
                profile,
            )));
        }
        None => {
            session.subscribe(Box::new(ReportingObserver::new(
                JsonLinesReporter::new(std::io::stdout()),
                profile,
            )));
        }
    }

    let mut player = match seed {
        Some(seed) => AutoPlayer::seeded(seed),
        None => AutoPlayer::from_entropy(),
    };
    player.play(&mut session);

    let result = session
        .result()
        .context("Session ended without a result")?;
    info!(
        outcome = %result.outcome(),
        matched = ?result.matched_prize(),
        revealed = result.revealed().len(),
        "Session complete"
    );

    Ok(())
}

/// Validate a configuration file and print it
#[instrument]
fn run_check_config(path: PathBuf) -> Result<()> {
    let config = SessionConfig::from_file(&path)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
    println!("{}", rendered);
    info!(path = %path.display(), "Config is valid");
    Ok(())
}
