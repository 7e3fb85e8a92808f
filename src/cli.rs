//! Command-line interface for strictly_scratch.

use clap::{Parser, Subcommand};

/// Strictly Scratch - scratch-card sessions with a hidden reveal budget
#[derive(Parser, Debug)]
#[command(name = "strictly_scratch")]
#[command(about = "Play scratch-card sessions and report the results", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one session with the automatic player and report the result
    Play {
        /// Path to session configuration file (defaults are used if omitted)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Seed for the deal and the card order (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Player name for the result record
        #[arg(long)]
        name: Option<String>,

        /// Player email for the result record
        #[arg(long)]
        email: Option<String>,

        /// Player phone for the result record
        #[arg(long)]
        phone: Option<String>,

        /// Append the result to this JSON-lines file instead of stdout
        #[arg(long)]
        report: Option<std::path::PathBuf>,
    },

    /// Validate a configuration file and print the resolved settings
    CheckConfig {
        /// Path to session configuration file
        #[arg(short, long, default_value = "scratch_config.toml")]
        config: std::path::PathBuf,
    },
}
