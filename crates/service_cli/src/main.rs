//! Pricer CLI - Monte Carlo Asian option pricing with reverse-mode gradients
//!
//! # Commands
//!
//! - `pricer price` - Price the scenario and print every gradient
//! - `pricer verify` - Check gradients against finite differences
//!
//! Without `--config` the built-in two-asset scenario is priced.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use service_cli::commands::price::OutputFormat;
use service_cli::commands::{price, verify};
use service_cli::config::{build_config, CliArgs};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Monte Carlo Asian option pricer
#[derive(Parser)]
#[command(name = "pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price the scenario and print the gradients
    Price {
        /// Number of Monte Carlo paths
        #[arg(short, long)]
        paths: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Price without recording gradients
        #[arg(long)]
        no_ad: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compare gradients with finite differences
    Verify {
        /// Number of Monte Carlo paths
        #[arg(short, long)]
        paths: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Relative bump size
        #[arg(long)]
        bump: Option<f64>,

        /// Pass tolerance
        #[arg(long)]
        tolerance: Option<f64>,
    },
}

impl Cli {
    fn config_args(&self) -> CliArgs {
        let (paths, seed, no_gradients) = match &self.command {
            Commands::Price {
                paths, seed, no_ad, ..
            } => (*paths, *seed, *no_ad),
            Commands::Verify { paths, seed, .. } => (*paths, *seed, false),
        };
        CliArgs {
            config_file: self.config.clone(),
            paths,
            seed,
            no_gradients,
            log_level: self.log_level.clone(),
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli.config_args()).context("Failed to load configuration")?;

    init_tracing(config.logging.level.as_filter_str());
    info!(
        version = service_cli::VERSION,
        paths = config.simulation.paths,
        steps = config.simulation.steps,
        seed = config.simulation.seed,
        assets = config.market.dims(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Price { format, .. } => {
            price::run(&config, format).context("Pricing failed")?;
        }
        Commands::Verify {
            bump, tolerance, ..
        } => {
            let report = verify::run(&config, bump, tolerance).context("Verification failed")?;
            if !report.all_passed() {
                bail!(
                    "{} of {} gradient checks failed",
                    report.failed_count(),
                    report.checks.len()
                );
            }
        }
    }

    Ok(())
}
