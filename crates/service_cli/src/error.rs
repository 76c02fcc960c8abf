//! CLI error types.

use pricer_pricing::SimulationError;
use thiserror::Error;

/// Errors surfaced by the `pricer` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading a file or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The scenario file or an environment override is malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A command-line argument is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The pricing engine rejected the scenario or failed mid-run.
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
