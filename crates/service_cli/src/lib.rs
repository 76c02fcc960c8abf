//! Command-line driver for Asian option pricing.
//!
//! Loads a scenario (market curves, contracts and simulation settings) from a
//! TOML file, or falls back to the built-in two-asset scenario, then prices
//! it with reverse-mode sensitivities or checks those sensitivities against
//! finite differences.
//!
//! As part of the **S**ervice layer, this crate only wires configuration,
//! logging and output around `pricer_pricing`.

pub mod commands;
pub mod config;
pub mod error;

pub use error::{CliError, Result};

// Re-export the pricing engine for integration
pub use pricer_pricing;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
