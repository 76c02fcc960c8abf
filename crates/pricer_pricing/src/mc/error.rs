//! Error types for the Monte Carlo driver.
//!
//! [`ConfigError`] covers invalid simulation parameters detected at
//! construction; [`SimulationError`] is what a pricing run returns.

use std::fmt;

use pricer_core::types::PricingError;
use pricer_tape::TapeError;
use thiserror::Error;

/// Configuration error for the Monte Carlo driver.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Path count outside valid range [1, 10_000_000].
    InvalidPathCount(usize),
    /// Step count outside valid range [1, 10_000].
    InvalidStepCount(usize),
    /// Time step not strictly positive and finite.
    InvalidTimeStep(f64),
    /// Invalid parameter value with name and description.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPathCount(count) => {
                write!(
                    f,
                    "Invalid path count {}: must be in range [1, 10_000_000]",
                    count
                )
            }
            Self::InvalidStepCount(count) => {
                write!(
                    f,
                    "Invalid step count {}: must be in range [1, 10_000]",
                    count
                )
            }
            Self::InvalidTimeStep(dt) => {
                write!(f, "Invalid time step {}: must be positive and finite", dt)
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "Invalid parameter '{}': {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Error returned by a pricing run.
///
/// Any error aborts the run; no partial result is produced.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Simulation parameters are invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Market inputs, contracts or curve lookups failed.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// The differentiation tape could not open a recording.
    #[error("Tape error: {0}")]
    Tape(#[from] TapeError),
}

impl SimulationError {
    /// Whether the error stems from invalid configuration rather than a
    /// failure during simulation.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Pricing(err) => err.is_configuration(),
            Self::Tape(_) => false,
        }
    }
}
