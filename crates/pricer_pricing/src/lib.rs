//! # Pricer Pricing (Layer 3: Monte Carlo Engine)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing drives Monte Carlo simulations of path-dependent contracts:
//! - Seeded random number generation ([`rng`])
//! - Path-dependent contracts observing the simulated state ([`path_dependent`])
//! - The simulation driver computing the price and, in reverse mode, the
//!   gradient of the price with respect to every market input ([`mc`])
//! - Finite-difference verification of those gradients ([`verify`])
//!
//! ## Differentiation
//!
//! Every path opens its own recording on a [`pricer_tape::Tape`]. Market inputs
//! are wrapped as active scalars, the model and contracts run with
//! [`pricer_tape::Active`] in place of `f64`, and a single backward sweep per
//! path yields all input gradients. Path gradients are averaged alongside the
//! price.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::mc::{AdMode, MarketInputs, MonteCarloConfig, SimulationDriver};
//! use pricer_pricing::path_dependent::AsianParams;
//!
//! let inputs = MarketInputs::new(
//!     vec![100.0],
//!     vec![0.0, 0.5, 1.0],
//!     vec![vec![0.02, 0.02, 0.02]],
//!     vec![vec![0.2, 0.2, 0.2]],
//! );
//! let contracts = [AsianParams::new(0, 100.0, 0.0, 1.0)];
//!
//! let config = MonteCarloConfig::builder()
//!     .n_paths(500)
//!     .n_steps(12)
//!     .ad_mode(AdMode::Reverse)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let mut driver = SimulationDriver::new(config).unwrap();
//! let result = driver.price(&inputs, &contracts).unwrap();
//!
//! assert!(result.price > 0.0);
//! let sens = result.sensitivities.unwrap();
//! assert!(sens.initial_values[0] > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod path_dependent;
pub mod rng;
pub mod verify;

pub use mc::{
    AdMode, MarketInputs, MonteCarloConfig, PricingResult, Sensitivities, SimulationDriver,
    SimulationError,
};
pub use path_dependent::{AsianOption, AsianParams, PathContract};

use num_traits::Float;

/// Lift a plain scalar into the simulation's numeric type as a constant.
///
/// Every `Float` used by this crate represents all finite `f64` values, so the
/// NaN fallback is never reached in practice.
#[inline]
pub(crate) fn lift<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}
