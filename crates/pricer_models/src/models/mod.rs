//! Stochastic process models for Monte Carlo simulation.
//!
//! - `StochasticModel` trait: unified interface for multi-asset models
//! - `LogNormalProcess`: log-normal dynamics with curve-driven rates and volatilities
//!
//! ## Design Philosophy
//!
//! All models use:
//! - Static dispatch through generics (not `Box<dyn Trait>`)
//! - Generic `Float` type so that one implementation serves primal and
//!   recorded runs
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pricer_core::market_data::curves::LinearInterpolation;
//! use pricer_models::models::{LogNormalProcess, StochasticModel};
//!
//! let rate = Arc::new(LinearInterpolation::new(&[0.0, 1.0], &[0.02, 0.03]).unwrap());
//! let vol = Arc::new(LinearInterpolation::new(&[0.0, 1.0], &[0.2, 0.2]).unwrap());
//! let mut model = LogNormalProcess::new(vec![rate], vec![vol], vec![100.0]).unwrap();
//!
//! let dt: f64 = 1.0 / 252.0;
//! for z in [0.1, -0.3, 0.7] {
//!     model.evolve(dt, &[z]).unwrap();
//! }
//! assert!((model.current_time() - 3.0 * dt).abs() < 1e-15);
//! ```

pub mod lognormal;
pub mod stochastic;

pub use lognormal::LogNormalProcess;
pub use stochastic::StochasticModel;
