//! Monte Carlo simulation with per-path reverse-mode sensitivities.
//!
//! # Architecture
//!
//! ```text
//! SimulationDriver
//! ├── MonteCarloConfig  (paths, steps, dt, AD mode, seed)
//! ├── PricerRng         (random number generation)
//! ├── Tape              (one recording per path)
//! └── Orchestration
//!     ├── MarketInputs → LogNormalProcess
//!     ├── AsianParams  → AsianOption
//!     └── PricingResult { price, std_error, sensitivities }
//! ```
//!
//! # Differentiation
//!
//! | Input | Activity |
//! |-------|----------|
//! | initial values | active, wrapped fresh every path |
//! | rate ordinates | active, wrapped fresh every path |
//! | volatility ordinates | active, wrapped fresh every path |
//! | knot times, dt, normals, contract terms | passive constants |
//! | path value | seeded with 1 |
//!
//! # Examples
//!
//! ```rust
//! use pricer_pricing::mc::{MarketInputs, MonteCarloConfig, SimulationDriver};
//! use pricer_pricing::path_dependent::AsianParams;
//!
//! let knots: Vec<f64> = (0..=4).map(|q| q as f64 / 4.0).collect();
//! let inputs = MarketInputs::new(
//!     vec![100.0, 100.0],
//!     knots.clone(),
//!     vec![vec![0.01; 5], vec![0.02; 5]],
//!     vec![vec![0.15; 5], vec![0.20; 5]],
//! );
//! let contracts = [
//!     AsianParams::new(0, 100.0, 0.0, 1.0),
//!     AsianParams::new(1, 100.0, 0.25, 0.75),
//! ];
//!
//! let config = MonteCarloConfig::builder()
//!     .n_paths(200)
//!     .n_steps(252)
//!     .seed(17)
//!     .build()
//!     .unwrap();
//!
//! let mut driver = SimulationDriver::new(config).unwrap();
//! let result = driver.price(&inputs, &contracts).unwrap();
//!
//! for (input, gradient) in result.sensitivities.unwrap().iter() {
//!     println!("d price / d {} = {:.6}", input, gradient);
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod inputs;
pub mod result;

// Re-exports for convenient access
pub use config::{AdMode, MonteCarloConfig, MonteCarloConfigBuilder, MAX_PATHS, MAX_STEPS};
pub use driver::SimulationDriver;
pub use error::{ConfigError, SimulationError};
pub use inputs::{InputRef, MarketInputs};
pub use result::{PricingResult, Sensitivities};
