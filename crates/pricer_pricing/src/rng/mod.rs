//! # Random Number Generation
//!
//! Seeded pseudo-random number generation for Monte Carlo simulations.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: the generator is seeded, so identical seeds give
//!   identical paths, prices and gradients
//! - **Explicit ownership**: the generator is a value owned by the driver,
//!   never a process-wide singleton
//! - **Draw order**: normals are drawn one step at a time in dimension order,
//!   so a run is reproduced exactly by replaying the same seed
//!
//! ## British English Convention
//!
//! All documentation in this module uses British English spelling conventions
//! ("initialise", "behaviour").
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::PricerRng;
//!
//! let mut rng = PricerRng::from_seed(12345);
//!
//! // Standard normal variates (mean=0, std=1)
//! let normal_value = rng.gen_normal();
//!
//! // Batch generation into a pre-allocated buffer, one draw per dimension
//! let mut step = vec![0.0; 2];
//! rng.fill_normal(&mut step);
//! ```

mod prng;

pub use prng::PricerRng;
