//! StochasticModel trait for multi-dimensional state evolution.
//!
//! A model owns a fixed-length state vector, one entry per simulated asset,
//! and advances it one time step at a time from independent standard normal
//! draws supplied by the caller.
//!
//! ## Design Philosophy
//!
//! - **Static dispatch**: callers are generic over `M: StochasticModel<T>`,
//!   not `Box<dyn StochasticModel<T>>`
//! - **Generic Float type**: the same model runs with `f64` or with recorded
//!   active scalars
//! - **Resettable**: every path starts from the state the model had right
//!   after construction
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pricer_core::market_data::curves::LinearInterpolation;
//! use pricer_models::models::{LogNormalProcess, StochasticModel};
//!
//! let flat = |v: f64| Arc::new(LinearInterpolation::new(&[0.0, 1.0], &[v, v]).unwrap());
//! let mut model = LogNormalProcess::new(vec![flat(0.02)], vec![flat(0.2)], vec![100.0]).unwrap();
//!
//! model.evolve(1.0 / 252.0, &[0.5]).unwrap();
//! assert!(model.state()[0] > 100.0);
//!
//! model.reset();
//! assert_eq!(model.state(), &[100.0]);
//! assert_eq!(model.current_time(), 0.0);
//! ```

use pricer_core::types::PricingError;
use pricer_core::Float;

/// Unified interface for multi-asset stochastic process models.
///
/// # Type Parameters
/// * `T` - Float type (`f64` or a recorded active scalar)
///
/// # Invariants
/// - `state().len() == dims()` at all times
/// - `reset()` restores the post-construction state bit for bit
pub trait StochasticModel<T: Float> {
    /// Number of simulated dimensions, fixed at construction.
    fn dims(&self) -> usize;

    /// Restore the initial state and rewind time to zero.
    fn reset(&mut self);

    /// Advance the model by `dt` using one standard normal draw per dimension.
    ///
    /// # Errors
    /// * `PricingError::DimensionMismatch` - `normals.len() != dims()`
    /// * `PricingError::Curve` - a term structure cannot be evaluated at the new time
    fn evolve(&mut self, dt: T, normals: &[T]) -> Result<(), PricingError>;

    /// Current state, one value per dimension.
    fn state(&self) -> &[T];

    /// Time reached by the last `evolve` call.
    fn current_time(&self) -> T;
}
