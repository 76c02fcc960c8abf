//! PathContract trait for contracts observed along a simulated path.

use num_traits::Float;
use pricer_core::types::PricingError;

/// A contract whose payoff depends on the path of the simulated state.
///
/// The driver calls [`reset`](Self::reset) at the start of every path,
/// [`evolve`](Self::evolve) once per time step with the observation time and
/// the model state, and [`payoff`](Self::payoff) at the end of the path.
///
/// # Type Parameters
///
/// * `T` - Float type (`f64` or a recorded active scalar)
pub trait PathContract<T: Float> {
    /// Clear any accumulated observations.
    fn reset(&mut self);

    /// Observe the model `state` at time `t`.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::DimensionMismatch` if `state` does not contain
    /// the dimension the contract references.
    fn evolve(&mut self, t: T, state: &[T]) -> Result<(), PricingError>;

    /// Payoff from the observations made since the last reset.
    fn payoff(&self) -> T;
}
