//! Arithmetic-average Asian call.
//!
//! The contract averages one asset over the observation window
//! `[start_time, end_time]` (both ends inclusive) and pays
//!
//! ```text
//! max(A - K, 0)    where A = (1/n) Σ S(t_i),  t_i in window
//! ```
//!
//! A path with no observation inside the window pays zero.

use num_traits::Float;
use pricer_core::types::PricingError;

use super::PathContract;
use crate::lift;

/// Plain terms of an Asian call.
///
/// Used to describe contracts independently of the numeric type; the driver
/// turns each set of terms into an [`AsianOption`] once per pricing run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsianParams {
    /// Index of the averaged asset in the model state.
    pub asset_id: usize,
    /// Strike price.
    pub strike: f64,
    /// First time included in the average.
    pub start_time: f64,
    /// Last time included in the average.
    pub end_time: f64,
}

impl AsianParams {
    /// Creates Asian call terms.
    #[inline]
    pub fn new(asset_id: usize, strike: f64, start_time: f64, end_time: f64) -> Self {
        Self {
            asset_id,
            strike,
            start_time,
            end_time,
        }
    }

    /// Check the terms against a model with `dims` dimensions.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfiguration` if `asset_id` is not a
    /// dimension of the model or any term is not finite.
    pub fn validate(&self, dims: usize) -> Result<(), PricingError> {
        if self.asset_id >= dims {
            return Err(PricingError::InvalidConfiguration(format!(
                "asset_id {} out of range for {} assets",
                self.asset_id, dims
            )));
        }
        if !(self.strike.is_finite() && self.start_time.is_finite() && self.end_time.is_finite()) {
            return Err(PricingError::InvalidConfiguration(format!(
                "non-finite Asian terms: strike {}, window [{}, {}]",
                self.strike, self.start_time, self.end_time
            )));
        }
        Ok(())
    }
}

/// Arithmetic-average Asian call with streaming accumulation.
///
/// # Example
///
/// ```
/// use pricer_pricing::path_dependent::{AsianOption, PathContract};
///
/// let mut option: AsianOption<f64> = AsianOption::new(0, 100.0, 0.0, 1.0);
/// option.evolve(0.0, &[100.0]).unwrap();
/// option.evolve(0.5, &[110.0]).unwrap();
/// option.evolve(1.0, &[120.0]).unwrap();
/// option.evolve(1.5, &[500.0]).unwrap(); // outside the window
///
/// assert_eq!(option.observation_count(), 3);
/// assert!((option.payoff() - 10.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct AsianOption<T: Float> {
    asset_id: usize,
    strike: T,
    start_time: T,
    end_time: T,
    running_sum: T,
    count: usize,
}

impl<T: Float> AsianOption<T> {
    /// Creates an Asian call on `asset_id` with the given window.
    pub fn new(asset_id: usize, strike: T, start_time: T, end_time: T) -> Self {
        Self {
            asset_id,
            strike,
            start_time,
            end_time,
            running_sum: T::zero(),
            count: 0,
        }
    }

    /// Creates an Asian call from plain terms; the terms become constants.
    pub fn from_params(params: &AsianParams) -> Self {
        Self::new(
            params.asset_id,
            lift(params.strike),
            lift(params.start_time),
            lift(params.end_time),
        )
    }

    /// Index of the averaged asset.
    #[inline]
    pub fn asset_id(&self) -> usize {
        self.asset_id
    }

    /// Strike price.
    #[inline]
    pub fn strike(&self) -> T {
        self.strike
    }

    /// Number of observations inside the window since the last reset.
    #[inline]
    pub fn observation_count(&self) -> usize {
        self.count
    }
}

impl<T: Float> PathContract<T> for AsianOption<T> {
    fn reset(&mut self) {
        self.running_sum = T::zero();
        self.count = 0;
    }

    fn evolve(&mut self, t: T, state: &[T]) -> Result<(), PricingError> {
        let price = *state
            .get(self.asset_id)
            .ok_or(PricingError::DimensionMismatch {
                expected: self.asset_id + 1,
                actual: state.len(),
            })?;

        if t >= self.start_time && t <= self.end_time {
            self.running_sum = self.running_sum + price;
            self.count += 1;
        }
        Ok(())
    }

    fn payoff(&self) -> T {
        if self.count == 0 {
            return T::zero();
        }
        let average = self.running_sum / lift(self.count as f64);
        (average - self.strike).max(T::zero())
    }
}
