//! Multi-asset log-normal process with time-dependent coefficients.
//!
//! Each dimension follows
//!
//! ```text
//! dS_i = r_i(t) S_i dt + vol_i(t) S_i dW_i
//! ```
//!
//! discretised in log space, which keeps the state strictly positive:
//!
//! ```text
//! S_i(t + dt) = S_i(t) * exp((r_i - vol_i^2 / 2) dt + vol_i sqrt(dt) Z_i)
//! ```
//!
//! The coefficients `r_i` and `vol_i` are read from term-structure curves at
//! the end of the step.

use std::sync::Arc;

use pricer_core::market_data::curves::{Curve1D, LinearInterpolation};
use pricer_core::types::PricingError;
use pricer_core::Float;

use super::stochastic::StochasticModel;

/// Log-normal process over `D` independent assets.
///
/// Curves are shared through `Arc` and never mutated, so one curve can serve
/// several dimensions or several models.
///
/// # Type Parameters
///
/// * `T` - Float type (`f64` or a recorded active scalar)
/// * `C` - Curve type used for both rates and volatilities
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::market_data::curves::LinearInterpolation;
/// use pricer_models::models::{LogNormalProcess, StochasticModel};
///
/// let times = [0.0, 0.5, 1.0];
/// let rate = Arc::new(LinearInterpolation::new(&times, &[0.01, 0.02, 0.01]).unwrap());
/// let vol = Arc::new(LinearInterpolation::new(&times, &[0.15, 0.25, 0.15]).unwrap());
///
/// let model = LogNormalProcess::new(
///     vec![Arc::clone(&rate), rate],
///     vec![Arc::clone(&vol), vol],
///     vec![100.0, 50.0],
/// )
/// .unwrap();
/// assert_eq!(model.dims(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct LogNormalProcess<T: Float, C: Curve1D<T> = LinearInterpolation<T>> {
    rate_curves: Vec<Arc<C>>,
    vol_curves: Vec<Arc<C>>,
    initial_values: Vec<T>,
    state: Vec<T>,
    current_time: T,
}

impl<T: Float, C: Curve1D<T>> LogNormalProcess<T, C> {
    /// Build a process from per-dimension rate curves, volatility curves and
    /// initial values.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfiguration` if the three sequences do
    /// not share the same length.
    pub fn new(
        rate_curves: Vec<Arc<C>>,
        vol_curves: Vec<Arc<C>>,
        initial_values: Vec<T>,
    ) -> Result<Self, PricingError> {
        let dims = initial_values.len();
        if rate_curves.len() != dims || vol_curves.len() != dims {
            return Err(PricingError::InvalidConfiguration(format!(
                "expected {} rate and volatility curves, got {} and {}",
                dims,
                rate_curves.len(),
                vol_curves.len()
            )));
        }

        Ok(Self {
            rate_curves,
            vol_curves,
            state: initial_values.clone(),
            initial_values,
            current_time: T::zero(),
        })
    }

    /// Values the state is reset to.
    #[inline]
    pub fn initial_values(&self) -> &[T] {
        &self.initial_values
    }

    /// Rate curve of each dimension.
    #[inline]
    pub fn rate_curves(&self) -> &[Arc<C>] {
        &self.rate_curves
    }

    /// Volatility curve of each dimension.
    #[inline]
    pub fn vol_curves(&self) -> &[Arc<C>] {
        &self.vol_curves
    }
}

impl<T: Float, C: Curve1D<T>> StochasticModel<T> for LogNormalProcess<T, C> {
    #[inline]
    fn dims(&self) -> usize {
        self.initial_values.len()
    }

    fn reset(&mut self) {
        self.state.copy_from_slice(&self.initial_values);
        self.current_time = T::zero();
    }

    fn evolve(&mut self, dt: T, normals: &[T]) -> Result<(), PricingError> {
        if normals.len() != self.dims() {
            return Err(PricingError::DimensionMismatch {
                expected: self.dims(),
                actual: normals.len(),
            });
        }

        self.current_time = self.current_time + dt;

        let half = T::one() / (T::one() + T::one());
        let sqrt_dt = dt.sqrt();

        for (i, &z) in normals.iter().enumerate() {
            let r = self.rate_curves[i].evaluate(self.current_time)?;
            let vol = self.vol_curves[i].evaluate(self.current_time)?;

            let drift = (r - half * vol * vol) * dt;
            let diffusion = vol * sqrt_dt * z;
            self.state[i] = self.state[i] * (drift + diffusion).exp();
        }

        Ok(())
    }

    #[inline]
    fn state(&self) -> &[T] {
        &self.state
    }

    #[inline]
    fn current_time(&self) -> T {
        self.current_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::InterpolationError;

    fn flat(value: f64) -> Arc<LinearInterpolation<f64>> {
        Arc::new(LinearInterpolation::new(&[0.0, 1.0], &[value, value]).unwrap())
    }

    fn two_asset_model() -> LogNormalProcess<f64> {
        LogNormalProcess::new(
            vec![flat(0.01), flat(0.02)],
            vec![flat(0.15), flat(0.20)],
            vec![100.0, 100.0],
        )
        .unwrap()
    }

    // ========================================
    // Construction
    // ========================================

    #[test]
    fn test_new_valid() {
        let model = two_asset_model();
        assert_eq!(model.dims(), 2);
        assert_eq!(model.state(), &[100.0, 100.0]);
        assert_eq!(model.current_time(), 0.0);
    }

    #[test]
    fn test_new_rate_curve_count_mismatch() {
        let result = LogNormalProcess::new(vec![flat(0.01)], vec![flat(0.2), flat(0.2)], vec![100.0, 100.0]);
        assert!(matches!(result, Err(PricingError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_new_vol_curve_count_mismatch() {
        let result = LogNormalProcess::new(vec![flat(0.01), flat(0.01)], vec![flat(0.2)], vec![100.0, 100.0]);
        assert!(matches!(result, Err(PricingError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_new_initial_value_count_mismatch() {
        let result = LogNormalProcess::new(vec![flat(0.01)], vec![flat(0.2)], vec![100.0, 100.0]);
        let err = result.unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_shared_curve_across_dimensions() {
        let curve = flat(0.02);
        let model = LogNormalProcess::new(
            vec![Arc::clone(&curve), Arc::clone(&curve)],
            vec![flat(0.2), flat(0.2)],
            vec![1.0, 2.0],
        )
        .unwrap();
        assert_eq!(Arc::strong_count(&curve), 3);
        assert!(Arc::ptr_eq(&model.rate_curves()[0], &model.rate_curves()[1]));
    }

    // ========================================
    // Evolution
    // ========================================

    #[test]
    fn test_evolve_dimension_mismatch() {
        let mut model = two_asset_model();
        let err = model.evolve(0.01, &[0.0]).unwrap_err();
        assert_eq!(
            err,
            PricingError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_evolve_single_step_formula() {
        let mut model = two_asset_model();
        let dt = 1.0 / 252.0;
        model.evolve(dt, &[0.5, -1.0]).unwrap();

        let expected_0 = 100.0 * ((0.01 - 0.5 * 0.15 * 0.15) * dt + 0.15 * dt.sqrt() * 0.5).exp();
        let expected_1 = 100.0 * ((0.02 - 0.5 * 0.20 * 0.20) * dt + 0.20 * dt.sqrt() * -1.0).exp();
        assert_relative_eq!(model.state()[0], expected_0, max_relative = 1e-15);
        assert_relative_eq!(model.state()[1], expected_1, max_relative = 1e-15);
        assert_relative_eq!(model.current_time(), dt);
    }

    #[test]
    fn test_zero_volatility_grows_at_rate() {
        let mut model = LogNormalProcess::new(vec![flat(0.05)], vec![flat(0.0)], vec![100.0]).unwrap();
        for _ in 0..10 {
            model.evolve(0.1, &[1.7]).unwrap();
        }
        assert_relative_eq!(model.state()[0], 100.0 * 0.05_f64.exp(), max_relative = 1e-12);
    }

    #[test]
    fn test_evolve_uses_curve_at_new_time() {
        // Rate jumps from 0 to 1 over the first step; the step must read 1.
        let rate = Arc::new(LinearInterpolation::new(&[0.0, 0.5], &[0.0, 1.0]).unwrap());
        let mut model = LogNormalProcess::new(vec![rate], vec![flat(0.0)], vec![1.0]).unwrap();
        model.evolve(0.5, &[0.0]).unwrap();
        assert_relative_eq!(model.state()[0], 0.5_f64.exp(), max_relative = 1e-15);
    }

    #[test]
    fn test_evolve_past_curve_domain_fails() {
        let mut model = two_asset_model();
        let err = model.evolve(1.5, &[0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            PricingError::Curve(InterpolationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_state_stays_positive() {
        let mut model = two_asset_model();
        for _ in 0..100 {
            model.evolve(0.01, &[-3.0, 3.0]).unwrap();
        }
        assert!(model.state().iter().all(|&s| s > 0.0));
    }

    // ========================================
    // Reset
    // ========================================

    #[test]
    fn test_reset_restores_initial_state() {
        let mut model = two_asset_model();
        let fresh = model.clone();

        for z in [0.3, -0.7, 1.1] {
            model.evolve(0.05, &[z, -z]).unwrap();
        }
        model.reset();

        assert_eq!(model.state(), fresh.state());
        assert_eq!(model.current_time(), fresh.current_time());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut model = two_asset_model();
        model.evolve(0.05, &[1.0, 1.0]).unwrap();
        model.reset();
        model.reset();
        assert_eq!(model.state(), model.initial_values());
    }

    #[test]
    fn test_same_normals_reproduce_path() {
        let mut model = two_asset_model();
        let normals = [[0.1, 0.2], [-0.5, 0.9], [1.3, -0.4]];

        for n in &normals {
            model.evolve(0.1, n).unwrap();
        }
        let first = model.state().to_vec();

        model.reset();
        for n in &normals {
            model.evolve(0.1, n).unwrap();
        }
        assert_eq!(model.state(), first.as_slice());
    }
}
