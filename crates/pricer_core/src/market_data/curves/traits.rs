//! Term-structure curve trait definition.

use crate::types::InterpolationError;
use num_traits::Float;

/// One-dimensional term-structure curve.
///
/// Maps a time value to a scalar such as a short rate or a volatility.
/// Implementations must be generic over `T: Float` so the same curve can be
/// evaluated with plain `f64` values or with recorded active scalars.
///
/// # Contract
///
/// - `evaluate(x)` never extrapolates: points outside `domain()` are errors
/// - curves are immutable once built and may be shared between models
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{Curve1D, LinearInterpolation};
///
/// let curve: LinearInterpolation<f64> = LinearInterpolation::new(&[0.0, 1.0], &[0.01, 0.03]).unwrap();
/// assert_eq!(curve.domain(), Some((0.0, 1.0)));
/// assert!((curve.evaluate(0.5).unwrap() - 0.02).abs() < 1e-12);
/// assert!(curve.evaluate(1.5).is_err());
/// ```
pub trait Curve1D<T: Float> {
    /// Evaluate the curve at `x`.
    ///
    /// # Errors
    ///
    /// * `InterpolationError::EmptyCurve` - the curve has no points
    /// * `InterpolationError::OutOfBounds` - `x` lies outside `domain()`
    fn evaluate(&self, x: T) -> Result<T, InterpolationError>;

    /// Return the closed interval `[first, last]` of tabulated points,
    /// or `None` for an empty curve.
    fn domain(&self) -> Option<(T, T)>;
}
