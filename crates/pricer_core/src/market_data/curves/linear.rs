//! Piecewise linear term-structure curve.

use super::Curve1D;
use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear curve over tabulated `(time, value)` points.
///
/// Domain points must be strictly increasing. The table is copied at
/// construction and never mutated afterwards.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`, or a recorded active scalar)
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{Curve1D, LinearInterpolation};
///
/// let times = [0.0, 0.5, 1.0];
/// let vols = [0.15, 0.25, 0.15];
///
/// let curve: LinearInterpolation<f64> = LinearInterpolation::new(&times, &vols).unwrap();
/// assert_eq!(curve.evaluate(0.5).unwrap(), 0.25);
/// assert!((curve.evaluate(0.75).unwrap() - 0.20).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolation<T: Float> {
    /// Strictly increasing domain points
    xs: Vec<T>,
    /// Range values, index-aligned with `xs`
    ys: Vec<T>,
}

impl<T: Float> LinearInterpolation<T> {
    /// Build a curve from domain points and range values.
    ///
    /// An empty table is accepted here; evaluating it fails with
    /// [`InterpolationError::EmptyCurve`].
    ///
    /// # Errors
    ///
    /// * `InterpolationError::LengthMismatch` - `xs` and `ys` differ in length
    /// * `InterpolationError::NonMonotonicData` - `xs` is not strictly increasing
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_core::market_data::curves::LinearInterpolation;
    /// use pricer_core::types::InterpolationError;
    ///
    /// let err = LinearInterpolation::new(&[0.0, 1.0, 2.0], &[0.0, 1.0]).unwrap_err();
    /// assert_eq!(err, InterpolationError::LengthMismatch { domain: 3, range: 2 });
    /// ```
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::LengthMismatch {
                domain: xs.len(),
                range: ys.len(),
            });
        }

        // NaN knots fail the comparison as well
        if let Some(index) = xs.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(InterpolationError::NonMonotonicData { index: index + 1 });
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Returns the domain points.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Returns the range values.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Returns the number of tabulated points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns true if the curve has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

impl<T: Float> Curve1D<T> for LinearInterpolation<T> {
    /// Evaluate the curve at `x`.
    ///
    /// Finds the smallest `i` with `xs[i] >= x`. The two boundary knots
    /// return their tabulated values, anything else (interior knots
    /// included) interpolates between `i - 1` and `i`:
    ///
    /// ```text
    /// t = (x - x[i-1]) / (x[i] - x[i-1])
    /// y = y[i-1] + t * (y[i] - y[i-1])
    /// ```
    fn evaluate(&self, x: T) -> Result<T, InterpolationError> {
        let (first, last) = self.domain().ok_or(InterpolationError::EmptyCurve)?;

        if !(x >= first && x <= last) {
            return Err(InterpolationError::OutOfBounds {
                x: x.to_f64().unwrap_or(f64::NAN),
                min: first.to_f64().unwrap_or(f64::NAN),
                max: last.to_f64().unwrap_or(f64::NAN),
            });
        }

        let i = self.xs.partition_point(|&xi| xi < x);
        if i == 0 {
            return Ok(self.ys[0]);
        }
        if i == self.xs.len() - 1 && self.xs[i] == x {
            return Ok(self.ys[i]);
        }

        let (x0, x1) = (self.xs[i - 1], self.xs[i]);
        let (y0, y1) = (self.ys[i - 1], self.ys[i]);
        let t = (x - x0) / (x1 - x0);

        Ok(y0 + t * (y1 - y0))
    }

    #[inline]
    fn domain(&self) -> Option<(T, T)> {
        match (self.xs.first(), self.xs.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }
}
