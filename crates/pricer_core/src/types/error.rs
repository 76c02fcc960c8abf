//! Error types for structured error handling.
//!
//! This module provides:
//! - `InterpolationError`: Errors from curve construction and evaluation
//! - `PricingError`: Errors from model and contract operations
//!
//! Every variant maps onto one of three failure kinds:
//!
//! | Kind | Variants |
//! |------|----------|
//! | invalid configuration | `LengthMismatch`, `NonMonotonicData`, `InvalidConfiguration` |
//! | degenerate curve / out of domain | `EmptyCurve`, `OutOfBounds` |
//! | dimension mismatch | `DimensionMismatch` |
//!
//! None of them is recoverable inside a simulation run; they propagate to the
//! caller unchanged.

use thiserror::Error;

/// Curve construction and evaluation errors.
///
/// # Examples
/// ```
/// use pricer_core::types::InterpolationError;
///
/// let err = InterpolationError::OutOfBounds { x: 5.0, min: 0.0, max: 3.0 };
/// assert!(format!("{}", err).contains("outside valid domain"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Domain and range sequences differ in length.
    #[error("Domain and range must have the same length: got {domain} and {range}")]
    LengthMismatch {
        /// Number of domain points supplied
        domain: usize,
        /// Number of range values supplied
        range: usize,
    },

    /// Domain points are not strictly increasing.
    #[error("Domain is not strictly increasing at index {index}")]
    NonMonotonicData {
        /// Index of the first point that does not exceed its predecessor
        index: usize,
    },

    /// Curve has no points to evaluate.
    #[error("Cannot evaluate a curve with no points")]
    EmptyCurve,

    /// Query point outside the tabulated domain.
    #[error("Query point {x} outside valid domain [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },
}

impl InterpolationError {
    /// Returns true for errors raised while building a curve.
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            InterpolationError::LengthMismatch { .. } | InterpolationError::NonMonotonicData { .. }
        )
    }
}

/// Model and contract errors.
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::DimensionMismatch { expected: 2, actual: 3 };
/// assert_eq!(format!("{}", err), "Dimension mismatch: expected 2, got 3");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PricingError {
    /// Shape mismatch detected at construction time.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Runtime argument of the wrong size.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Size required by the callee
        expected: usize,
        /// Size actually supplied
        actual: usize,
    },

    /// Curve construction or evaluation failure.
    #[error("Curve error: {0}")]
    Curve(#[from] InterpolationError),
}

impl PricingError {
    /// Returns true if the error was raised by a constructor.
    pub fn is_configuration(&self) -> bool {
        match self {
            PricingError::InvalidConfiguration(_) => true,
            PricingError::Curve(inner) => inner.is_configuration(),
            PricingError::DimensionMismatch { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation_error_display() {
        let err = InterpolationError::LengthMismatch { domain: 3, range: 2 };
        assert_eq!(
            err.to_string(),
            "Domain and range must have the same length: got 3 and 2"
        );

        let err = InterpolationError::NonMonotonicData { index: 4 };
        assert!(err.to_string().contains("index 4"));

        let err = InterpolationError::EmptyCurve;
        assert!(err.to_string().contains("no points"));
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = InterpolationError::OutOfBounds {
            x: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(err.to_string(), "Query point 1.5 outside valid domain [0, 1]");
    }

    #[test]
    fn test_pricing_error_from_interpolation() {
        let err: PricingError = InterpolationError::EmptyCurve.into();
        assert!(matches!(err, PricingError::Curve(InterpolationError::EmptyCurve)));
        assert!(err.to_string().starts_with("Curve error"));
    }

    #[test]
    fn test_is_configuration() {
        assert!(PricingError::InvalidConfiguration("x".to_string()).is_configuration());
        assert!(PricingError::from(InterpolationError::LengthMismatch { domain: 1, range: 0 })
            .is_configuration());
        assert!(!PricingError::from(InterpolationError::EmptyCurve).is_configuration());
        assert!(!PricingError::DimensionMismatch {
            expected: 2,
            actual: 1
        }
        .is_configuration());
    }
}
