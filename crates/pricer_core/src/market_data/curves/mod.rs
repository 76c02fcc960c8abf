//! Term-structure curves for rates and volatilities.
//!
//! This module provides:
//! - [`Curve1D`]: Generic trait for time-indexed scalar curves
//! - [`LinearInterpolation`]: Piecewise linear curve over tabulated points

mod linear;
mod traits;

#[cfg(test)]
mod property_tests;

pub use linear::LinearInterpolation;
pub use traits::Curve1D;
