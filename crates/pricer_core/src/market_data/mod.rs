//! Market data structures for simulation inputs.
//!
//! # Architecture
//!
//! All structures are generic over `T: Float` to support both standard
//! floating-point types (f64, f32) and recorded active scalars used for
//! reverse-mode sensitivities.
//!
//! # Components
//!
//! - [`curves`]: Term-structure trait and the linear interpolation curve
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::curves::{Curve1D, LinearInterpolation};
//!
//! let times = [0.0, 0.25, 0.5, 0.75, 1.0];
//! let rates = [0.010, 0.015, 0.010, 0.005, 0.010];
//!
//! let curve: LinearInterpolation<f64> = LinearInterpolation::new(&times, &rates).unwrap();
//! let r = curve.evaluate(0.125).unwrap();
//! assert!((r - 0.0125).abs() < 1e-12);
//! ```

pub mod curves;

pub use curves::{Curve1D, LinearInterpolation};
