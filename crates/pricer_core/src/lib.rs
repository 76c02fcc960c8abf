//! # pricer_core: Foundation types for Monte Carlo sensitivity pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Term-structure curves: `Curve1D`, `LinearInterpolation` (`market_data::curves`)
//! - Error types: `InterpolationError`, `PricingError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Generic Scalars
//!
//! Curves are generic over `T: num_traits::Float`. The same code path is used
//! for primal-only pricing with `f64` and for recorded pricing with the active
//! scalar of `pricer_tape`.
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::curves::{Curve1D, LinearInterpolation};
//! use pricer_core::types::InterpolationError;
//!
//! let vols = LinearInterpolation::new(&[0.0, 0.5, 1.0], &[0.15, 0.35, 0.15]).unwrap();
//! assert_eq!(vols.evaluate(0.5).unwrap(), 0.35);
//!
//! // No extrapolation outside the tabulated times
//! assert!(matches!(
//!     vols.evaluate(1.01),
//!     Err(InterpolationError::OutOfBounds { .. })
//! ));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for the error types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod types;

pub use num_traits::Float;
