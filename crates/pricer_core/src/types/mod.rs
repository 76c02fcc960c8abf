//! Core error types.
//!
//! # Re-exports
//!
//! - [`InterpolationError`], [`PricingError`] from `error`

pub mod error;

pub use error::{InterpolationError, PricingError};
