//! # Pricer Models
//!
//! Stochastic models driven by market term structures.
//!
//! This crate provides:
//! - The `StochasticModel` trait advancing a multi-asset state one step at a time
//! - `LogNormalProcess`, whose drift and volatility come from `Curve1D` curves
//!
//! ## Design Principles
//!
//! - **Generic over `Float`** so the same code is evaluated with `f64` or with
//!   tape-recorded scalars
//! - **Shared, immutable curves** held through `Arc`
//! - **Errors as values**: curve and dimension failures surface as `PricingError`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod models;

pub use models::{LogNormalProcess, StochasticModel};
