//! # pricer_tape: Reverse-mode differentiation substrate
//!
//! Operator-overloading tape used to obtain exact pathwise gradients of Monte
//! Carlo payoffs with respect to every market input in one backward pass.
//!
//! ## Protocol
//!
//! | Step | Call |
//! |------|------|
//! | open a scope | [`Tape::begin_recording`] |
//! | register inputs | [`Recording::wrap`] |
//! | compute | ordinary arithmetic on [`Active`] (it implements `num_traits::Float`) |
//! | seed the output | [`Recording::seed_gradient`] |
//! | reverse sweep | [`Recording::propagate_adjoints`] |
//! | read gradients | [`Recording::read_gradient`] |
//! | close the scope | drop the [`Recording`] |
//!
//! Only one scope per tape can be open. Opening a new scope clears every node
//! of the previous one, so nothing recorded on one path leaks into the next.
//!
//! ## Example
//!
//! ```rust
//! use num_traits::Float;
//! use pricer_tape::Tape;
//!
//! let tape = Tape::new();
//! let rec = tape.begin_recording().unwrap();
//!
//! let s0 = rec.wrap(100.0);
//! let vol = rec.wrap(0.2);
//! let s1 = s0 * (vol * vol * rec.wrap(-0.5).exp()).exp();
//!
//! rec.seed_gradient(s1, 1.0);
//! rec.propagate_adjoints();
//!
//! assert!((rec.read_gradient(s0) - s1.value() / 100.0).abs() < 1e-12);
//! ```

#![deny(missing_docs)]

mod active;
mod error;
mod tape;

pub use active::Active;
pub use error::TapeError;
pub use tape::{Recording, Tape, DEFAULT_CAPACITY};
