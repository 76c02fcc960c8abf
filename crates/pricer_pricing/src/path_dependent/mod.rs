//! Path-dependent contract infrastructure.
//!
//! Contracts observe the simulated state after every model step and turn the
//! accumulated observations into a payoff at the end of the path.
//!
//! # Key Components
//!
//! - [`PathContract`]: trait for contracts driven by the simulation loop
//! - [`AsianOption`]: arithmetic-average Asian call over a time window
//! - [`AsianParams`]: plain contract terms used to instantiate an `AsianOption`
//!
//! # Design Philosophy
//!
//! - **Streaming accumulation**: running sums instead of stored paths
//! - **Generic Float type**: contracts run with `f64` or recorded scalars
//! - **Static dispatch**: the driver is generic over the contract type

mod asian;
mod contract;

pub use asian::{AsianOption, AsianParams};
pub use contract::PathContract;
