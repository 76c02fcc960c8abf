//! Verify command implementation
//!
//! Compares reverse-mode gradients against matched-draw finite differences
//! for every initial value and a spread of curve ordinates.

use std::collections::BTreeSet;

use pricer_pricing::mc::{InputRef, MarketInputs, SimulationDriver};
use pricer_pricing::verify::{verify_gradients, VerificationConfig, VerificationReport};
use pricer_pricing::SimulationError;
use tracing::info;

use crate::config::PricerConfig;
use crate::{CliError, Result};

/// Run the verify command and print one line per check.
pub fn run(config: &PricerConfig, bump: Option<f64>, tolerance: Option<f64>) -> Result<VerificationReport> {
    let report = verify(config, bump, tolerance)?;
    println!("Asian option price: {}", report.price);
    println!("{}", report.summary());
    Ok(report)
}

/// Verify the gradients of the configured scenario
pub fn verify(
    config: &PricerConfig,
    bump: Option<f64>,
    tolerance: Option<f64>,
) -> Result<VerificationReport> {
    let mut builder = VerificationConfig::builder();
    if let Some(bump) = bump {
        builder = builder.bump_size(bump);
    }
    if let Some(tolerance) = tolerance {
        builder = builder.tolerance(tolerance);
    }
    let verification = builder
        .build()
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let refs = sample_refs(&config.market);
    info!(
        checks = refs.len(),
        bump = verification.bump_size(),
        tolerance = verification.tolerance(),
        "Verifying gradients"
    );

    let driver = SimulationDriver::new(config.monte_carlo_config()?).map_err(SimulationError::from)?;
    Ok(verify_gradients(
        &driver,
        &config.market,
        &config.contracts,
        &refs,
        &verification,
    )?)
}

/// Every initial value, plus the first, quartile and last knot of each
/// rate and volatility curve.
pub fn sample_refs(inputs: &MarketInputs) -> Vec<InputRef> {
    let n = inputs.n_knots();
    let knots: BTreeSet<usize> = if n == 0 {
        BTreeSet::new()
    } else {
        [0, n / 4, n / 2, 3 * n / 4, n - 1].into_iter().collect()
    };

    let mut refs: Vec<InputRef> = (0..inputs.dims())
        .map(|asset| InputRef::InitialValue { asset })
        .collect();
    for asset in 0..inputs.dims() {
        refs.extend(knots.iter().map(|&knot| InputRef::Rate { asset, knot }));
    }
    for asset in 0..inputs.dims() {
        refs.extend(knots.iter().map(|&knot| InputRef::Vol { asset, knot }));
    }
    refs
}
