//! Finite-difference verification of reverse-mode sensitivities.
//!
//! Each selected input is checked against the central difference
//!
//! ```text
//! fd = (P(x + h) - P(x - h)) / 2h
//! ```
//!
//! where every repricing replays the same random draws (the generator is
//! re-seeded before each run) and runs primal-only. With matched draws the
//! difference quotient is a derivative of the same path functions the tape
//! differentiates, so the two agree up to truncation and kink effects.
//!
//! ## Usage
//!
//! ```rust
//! use pricer_pricing::mc::{InputRef, MarketInputs, MonteCarloConfig, SimulationDriver};
//! use pricer_pricing::path_dependent::AsianParams;
//! use pricer_pricing::verify::{verify_gradients, VerificationConfig};
//!
//! let inputs = MarketInputs::new(
//!     vec![100.0],
//!     vec![0.0, 1.0],
//!     vec![vec![0.02, 0.02]],
//!     vec![vec![0.2, 0.3]],
//! );
//! let contracts = [AsianParams::new(0, 100.0, 0.0, 1.0)];
//! let driver = SimulationDriver::new(
//!     MonteCarloConfig::builder().n_paths(200).n_steps(12).seed(3).build().unwrap(),
//! )
//! .unwrap();
//!
//! let report = verify_gradients(
//!     &driver,
//!     &inputs,
//!     &contracts,
//!     &[InputRef::InitialValue { asset: 0 }, InputRef::Vol { asset: 0, knot: 1 }],
//!     &VerificationConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(report.checks.len(), 2);
//! println!("{}", report.summary());
//! ```

use pricer_core::types::PricingError;
use tracing::{debug, warn};

use crate::mc::{AdMode, ConfigError, InputRef, MarketInputs, SimulationDriver, SimulationError};
use crate::path_dependent::AsianParams;

/// Default relative bump size.
pub const DEFAULT_BUMP_SIZE: f64 = 1e-6;

/// Default acceptance tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Configuration for gradient verification.
///
/// The bump applied to input `x` is `bump_size * max(1, |x|)`. A check passes
/// when `|ad - fd| <= tolerance * (1 + |fd|)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerificationConfig {
    bump_size: f64,
    tolerance: f64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            bump_size: DEFAULT_BUMP_SIZE,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl VerificationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> VerificationConfigBuilder {
        VerificationConfigBuilder::default()
    }

    /// Relative bump size.
    #[inline]
    pub fn bump_size(&self) -> f64 {
        self.bump_size
    }

    /// Acceptance tolerance.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Builder for [`VerificationConfig`].
#[derive(Clone, Debug, Default)]
pub struct VerificationConfigBuilder {
    bump_size: Option<f64>,
    tolerance: Option<f64>,
}

impl VerificationConfigBuilder {
    /// Sets the relative bump size.
    #[inline]
    pub fn bump_size(mut self, bump_size: f64) -> Self {
        self.bump_size = Some(bump_size);
        self
    }

    /// Sets the acceptance tolerance.
    #[inline]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Builds the configuration, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` if either value is not a
    /// positive finite number.
    pub fn build(self) -> Result<VerificationConfig, ConfigError> {
        let bump_size = self.bump_size.unwrap_or(DEFAULT_BUMP_SIZE);
        let tolerance = self.tolerance.unwrap_or(DEFAULT_TOLERANCE);

        for (name, value) in [("bump_size", bump_size), ("tolerance", tolerance)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value: format!("{} is not a positive finite number", value),
                });
            }
        }

        Ok(VerificationConfig {
            bump_size,
            tolerance,
        })
    }
}

/// Outcome of one gradient check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientCheck {
    /// Checked input.
    pub input: InputRef,
    /// Reverse-mode gradient.
    pub ad: f64,
    /// Central finite difference.
    pub fd: f64,
    /// `|ad - fd|`.
    pub abs_error: f64,
    /// `|ad - fd| / |fd|`, infinite when `fd` is zero and `ad` is not.
    pub rel_error: f64,
    /// Whether the check met the tolerance.
    pub passed: bool,
}

impl GradientCheck {
    fn new(input: InputRef, ad: f64, fd: f64, tolerance: f64) -> Self {
        let abs_error = (ad - fd).abs();
        let rel_error = if abs_error == 0.0 {
            0.0
        } else {
            abs_error / fd.abs()
        };
        Self {
            input,
            ad,
            fd,
            abs_error,
            rel_error,
            passed: abs_error <= tolerance * (1.0 + fd.abs()),
        }
    }
}

/// Result of a verification run.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationReport {
    /// Price of the unbumped reverse-mode run.
    pub price: f64,
    /// One entry per checked input, in request order.
    pub checks: Vec<GradientCheck>,
}

impl VerificationReport {
    /// Whether every check passed.
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Number of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// One line per check followed by a pass count.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for c in &self.checks {
            out.push_str(&format!(
                "{:<12} ad={:>14.8} fd={:>14.8} abs={:.2e} rel={:.2e} {}\n",
                c.input.to_string(),
                c.ad,
                c.fd,
                c.abs_error,
                c.rel_error,
                if c.passed { "PASS" } else { "FAIL" }
            ));
        }
        out.push_str(&format!(
            "{}/{} checks passed",
            self.checks.len() - self.failed_count(),
            self.checks.len()
        ));
        out
    }
}

/// Compare reverse-mode gradients with matched-draw central differences.
///
/// Uses the configuration and current seed of `driver` without touching its
/// generator: one reverse-mode run, then two primal runs per input, each
/// starting from the same seed.
///
/// # Errors
///
/// Returns `SimulationError` if any run fails or an input reference is out
/// of range.
pub fn verify_gradients(
    driver: &SimulationDriver,
    inputs: &MarketInputs,
    contracts: &[AsianParams],
    refs: &[InputRef],
    config: &VerificationConfig,
) -> Result<VerificationReport, SimulationError> {
    let seed = driver.seed();
    let base = driver.config();

    let mut recorded = SimulationDriver::with_seed(base.with_ad_mode(AdMode::Reverse), seed)?;
    let reference = recorded.price(inputs, contracts)?;
    let sensitivities = reference.sensitivities.unwrap_or_default();

    let mut primal = SimulationDriver::with_seed(base.with_ad_mode(AdMode::NoAd), seed)?;
    let mut checks = Vec::with_capacity(refs.len());

    for &input in refs {
        let x = inputs
            .get(input)
            .ok_or_else(|| PricingError::InvalidConfiguration(format!("no market input {}", input)))?;
        let h = config.bump_size * x.abs().max(1.0);

        primal.reset_with_seed(seed);
        let up = primal.price(&inputs.bumped(input, h)?, contracts)?.price;
        primal.reset_with_seed(seed);
        let down = primal.price(&inputs.bumped(input, -h)?, contracts)?.price;

        let fd = (up - down) / (2.0 * h);
        let ad = sensitivities.get(input).unwrap_or(0.0);
        let check = GradientCheck::new(input, ad, fd, config.tolerance);

        if check.passed {
            debug!(%input, ad, fd, abs_error = check.abs_error, "gradient check passed");
        } else {
            warn!(%input, ad, fd, abs_error = check.abs_error, "gradient check failed");
        }
        checks.push(check);
    }

    Ok(VerificationReport {
        price: reference.price,
        checks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::MonteCarloConfig;

    fn inputs() -> MarketInputs {
        MarketInputs::new(
            vec![100.0],
            vec![0.0, 0.5, 1.0],
            vec![vec![0.02, 0.03, 0.04]],
            vec![vec![0.2, 0.25, 0.3]],
        )
    }

    fn driver(n_paths: usize) -> SimulationDriver {
        let config = MonteCarloConfig::builder()
            .n_paths(n_paths)
            .n_steps(10)
            .seed(8)
            .build()
            .unwrap();
        SimulationDriver::new(config).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = VerificationConfig::builder().build().unwrap();
        assert_eq!(config, VerificationConfig::default());
        assert_eq!(config.bump_size(), DEFAULT_BUMP_SIZE);
        assert_eq!(config.tolerance(), DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_config_rejects_non_positive() {
        let err = VerificationConfig::builder().bump_size(0.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "bump_size", .. }));

        let err = VerificationConfig::builder().tolerance(f64::NAN).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "tolerance", .. }));
    }

    #[test]
    fn test_gradient_check_errors() {
        let check = GradientCheck::new(InputRef::InitialValue { asset: 0 }, 1.01, 1.0, 1e-3);
        assert!((check.abs_error - 0.01).abs() < 1e-12);
        assert!((check.rel_error - 0.01).abs() < 1e-12);
        assert!(!check.passed);

        let check = GradientCheck::new(InputRef::InitialValue { asset: 0 }, 0.0, 0.0, 1e-3);
        assert_eq!(check.rel_error, 0.0);
        assert!(check.passed);
    }

    #[test]
    fn test_all_inputs_agree_with_finite_differences() {
        let inputs = inputs();
        let contracts = [AsianParams::new(0, 100.0, 0.0, 1.0)];
        let report = verify_gradients(
            &driver(500),
            &inputs,
            &contracts,
            &inputs.input_refs(),
            &VerificationConfig::default(),
        )
        .unwrap();

        assert_eq!(report.checks.len(), 7);
        assert!(report.all_passed(), "{}", report.summary());
        assert!(report.price > 0.0);
    }

    #[test]
    fn test_verification_leaves_driver_untouched() {
        let inputs = inputs();
        let contracts = [AsianParams::new(0, 100.0, 0.0, 1.0)];
        let mut d = driver(50);

        let report = verify_gradients(
            &d,
            &inputs,
            &contracts,
            &[InputRef::InitialValue { asset: 0 }],
            &VerificationConfig::default(),
        )
        .unwrap();

        let direct = d.price(&inputs, &contracts).unwrap();
        assert_eq!(direct.price, report.price);
    }

    #[test]
    fn test_unknown_input_is_an_error() {
        let result = verify_gradients(
            &driver(10),
            &inputs(),
            &[AsianParams::new(0, 100.0, 0.0, 1.0)],
            &[InputRef::Rate { asset: 0, knot: 9 }],
            &VerificationConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_reports_counts() {
        let report = VerificationReport {
            price: 1.0,
            checks: vec![
                GradientCheck::new(InputRef::InitialValue { asset: 0 }, 1.0, 1.0, 1e-3),
                GradientCheck::new(InputRef::Vol { asset: 0, knot: 2 }, 2.0, 1.0, 1e-3),
            ],
        };
        assert_eq!(report.failed_count(), 1);
        assert!(!report.all_passed());
        let summary = report.summary();
        assert!(summary.contains("vol0[2]"));
        assert!(summary.ends_with("1/2 checks passed"));
    }
}
