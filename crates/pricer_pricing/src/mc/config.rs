//! Simulation grid and differentiation settings.
//!
//! A run simulates `n_paths` paths of `n_steps` steps of length `dt`; with
//! [`AdMode::Reverse`] every path is recorded on the tape and swept back.

use super::error::ConfigError;

/// Upper bound on `n_paths`.
pub const MAX_PATHS: usize = 10_000_000;

/// Upper bound on `n_steps`.
pub const MAX_STEPS: usize = 10_000;

/// How a pricing run treats derivatives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AdMode {
    /// Plain `f64` arithmetic, price only.
    NoAd,

    /// Record each path and accumulate adjoints of every market input.
    #[default]
    Reverse,
}

/// Validated settings of a Monte Carlo run.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{MonteCarloConfig, AdMode};
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(10_000)
///     .n_steps(252)
///     .ad_mode(AdMode::NoAd)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 10_000);
/// assert!((config.dt() - 1.0 / 252.0).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloConfig {
    n_paths: usize,
    n_steps: usize,
    dt: f64,
    ad_mode: AdMode,
    seed: Option<u64>,
}

impl MonteCarloConfig {
    /// Start building a configuration.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Number of simulated paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Step length in years.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Time on the model clock after the last step.
    ///
    /// The clock adds `dt` once per step, so this can sit a few ulps past
    /// `n_steps * dt`; with `dt = 1/52` the one-year grid ends at
    /// `1.0000000000000009`.
    pub fn final_time(&self) -> f64 {
        (0..self.n_steps).fold(0.0, |t, _| t + self.dt)
    }

    /// Differentiation mode.
    #[inline]
    pub fn ad_mode(&self) -> AdMode {
        self.ad_mode
    }

    /// Seed of the normal generator; the driver uses 0 when unset.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Same grid and seed under another differentiation mode.
    pub fn with_ad_mode(&self, ad_mode: AdMode) -> Self {
        Self {
            ad_mode,
            ..self.clone()
        }
    }

    /// Check path count, step count and step length.
    ///
    /// # Errors
    ///
    /// - `InvalidPathCount` unless `1 <= n_paths <= MAX_PATHS`
    /// - `InvalidStepCount` unless `1 <= n_steps <= MAX_STEPS`
    /// - `InvalidTimeStep` unless `dt` is positive and finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PATHS).contains(&self.n_paths) {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if !(1..=MAX_STEPS).contains(&self.n_steps) {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// Path and step counts are required. Without an explicit `dt` the grid
/// spans one year, `dt = 1 / n_steps`.
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let half_year = MonteCarloConfig::builder()
///     .n_paths(50_000)
///     .n_steps(126)
///     .dt(1.0 / 252.0)
///     .build()
///     .expect("valid config");
///
/// assert!((half_year.final_time() - 0.5).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    dt: Option<f64>,
    ad_mode: AdMode,
    seed: Option<u64>,
}

impl MonteCarloConfigBuilder {
    /// Number of paths, at most [`MAX_PATHS`].
    pub fn n_paths(self, n_paths: usize) -> Self {
        Self {
            n_paths: Some(n_paths),
            ..self
        }
    }

    /// Steps per path, at most [`MAX_STEPS`].
    pub fn n_steps(self, n_steps: usize) -> Self {
        Self {
            n_steps: Some(n_steps),
            ..self
        }
    }

    /// Step length in years.
    pub fn dt(self, dt: f64) -> Self {
        Self { dt: Some(dt), ..self }
    }

    /// Differentiation mode; reverse by default.
    pub fn ad_mode(self, ad_mode: AdMode) -> Self {
        Self { ad_mode, ..self }
    }

    /// Seed of the normal generator.
    pub fn seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Fill in the default step length and validate.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a missing count, otherwise whatever
    /// [`MonteCarloConfig::validate`] reports.
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let required = |name: &'static str, value: Option<usize>| {
            value.ok_or_else(|| ConfigError::InvalidParameter {
                name,
                value: "must be specified".to_string(),
            })
        };
        let n_paths = required("n_paths", self.n_paths)?;
        let n_steps = required("n_steps", self.n_steps)?;

        let config = MonteCarloConfig {
            n_paths,
            n_steps,
            dt: self.dt.unwrap_or(1.0 / n_steps as f64),
            ad_mode: self.ad_mode,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}
