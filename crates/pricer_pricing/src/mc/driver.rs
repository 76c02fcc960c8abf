//! Monte Carlo simulation driver.
//!
//! The [`SimulationDriver`] coordinates:
//! 1. Random number generation (via [`PricerRng`])
//! 2. Model evolution (via [`StochasticModel`])
//! 3. Contract observation and payoff (via [`PathContract`])
//! 4. Per-path recording and backward sweep (via [`Tape`]) in reverse mode
//! 5. Averaging of path values and path gradients
//!
//! # Path Protocol
//!
//! ```text
//! for each path:
//!     open recording, wrap inputs, build curves and model
//!     reset model and contracts
//!     for day in 0..n_steps:
//!         draw D normals, model.evolve(dt)
//!         contract.evolve(day * dt, state) for each contract
//!     value = Σ payoffs; seed 1; propagate; read gradients
//! price = Σ values / N, gradients = Σ path gradients / N
//! ```
//!
//! Contracts observe at the grid time at the start of the step, after the
//! model has moved to the end of the step.

use num_traits::Float;
use pricer_core::types::PricingError;
use pricer_models::models::StochasticModel;
use pricer_tape::{Active, Recording, Tape};
use tracing::{debug, info};

use super::config::{AdMode, MonteCarloConfig};
use super::error::{ConfigError, SimulationError};
use super::inputs::{build_process, MarketInputs};
use super::result::{PathStatistics, PricingResult, Sensitivities};
use crate::lift;
use crate::path_dependent::{AsianOption, AsianParams, PathContract};
use crate::rng::PricerRng;

/// Monte Carlo pricing driver.
///
/// Owns the simulation configuration, the random number generator and the
/// differentiation tape. Runs are sequential; the generator carries on from
/// where the previous run stopped unless [`reset`](Self::reset) is called.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{AdMode, MarketInputs, MonteCarloConfig, SimulationDriver};
/// use pricer_pricing::path_dependent::AsianParams;
///
/// let inputs = MarketInputs::new(
///     vec![100.0],
///     vec![0.0, 1.0],
///     vec![vec![0.03, 0.03]],
///     vec![vec![0.25, 0.25]],
/// );
/// let config = MonteCarloConfig::builder()
///     .n_paths(1_000)
///     .n_steps(12)
///     .ad_mode(AdMode::NoAd)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let mut driver = SimulationDriver::new(config).unwrap();
/// let result = driver
///     .price(&inputs, &[AsianParams::new(0, 100.0, 0.0, 1.0)])
///     .unwrap();
///
/// assert!(result.sensitivities.is_none());
/// println!("Price: {} +/- {}", result.price, result.std_error);
/// ```
pub struct SimulationDriver {
    config: MonteCarloConfig,
    rng: PricerRng,
    tape: Tape,
}

impl SimulationDriver {
    /// Creates a driver seeded from the configuration (seed 0 if unset).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration is invalid.
    pub fn new(config: MonteCarloConfig) -> Result<Self, ConfigError> {
        let seed = config.seed().unwrap_or(0);
        Self::with_seed(config, seed)
    }

    /// Creates a driver with a specific seed, overriding the config seed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration is invalid.
    pub fn with_seed(config: MonteCarloConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            rng: PricerRng::from_seed(seed),
            tape: Tape::new(),
        })
    }

    /// Returns a reference to the configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Seed the generator was last initialised with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Rewinds the generator to the configured seed.
    pub fn reset(&mut self) {
        self.rng = PricerRng::from_seed(self.config.seed().unwrap_or(0));
    }

    /// Rewinds the generator to a new seed.
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.rng = PricerRng::from_seed(seed);
    }

    /// Prices the sum of `contracts` under the log-normal model of `inputs`.
    ///
    /// In [`AdMode::Reverse`] the result carries the gradient of the price
    /// with respect to every initial value, rate ordinate and volatility
    /// ordinate; in [`AdMode::NoAd`] it carries none.
    ///
    /// # Errors
    ///
    /// - `SimulationError::Pricing` if the inputs or contracts are invalid,
    ///   or a curve cannot be evaluated along the time grid
    /// - `SimulationError::Tape` if the tape is already recording
    ///
    /// Any error aborts the run.
    pub fn price(
        &mut self,
        inputs: &MarketInputs,
        contracts: &[AsianParams],
    ) -> Result<PricingResult, SimulationError> {
        inputs.validate()?;
        for params in contracts {
            params.validate(inputs.dims())?;
        }

        info!(
            n_paths = self.config.n_paths(),
            n_steps = self.config.n_steps(),
            dt = self.config.dt(),
            seed = self.rng.seed(),
            ad_mode = ?self.config.ad_mode(),
            dims = inputs.dims(),
            contracts = contracts.len(),
            "Monte Carlo run started"
        );

        let result = match self.config.ad_mode() {
            AdMode::NoAd => self.price_primal(inputs, contracts)?,
            AdMode::Reverse => self.price_reverse(inputs, contracts)?,
        };

        info!(
            price = result.price,
            std_error = result.std_error,
            "Monte Carlo run complete"
        );
        Ok(result)
    }

    /// Primal-only run with `f64`.
    fn price_primal(
        &mut self,
        inputs: &MarketInputs,
        contracts: &[AsianParams],
    ) -> Result<PricingResult, SimulationError> {
        let dims = inputs.dims();
        let mut model = build_process(
            &inputs.time_points,
            &inputs.initial_values,
            &inputs.rates,
            &inputs.vols,
        )?;
        let mut options: Vec<AsianOption<f64>> =
            contracts.iter().map(AsianOption::from_params).collect();

        let mut stepper = PathStepper::new(&self.config, dims);
        let mut stats = PathStatistics::default();

        for _ in 0..self.config.n_paths() {
            let value = stepper.run(&mut model, &mut options, &mut self.rng)?;
            stats.push(value);
        }

        Ok(PricingResult {
            price: stats.mean(),
            std_error: stats.std_error(),
            n_paths: self.config.n_paths(),
            sensitivities: None,
        })
    }

    /// Recorded run: one recording and one backward sweep per path.
    fn price_reverse(
        &mut self,
        inputs: &MarketInputs,
        contracts: &[AsianParams],
    ) -> Result<PricingResult, SimulationError> {
        let Self { config, rng, tape } = self;
        let tape: &Tape = tape;

        let n_paths = config.n_paths();
        let knots: Vec<Active<'_>> = inputs.time_points.iter().map(|&t| Active::constant(t)).collect();
        let mut options: Vec<AsianOption<Active<'_>>> =
            contracts.iter().map(AsianOption::from_params).collect();

        let mut stepper = PathStepper::new(config, inputs.dims());
        let mut stats = PathStatistics::default();
        let mut gradients = Sensitivities::zeros_like(inputs);

        for path in 0..n_paths {
            let rec = tape.begin_recording()?;
            let wrapped = WrappedInputs::new(&rec, inputs);
            let mut model = build_process(&knots, &wrapped.initial_values, &wrapped.rates, &wrapped.vols)?;

            let value = stepper.run(&mut model, &mut options, rng)?;
            stats.push(value.value());

            rec.seed_gradient(value, 1.0);
            rec.propagate_adjoints();
            wrapped.accumulate_gradients(&rec, &mut gradients);

            if path == 0 {
                debug!(tape_len = rec.len(), "first path recorded");
            }
        }

        gradients.average_over(n_paths);

        Ok(PricingResult {
            price: stats.mean(),
            std_error: stats.std_error(),
            n_paths,
            sensitivities: Some(gradients),
        })
    }
}

/// Per-path stepping shared by primal and recorded runs.
///
/// Holds the draw buffer so that paths do not allocate.
struct PathStepper<T> {
    n_steps: usize,
    dt: f64,
    draws: Vec<f64>,
    normals: Vec<T>,
}

impl<T: Float> PathStepper<T> {
    fn new(config: &MonteCarloConfig, dims: usize) -> Self {
        Self {
            n_steps: config.n_steps(),
            dt: config.dt(),
            draws: vec![0.0; dims],
            normals: Vec::with_capacity(dims),
        }
    }

    /// Simulate one path and return the summed payoff of `contracts`.
    fn run<M, C>(
        &mut self,
        model: &mut M,
        contracts: &mut [C],
        rng: &mut PricerRng,
    ) -> Result<T, PricingError>
    where
        M: StochasticModel<T>,
        C: PathContract<T>,
    {
        model.reset();
        for contract in contracts.iter_mut() {
            contract.reset();
        }

        let dt: T = lift(self.dt);
        for day in 0..self.n_steps {
            rng.fill_normal(&mut self.draws);
            self.normals.clear();
            self.normals.extend(self.draws.iter().map(|&z| lift::<T>(z)));

            model.evolve(dt, &self.normals)?;

            let t: T = lift(day as f64 * self.dt);
            for contract in contracts.iter_mut() {
                contract.evolve(t, model.state())?;
            }
        }

        Ok(contracts
            .iter()
            .fold(T::zero(), |total, contract| total + contract.payoff()))
    }
}

/// Market inputs wrapped as independent variables of one recording.
struct WrappedInputs<'t> {
    initial_values: Vec<Active<'t>>,
    rates: Vec<Vec<Active<'t>>>,
    vols: Vec<Vec<Active<'t>>>,
}

impl<'t> WrappedInputs<'t> {
    fn new(rec: &Recording<'t>, inputs: &MarketInputs) -> Self {
        Self {
            initial_values: rec.wrap_slice(&inputs.initial_values),
            rates: inputs.rates.iter().map(|row| rec.wrap_slice(row)).collect(),
            vols: inputs.vols.iter().map(|row| rec.wrap_slice(row)).collect(),
        }
    }

    /// Add this path's input gradients to `total`.
    fn accumulate_gradients(&self, rec: &Recording<'t>, total: &mut Sensitivities) {
        let add = |sum: &mut [f64], inputs: &[Active<'t>]| {
            for (g, &x) in sum.iter_mut().zip(inputs) {
                *g += rec.read_gradient(x);
            }
        };

        add(&mut total.initial_values, &self.initial_values);
        for (sum, row) in total.rates.iter_mut().zip(&self.rates) {
            add(sum, row);
        }
        for (sum, row) in total.vols.iter_mut().zip(&self.vols) {
            add(sum, row);
        }
    }
}
