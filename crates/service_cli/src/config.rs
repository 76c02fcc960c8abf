//! Scenario configuration management
//!
//! A scenario is loaded from a TOML file with `[simulation]`, `[market]`,
//! `[[contracts]]` and `[logging]` sections, then overridden by `PRICER_*`
//! environment variables and finally by command-line flags. Missing sections
//! fall back to the built-in two-asset scenario.

use std::f64::consts::PI;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use pricer_pricing::mc::{AdMode, MarketInputs, MonteCarloConfig};
use pricer_pricing::{AsianParams, SimulationError};
use serde::Deserialize;

use crate::{CliError, Result};

/// Log levels accepted by `[logging] level` and `--log-level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(CliError::Config(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                s
            ))),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> std::result::Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// `[simulation]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    /// Number of Monte Carlo paths
    pub paths: usize,
    /// Number of time steps per path
    pub steps: usize,
    /// Step length; `1 / steps` when absent. The clock adds it once per
    /// step and must stay on the curve knots, so step counts whose
    /// accumulated `1 / steps` overshoots 1.0 (52, 100) need an explicit,
    /// slightly shorter `dt`
    pub dt: Option<f64>,
    /// Seed of the normal generator
    pub seed: u64,
    /// Whether to record gradients
    pub gradients: bool,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            paths: 10_000,
            steps: 252,
            dt: None,
            seed: 17,
            gradients: true,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter level used when `RUST_LOG` is unset
    #[serde(deserialize_with = "deserialize_log_level")]
    pub level: LogLevel,
}

/// Complete pricing scenario
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PricerConfig {
    /// Grid, path count, seed and gradient switch
    pub simulation: SimulationSection,
    /// Initial values and curve ordinates on a shared knot grid
    pub market: MarketInputs,
    /// Asian calls whose payoffs are summed per path
    pub contracts: Vec<AsianParams>,
    pub logging: LoggingSection,
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationSection::default(),
            market: demo_market(),
            contracts: demo_contracts(),
            logging: LoggingSection::default(),
        }
    }
}

/// Two assets at 100 on weekly knots over one year, with seasonal rates and
/// volatilities.
pub fn demo_market() -> MarketInputs {
    let knots: Vec<f64> = (0..=52).map(|week| week as f64 / 52.0).collect();
    let seasonal = |t: f64| (2.0 * PI * t).sin();
    let hump = |t: f64| 1.0 - (2.0 * PI * t).cos();

    let rates = vec![
        knots.iter().map(|&t| 0.01 + 0.005 * seasonal(t)).collect(),
        knots.iter().map(|&t| 0.02 + 0.005 * seasonal(t)).collect(),
    ];
    let vols = vec![
        knots.iter().map(|&t| 0.15 + 0.10 * hump(t)).collect(),
        knots.iter().map(|&t| 0.20 + 0.10 * hump(t)).collect(),
    ];

    MarketInputs::new(vec![100.0, 100.0], knots, rates, vols)
}

/// Full-year Asian call on the first asset and a mid-year window on the
/// second, both struck at 100.
pub fn demo_contracts() -> Vec<AsianParams> {
    vec![
        AsianParams::new(0, 100.0, 0.0, 1.0),
        AsianParams::new(1, 100.0, 0.25, 0.75),
    ]
}

impl PricerConfig {
    /// Load a scenario from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a scenario from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CliError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply `PRICER_PATHS`, `PRICER_STEPS`, `PRICER_SEED` and
    /// `PRICER_LOG_LEVEL` from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(paths) = lookup("PRICER_PATHS") {
            self.simulation.paths = parse_env("PRICER_PATHS", &paths)?;
        }
        if let Some(steps) = lookup("PRICER_STEPS") {
            self.simulation.steps = parse_env("PRICER_STEPS", &steps)?;
        }
        if let Some(seed) = lookup("PRICER_SEED") {
            self.simulation.seed = parse_env("PRICER_SEED", &seed)?;
        }
        if let Some(level) = lookup("PRICER_LOG_LEVEL") {
            self.logging.level = LogLevel::from_str(&level)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<()> {
        if let Some(paths) = cli.paths {
            self.simulation.paths = paths;
        }
        if let Some(seed) = cli.seed {
            self.simulation.seed = seed;
        }
        if cli.no_gradients {
            self.simulation.gradients = false;
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = LogLevel::from_str(level)?;
        }
        Ok(())
    }

    /// Driver configuration of the `[simulation]` section
    pub fn monte_carlo_config(&self) -> Result<MonteCarloConfig> {
        let sim = &self.simulation;
        let ad_mode = if sim.gradients {
            AdMode::Reverse
        } else {
            AdMode::NoAd
        };

        let mut builder = MonteCarloConfig::builder()
            .n_paths(sim.paths)
            .n_steps(sim.steps)
            .ad_mode(ad_mode)
            .seed(sim.seed);
        if let Some(dt) = sim.dt {
            builder = builder.dt(dt);
        }
        builder
            .build()
            .map_err(|e| CliError::Simulation(SimulationError::from(e)))
    }

    /// Validate the simulation settings, market curves and contracts
    ///
    /// Also rejects grids whose clock leaves the knot range, which the
    /// driver would otherwise only report on the first path
    pub fn validate(&self) -> Result<()> {
        let mc = self.monte_carlo_config()?;
        self.market
            .validate()
            .map_err(|e| CliError::Simulation(e.into()))?;
        if let (Some(&first), Some(&last)) =
            (self.market.time_points.first(), self.market.time_points.last())
        {
            let end = mc.final_time();
            if mc.dt() < first || end > last {
                return Err(CliError::Config(format!(
                    "Simulation clock runs from {} to {}, outside the curve knots [{}, {}]; adjust steps or dt",
                    mc.dt(),
                    end,
                    first,
                    last
                )));
            }
        }
        for contract in &self.contracts {
            contract
                .validate(self.market.dims())
                .map_err(|e| CliError::Simulation(e.into()))?;
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("{} has an invalid value: {}", name, value)))
}

/// Overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Scenario file path
    pub config_file: Option<PathBuf>,
    /// Path count override
    pub paths: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
    /// Disable gradient recording
    pub no_gradients: bool,
    /// Log level override
    pub log_level: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Scenario file
/// 4. Built-in scenario
pub fn build_config(cli: &CliArgs) -> Result<PricerConfig> {
    let mut config = match &cli.config_file {
        Some(path) => PricerConfig::from_file(path)?,
        None => PricerConfig::default(),
    };

    config.apply_env(|name| std::env::var(name).ok())?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = PricerConfig::default();
        assert_eq!(config.simulation.paths, 10_000);
        assert_eq!(config.simulation.steps, 252);
        assert_eq!(config.simulation.seed, 17);
        assert!(config.simulation.gradients);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.market.dims(), 2);
        assert_eq!(config.market.n_knots(), 53);
        assert_eq!(config.contracts.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_demo_market_curves() {
        let market = demo_market();
        assert_eq!(market.time_points[52], 1.0);
        assert!((market.rates[0][0] - 0.01).abs() < 1e-15);
        assert!((market.rates[1][13] - 0.025).abs() < 1e-12);
        assert!((market.vols[0][0] - 0.15).abs() < 1e-15);
        assert!((market.vols[1][26] - 0.40).abs() < 1e-12);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Warn").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("verbose").is_err());
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            [simulation]
            paths = 500
            steps = 12
            seed = 3
            gradients = false

            [market]
            initial_values = [50.0]
            time_points = [0.0, 0.5, 1.0]
            rates = [[0.01, 0.02, 0.03]]
            vols = [[0.2, 0.25, 0.3]]

            [[contracts]]
            asset_id = 0
            strike = 55.0
            start_time = 0.5
            end_time = 1.0

            [logging]
            level = "debug"
        "#;

        let config = PricerConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.simulation.paths, 500);
        assert_eq!(config.simulation.steps, 12);
        assert_eq!(config.simulation.dt, None);
        assert!(!config.simulation.gradients);
        assert_eq!(config.market.initial_values, vec![50.0]);
        assert_eq!(config.contracts, vec![AsianParams::new(0, 55.0, 0.5, 1.0)]);
        assert_eq!(config.logging.level, LogLevel::Debug);

        let mc = config.monte_carlo_config().unwrap();
        assert_eq!(mc.ad_mode(), AdMode::NoAd);
        assert_eq!(mc.seed(), Some(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_builtin_scenario() {
        let config = PricerConfig::from_toml("[simulation]\npaths = 1000\n").unwrap();
        assert_eq!(config.simulation.paths, 1000);
        assert_eq!(config.simulation.steps, 252);
        assert_eq!(config.market, demo_market());
        assert_eq!(config.contracts, demo_contracts());
    }

    #[test]
    fn test_incomplete_market_rejected() {
        let err = PricerConfig::from_toml("[market]\ninitial_values = [1.0]\n").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_apply_env() {
        let env: HashMap<&str, &str> = [("PRICER_PATHS", "250"), ("PRICER_LOG_LEVEL", "warn")]
            .into_iter()
            .collect();
        let mut config = PricerConfig::default();
        config
            .apply_env(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.simulation.paths, 250);
        assert_eq!(config.simulation.seed, 17);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_apply_env_rejects_garbage() {
        let mut config = PricerConfig::default();
        let err = config
            .apply_env(|name| (name == "PRICER_SEED").then(|| "seventeen".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("PRICER_SEED"));
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = PricerConfig::default();
        let cli = CliArgs {
            paths: Some(42),
            seed: Some(7),
            no_gradients: true,
            log_level: Some("trace".to_string()),
            config_file: None,
        };
        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.simulation.paths, 42);
        assert_eq!(config.simulation.seed, 7);
        assert!(!config.simulation.gradients);
        assert_eq!(config.logging.level, LogLevel::Trace);
    }

    #[test]
    fn test_validate_rejects_bad_contract() {
        let mut config = PricerConfig::default();
        config.contracts.push(AsianParams::new(5, 100.0, 0.0, 1.0));
        assert!(matches!(config.validate(), Err(CliError::Simulation(_))));
    }

    #[test]
    fn test_validate_rejects_zero_paths() {
        let mut config = PricerConfig::default();
        config.simulation.paths = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid path count"));
    }

    #[test]
    fn test_validate_rejects_clock_past_last_knot() {
        let mut config = PricerConfig::default();
        config.simulation.steps = 52;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("1.0000000000000009"));

        config.simulation.dt = Some(1.0 / 52.5);
        assert!(config.validate().is_ok());

        config.simulation.steps = 12;
        config.simulation.dt = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_first_step_before_first_knot() {
        let mut config = PricerConfig::default();
        config.market.time_points[0] = 0.5 / 52.0;
        config.simulation.steps = 365;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = PricerConfig::from_file(&PathBuf::from("/nonexistent/pricer.toml")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
