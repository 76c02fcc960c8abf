//! Price command implementation
//!
//! Prices the configured Asian options and prints the price, its standard
//! error and, when gradients are recorded, the derivative with respect to
//! every market input.

use clap::ValueEnum;
use pricer_pricing::mc::{PricingResult, SimulationDriver};
use pricer_pricing::SimulationError;
use serde::Serialize;
use tracing::info;

use crate::config::PricerConfig;
use crate::{CliError, Result};

/// Output format of the price command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per figure
    #[default]
    Text,
    /// Pretty-printed JSON document
    Json,
}

/// JSON document written by `--format json`
#[derive(Debug, Serialize)]
struct PriceReport {
    price: f64,
    std_error: f64,
    n_paths: usize,
    seed: u64,
    gradients: Vec<GradientEntry>,
}

#[derive(Debug, Serialize)]
struct GradientEntry {
    input: String,
    value: f64,
}

/// Run the price command
pub fn run(config: &PricerConfig, format: OutputFormat) -> Result<()> {
    let result = price(config)?;
    let rendered = match format {
        OutputFormat::Text => render_text(&result),
        OutputFormat::Json => render_json(&result, config.simulation.seed)?,
    };
    println!("{}", rendered);
    Ok(())
}

/// Price the scenario
pub fn price(config: &PricerConfig) -> Result<PricingResult> {
    let mc_config = config.monte_carlo_config()?;
    info!(
        paths = mc_config.n_paths(),
        steps = mc_config.n_steps(),
        contracts = config.contracts.len(),
        "Pricing scenario"
    );

    let mut driver = SimulationDriver::new(mc_config).map_err(SimulationError::from)?;
    Ok(driver.price(&config.market, &config.contracts)?)
}

/// Price, standard error and one line per gradient
pub fn render_text(result: &PricingResult) -> String {
    let mut out = format!(
        "Asian option price: {} (std error {:.6}, {} paths)",
        result.price, result.std_error, result.n_paths
    );
    if let Some(sens) = &result.sensitivities {
        for (input, value) in sens.iter() {
            out.push_str(&format!(
                "\nGradient of price with respect to {}: {}",
                input, value
            ));
        }
    }
    out
}

/// JSON rendering with gradients keyed by input label
pub fn render_json(result: &PricingResult, seed: u64) -> Result<String> {
    let gradients = result
        .sensitivities
        .iter()
        .flat_map(|sens| sens.iter())
        .map(|(input, value)| GradientEntry {
            input: input.to_string(),
            value,
        })
        .collect();

    let report = PriceReport {
        price: result.price,
        std_error: result.std_error,
        n_paths: result.n_paths,
        seed,
        gradients,
    };
    serde_json::to_string_pretty(&report).map_err(|e| CliError::Io(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_pricing::mc::Sensitivities;

    fn sample_result() -> PricingResult {
        PricingResult {
            price: 12.5,
            std_error: 0.125,
            n_paths: 100,
            sensitivities: Some(Sensitivities {
                initial_values: vec![0.5],
                rates: vec![vec![1.0, 2.0]],
                vols: vec![vec![3.0, 4.0]],
            }),
        }
    }

    #[test]
    fn test_render_text_lists_every_gradient() {
        let text = render_text(&sample_result());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 5);
        assert!(lines[0].starts_with("Asian option price: 12.5"));
        assert_eq!(lines[1], "Gradient of price with respect to S0: 0.5");
        assert_eq!(lines[3], "Gradient of price with respect to r0[1]: 2");
        assert_eq!(lines[5], "Gradient of price with respect to vol0[1]: 4");
    }

    #[test]
    fn test_render_text_without_gradients() {
        let result = PricingResult {
            sensitivities: None,
            ..sample_result()
        };
        assert_eq!(render_text(&result).lines().count(), 1);
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&sample_result(), 17).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["price"], 12.5);
        assert_eq!(value["seed"], 17);
        assert_eq!(value["gradients"].as_array().unwrap().len(), 5);
        assert_eq!(value["gradients"][2]["input"], "r0[0]");
        assert_eq!(value["gradients"][2]["value"], 1.0);
    }
}
