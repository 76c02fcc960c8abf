//! Pricing results and averaged sensitivities.

use super::inputs::{InputRef, MarketInputs};

/// Gradient of the price with respect to every market input.
///
/// Index-aligned with [`MarketInputs`]: `rates[i][k]` is the derivative with
/// respect to `MarketInputs::rates[i][k]`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sensitivities {
    /// Derivatives with respect to the initial values.
    pub initial_values: Vec<f64>,
    /// Derivatives with respect to the rate ordinates.
    pub rates: Vec<Vec<f64>>,
    /// Derivatives with respect to the volatility ordinates.
    pub vols: Vec<Vec<f64>>,
}

impl Sensitivities {
    /// All-zero sensitivities shaped like `inputs`.
    pub fn zeros_like(inputs: &MarketInputs) -> Self {
        Self {
            initial_values: vec![0.0; inputs.initial_values.len()],
            rates: inputs.rates.iter().map(|row| vec![0.0; row.len()]).collect(),
            vols: inputs.vols.iter().map(|row| vec![0.0; row.len()]).collect(),
        }
    }

    /// Derivative with respect to one input, or `None` if out of range.
    pub fn get(&self, input: InputRef) -> Option<f64> {
        match input {
            InputRef::InitialValue { asset } => self.initial_values.get(asset).copied(),
            InputRef::Rate { asset, knot } => self.rates.get(asset)?.get(knot).copied(),
            InputRef::Vol { asset, knot } => self.vols.get(asset)?.get(knot).copied(),
        }
    }

    /// Every derivative with its input reference, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (InputRef, f64)> + '_ {
        let initial = self
            .initial_values
            .iter()
            .enumerate()
            .map(|(asset, &g)| (InputRef::InitialValue { asset }, g));
        let rates = self.rates.iter().enumerate().flat_map(|(asset, row)| {
            row.iter()
                .enumerate()
                .map(move |(knot, &g)| (InputRef::Rate { asset, knot }, g))
        });
        let vols = self.vols.iter().enumerate().flat_map(|(asset, row)| {
            row.iter()
                .enumerate()
                .map(move |(knot, &g)| (InputRef::Vol { asset, knot }, g))
        });
        initial.chain(rates).chain(vols)
    }

    /// Turn per-path sums into means by dividing by `n_paths`.
    pub(crate) fn average_over(&mut self, n_paths: usize) {
        let n = n_paths as f64;
        let rows = self.rates.iter_mut().chain(self.vols.iter_mut());
        for g in self.initial_values.iter_mut().chain(rows.flatten()) {
            *g /= n;
        }
    }
}

/// Monte Carlo estimate with optional sensitivities.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::PricingResult;
///
/// let result = PricingResult {
///     price: 10.45,
///     std_error: 0.05,
///     n_paths: 10_000,
///     sensitivities: None,
/// };
///
/// println!("Price: {} +/- {}", result.price, result.confidence_95());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingResult {
    /// Average of the path values.
    pub price: f64,
    /// Standard error of the price estimate.
    pub std_error: f64,
    /// Number of simulated paths.
    pub n_paths: usize,
    /// Averaged path gradients; `None` when differentiation is off.
    pub sensitivities: Option<Sensitivities>,
}

impl PricingResult {
    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }

    /// Returns the 99% confidence interval half-width.
    #[inline]
    pub fn confidence_99(&self) -> f64 {
        2.576 * self.std_error
    }
}

/// Running sum of path values, with Welford accumulators for the variance.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PathStatistics {
    count: usize,
    sum: f64,
    mean: f64,
    m2: f64,
}

impl PathStatistics {
    #[inline]
    pub(crate) fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Sum of path values divided by the path count.
    pub(crate) fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Sample standard deviation over sqrt(n); zero below two paths.
    pub(crate) fn std_error(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let n = self.count as f64;
        let variance = self.m2 / (n - 1.0);
        (variance / n).sqrt()
    }
}
