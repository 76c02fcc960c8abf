//! Market inputs of a pricing run and references to individual inputs.

use std::fmt;
use std::sync::Arc;

use num_traits::Float;
use pricer_core::market_data::curves::LinearInterpolation;
use pricer_core::types::PricingError;
use pricer_models::models::LogNormalProcess;

/// Plain scalar inputs of the log-normal model.
///
/// All curves share the knot grid `time_points`; `rates[i]` and `vols[i]`
/// hold the ordinates of asset `i`. Every scalar except the knot times is a
/// differentiation input of a reverse-mode run.
///
/// # Example
///
/// ```
/// use pricer_pricing::mc::MarketInputs;
///
/// let inputs = MarketInputs::new(
///     vec![100.0, 50.0],
///     vec![0.0, 1.0],
///     vec![vec![0.01, 0.02], vec![0.03, 0.03]],
///     vec![vec![0.2, 0.25], vec![0.3, 0.3]],
/// );
/// assert_eq!(inputs.dims(), 2);
/// assert_eq!(inputs.n_knots(), 2);
/// assert!(inputs.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketInputs {
    /// Initial value of each asset.
    pub initial_values: Vec<f64>,
    /// Knot times shared by every curve.
    pub time_points: Vec<f64>,
    /// Rate ordinates, one row per asset.
    pub rates: Vec<Vec<f64>>,
    /// Volatility ordinates, one row per asset.
    pub vols: Vec<Vec<f64>>,
}

impl MarketInputs {
    /// Creates market inputs without validating them.
    pub fn new(
        initial_values: Vec<f64>,
        time_points: Vec<f64>,
        rates: Vec<Vec<f64>>,
        vols: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            initial_values,
            time_points,
            rates,
            vols,
        }
    }

    /// Number of assets.
    #[inline]
    pub fn dims(&self) -> usize {
        self.initial_values.len()
    }

    /// Number of curve knots.
    #[inline]
    pub fn n_knots(&self) -> usize {
        self.time_points.len()
    }

    /// Check that the inputs describe a valid model.
    ///
    /// # Errors
    ///
    /// - `PricingError::InvalidConfiguration` if the number of rate or
    ///   volatility rows differs from the number of assets
    /// - `PricingError::Curve` if a row does not match the knot grid or the
    ///   knots are not strictly increasing
    pub fn validate(&self) -> Result<(), PricingError> {
        build_process(&self.time_points, &self.initial_values, &self.rates, &self.vols).map(|_| ())
    }

    /// Value of a single input, or `None` if the reference is out of range.
    pub fn get(&self, input: InputRef) -> Option<f64> {
        match input {
            InputRef::InitialValue { asset } => self.initial_values.get(asset).copied(),
            InputRef::Rate { asset, knot } => self.rates.get(asset)?.get(knot).copied(),
            InputRef::Vol { asset, knot } => self.vols.get(asset)?.get(knot).copied(),
        }
    }

    /// Copy of the inputs with `input` shifted by `shift`.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfiguration` if the reference is out
    /// of range.
    pub fn bumped(&self, input: InputRef, shift: f64) -> Result<Self, PricingError> {
        let mut out = self.clone();
        let slot = match input {
            InputRef::InitialValue { asset } => out.initial_values.get_mut(asset),
            InputRef::Rate { asset, knot } => out.rates.get_mut(asset).and_then(|r| r.get_mut(knot)),
            InputRef::Vol { asset, knot } => out.vols.get_mut(asset).and_then(|v| v.get_mut(knot)),
        };
        let value = slot.ok_or_else(|| {
            PricingError::InvalidConfiguration(format!("no market input {}", input))
        })?;
        *value += shift;
        Ok(out)
    }

    /// Every differentiable input in canonical order: initial values, then
    /// rate ordinates asset by asset, then volatility ordinates.
    pub fn input_refs(&self) -> Vec<InputRef> {
        let initial = (0..self.dims()).map(|asset| InputRef::InitialValue { asset });
        let rates = self.rates.iter().enumerate().flat_map(|(asset, row)| {
            (0..row.len()).map(move |knot| InputRef::Rate { asset, knot })
        });
        let vols = self.vols.iter().enumerate().flat_map(|(asset, row)| {
            (0..row.len()).map(move |knot| InputRef::Vol { asset, knot })
        });
        initial.chain(rates).chain(vols).collect()
    }
}

/// Reference to one differentiable market input.
///
/// Displays as `S{asset}`, `r{asset}[{knot}]` or `vol{asset}[{knot}]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputRef {
    /// Initial value of an asset.
    InitialValue {
        /// Asset index.
        asset: usize,
    },
    /// Rate ordinate of an asset's curve.
    Rate {
        /// Asset index.
        asset: usize,
        /// Knot index.
        knot: usize,
    },
    /// Volatility ordinate of an asset's curve.
    Vol {
        /// Asset index.
        asset: usize,
        /// Knot index.
        knot: usize,
    },
}

impl fmt::Display for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitialValue { asset } => write!(f, "S{}", asset),
            Self::Rate { asset, knot } => write!(f, "r{}[{}]", asset, knot),
            Self::Vol { asset, knot } => write!(f, "vol{}[{}]", asset, knot),
        }
    }
}

/// Build a log-normal process with one linear rate curve and one linear
/// volatility curve per asset over the shared knot grid.
pub(crate) fn build_process<T: Float>(
    time_points: &[T],
    initial_values: &[T],
    rates: &[Vec<T>],
    vols: &[Vec<T>],
) -> Result<LogNormalProcess<T>, PricingError> {
    let dims = initial_values.len();
    if rates.len() != dims || vols.len() != dims {
        return Err(PricingError::InvalidConfiguration(format!(
            "{} assets need {} rate and volatility rows, got {} and {}",
            dims,
            dims,
            rates.len(),
            vols.len()
        )));
    }

    let curve = |ys: &Vec<T>| LinearInterpolation::new(time_points, ys).map(Arc::new);
    let rate_curves = rates.iter().map(&curve).collect::<Result<Vec<_>, _>>()?;
    let vol_curves = vols.iter().map(&curve).collect::<Result<Vec<_>, _>>()?;

    LogNormalProcess::new(rate_curves, vol_curves, initial_values.to_vec())
}
