use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::Indicator;

/// Simple Moving Average.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        "sma"
    }

    fn required_points(&self) -> usize {
        self.period
    }

    /// The first `period - 1` slots are `None`; each later slot holds the
    /// arithmetic mean of the trailing `period` prices.
    fn calculate(&self, prices: &[f64]) -> Result<Vec<Option<f64>>, Report<IndicatorError>> {
        if prices.len() < self.period {
            bail!(IndicatorError::InsufficientData {
                required: self.period,
                available: prices.len(),
            });
        }

        let mut values: Vec<Option<f64>> = vec![None; self.period - 1];
        values.extend(
            prices
                .windows(self.period)
                .map(|w| Some(w.iter().sum::<f64>() / self.period as f64)),
        );
        Ok(values)
    }
}

/// Exponential Moving Average.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }

    /// Calculate raw EMA values from a price slice (internal helper).
    ///
    /// Seeds with the first price, so the output has one value per input and
    /// no warm-up gap. Early values lean heavily on the seed.
    pub fn calculate_prices(&self, prices: &[f64]) -> Result<Vec<f64>, Report<IndicatorError>> {
        if prices.is_empty() {
            bail!(IndicatorError::InsufficientData {
                required: 1,
                available: 0,
            });
        }
        if let Some(index) = prices.iter().position(|p| !p.is_finite()) {
            bail!(IndicatorError::NonFiniteInput { index });
        }

        let k = 2.0 / (self.period as f64 + 1.0);
        let mut ema = prices[0];
        let mut results = vec![ema];

        for &price in &prices[1..] {
            ema = price * k + ema * (1.0 - k);
            results.push(ema);
        }

        Ok(results)
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        "ema"
    }

    fn required_points(&self) -> usize {
        1
    }

    fn calculate(&self, prices: &[f64]) -> Result<Vec<Option<f64>>, Report<IndicatorError>> {
        Ok(self.calculate_prices(prices)?.into_iter().map(Some).collect())
    }
}
