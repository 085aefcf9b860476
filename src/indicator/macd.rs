use error_stack::{Report, bail};
use serde::Serialize;

use crate::error::IndicatorError;
use crate::indicator::ma::Ema;

/// Standard MACD periods used by the dashboard.
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Latest values of the MACD, signal, and histogram lines.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Moving Average Convergence Divergence.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    pub fn new(
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> Result<Self, Report<IndicatorError>> {
        if fast_period == 0 || slow_period == 0 || signal_period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "all periods must be > 0".into(),
            });
        }
        if fast_period >= slow_period {
            bail!(IndicatorError::InvalidParameter {
                name: "fast_period must be < slow_period".into(),
            });
        }
        Ok(Self {
            fast_period,
            slow_period,
            signal_period,
        })
    }

    /// Latest (macd, signal, histogram) triple over `prices`.
    ///
    /// The EMAs seed at the first price, so every line spans the full input
    /// and the three series stay aligned index for index.
    pub fn latest(&self, prices: &[f64]) -> Result<MacdOutput, Report<IndicatorError>> {
        if prices.len() < self.slow_period {
            bail!(IndicatorError::InsufficientData {
                required: self.slow_period,
                available: prices.len(),
            });
        }

        let fast_ema = Ema::new(self.fast_period)?.calculate_prices(prices)?;
        let slow_ema = Ema::new(self.slow_period)?.calculate_prices(prices)?;

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = Ema::new(self.signal_period)?.calculate_prices(&macd_line)?;

        let histogram: Vec<f64> = macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(m, s)| m - s)
            .collect();

        Ok(MacdOutput {
            macd: macd_line.last().copied().unwrap_or(0.0),
            signal: signal_line.last().copied().unwrap_or(0.0),
            histogram: histogram.last().copied().unwrap_or(0.0),
        })
    }
}
