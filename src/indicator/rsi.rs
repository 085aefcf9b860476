use error_stack::{Report, bail};

use crate::error::IndicatorError;

/// Period used for the dashboard's RSI panel.
pub const RSI_PERIOD: usize = 14;

/// RSI (Relative Strength Index) over a fixed window.
///
/// Averages the gains and losses of the first `period` price changes only.
/// This is deliberately simpler than Wilder's smoothed variant: later price
/// changes never move the value, so the reading describes the start of the
/// window rather than its end.
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }

    /// RSI scalar for `prices`. Needs at least `period + 1` prices to form
    /// `period` changes.
    pub fn latest(&self, prices: &[f64]) -> Result<f64, Report<IndicatorError>> {
        let required = self.period + 1;
        if prices.len() < required {
            bail!(IndicatorError::InsufficientData {
                required,
                available: prices.len(),
            });
        }

        let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

        let avg_gain: f64 = deltas[..self.period]
            .iter()
            .map(|&d| d.max(0.0))
            .sum::<f64>()
            / self.period as f64;
        let avg_loss: f64 = deltas[..self.period]
            .iter()
            .map(|&d| (-d).max(0.0))
            .sum::<f64>()
            / self.period as f64;

        Ok(rsi_value(avg_gain, avg_loss))
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_period_zero_invalid() {
        assert!(Rsi::new(0).is_err());
    }

    #[test]
    fn rsi_insufficient_data() {
        let rsi = Rsi::new(14).unwrap();
        // period + 1 prices are required; 14 is one short
        assert!(rsi.latest(&[1.0; 14]).is_err());
        assert!(rsi.latest(&[1.0; 15]).is_ok());
    }

    #[test]
    fn rsi_all_gains_returns_100() {
        let rsi = Rsi::new(3).unwrap();
        let value = rsi.latest(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(value, 100.0);
    }

    #[test]
    fn rsi_flat_prices_return_100() {
        // No losses at all, so the zero-loss guard kicks in
        let rsi = Rsi::new(3).unwrap();
        let value = rsi.latest(&[10.0, 10.0, 10.0, 10.0]).unwrap();
        assert_eq!(value, 100.0);
    }

    #[test]
    fn rsi_all_losses_returns_0() {
        let rsi = Rsi::new(3).unwrap();
        let value = rsi.latest(&[4.0, 3.0, 2.0, 1.0]).unwrap();
        assert!(value.abs() < 1e-9);
    }

    #[test]
    fn rsi_known_value() {
        // deltas +1, -1, +2: avg_gain = 1, avg_loss = 1/3 -> rs = 3 -> 75
        let rsi = Rsi::new(3).unwrap();
        let value = rsi.latest(&[10.0, 11.0, 10.0, 12.0]).unwrap();
        assert!((value - 75.0).abs() < 1e-9);
    }

    #[test]
    fn rsi_ignores_changes_after_first_period() {
        let rsi = Rsi::new(3).unwrap();
        let base = rsi.latest(&[10.0, 11.0, 10.0, 12.0]).unwrap();
        let extended = rsi.latest(&[10.0, 11.0, 10.0, 12.0, 999.0, 1.0]).unwrap();
        assert_eq!(base, extended);
    }

    #[test]
    fn rsi_bounded() {
        let rsi = Rsi::new(14).unwrap();
        let prices: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i * 7) % 13) as f64 - 6.0)
            .collect();
        let value = rsi.latest(&prices).unwrap();
        assert!((0.0..=100.0).contains(&value));
    }
}
