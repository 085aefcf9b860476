use error_stack::{Report, bail};
use serde::Serialize;

use crate::error::ForecastError;
use crate::indicator::overlay_indicator;
use crate::indicator::rsi::{RSI_PERIOD, Rsi};
use crate::model::{Confidence, Overlay, TrendLabel};

/// Minimum points the forecaster accepts from the active window.
const MIN_POINTS: usize = 10;
/// Steps ahead for the week projection.
const WEEK_HORIZON: usize = 7;
/// Raw per-step slope beyond which the fit counts as directional. Not
/// normalized by price level, so cheap stocks trend "Neutral" more easily.
const TREND_SLOPE_THRESHOLD: f64 = 0.1;

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_WEIGHT: f64 = 2.0;
const CROSSOVER_WEIGHT: f64 = 1.0;
const MOMENTUM_WEIGHT: f64 = 10.0;
const HIGH_CONFIDENCE_SCORE: f64 = 3.0;
const LOW_CONFIDENCE_SCORE: f64 = 1.0;

/// Fitted ordinary-least-squares line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionModel {
    pub slope: f64,
    pub intercept: f64,
}

impl RegressionModel {
    /// Projected value at step `x`.
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Regression price projection derived from the active window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Forecast {
    pub next_day: f64,
    pub next_week: f64,
    pub trend: TrendLabel,
}

/// Advisory signal blending RSI extremes, moving-average crossover, and
/// last-step momentum. Coarser than the regression forecast and shown
/// alongside it; neither overrides the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendSignal {
    pub score: f64,
    pub direction: TrendLabel,
    pub confidence: Confidence,
}

/// Closed-form OLS fit of `y` against `x`.
pub fn fit_linear(x: &[f64], y: &[f64]) -> Result<RegressionModel, Report<ForecastError>> {
    if x.len() != y.len() {
        bail!(ForecastError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.is_empty() {
        bail!(ForecastError::EmptyInput);
    }

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(xi, yi)| xi * yi).sum();
    let sum_xx: f64 = x.iter().map(|xi| xi * xi).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        // Degenerate x spread (a single point): flat zero model rather than an error
        return Ok(RegressionModel {
            slope: 0.0,
            intercept: 0.0,
        });
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Ok(RegressionModel { slope, intercept })
}

/// Fit a line through the window's closes (x = 0..n) and project the next day
/// and the next week. Projections are floored at zero.
pub fn predict(prices: &[f64]) -> Result<Forecast, Report<ForecastError>> {
    if prices.len() < MIN_POINTS {
        bail!(ForecastError::InsufficientData {
            required: MIN_POINTS,
            available: prices.len(),
        });
    }

    let x: Vec<f64> = (0..prices.len()).map(|i| i as f64).collect();
    let model = fit_linear(&x, prices)?;

    let n = prices.len() as f64;
    Ok(Forecast {
        next_day: model.at(n).max(0.0),
        next_week: model.at(n + WEEK_HORIZON as f64).max(0.0),
        trend: label_for_slope(model.slope),
    })
}

fn label_for_slope(slope: f64) -> TrendLabel {
    if slope > TREND_SLOPE_THRESHOLD {
        TrendLabel::Bullish
    } else if slope < -TREND_SLOPE_THRESHOLD {
        TrendLabel::Bearish
    } else {
        TrendLabel::Neutral
    }
}

/// Score the window's trend. Total over any input: components whose inputs
/// are too short contribute zero, so a thin window degrades toward a neutral,
/// low-confidence signal instead of failing.
pub fn trend_strength(prices: &[f64]) -> TrendSignal {
    let score = rsi_component(prices) + crossover_component(prices) + momentum_component(prices);

    let direction = if score > 0.0 {
        TrendLabel::Bullish
    } else if score < 0.0 {
        TrendLabel::Bearish
    } else {
        TrendLabel::Neutral
    };
    let confidence = if score.abs() > HIGH_CONFIDENCE_SCORE {
        Confidence::High
    } else if score.abs() < LOW_CONFIDENCE_SCORE {
        Confidence::Low
    } else {
        Confidence::Medium
    };

    TrendSignal {
        score,
        direction,
        confidence,
    }
}

/// Overbought readings push the score down, oversold readings push it up.
fn rsi_component(prices: &[f64]) -> f64 {
    let rsi = match Rsi::new(RSI_PERIOD).and_then(|r| r.latest(prices)) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = ?e, "rsi unavailable for trend score");
            return 0.0;
        }
    };
    if rsi > RSI_OVERBOUGHT {
        -RSI_WEIGHT
    } else if rsi < RSI_OVERSOLD {
        RSI_WEIGHT
    } else {
        0.0
    }
}

/// Short average above the long average reads bullish, otherwise bearish.
fn crossover_component(prices: &[f64]) -> f64 {
    let short = latest_overlay_value(Overlay::Sma20, prices);
    let long = latest_overlay_value(Overlay::Sma50, prices);
    match (short, long) {
        (Some(s), Some(l)) if s > l => CROSSOVER_WEIGHT,
        (Some(_), Some(_)) => -CROSSOVER_WEIGHT,
        _ => 0.0,
    }
}

/// Percentage change of the last step, scaled up.
fn momentum_component(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }
    let last = prices[prices.len() - 1];
    let previous = prices[prices.len() - 2];
    if previous == 0.0 {
        return 0.0;
    }
    (last - previous) / previous * MOMENTUM_WEIGHT
}

fn latest_overlay_value(overlay: Overlay, prices: &[f64]) -> Option<f64> {
    match overlay_indicator(overlay).and_then(|i| i.calculate(prices)) {
        Ok(series) => series.last().copied().flatten(),
        Err(e) => {
            tracing::debug!(error = ?e, overlay = %overlay, "overlay unavailable for trend score");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_linear_recovers_known_line() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|xi| 2.0 * xi + 3.0).collect();
        let model = fit_linear(&x, &y).unwrap();
        assert!((model.slope - 2.0).abs() < 1e-9);
        assert!((model.intercept - 3.0).abs() < 1e-9);
    }

    #[test]
    fn fit_linear_length_mismatch() {
        assert!(fit_linear(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn fit_linear_empty_input() {
        assert!(fit_linear(&[], &[]).is_err());
    }

    #[test]
    fn fit_linear_single_point_is_degenerate() {
        let model = fit_linear(&[5.0], &[10.0]).unwrap();
        assert_eq!(model.slope, 0.0);
        assert_eq!(model.intercept, 0.0);
    }

    #[test]
    fn fit_linear_flat_series() {
        let x: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let model = fit_linear(&x, &[42.0; 8]).unwrap();
        assert!(model.slope.abs() < 1e-9);
        assert!((model.intercept - 42.0).abs() < 1e-9);
    }

    #[test]
    fn predict_requires_ten_points() {
        assert!(predict(&[100.0; 9]).is_err());
        assert!(predict(&[100.0; 10]).is_ok());
    }

    #[test]
    fn predict_extends_a_strict_uptrend() {
        // closes 100, 101, ..., 129: slope 1, intercept 100
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let forecast = predict(&prices).unwrap();
        assert!((forecast.next_day - 130.0).abs() < 1e-6);
        assert!((forecast.next_week - 137.0).abs() < 1e-6);
        assert_eq!(forecast.trend, TrendLabel::Bullish);
    }

    #[test]
    fn predict_floors_projections_at_zero() {
        // 30, 28, ..., 8: next day lands at 6, next week would go negative
        let prices: Vec<f64> = (0..12).map(|i| 30.0 - 2.0 * i as f64).collect();
        let forecast = predict(&prices).unwrap();
        assert!((forecast.next_day - 6.0).abs() < 1e-6);
        assert_eq!(forecast.next_week, 0.0);
        assert_eq!(forecast.trend, TrendLabel::Bearish);
    }

    #[test]
    fn predict_flat_series_is_neutral() {
        let forecast = predict(&[50.0; 20]).unwrap();
        assert_eq!(forecast.trend, TrendLabel::Neutral);
        assert!((forecast.next_day - 50.0).abs() < 1e-9);
        assert!((forecast.next_week - 50.0).abs() < 1e-9);
    }

    #[test]
    fn predict_small_slope_is_neutral() {
        // slope 0.05 sits inside the +/-0.1 dead zone
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + 0.05 * i as f64).collect();
        let forecast = predict(&prices).unwrap();
        assert_eq!(forecast.trend, TrendLabel::Neutral);
    }

    #[test]
    fn trend_strength_empty_is_neutral() {
        let signal = trend_strength(&[]);
        assert_eq!(signal.score, 0.0);
        assert_eq!(signal.direction, TrendLabel::Neutral);
        assert_eq!(signal.confidence, Confidence::Low);
    }

    #[test]
    fn trend_strength_momentum_only_on_sparse_data() {
        // Too short for RSI and both averages; only the last step counts
        let signal = trend_strength(&[100.0, 101.0, 102.0, 103.0, 105.06]);
        assert!(signal.score > 0.0);
        assert_eq!(signal.direction, TrendLabel::Bullish);
        assert_eq!(signal.confidence, Confidence::Low);
        let momentum = (105.06 - 103.0) / 103.0 * 10.0;
        assert!((signal.score - momentum).abs() < 1e-9);
    }

    #[test]
    fn trend_strength_oversold_recovery_scores_high() {
        // Head falls so the fixed RSI window reads oversold, the tail rallies
        // so the short average sits above the long one, and the final step
        // jumps five percent.
        let mut prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let mut price = 86.0;
        for _ in 0..44 {
            price += 2.0;
            prices.push(price);
        }
        prices.push(price * 1.05);

        let signal = trend_strength(&prices);
        // +2 oversold, +1 crossover, +0.5 momentum
        assert!((signal.score - 3.5).abs() < 1e-9);
        assert_eq!(signal.direction, TrendLabel::Bullish);
        assert_eq!(signal.confidence, Confidence::High);
    }

    #[test]
    fn trend_strength_overbought_slide_scores_low() {
        // Mirror image: overbought start, falling tail, five percent drop
        let mut prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let mut price = 114.0;
        for _ in 0..44 {
            price -= 2.0;
            prices.push(price);
        }
        prices.push(price * 0.95);

        let signal = trend_strength(&prices);
        assert!((signal.score + 3.5).abs() < 1e-9);
        assert_eq!(signal.direction, TrendLabel::Bearish);
        assert_eq!(signal.confidence, Confidence::High);
    }
}
