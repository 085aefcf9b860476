use chrono::NaiveDate;
use serde::Serialize;

use crate::forecast::{self, Forecast, TrendSignal};
use crate::indicator::macd::{MACD_FAST, MACD_SIGNAL, MACD_SLOW, Macd, MacdOutput};
use crate::indicator::rsi::{RSI_PERIOD, Rsi};
use crate::indicator::{close_prices, overlay_indicator, volumes};
use crate::model::{ChartKind, Overlay, Selection, StockRecord, TrendLabel};
use crate::window;

/// Neutral RSI shown when the active window cannot support the calculation.
const NEUTRAL_RSI: f64 = 50.0;

/// One overlay line, index-aligned with the view's price series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlaySeries {
    pub overlay: Overlay,
    pub values: Vec<Option<f64>>,
}

/// Change of the current price against the previous close in the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    pub change: f64,
    pub percent: f64,
}

/// Latest moving-average readings for the indicator panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovingAverages {
    pub sma20: f64,
    pub sma50: f64,
    pub ema12: f64,
}

/// Everything a renderer needs to draw one stock for one selection.
///
/// Assembly never fails: engines that cannot produce a value for the active
/// window are logged and replaced by their documented fallbacks, so a thin
/// window yields a degraded view rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockView {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub window: String,
    pub chart: ChartKind,
    pub price_change: Option<PriceChange>,
    pub overlays: Vec<OverlaySeries>,
    pub averages: MovingAverages,
    pub rsi: f64,
    pub macd: MacdOutput,
    pub forecast: Forecast,
    pub signal: TrendSignal,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub volumes: Vec<f64>,
}

/// Assemble the dashboard view for one record under the given selection.
///
/// Pure with respect to its inputs: the same record and selection always
/// produce the same view.
pub fn analyze(record: &StockRecord, selection: &Selection) -> StockView {
    let points = window::filter(&record.historical_data, selection.window);
    if points.is_empty() {
        tracing::warn!(
            symbol = record.symbol,
            window = %selection.window,
            "no data points in the active window"
        );
    }

    let closes = close_prices(&points);
    let vols = volumes(&points);
    let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();

    StockView {
        symbol: record.symbol.clone(),
        name: record.name.clone(),
        current_price: record.current_price,
        window: selection.window.to_string(),
        chart: selection.chart,
        price_change: price_change(record.current_price, &closes),
        overlays: overlay_series(&selection.overlays, &closes),
        averages: moving_averages(&closes),
        rsi: latest_rsi(&closes),
        macd: latest_macd(&closes),
        forecast: forecast_or_fallback(&closes),
        signal: forecast::trend_strength(&closes),
        dates,
        closes,
        volumes: vols,
    }
}

fn price_change(current_price: f64, closes: &[f64]) -> Option<PriceChange> {
    if closes.len() < 2 {
        return None;
    }
    let previous = closes[closes.len() - 2];
    if previous == 0.0 {
        return None;
    }
    let change = current_price - previous;
    Some(PriceChange {
        change,
        percent: change / previous * 100.0,
    })
}

/// Series for the enabled overlays, in fixed chart order. Overlays the window
/// cannot support are skipped.
fn overlay_series(enabled: &[Overlay], closes: &[f64]) -> Vec<OverlaySeries> {
    let mut series = Vec::new();
    for overlay in Overlay::ALL {
        if !enabled.contains(&overlay) {
            continue;
        }
        if let Some(values) = overlay_values(overlay, closes) {
            series.push(OverlaySeries { overlay, values });
        }
    }
    series
}

fn overlay_values(overlay: Overlay, closes: &[f64]) -> Option<Vec<Option<f64>>> {
    let indicator = match overlay_indicator(overlay) {
        Ok(indicator) => indicator,
        Err(e) => {
            tracing::warn!(error = ?e, overlay = %overlay, "failed to build overlay engine");
            return None;
        }
    };
    if closes.len() < indicator.required_points() {
        tracing::debug!(
            overlay = %overlay,
            required = indicator.required_points(),
            available = closes.len(),
            "insufficient data for overlay"
        );
        return None;
    }
    match indicator.calculate(closes) {
        Ok(values) => Some(values),
        Err(e) => {
            tracing::warn!(error = ?e, indicator = indicator.name(), "overlay calculation failed");
            None
        }
    }
}

/// The indicator panel always shows all three averages; 0.0 stands in for the
/// ones the window cannot support.
fn moving_averages(closes: &[f64]) -> MovingAverages {
    MovingAverages {
        sma20: latest_overlay_value(Overlay::Sma20, closes),
        sma50: latest_overlay_value(Overlay::Sma50, closes),
        ema12: latest_overlay_value(Overlay::Ema12, closes),
    }
}

fn latest_overlay_value(overlay: Overlay, closes: &[f64]) -> f64 {
    overlay_values(overlay, closes)
        .and_then(|values| values.last().copied().flatten())
        .unwrap_or(0.0)
}

fn latest_rsi(closes: &[f64]) -> f64 {
    match Rsi::new(RSI_PERIOD).and_then(|rsi| rsi.latest(closes)) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = ?e, "rsi unavailable, showing neutral value");
            NEUTRAL_RSI
        }
    }
}

fn latest_macd(closes: &[f64]) -> MacdOutput {
    match Macd::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL).and_then(|macd| macd.latest(closes)) {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!(error = ?e, "macd unavailable, showing zeros");
            MacdOutput::default()
        }
    }
}

fn forecast_or_fallback(closes: &[f64]) -> Forecast {
    match forecast::predict(closes) {
        Ok(forecast) => forecast,
        Err(e) => {
            tracing::debug!(error = ?e, "forecast unavailable, resetting predictions");
            Forecast {
                next_day: 0.0,
                next_week: 0.0,
                trend: TrendLabel::Unknown,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{Confidence, OhlcvPoint, TimeWindow};

    fn record_from_closes(closes: &[f64]) -> StockRecord {
        let historical_data = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvPoint {
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(i as u64),
                open: close,
                high: close + 0.5,
                low: (close - 0.5).max(0.1),
                close,
                volume: 10_000.0,
            })
            .collect();
        StockRecord {
            symbol: "TEST".into(),
            name: "Test Corporation".into(),
            current_price: *closes.last().unwrap(),
            historical_data,
        }
    }

    fn selection(window: TimeWindow, overlays: &[Overlay]) -> Selection {
        Selection {
            symbol: "TEST".into(),
            window,
            chart: ChartKind::Line,
            overlays: overlays.to_vec(),
        }
    }

    #[test]
    fn uptrend_view_carries_forecast_and_indicators() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let record = record_from_closes(&closes);
        let view = analyze(&record, &selection(TimeWindow::LastPoints(30), &Overlay::ALL));

        assert_eq!(view.closes.len(), 30);
        assert!((view.forecast.next_day - 130.0).abs() < 1e-6);
        assert!((view.forecast.next_week - 137.0).abs() < 1e-6);
        assert_eq!(view.forecast.trend, TrendLabel::Bullish);

        // Strictly rising: RSI pegs at 100, MACD goes positive
        assert_eq!(view.rsi, 100.0);
        assert!(view.macd.macd > 0.0);

        // 30 points support the 20-period average but not the 50-period one
        assert!(view.averages.sma20 > 0.0);
        assert_eq!(view.averages.sma50, 0.0);
        assert!(view.averages.ema12 > 0.0);

        let change = view.price_change.unwrap();
        assert!((change.change - 1.0).abs() < 1e-9);
        assert!((change.percent - 100.0 / 128.0).abs() < 1e-9);
    }

    #[test]
    fn empty_window_degrades_to_fallbacks() {
        let closes: Vec<f64> = (0..20).map(|i| 50.0 + i as f64).collect();
        let record = record_from_closes(&closes);
        let view = analyze(&record, &selection(TimeWindow::LastPoints(0), &Overlay::ALL));

        assert!(view.closes.is_empty());
        assert!(view.dates.is_empty());
        assert!(view.volumes.is_empty());
        assert!(view.price_change.is_none());
        assert!(view.overlays.is_empty());
        assert_eq!(view.averages.sma20, 0.0);
        assert_eq!(view.averages.sma50, 0.0);
        assert_eq!(view.averages.ema12, 0.0);
        assert_eq!(view.rsi, NEUTRAL_RSI);
        assert_eq!(view.macd, MacdOutput::default());
        assert_eq!(view.forecast.next_day, 0.0);
        assert_eq!(view.forecast.next_week, 0.0);
        assert_eq!(view.forecast.trend, TrendLabel::Unknown);
        assert_eq!(view.signal.score, 0.0);
        assert_eq!(view.signal.confidence, Confidence::Low);
    }

    #[test]
    fn short_window_keeps_prices_but_degrades_engines() {
        let closes: Vec<f64> = (0..9).map(|i| 80.0 + i as f64).collect();
        let record = record_from_closes(&closes);
        let view = analyze(&record, &selection(TimeWindow::LastPoints(9), &Overlay::ALL));

        assert_eq!(view.closes.len(), 9);
        assert!(view.price_change.is_some());
        assert_eq!(view.rsi, NEUTRAL_RSI);
        assert_eq!(view.macd, MacdOutput::default());
        assert_eq!(view.forecast.trend, TrendLabel::Unknown);
    }

    #[test]
    fn macd_needs_twenty_six_points() {
        let make_view = |n: usize| {
            let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
            let record = record_from_closes(&closes);
            analyze(&record, &selection(TimeWindow::LastPoints(n), &[]))
        };
        assert_eq!(make_view(25).macd, MacdOutput::default());
        assert!(make_view(26).macd.macd > 0.0);
    }

    #[test]
    fn overlays_follow_the_selection() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 7) as f64).collect();
        let record = record_from_closes(&closes);

        let none = analyze(&record, &selection(TimeWindow::LastPoints(60), &[]));
        assert!(none.overlays.is_empty());

        let one = analyze(
            &record,
            &selection(TimeWindow::LastPoints(60), &[Overlay::Sma50]),
        );
        assert_eq!(one.overlays.len(), 1);
        assert_eq!(one.overlays[0].overlay, Overlay::Sma50);
        assert_eq!(one.overlays[0].values.len(), 60);
    }

    #[test]
    fn overlay_order_is_fixed_regardless_of_selection_order() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let record = record_from_closes(&closes);
        let view = analyze(
            &record,
            &selection(
                TimeWindow::LastPoints(60),
                &[Overlay::Ema12, Overlay::Sma50, Overlay::Sma20],
            ),
        );
        let order: Vec<Overlay> = view.overlays.iter().map(|s| s.overlay).collect();
        assert_eq!(order, vec![Overlay::Sma20, Overlay::Sma50, Overlay::Ema12]);
    }

    #[test]
    fn single_point_window_has_no_price_change() {
        let record = record_from_closes(&[42.0, 43.0, 44.0]);
        let view = analyze(&record, &selection(TimeWindow::LastPoints(1), &[]));
        assert!(view.price_change.is_none());
        assert_eq!(view.closes, vec![44.0]);
    }

    #[test]
    fn analyze_is_idempotent() {
        let closes: Vec<f64> = (0..40).map(|i| 120.0 + ((i * 3) % 11) as f64).collect();
        let record = record_from_closes(&closes);
        let sel = selection(TimeWindow::LastPoints(40), &Overlay::ALL);
        let first = analyze(&record, &sel);
        let second = analyze(&record, &sel);
        assert_eq!(first, second);
    }
}
