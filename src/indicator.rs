pub mod ma;
pub mod macd;
pub mod rsi;

use error_stack::Report;

use crate::error::IndicatorError;
use crate::model::{OhlcvPoint, Overlay};

use ma::{Ema, Sma};

/// Period of the short simple moving average drawn on the chart.
const SMA_SHORT_PERIOD: usize = 20;
/// Period of the long simple moving average drawn on the chart.
const SMA_LONG_PERIOD: usize = 50;
/// Period of the exponential moving average drawn on the chart.
const EMA_OVERLAY_PERIOD: usize = 12;

/// A chart-overlay indicator computed over a close-price sequence.
///
/// Prices must be in ascending date order, oldest first. The output is
/// index-aligned with the input: one slot per price, `None` through the
/// warm-up region where the statistic is not yet defined.
pub trait Indicator {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Minimum number of prices required to produce at least one value.
    fn required_points(&self) -> usize;

    /// Calculate the indicator series over `prices`.
    fn calculate(&self, prices: &[f64]) -> Result<Vec<Option<f64>>, Report<IndicatorError>>;
}

/// Build the engine behind a chart overlay. Overlay periods are fixed, so the
/// inner constructors only fail on a programming error.
pub fn overlay_indicator(overlay: Overlay) -> Result<Box<dyn Indicator>, Report<IndicatorError>> {
    Ok(match overlay {
        Overlay::Sma20 => Box::new(Sma::new(SMA_SHORT_PERIOD)?),
        Overlay::Sma50 => Box::new(Sma::new(SMA_LONG_PERIOD)?),
        Overlay::Ema12 => Box::new(Ema::new(EMA_OVERLAY_PERIOD)?),
    })
}

/// Extract the close-price series from a point slice.
pub fn close_prices(points: &[OhlcvPoint]) -> Vec<f64> {
    points.iter().map(|p| p.close).collect()
}

/// Extract the volume series from a point slice.
pub fn volumes(points: &[OhlcvPoint]) -> Vec<f64> {
    points.iter().map(|p| p.volume).collect()
}
