pub mod json;
pub mod terminal;

use crate::view::{PriceChange, StockView};

/// Sink for assembled dashboard views.
pub trait Renderer {
    fn render(&self, view: &StockView);
}

/// Compact volume formatting: 1.5K, 2.5M, 3.1B.
pub fn format_volume(volume: f64) -> String {
    if !volume.is_finite() {
        return "0".into();
    }
    if volume >= 1e9 {
        format!("{:.1}B", volume / 1e9)
    } else if volume >= 1e6 {
        format!("{:.1}M", volume / 1e6)
    } else if volume >= 1e3 {
        format!("{:.1}K", volume / 1e3)
    } else {
        format!("{volume}")
    }
}

/// Signed change with percentage, e.g. "+$1.00 (0.78%)".
pub fn format_change(change: &PriceChange) -> String {
    let sign = if change.change >= 0.0 { "+" } else { "" };
    format!("{sign}${:.2} ({:.2}%)", change.change, change.percent)
}
