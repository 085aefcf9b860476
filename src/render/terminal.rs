use crate::indicator::rsi::RSI_PERIOD;
use crate::render::{Renderer, format_change, format_volume};
use crate::view::StockView;

/// Bars shown in the recent-history table.
const RECENT_ROWS: usize = 10;

/// Plain-text dashboard for the terminal.
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&self, view: &StockView) {
        let rule = "=".repeat(56);

        println!("{rule}");
        println!(" {} ({})", view.name, view.symbol);
        match &view.price_change {
            Some(change) => println!(
                " Price ${:.2}   {}",
                view.current_price,
                format_change(change)
            ),
            None => println!(" Price ${:.2}", view.current_price),
        }
        println!(
            " Window {} | {} chart | {} bars",
            view.window,
            view.chart,
            view.closes.len()
        );
        println!("{rule}");

        println!(" Indicators");
        println!("   SMA 20      ${:.2}", view.averages.sma20);
        println!("   SMA 50      ${:.2}", view.averages.sma50);
        println!("   EMA 12      ${:.2}", view.averages.ema12);
        println!("   RSI ({RSI_PERIOD})    {:.2}", view.rsi);
        println!(
            "   MACD        {:.4}  signal {:.4}  histogram {:.4}",
            view.macd.macd, view.macd.signal, view.macd.histogram
        );

        println!(" Forecast");
        println!("   next day    ${:.2}", view.forecast.next_day);
        println!("   next week   ${:.2}", view.forecast.next_week);
        println!("   trend       {}", view.forecast.trend);

        println!(" Signal");
        println!(
            "   score {:.2} ({}, {} confidence)",
            view.signal.score, view.signal.direction, view.signal.confidence
        );

        let legend: Vec<&str> = view.overlays.iter().map(|s| s.overlay.label()).collect();
        if legend.is_empty() {
            println!(" Overlays: none");
        } else {
            println!(" Overlays: {}", legend.join(", "));
        }

        println!(" Recent bars");
        let start = view.closes.len().saturating_sub(RECENT_ROWS);
        for index in start..view.closes.len() {
            println!(
                "   {}  close ${:<10.2} volume {}",
                view.dates[index],
                view.closes[index],
                format_volume(view.volumes[index])
            );
        }
        if view.closes.is_empty() {
            println!("   (no data in the selected window)");
        }
        println!("{rule}");
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{ChartKind, OhlcvPoint, Overlay, Selection, StockRecord, TimeWindow};
    use crate::view;

    fn small_view() -> StockView {
        let historical_data: Vec<OhlcvPoint> = (0..30)
            .map(|i| {
                let close = 100.0 + i as f64;
                OhlcvPoint {
                    date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
                        + chrono::Days::new(i as u64),
                    open: close,
                    high: close + 0.5,
                    low: close - 0.5,
                    close,
                    volume: 1_000_000.0,
                }
            })
            .collect();
        let record = StockRecord {
            symbol: "TEST".into(),
            name: "Test Corporation".into(),
            current_price: 129.0,
            historical_data,
        };
        let selection = Selection {
            symbol: "TEST".into(),
            window: TimeWindow::LastPoints(30),
            chart: ChartKind::Line,
            overlays: Overlay::ALL.to_vec(),
        };
        view::analyze(&record, &selection)
    }

    #[test]
    fn render_full_view_does_not_panic() {
        TerminalRenderer.render(&small_view());
    }

    #[test]
    fn render_empty_view_does_not_panic() {
        let mut view = small_view();
        view.dates.clear();
        view.closes.clear();
        view.volumes.clear();
        view.overlays.clear();
        view.price_change = None;
        TerminalRenderer.render(&view);
    }
}
