use chrono::{Datelike, NaiveDate, Weekday};
use error_stack::Report;

use crate::error::StoreError;
use crate::model::{OhlcvPoint, StockRecord};
use crate::store::StockStore;

/// Calendar days of history generated per stock, roughly fifteen months so
/// the one-year window always has data to spare.
const HISTORY_DAYS: u64 = 455;

struct Profile {
    symbol: &'static str,
    name: &'static str,
    start_price: f64,
    drift: f64,
    volatility: f64,
    volume_base: f64,
    seed: u64,
}

const PROFILES: [Profile; 5] = [
    Profile {
        symbol: "AAPL",
        name: "Apple Inc.",
        start_price: 168.40,
        drift: 0.0004,
        volatility: 0.012,
        volume_base: 55_000_000.0,
        seed: 0x5157_4f43_4b01,
    },
    Profile {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        start_price: 134.75,
        drift: 0.0003,
        volatility: 0.014,
        volume_base: 28_000_000.0,
        seed: 0x5157_4f43_4b02,
    },
    Profile {
        symbol: "MSFT",
        name: "Microsoft Corporation",
        start_price: 402.10,
        drift: 0.0005,
        volatility: 0.010,
        volume_base: 22_000_000.0,
        seed: 0x5157_4f43_4b03,
    },
    Profile {
        symbol: "AMZN",
        name: "Amazon.com, Inc.",
        start_price: 174.90,
        drift: 0.0002,
        volatility: 0.016,
        volume_base: 40_000_000.0,
        seed: 0x5157_4f43_4b04,
    },
    Profile {
        symbol: "TSLA",
        name: "Tesla, Inc.",
        start_price: 251.30,
        drift: -0.0001,
        volatility: 0.028,
        volume_base: 95_000_000.0,
        seed: 0x5157_4f43_4b05,
    },
];

/// Built-in dataset used when no data file is configured. Fully deterministic:
/// the same five records on every run.
pub fn sample_store() -> Result<StockStore, Report<StoreError>> {
    StockStore::from_records(PROFILES.iter().map(build_record))
}

/// Latest bar date of the generated history. A Friday, so the series ends on
/// a trading day.
fn anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
}

fn build_record(profile: &Profile) -> StockRecord {
    let anchor = anchor_date();
    let mut state = profile.seed;
    let mut price = profile.start_price;
    let mut historical_data = Vec::new();

    for offset in (0..HISTORY_DAYS).rev() {
        let date = anchor - chrono::Days::new(offset);
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let step = profile.drift + profile.volatility * centered(&mut state);
        let open = price;
        let close = (open * (1.0 + step)).max(profile.start_price * 0.05);
        let high = open.max(close) * (1.0 + 0.004 * unit(&mut state));
        let low = open.min(close) * (1.0 - 0.004 * unit(&mut state));
        let volume = profile.volume_base * (0.6 + 0.8 * unit(&mut state));

        historical_data.push(OhlcvPoint {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }

    StockRecord {
        symbol: profile.symbol.into(),
        name: profile.name.into(),
        current_price: price,
        historical_data,
    }
}

/// Linear congruential step; keeps the generator dependency-free and the
/// output identical across runs and platforms.
fn next_state(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

/// Uniform draw in [0, 1).
fn unit(state: &mut u64) -> f64 {
    (next_state(state) >> 11) as f64 / (1u64 << 53) as f64
}

/// Uniform draw in [-1, 1).
fn centered(state: &mut u64) -> f64 {
    unit(state) * 2.0 - 1.0
}
