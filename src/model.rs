use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily price bar.
///
/// Field names serialize in the camelCase shape of the dashboard's JSON data
/// files (`date` as ISO `YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvPoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A stock with its display metadata and daily history.
///
/// Owned by the data source; the engine only derives views from it. History
/// insertion order is irrelevant: the window filter sorts by date before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub historical_data: Vec<OhlcvPoint>,
}

/// Lookback window selecting the active data slice.
///
/// Calendar variants anchor at the latest date in the data, with the window
/// start normalized to the first day of its month. Any selector string that is
/// not a known calendar window falls back to a point count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    LastPoints(usize),
}

impl TimeWindow {
    /// Parse a selector string: `"1mo"`, `"3mo"`, `"6mo"`, `"1y"`, or a bare
    /// point count for anything else that parses as an integer.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1mo" => Some(Self::OneMonth),
            "3mo" => Some(Self::ThreeMonths),
            "6mo" => Some(Self::SixMonths),
            "1y" => Some(Self::OneYear),
            other => other.parse::<usize>().ok().map(Self::LastPoints),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneMonth => write!(f, "1mo"),
            Self::ThreeMonths => write!(f, "3mo"),
            Self::SixMonths => write!(f, "6mo"),
            Self::OneYear => write!(f, "1y"),
            Self::LastPoints(n) => write!(f, "{n}"),
        }
    }
}

/// How the rendering collaborator draws the price series. The engine does not
/// interpret this; it is selection state threaded through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Candlestick,
}

impl ChartKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Some(Self::Line),
            "candlestick" => Some(Self::Candlestick),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Candlestick => "candlestick",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chart overlay indicators the caller can enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overlay {
    Sma20,
    Sma50,
    Ema12,
}

impl Overlay {
    /// Every overlay, in the fixed order they appear on the chart.
    pub const ALL: [Self; 3] = [Self::Sma20, Self::Sma50, Self::Ema12];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sma20" => Some(Self::Sma20),
            "sma50" => Some(Self::Sma50),
            "ema12" => Some(Self::Ema12),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sma20 => "sma20",
            Self::Sma50 => "sma50",
            Self::Ema12 => "ema12",
        }
    }

    /// Legend label used by the chart.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sma20 => "SMA 20",
            Self::Sma50 => "SMA 50",
            Self::Ema12 => "EMA 12",
        }
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Directional call attached to a forecast or advisory signal.
///
/// The engines only ever produce the first three; `Unknown` is the view-level
/// fallback when a forecast fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendLabel {
    Bullish,
    Bearish,
    Neutral,
    Unknown,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Confidence attached to the heuristic trend-strength signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// The dashboard's full selection state, passed explicitly into every analyze
/// call. There is no ambient current-stock or current-period state anywhere;
/// each user action builds a fresh snapshot.
#[derive(Debug, Clone)]
pub struct Selection {
    pub symbol: String,
    pub window: TimeWindow,
    pub chart: ChartKind,
    pub overlays: Vec<Overlay>,
}
