use std::collections::BTreeMap;
use std::path::Path;
use std::thread;
use std::time::Duration;

use error_stack::{Report, ResultExt, bail};

use crate::error::StoreError;
use crate::model::StockRecord;

/// Longest symbol the dashboard accepts.
const MAX_SYMBOL_LEN: usize = 10;

/// In-memory stock records keyed by canonical symbol.
///
/// Lookups are read-only; the store is loaded once at startup and never
/// mutated afterwards.
pub struct StockStore {
    records: BTreeMap<String, StockRecord>,
    search_delay: Duration,
}

impl StockStore {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            search_delay: Duration::ZERO,
        }
    }

    /// Pause every search by `delay`, imitating a slow upstream data source.
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    pub fn from_records(
        records: impl IntoIterator<Item = StockRecord>,
    ) -> Result<Self, Report<StoreError>> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Parse a `symbol -> record` JSON object into a store.
    pub fn from_json_str(json: &str) -> Result<Self, Report<StoreError>> {
        let parsed: BTreeMap<String, StockRecord> =
            serde_json::from_str(json).change_context(StoreError::Parse {
                reason: "expected an object mapping symbols to stock records".into(),
            })?;

        let mut store = Self::new();
        for (key, record) in parsed {
            if key != record.symbol {
                tracing::debug!(key, symbol = record.symbol, "data file key differs from record symbol");
            }
            store.insert(record)?;
        }
        Ok(store)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Report<StoreError>> {
        let content = std::fs::read_to_string(path)
            .change_context(StoreError::ReadFile)
            .attach_with(|| format!("path: {}", path.display()))?;
        Self::from_json_str(&content)
    }

    /// Validate and add one record. Records with inconsistent or non-finite
    /// price data are rejected outright so the engines never see them.
    pub fn insert(&mut self, record: StockRecord) -> Result<(), Report<StoreError>> {
        validate_record(&record)?;
        self.records.insert(record.symbol.clone(), record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Canonical symbols in alphabetical order.
    pub fn symbols(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    /// Look up a stock by user query: exact symbol first, then the first
    /// case-insensitive substring match over symbols and display names.
    pub fn search(&self, query: &str) -> Result<Option<&StockRecord>, Report<StoreError>> {
        let symbol = validate_symbol(query)?;
        self.simulate_latency();

        if let Some(record) = self.records.get(&symbol) {
            return Ok(Some(record));
        }
        Ok(self
            .records
            .values()
            .find(|r| r.symbol.contains(&symbol) || r.name.to_uppercase().contains(&symbol)))
    }

    fn simulate_latency(&self) {
        if !self.search_delay.is_zero() {
            tracing::debug!(delay_ms = self.search_delay.as_millis() as u64, "simulating data source latency");
            thread::sleep(self.search_delay);
        }
    }
}

impl Default for StockStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonicalize a user-entered symbol: trimmed, at most ten characters,
/// letters only, uppercased.
pub fn validate_symbol(raw: &str) -> Result<String, Report<StoreError>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!(StoreError::InvalidSymbol {
            reason: "symbol cannot be empty".into(),
        });
    }
    if trimmed.len() > MAX_SYMBOL_LEN {
        bail!(StoreError::InvalidSymbol {
            reason: format!("symbol is too long (maximum {MAX_SYMBOL_LEN} characters)"),
        });
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!(StoreError::InvalidSymbol {
            reason: "symbol can only contain letters".into(),
        });
    }
    Ok(trimmed.to_ascii_uppercase())
}

fn validate_record(record: &StockRecord) -> Result<(), Report<StoreError>> {
    let canonical = validate_symbol(&record.symbol).change_context(StoreError::InvalidRecord {
        symbol: record.symbol.clone(),
        reason: "record symbol is not valid".into(),
    })?;
    if canonical != record.symbol {
        bail!(StoreError::InvalidRecord {
            symbol: record.symbol.clone(),
            reason: "record symbol must be uppercase".into(),
        });
    }
    if !record.current_price.is_finite() || record.current_price <= 0.0 {
        bail!(StoreError::InvalidRecord {
            symbol: record.symbol.clone(),
            reason: "current price must be a positive number".into(),
        });
    }
    if record.historical_data.is_empty() {
        bail!(StoreError::InvalidRecord {
            symbol: record.symbol.clone(),
            reason: "no historical data available".into(),
        });
    }

    for (index, point) in record.historical_data.iter().enumerate() {
        let fields = [
            point.open,
            point.high,
            point.low,
            point.close,
            point.volume,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            bail!(StoreError::InvalidRecord {
                symbol: record.symbol.clone(),
                reason: format!("non-finite value in data point {index}"),
            });
        }
        if point.open <= 0.0 || point.high <= 0.0 || point.low <= 0.0 || point.close <= 0.0 {
            bail!(StoreError::InvalidRecord {
                symbol: record.symbol.clone(),
                reason: format!("non-positive price in data point {index}"),
            });
        }
        if point.volume < 0.0 {
            bail!(StoreError::InvalidRecord {
                symbol: record.symbol.clone(),
                reason: format!("negative volume in data point {index}"),
            });
        }
        if point.high < point.low {
            bail!(StoreError::InvalidRecord {
                symbol: record.symbol.clone(),
                reason: format!("high is below low in data point {index}"),
            });
        }
    }
    Ok(())
}
