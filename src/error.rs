use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("failed to read config file")]
    ReadFile,
    #[display("failed to parse config: {reason}")]
    Parse { reason: String },
    #[display("invalid config: {field}")]
    Validation { field: String },
}

#[derive(Debug, Display, Error)]
pub enum StoreError {
    #[display("failed to read data file")]
    ReadFile,
    #[display("failed to parse stock data: {reason}")]
    Parse { reason: String },
    #[display("invalid stock symbol: {reason}")]
    InvalidSymbol { reason: String },
    #[display("invalid record for {symbol}: {reason}")]
    InvalidRecord { symbol: String, reason: String },
}

#[derive(Debug, Display, Error)]
pub enum IndicatorError {
    #[display("insufficient data: need {required}, got {available}")]
    InsufficientData { required: usize, available: usize },
    #[display("invalid parameter: {name}")]
    InvalidParameter { name: String },
    #[display("non-finite price at index {index}")]
    NonFiniteInput { index: usize },
}

#[derive(Debug, Display, Error)]
pub enum ForecastError {
    #[display("insufficient data: need {required}, got {available}")]
    InsufficientData { required: usize, available: usize },
    #[display("input length mismatch: x has {x_len}, y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },
    #[display("empty input series")]
    EmptyInput,
}
