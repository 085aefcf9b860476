use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::{ChartKind, Overlay, TimeWindow};

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

fn default_search_delay_ms() -> u64 {
    0
}

fn default_symbol() -> String {
    "AAPL".into()
}

fn default_window() -> String {
    "3mo".into()
}

fn default_chart() -> String {
    "line".into()
}

fn default_overlays() -> Vec<String> {
    Overlay::ALL.iter().map(|o| o.as_str().to_string()).collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DataConfig {
    /// JSON stock data file. The built-in sample set is used when unset.
    #[serde(default)]
    pub file: Option<String>,
    /// Artificial pause before each search, imitating a remote data source.
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            file: None,
            search_delay_ms: default_search_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    /// Symbol analyzed when none is given on the command line.
    #[serde(default = "default_symbol")]
    pub default_symbol: String,
    #[serde(default = "default_window")]
    pub window: String,
    #[serde(default = "default_chart")]
    pub chart: String,
    #[serde(default = "default_overlays")]
    pub overlays: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_symbol: default_symbol(),
            window: default_window(),
            chart: default_chart(),
            overlays: default_overlays(),
        }
    }
}

/// Load and validate an `AppConfig` from a TOML file at `path`.
pub fn load(path: &Path) -> Result<AppConfig, Report<ConfigError>> {
    let content = std::fs::read_to_string(path)
        .change_context(ConfigError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content).change_context(ConfigError::Parse {
        reason: "invalid TOML syntax or schema mismatch".into(),
    })?;

    validate(&config)?;

    Ok(config)
}

/// Like [`load`], but a missing file is fine unless the user asked for that
/// exact path: the built-in defaults are used instead.
pub fn load_or_default(path: &Path, explicit: bool) -> Result<AppConfig, Report<ConfigError>> {
    if !path.exists() && !explicit {
        return Ok(AppConfig::default());
    }
    load(path)
}

fn validate(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    validate_window(config)?;
    validate_chart(config)?;
    validate_overlays(config)?;
    Ok(())
}

fn validate_window(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if TimeWindow::parse(&config.dashboard.window).is_none() {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "dashboard.window: unknown window \"{}\"",
                config.dashboard.window
            ),
        }));
    }
    Ok(())
}

fn validate_chart(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if ChartKind::from_str(&config.dashboard.chart).is_none() {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "dashboard.chart: unknown chart type \"{}\"",
                config.dashboard.chart
            ),
        }));
    }
    Ok(())
}

fn validate_overlays(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    for overlay in &config.dashboard.overlays {
        if Overlay::from_str(overlay).is_none() {
            return Err(Report::new(ConfigError::Validation {
                field: format!("dashboard.overlays: unknown overlay \"{overlay}\""),
            }));
        }
    }
    Ok(())
}
