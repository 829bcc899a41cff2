//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ENDLESS_CONFIG";
/// Environment variable overriding the load threshold.
pub const THRESHOLD_ENV: &str = "ENDLESS_THRESHOLD";
/// Environment variable overriding the layout kind.
pub const LAYOUT_ENV: &str = "ENDLESS_LAYOUT";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a directory, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting has a value the demo cannot run with.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name, as written in the config file.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Layout the demo lays its rows out with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// One column.
    #[default]
    Linear,
    /// Several columns, tiled row-major.
    Staggered,
}

impl FromStr for LayoutKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "staggered" => Ok(Self::Staggered),
            other => Err(ConfigError::InvalidValue {
                field: "layout",
                reason: format!("expected \"linear\" or \"staggered\", got {other:?}"),
            }),
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Staggered => f.write_str("staggered"),
        }
    }
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, defaults are used.
/// Corresponds to `~/.config/endless-list/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Edge distance, in rows, that triggers a load.
    #[serde(default)]
    pub threshold: Option<i64>,

    /// Rows delivered by one load.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Pages available in each direction.
    #[serde(default)]
    pub total_pages: Option<usize>,

    /// Simulated load latency.
    #[serde(default)]
    pub load_delay_ms: Option<u64>,

    /// Row layout.
    #[serde(default)]
    pub layout: Option<LayoutKind>,

    /// Columns of the staggered layout.
    #[serde(default)]
    pub tracks: Option<usize>,

    /// Load older rows when scrolling to the top too.
    #[serde(default)]
    pub bidirectional: Option<bool>,

    /// Show a loading row while a page is in flight.
    #[serde(default)]
    pub placeholder: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Load threshold. Validated, not yet a `Threshold`.
    pub threshold: i64,
    /// Rows per page.
    pub page_size: usize,
    /// Pages per direction.
    pub total_pages: usize,
    /// Simulated load latency in milliseconds.
    pub load_delay_ms: u64,
    /// Row layout.
    pub layout: LayoutKind,
    /// Staggered columns.
    pub tracks: usize,
    /// Load in both directions.
    pub bidirectional: bool,
    /// Show loading rows.
    pub placeholder: bool,
    /// Path to log file.
    pub log_file_path: PathBuf,
    /// Default log filter.
    pub log_level: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            threshold: 1,
            page_size: 8,
            total_pages: 10,
            load_delay_ms: 1000,
            layout: LayoutKind::Linear,
            tracks: 3,
            bidirectional: false,
            placeholder: true,
            log_file_path: default_log_path(),
            log_level: "info".to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Reject settings the demo cannot run with.
    ///
    /// # Errors
    /// [`ConfigError::InvalidValue`] for a non-positive threshold, zero page size,
    /// zero pages or zero tracks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold <= 0 {
            return Err(invalid("threshold", format!("must be positive, got {}", self.threshold)));
        }
        if self.page_size == 0 {
            return Err(invalid("page_size", "must be at least 1".to_string()));
        }
        if self.total_pages == 0 {
            return Err(invalid("total_pages", "must be at least 1".to_string()));
        }
        if self.tracks == 0 {
            return Err(invalid("tracks", "must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { field, reason }
}

/// Overrides collected from command-line flags. `None` leaves the setting alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--threshold`
    pub threshold: Option<i64>,
    /// `--page-size`
    pub page_size: Option<usize>,
    /// `--pages`
    pub total_pages: Option<usize>,
    /// `--delay-ms`
    pub load_delay_ms: Option<u64>,
    /// `--layout`
    pub layout: Option<LayoutKind>,
    /// `--tracks`
    pub tracks: Option<usize>,
    /// `--bidirectional`
    pub bidirectional: Option<bool>,
    /// `--no-placeholder`, stored inverted.
    pub placeholder: Option<bool>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/endless-list/endless-demo.log` on Unix-like systems, falling
/// back to the current directory when no state directory is known.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("endless-list").join("endless-demo.log"),
        None => PathBuf::from("endless-demo.log"),
    }
}

/// Resolve default config file path.
///
/// Returns `~/.config/endless-list/config.toml` on Unix, appropriate path on other
/// platforms. Returns `None` if the config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("endless-list").join("config.toml"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `ENDLESS_CONFIG` environment variable
/// 3. Default path `~/.config/endless-list/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        threshold: config.threshold.unwrap_or(defaults.threshold),
        page_size: config.page_size.unwrap_or(defaults.page_size),
        total_pages: config.total_pages.unwrap_or(defaults.total_pages),
        load_delay_ms: config.load_delay_ms.unwrap_or(defaults.load_delay_ms),
        layout: config.layout.unwrap_or(defaults.layout),
        tracks: config.tracks.unwrap_or(defaults.tracks),
        bidirectional: config.bidirectional.unwrap_or(defaults.bidirectional),
        placeholder: config.placeholder.unwrap_or(defaults.placeholder),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        log_level: config.log_level.unwrap_or(defaults.log_level),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `ENDLESS_THRESHOLD`: load threshold
/// - `ENDLESS_LAYOUT`: `linear` or `staggered`
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if a variable is set but unparseable.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(THRESHOLD_ENV) {
        config.threshold = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            field: "threshold",
            reason: format!("{THRESHOLD_ENV}={raw:?} is not an integer"),
        })?;
    }

    if let Ok(raw) = std::env::var(LAYOUT_ENV) {
        config.layout = raw.parse()?;
    }

    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(total_pages) = cli.total_pages {
        config.total_pages = total_pages;
    }
    if let Some(delay) = cli.load_delay_ms {
        config.load_delay_ms = delay;
    }
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    if let Some(tracks) = cli.tracks {
        config.tracks = tracks;
    }
    if let Some(bidirectional) = cli.bidirectional {
        config.bidirectional = bidirectional;
    }
    if let Some(placeholder) = cli.placeholder {
        config.placeholder = placeholder;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
