//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::view_state::{ListConfig, RowHeight};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "CHATSCROLL_CONFIG";

/// Environment variable overriding the overscan row count.
pub const OVERSCAN_ENV_VAR: &str = "CHATSCROLL_OVERSCAN";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/chatscroll/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Estimated height in lines of a message that was never measured.
    #[serde(default)]
    pub estimated_row_height: Option<u32>,

    /// Rows rendered beyond the visible range on each side.
    #[serde(default)]
    pub overscan_rows: Option<usize>,

    /// Height in lines of the header spacer above the first message.
    #[serde(default)]
    pub header_height: Option<u32>,

    /// Lines from the end within which scrolling down resumes following.
    #[serde(default)]
    pub at_end_threshold: Option<usize>,

    /// Start in virtualized mode (false renders every message every frame).
    #[serde(default)]
    pub virtualize: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Estimated row height in lines.
    pub estimated_row_height: u32,
    /// Overscan rows per side.
    pub overscan_rows: usize,
    /// Header spacer height in lines.
    pub header_height: u32,
    /// At-end snap threshold in lines.
    pub at_end_threshold: usize,
    /// Virtualized rendering enabled.
    pub virtualize: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            estimated_row_height: 4,
            overscan_rows: 3,
            header_height: 1,
            at_end_threshold: 2,
            virtualize: true,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// List tunables derived from this config. Zero heights are lifted to one.
    pub fn list_config(&self) -> ListConfig {
        ListConfig {
            estimated_row_height: RowHeight::clamped(self.estimated_row_height),
            overscan: self.overscan_rows,
            header_height: RowHeight::clamped(self.header_height),
            at_end_threshold: self.at_end_threshold,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/chatscroll/chatscroll.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("chatscroll").join("chatscroll.log")
    } else {
        PathBuf::from("chatscroll.log")
    }
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

/// Resolve default config file path.
///
/// Returns `~/.config/chatscroll/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chatscroll").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CHATSCROLL_CONFIG` environment variable
/// 3. Default path `~/.config/chatscroll/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed,
/// or if `CHATSCROLL_CONFIG` is set to something that is not valid Unicode.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    match std::env::var(CONFIG_ENV_VAR) {
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()));
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CHATSCROLL_OVERSCAN`: Override overscan rows (ignored unless a non-negative integer)
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(overscan) = std::env::var(OVERSCAN_ENV_VAR)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
    {
        config.overscan_rows = overscan;
    }

    config
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
        estimated_row_height: config
            .estimated_row_height
            .unwrap_or(defaults.estimated_row_height),
        overscan_rows: config.overscan_rows.unwrap_or(defaults.overscan_rows),
        header_height: config.header_height.unwrap_or(defaults.header_height),
        at_end_threshold: config.at_end_threshold.unwrap_or(defaults.at_end_threshold),
        virtualize: config.virtualize.unwrap_or(defaults.virtualize),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
///
/// # Arguments
///
/// * `config` - Base resolved config (already merged with defaults, file, and env vars)
/// * `overscan_override` - Optional overscan from `--overscan`
/// * `virtualize_override` - `Some(false)` from `--no-virtualize`
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    overscan_override: Option<usize>,
    virtualize_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(overscan) = overscan_override {
        config.overscan_rows = overscan;
    }

    if let Some(virtualize) = virtualize_override {
        config.virtualize = virtualize;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
