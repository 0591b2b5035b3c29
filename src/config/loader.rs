//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read a config file that exists.
    #[error("failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; unspecified fields fall back to hardcoded
/// defaults. Corresponds to `~/.config/pageflow/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Layout strategy, `"linear"` or `"stacked"`.
    #[serde(default)]
    pub layout: Option<String>,

    /// Scroll axis for the linear layouter, `"horizontal"` or `"vertical"`.
    #[serde(default)]
    pub axis: Option<String>,

    /// Easing curve name (e.g. `"linear"`, `"sine-in-out"`).
    #[serde(default)]
    pub easing: Option<String>,

    /// Number of pages in the demo deck.
    #[serde(default)]
    pub pages: Option<usize>,

    /// Gap between pages in the linear layout, in cells.
    #[serde(default)]
    pub spacing: Option<f32>,

    /// Rows each buried page peeks out in the stacked layout.
    #[serde(default)]
    pub peek: Option<f32>,

    /// Transition duration in milliseconds. Zero disables animation.
    #[serde(default)]
    pub animation_ms: Option<u64>,

    /// Snap to page boundaries when a scroll rests.
    #[serde(default)]
    pub paging: Option<bool>,

    /// Allow rest snaps to travel more than one page.
    #[serde(default)]
    pub continuous_navigation: Option<bool>,

    /// Defer relayout during drags until the scroll rests.
    #[serde(default)]
    pub layout_on_rest: Option<bool>,

    /// Path to the log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Custom key bindings (future use).
    #[serde(default)]
    pub keybindings: Option<toml::Value>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Layout strategy name.
    pub layout: String,
    /// Scroll axis name.
    pub axis: String,
    /// Easing curve name.
    pub easing: String,
    /// Number of pages in the demo deck.
    pub pages: usize,
    /// Linear layout spacing in cells.
    pub spacing: f32,
    /// Stacked layout peek in rows.
    pub peek: f32,
    /// Transition duration in milliseconds.
    pub animation_ms: u64,
    /// Rest snapping.
    pub paging: bool,
    /// Multi-page rest snaps.
    pub continuous_navigation: bool,
    /// Defer relayout during drags until the scroll rests.
    pub layout_on_rest: bool,
    /// Path to the log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            layout: "linear".to_string(),
            axis: "horizontal".to_string(),
            easing: "sine-in-out".to_string(),
            pages: 8,
            spacing: 0.0,
            peek: 3.0,
            animation_ms: 250,
            paging: true,
            continuous_navigation: false,
            layout_on_rest: false,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve the default log file path.
///
/// Returns `~/.local/state/pageflow/pageflow.log` on Unix-like systems,
/// or the platform equivalent. Falls back to the current directory when
/// no state directory can be determined.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("pageflow").join("pageflow.log")
    } else {
        PathBuf::from("pageflow.log")
    }
}

/// Resolve the default config file path.
///
/// Returns `~/.config/pageflow/config.toml` on Unix, the platform
/// equivalent elsewhere, or `None` if no config directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pageflow").join("config.toml"))
}

/// Load a configuration file from a specific path.
///
/// A missing file is not an error; `Ok(None)` means "use defaults".
///
/// # Errors
///
/// Returns an error only when the file exists but cannot be read or
/// parsed.
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
/// 2. `PAGEFLOW_CONFIG` environment variable
/// 3. Default path `~/.config/pageflow/config.toml`
///
/// Missing config files are not errors; defaults are used.
///
/// # Errors
///
/// Returns an error only when a config file exists but cannot be read or
/// parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("PAGEFLOW_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge a config file into the defaults.
///
/// For each field, a `Some(value)` from the file wins over the default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        layout: config.layout.unwrap_or(defaults.layout),
        axis: config.axis.unwrap_or(defaults.axis),
        easing: config.easing.unwrap_or(defaults.easing),
        pages: config.pages.unwrap_or(defaults.pages),
        spacing: config.spacing.unwrap_or(defaults.spacing),
        peek: config.peek.unwrap_or(defaults.peek),
        animation_ms: config.animation_ms.unwrap_or(defaults.animation_ms),
        paging: config.paging.unwrap_or(defaults.paging),
        continuous_navigation: config
            .continuous_navigation
            .unwrap_or(defaults.continuous_navigation),
        layout_on_rest: config.layout_on_rest.unwrap_or(defaults.layout_on_rest),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to a resolved config.
///
/// `PAGEFLOW_EASING` overrides the easing curve name.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(easing) = std::env::var("PAGEFLOW_EASING") {
        config.easing = easing;
    }

    config
}

/// Apply CLI argument overrides to a resolved config.
///
/// CLI args have the highest precedence. Only flags the user explicitly
/// set override; `None` leaves the merged value in place.
///
/// Precedence chain: defaults, config file, env vars, CLI args (highest).
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    layout_override: Option<String>,
    easing_override: Option<String>,
    pages_override: Option<usize>,
) -> ResolvedConfig {
    if let Some(layout) = layout_override {
        config.layout = layout;
    }

    if let Some(easing) = easing_override {
        config.easing = easing;
    }

    if let Some(pages) = pages_override {
        config.pages = pages;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
