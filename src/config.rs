//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table, the user's file is merged on top, and the result
//! is deserialized and validated.
//!
//! ## Config File Location
//!
//! Place `config.toml` at the root of the working folder:
//!
//! ```text
//! site/
//! ├── config.toml
//! ├── articles/
//! ├── standalones/
//! ├── cards/
//! └── justcopyme/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! cards_per_page = 9         # Cards on each index page, sticky cards included
//!
//! [site]
//! title = "My Blog"
//! description = "Notes and articles"
//! tags = []                  # Written to <meta name="keywords">
//! url = "https://example.com"
//! # image = "/media/cover.jpg"
//!
//! [media]
//! card_small_width = 300     # Width of `-small` variants for card media
//! page_small_width = 500     # Width of `-small` variants for page media
//!
//! [output]
//! minify = true              # Minify HTML and the sitemap
//!
//! [processing]
//! max_processes = 4          # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Maximum cards on one index page, sticky cards included.
    pub cards_per_page: usize,
    /// Blog identity used in page heads and the sitemap.
    pub site: SiteInfo,
    /// Small-variant widths for copied media.
    pub media: MediaConfig,
    /// Output post-processing.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cards_per_page: 9,
            site: SiteInfo::default(),
            media: MediaConfig::default(),
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// Whether the sticky cards fit in `cards_per_page` depends on the cards
    /// found at build time and is checked by the paginator instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cards_per_page == 0 {
            return Err(ConfigError::Validation(
                "cards_per_page must be at least 1".into(),
            ));
        }
        if self.media.card_small_width == 0 || self.media.page_small_width == 0 {
            return Err(ConfigError::Validation(
                "media small widths must be non-zero".into(),
            ));
        }
        if self.site.url.trim().is_empty() {
            return Err(ConfigError::Validation("site.url must not be empty".into()));
        }
        Ok(())
    }
}

/// Blog identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Absolute base URL, used for sitemap locations.
    pub url: String,
    /// Default social preview image.
    pub image: Option<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: "Notes and articles".to_string(),
            tags: Vec::new(),
            url: "https://example.com".to_string(),
            image: None,
        }
    }
}

impl SiteInfo {
    /// Join the base URL with a site-relative URL.
    pub fn absolute_url(&self, relative_url: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            relative_url.trim_start_matches('/')
        )
    }
}

/// Widths for the `-small` copies made of every raster image under `media/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    pub card_small_width: u32,
    pub page_small_width: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            card_small_width: 300,
            page_small_width: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub minify: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { minify: true }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel content workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Cardpress Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the root of the working folder (next to articles/).
# Unknown keys will cause an error.

# Cards shown on each index page, sticky cards included.
# Must be greater than the number of sticky cards under cards/.
cards_per_page = 9

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
title = "My Blog"
description = "Notes and articles"
# Keywords written to every page head.
tags = []
# Absolute base URL. Sitemap locations are built from it.
url = "https://example.com"
# Default preview image for pages without one.
# image = "/media/cover.jpg"

# ---------------------------------------------------------------------------
# Media
# ---------------------------------------------------------------------------
[media]
# Every raster image under a media/ folder gets a `name-small.ext` copy
# resized to this width. Images already narrower are copied unchanged.
card_small_width = 300
page_small_width = 500

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Minify HTML pages and the sitemap.
minify = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
