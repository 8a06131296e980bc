//! Reviewer configuration.
//!
//! Loads the optional `config.json` that tunes catalog contents and the
//! suggestion-retention policy. A missing file means defaults.
use crate::catalog::{
    default_dimensions, default_metrics, Catalog, DimensionCatalog, MetricCatalog, MetricEntry,
};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current schema version for `config.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

const CONFIG_DIR_NAME: &str = "qannotate";
const CONFIG_FILE_NAME: &str = "config.json";

/// What happens to the context-integration suggestion when the reviewer
/// switches away from `replace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPolicy {
    #[default]
    Clear,
    Retain,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewConfig {
    pub schema_version: u32,
    #[serde(default)]
    pub suggestion_policy: SuggestionPolicy,
    #[serde(default = "default_metrics")]
    pub metric_catalog: Vec<MetricEntry>,
    #[serde(default = "default_dimensions")]
    pub dimensions: Vec<String>,
    #[serde(default = "default_show_disambiguation")]
    pub show_disambiguation: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            suggestion_policy: SuggestionPolicy::default(),
            metric_catalog: default_metrics(),
            dimensions: default_dimensions(),
            show_disambiguation: default_show_disambiguation(),
        }
    }
}

impl ReviewConfig {
    /// Metric and dimension pickers built from this config.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(
            MetricCatalog::new(self.metric_catalog.clone()),
            DimensionCatalog::new(self.dimensions.clone()),
        )
    }
}

fn default_show_disambiguation() -> bool {
    true
}

/// `<config_dir>/qannotate/config.json`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load config from an explicit path, or the default location.
///
/// An explicit path must exist; the default location may be absent.
pub fn load_config(explicit: Option<&Path>) -> Result<ReviewConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(ReviewConfig::default()),
        },
    };
    if !path.is_file() {
        if required {
            return Err(anyhow!("config not found at {}", path.display()));
        }
        tracing::debug!(path = %path.display(), "no config file; using defaults");
        return Ok(ReviewConfig::default());
    }
    let bytes = fs::read(&path).with_context(|| format!("read config {}", path.display()))?;
    let config: ReviewConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    validate_config(&config)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Validate config schema and catalog contents.
pub fn validate_config(config: &ReviewConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.metric_catalog.is_empty() {
        return Err(anyhow!("metric_catalog must be non-empty"));
    }
    for entry in &config.metric_catalog {
        if entry.id.trim().is_empty() || entry.name.trim().is_empty() {
            return Err(anyhow!(
                "metric_catalog entries need a non-empty id and name (got {:?}/{:?})",
                entry.id,
                entry.name
            ));
        }
    }
    if let Some(blank) = config.dimensions.iter().find(|dim| dim.trim().is_empty()) {
        return Err(anyhow!("dimensions must be non-empty (got {blank:?})"));
    }
    Ok(())
}

/// Pretty JSON of the default config, for users bootstrapping their own.
pub fn config_stub() -> Result<String> {
    serde_json::to_string_pretty(&ReviewConfig::default()).context("serialize config stub")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
