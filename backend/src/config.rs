//! # Dashboard Configuration
//!
//! Display and paging settings, read from a YAML file.
//!
//! ```yaml
//! currency_symbol: "$"
//! default_page_size: 25
//! max_page_size: 200
//! max_text_length: 256
//! date_format: month_day_year
//! seed_mock_data: true
//! ```
//!
//! Every key is optional. The file location comes from the
//! `FIELD_SERVICE_CONFIG` environment variable; without it the defaults apply.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Environment variable naming the YAML config file
pub const CONFIG_ENV_VAR: &str = "FIELD_SERVICE_CONFIG";

/// Date formatting options for tables
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// "June 13, 2025 9:00 AM"
    #[default]
    MonthDayYear,
    /// "06/13/2025"
    ShortDate,
    /// "2025-06-13"
    Iso,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub currency_symbol: String,
    /// Page size used when a list query gives no limit
    pub default_page_size: u32,
    /// Upper bound applied to any requested limit
    pub max_page_size: u32,
    /// Maximum length of titles, names and descriptions
    pub max_text_length: usize,
    pub date_format: DateFormat,
    /// Populate storage with the mock dataset on startup
    pub seed_mock_data: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            default_page_size: 25,
            max_page_size: 200,
            max_text_length: 256,
            date_format: DateFormat::MonthDayYear,
            seed_mock_data: true,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        info!("Loaded dashboard config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `FIELD_SERVICE_CONFIG`, or fall back to defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                info!("{} not set, using default dashboard config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            anyhow::bail!("Page sizes must be greater than zero");
        }
        if self.default_page_size > self.max_page_size {
            anyhow::bail!(
                "default_page_size ({}) exceeds max_page_size ({})",
                self.default_page_size,
                self.max_page_size
            );
        }
        if self.max_text_length == 0 {
            anyhow::bail!("max_text_length must be greater than zero");
        }
        Ok(())
    }

    /// Resolve a requested page size against the configured default and cap
    pub fn page_size(&self, requested: Option<u32>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_partial_yaml_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "currency_symbol: \"€\"\ndate_format: iso").unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.date_format, DateFormat::Iso);
        assert_eq!(config.default_page_size, 25);
        assert!(config.seed_mock_data);
    }

    #[test]
    fn test_load_rejects_inconsistent_page_sizes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_page_size: 500\nmax_page_size: 100").unwrap();

        let err = DashboardConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("exceeds max_page_size"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_page_size_clamping() {
        let config = DashboardConfig::default();
        assert_eq!(config.page_size(None), 25);
        assert_eq!(config.page_size(Some(10)), 10);
        assert_eq!(config.page_size(Some(0)), 1);
        assert_eq!(config.page_size(Some(10_000)), 200);
    }
}
