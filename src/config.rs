// ⚙️ Dashboard Configuration - JSON file, every field optional

use crate::dashboard::ViewOptions;
use crate::filter::{AgeRange, FilterCriteria};
use crate::loader::DatasetSource;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where the base records come from
    pub source: DatasetSource,

    /// Bars in the destination ranking
    pub top_n: usize,

    /// Bins in the age histogram
    pub age_bins: usize,

    /// Age range selected when the dashboard opens
    pub default_age_range: AgeRange,

    /// Bind address for the HTTP server
    pub server_addr: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            source: DatasetSource::default(),
            top_n: 10,
            age_bins: 10,
            default_age_range: AgeRange::new(20, 50),
            server_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        DashboardConfig::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse config JSON")
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            top_n: self.top_n,
            age_bins: self.age_bins,
        }
    }

    /// Criteria the dashboard starts with: all destinations, default ages
    pub fn initial_criteria(&self) -> FilterCriteria {
        FilterCriteria::all()
            .with_age_range(self.default_age_range.min, self.default_age_range.max)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();

        assert_eq!(config.top_n, 10);
        assert_eq!(config.age_bins, 10);
        assert_eq!(config.initial_criteria().age_range, AgeRange::new(20, 50));
        assert!(config.initial_criteria().destinations.is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json(r#"{"top_n": 5, "source": {"kind": "embedded"}}"#)
            .unwrap();

        assert_eq!(config.top_n, 5);
        assert_eq!(config.source, DatasetSource::Embedded);
        assert_eq!(config.age_bins, 10);
        assert_eq!(config.server_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_view_options() {
        let config = DashboardConfig::from_json(r#"{"top_n": 3, "age_bins": 4}"#).unwrap();

        assert_eq!(
            config.view_options(),
            ViewOptions {
                top_n: 3,
                age_bins: 4
            }
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(DashboardConfig::from_json("{not json").is_err());
        assert!(DashboardConfig::from_file("/nonexistent/dashboard.json").is_err());
    }
}
