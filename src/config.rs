use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Dashboard settings; every field falls back to the stock dashboard value
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Years offered by the year selector. Not derived from the data.
    #[serde(default = "default_year_options")]
    pub year_options: Vec<i32>,
    /// mood_happy value counted as happy
    #[serde(default = "default_happy_value")]
    pub happy_value: String,
}

fn default_data_path() -> PathBuf { PathBuf::from("merged_data.csv") }
fn default_year_options() -> Vec<i32> { vec![1969, 2019] }
fn default_happy_value() -> String { "happy".to_string() }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            year_options: default_year_options(),
            happy_value: default_happy_value(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON configuration file
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DashboardError::Config(e.to_string()))
    }
}
