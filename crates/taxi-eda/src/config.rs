use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use taxi_eda_core::columns::UnivariateSelection;
use taxi_eda_core::LoadOptions;

pub const DEFAULT_CONFIG_FILE: &str = "taxi-eda.toml";
pub const DEFAULT_DATASET: &str = "taxi_sample.csv";
pub const DATASET_ENV: &str = "TAXI_EDA_DATASET";

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Univariate choices used when the command line does not name one.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct UnivariateDefaults {
    pub numeric: Option<String>,
    pub numeric_chart: Option<String>,
    pub categorical: Option<String>,
    pub categorical_chart: Option<String>,
}

impl UnivariateDefaults {
    /// Invalid entries fall back to the first allowed option with a warning.
    pub fn selection(&self) -> UnivariateSelection {
        UnivariateSelection::resolve(
            self.numeric.as_deref(),
            self.numeric_chart.as_deref(),
            self.categorical.as_deref(),
            self.categorical_chart.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub dataset: PathBuf,
    pub has_index_column: bool,
    pub preview_rows: usize,
    pub log_format: LogFormat,
    pub univariate: UnivariateDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        let load = LoadOptions::default();
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            has_index_column: load.has_index_column,
            preview_rows: 20,
            log_format: LogFormat::default(),
            univariate: UnivariateDefaults::default(),
        }
    }
}

impl AppConfig {
    /// An explicit path must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML from '{}'", path.display()))
    }

    /// `--dataset` beats the environment, which beats the config file.
    pub fn dataset_path(&self, flag: Option<&Path>, env_value: Option<String>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| self.dataset.clone())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            has_index_column: self.has_index_column,
            ..LoadOptions::default()
        }
    }
}
