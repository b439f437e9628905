use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analyzers::ranking::DEFAULT_RANK_WIDTH;
use crate::stats::DEFAULT_SUMMARY_DENOMINATOR;

/// Public Chicago taxi-trip resource.
pub const DEFAULT_DATASET_URL: &str = "https://data.cityofchicago.org/resource/wrvz-psew.json";

/// Tunable parameters of a run.
///
/// Stored as a JSON object on disk; every key is optional:
/// ```json
/// {
///   "summaryDenominator": 200000,
///   "rankWidth": 10,
///   "datasetUrl": "https://data.cityofchicago.org/resource/wrvz-psew.json",
///   "rowLimit": 50000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Divisor for the summary averages.
    pub summary_denominator: u64,
    /// Number of companies in top/bottom rankings.
    pub rank_width: usize,
    pub dataset_url: String,
    /// Maximum rows requested from the dataset endpoint.
    pub row_limit: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            summary_denominator: DEFAULT_SUMMARY_DENOMINATOR,
            rank_width: DEFAULT_RANK_WIDTH,
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            row_limit: None,
        }
    }
}

impl EngineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("Invalid config file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
