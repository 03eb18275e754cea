//! Analysis configuration.
//!
//! Column names are semantic contracts: each stage looks its columns up by
//! the names configured here. Defaults match the California housing
//! dataset; a JSON file can override any subset of fields.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Suffix appended to a distance column name for its normalized companion.
pub const NORM_SUFFIX: &str = "_norm";

/// Name of the per-row mean of all normalized distance columns.
pub const COMBINED_INDEX_COLUMN: &str = "combined_distance_norm";

/// Options for parsing delimited text into a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Field delimiter. Default: `,`
    pub delimiter: u8,
    /// Field texts (after trimming) that mean "no value".
    pub missing_markers: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing_markers: ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Target column. Default: `Median_House_Value`
    pub value_column: String,
    /// Grouping column for the value-by-age trend. Default: `Median_Age`
    pub age_column: String,
    /// Default: `Median_Income`
    pub income_column: String,
    /// Default: `Population`
    pub population_column: String,
    pub latitude_column: String,
    pub longitude_column: String,
    /// Distance columns in the order results are reported.
    pub distance_columns: Vec<String>,
    /// Bins for the value distribution histogram. Default: 50
    pub histogram_bins: usize,
    pub load: LoadOptions,
    /// Directory for generated report files. Default: `.`
    pub output_dir: PathBuf,
    /// File name for the saved cleaned table. Default: `analysis_results.csv`
    pub results_file: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            value_column: "Median_House_Value".to_string(),
            age_column: "Median_Age".to_string(),
            income_column: "Median_Income".to_string(),
            population_column: "Population".to_string(),
            latitude_column: "Latitude".to_string(),
            longitude_column: "Longitude".to_string(),
            distance_columns: [
                "Distance_to_coast",
                "Distance_to_LA",
                "Distance_to_SanDiego",
                "Distance_to_SanJose",
                "Distance_to_SanFrancisco",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            histogram_bins: 50,
            load: LoadOptions::default(),
            output_dir: PathBuf::from("."),
            results_file: "analysis_results.csv".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Read a JSON config file. Fields left out keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let named = [
            ("value_column", &self.value_column),
            ("age_column", &self.age_column),
            ("income_column", &self.income_column),
            ("population_column", &self.population_column),
            ("latitude_column", &self.latitude_column),
            ("longitude_column", &self.longitude_column),
            ("results_file", &self.results_file),
        ];
        if let Some((field, _)) = named.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(AnalysisError::InvalidConfig(format!(
                "{field} must not be empty"
            )));
        }
        if self.distance_columns.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "at least one distance column is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for col in &self.distance_columns {
            if !seen.insert(col.as_str()) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "distance column '{col}' listed twice"
                )));
            }
        }
        if self.histogram_bins == 0 {
            return Err(AnalysisError::InvalidConfig(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
