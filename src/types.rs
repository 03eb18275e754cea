use crate::table::{ColumnKind, Value};
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ColumnCount {
    #[serde(rename = "Column")]
    #[tabled(rename = "Column")]
    pub column: String,
    #[serde(rename = "Missing")]
    #[tabled(rename = "Missing")]
    pub missing: usize,
}

/// Diagnostics from [`crate::cleaner::clean`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanReport {
    pub rows_before: usize,
    pub rows_after_null_drop: usize,
    pub rows_after: usize,
    pub nulls_before: Vec<ColumnCount>,
    pub nulls_after: Vec<ColumnCount>,
    pub duplicates_before: usize,
    pub duplicates_after: usize,
}

impl CleanReport {
    pub fn rows_with_nulls(&self) -> usize {
        self.rows_before - self.rows_after_null_drop
    }
}

/// Descriptive statistics over the present values of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; 0 for a single value.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    #[serde(flatten)]
    pub summary: StatSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ColumnInfo {
    #[serde(rename = "Column")]
    #[tabled(rename = "Column")]
    pub column: String,
    #[serde(rename = "Kind")]
    #[tabled(rename = "Kind")]
    pub kind: ColumnKind,
    #[serde(rename = "NonMissing")]
    #[tabled(rename = "NonMissing")]
    pub non_missing: usize,
    #[serde(rename = "Missing")]
    #[tabled(rename = "Missing")]
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    pub key: Value,
    /// Present target values in the group.
    pub count: usize,
    /// `None` only when every target value in the group is missing.
    pub mean: Option<f64>,
}

/// Mean of a target column per distinct group value, ascending by key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedSeries {
    pub group_column: String,
    pub target_column: String,
    pub entries: Vec<GroupEntry>,
}

impl GroupedSeries {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestEntry {
    pub column: String,
    pub min_distance: f64,
    /// Rows sharing the minimum distance.
    pub tied_rows: usize,
    pub mean: f64,
}

/// Mean target value at the minimum of each distance column, in the order
/// the columns were requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestCityAverages {
    pub target_column: String,
    pub entries: Vec<NearestEntry>,
}

impl NearestCityAverages {
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.mean).collect()
    }

    /// Each mean as a percentage of the sum of all means.
    pub fn shares(&self) -> Vec<f64> {
        let total: f64 = self.entries.iter().map(|e| e.mean).sum();
        self.entries
            .iter()
            .map(|e| {
                if total == 0.0 {
                    0.0
                } else {
                    e.mean / total * 100.0
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BubblePoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

// Rendered rows for CSV export and console previews. Numbers are already
// formatted so the files read the same as the console.

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SummaryRow {
    #[serde(rename = "Column")]
    #[tabled(rename = "Column")]
    pub column: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: String,
    #[serde(rename = "Mean")]
    #[tabled(rename = "Mean")]
    pub mean: String,
    #[serde(rename = "Median")]
    #[tabled(rename = "Median")]
    pub median: String,
    #[serde(rename = "StdDev")]
    #[tabled(rename = "StdDev")]
    pub std_dev: String,
    #[serde(rename = "Min")]
    #[tabled(rename = "Min")]
    pub min: String,
    #[serde(rename = "Max")]
    #[tabled(rename = "Max")]
    pub max: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "AvgValue")]
    #[tabled(rename = "AvgValue")]
    pub avg_value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct NearestRow {
    #[serde(rename = "DistanceColumn")]
    #[tabled(rename = "DistanceColumn")]
    pub column: String,
    #[serde(rename = "MinDistance")]
    #[tabled(rename = "MinDistance")]
    pub min_distance: String,
    #[serde(rename = "TiedRows")]
    #[tabled(rename = "TiedRows")]
    pub tied_rows: usize,
    #[serde(rename = "AvgValue")]
    #[tabled(rename = "AvgValue")]
    pub avg_value: String,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}
