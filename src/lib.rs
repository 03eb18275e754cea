//! Housing data cleaning and aggregation.
//!
//! Loads a delimited housing table (one row per census block), drops
//! incomplete and duplicate rows, and derives the views a renderer draws:
//! value statistics, value by house age, value at the nearest block to each
//! reference city, income/value/population points and a normalized
//! multi-distance map table.
//!
//! ```rust,ignore
//! use housing_report::{analyze, load_path, AnalysisConfig};
//!
//! let config = AnalysisConfig::default();
//! let table = load_path("housing.csv", &config.load)?;
//! let analysis = analyze(&table, &config)?;
//! println!("mean value: {}", analysis.value_summary.mean);
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod nearest;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod reports;
pub mod stats;
pub mod table;
pub mod types;
pub mod util;

pub use cleaner::{clean, duplicate_count, null_counts};
pub use config::{AnalysisConfig, LoadOptions};
pub use error::{AnalysisError, Result};
pub use loader::{load_path, load_reader, load_str};
pub use nearest::nearest_averages;
pub use normalize::{normalize, DerivedTable};
pub use output::export;
pub use pipeline::{analyze, Analysis};
pub use stats::{bubble_points, column_info, describe, describe_all, group_mean, histogram};
pub use table::{ColumnKind, Table, Value};
pub use types::{
    BubblePoint, CleanReport, GroupedSeries, HistogramBin, NearestCityAverages, StatSummary,
};
