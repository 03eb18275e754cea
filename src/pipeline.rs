//! Runs every stage over one cleaned table.

use crate::cleaner::clean;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::nearest::nearest_averages;
use crate::normalize::{normalize, DerivedTable};
use crate::stats::{bubble_points, column_info, describe, describe_all, group_mean, histogram};
use crate::table::Table;
use crate::types::{
    BubblePoint, CleanReport, ColumnInfo, ColumnSummary, GroupedSeries, HistogramBin,
    NearestCityAverages, StatSummary,
};
use tracing::info;

/// Everything one run derives. The cleaned table is the shared input of
/// every other field.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub cleaned: Table,
    pub clean_report: CleanReport,
    pub column_info: Vec<ColumnInfo>,
    pub value_column: String,
    pub value_summary: StatSummary,
    pub column_summaries: Vec<ColumnSummary>,
    pub value_histogram: Vec<HistogramBin>,
    /// Mean value per house age.
    pub age_trend: GroupedSeries,
    pub nearest: NearestCityAverages,
    /// Income against value, sized by population.
    pub bubbles: Vec<BubblePoint>,
    pub map: DerivedTable,
}

pub fn analyze(table: &Table, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;

    // Fail before cleaning if any configured column is absent
    table.column_indices(&[
        &config.value_column,
        &config.age_column,
        &config.income_column,
        &config.population_column,
        &config.latitude_column,
        &config.longitude_column,
    ])?;
    table.column_indices(&config.distance_columns)?;

    let (cleaned, clean_report) = clean(table);

    info!("Computing statistics...");
    let column_info = column_info(&cleaned);
    let value_summary = describe(&cleaned, &config.value_column)?;
    let column_summaries = describe_all(&cleaned);
    let value_histogram = histogram(&cleaned, &config.value_column, config.histogram_bins)?;
    let age_trend = group_mean(&cleaned, &config.age_column, &config.value_column)?;

    info!("Aggregating by nearest reference point...");
    let nearest = nearest_averages(&cleaned, &config.value_column, &config.distance_columns)?;

    let bubbles = bubble_points(
        &cleaned,
        &config.income_column,
        &config.value_column,
        &config.population_column,
    )?;

    info!("Normalizing distances...");
    let map = normalize(
        &cleaned,
        &config.latitude_column,
        &config.longitude_column,
        &config.distance_columns,
    )?;

    info!(
        "Analysis complete: {} rows, {} age groups",
        cleaned.row_count(),
        age_trend.len()
    );
    Ok(Analysis {
        cleaned,
        clean_report,
        column_info,
        value_column: config.value_column.clone(),
        value_summary,
        column_summaries,
        value_histogram,
        age_trend,
        nearest,
        bubbles,
        map,
    })
}
