use crate::pipeline::Analysis;
use crate::types::{
    CleanReport, ColumnSummary, GroupedSeries, NearestCityAverages, NearestRow, StatSummary,
    SummaryRow, TrendRow,
};
use crate::util::{format_int, format_number};
use chrono::{Local, SecondsFormat};
use serde::Serialize;

/// Serializable digest of one analysis run, written as `analysis_summary.json`.
#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    pub generated_at: String,
    pub cleaning: CleanReport,
    pub value_column: String,
    pub value_summary: StatSummary,
    pub age_trend: GroupedSeries,
    pub nearest: NearestCityAverages,
    pub nearest_shares_pct: Vec<f64>,
    pub bubble_points: usize,
    pub map_rows: usize,
    pub map_center: Option<(f64, f64)>,
}

pub fn summary_rows(summaries: &[ColumnSummary]) -> Vec<SummaryRow> {
    summaries
        .iter()
        .map(|s| SummaryRow {
            column: s.column.clone(),
            count: format_int(s.summary.count),
            mean: format_number(s.summary.mean, 2),
            median: format_number(s.summary.median, 2),
            std_dev: format_number(s.summary.std_dev, 2),
            min: format_number(s.summary.min, 2),
            max: format_number(s.summary.max, 2),
        })
        .collect()
}

pub fn trend_rows(series: &GroupedSeries) -> Vec<TrendRow> {
    series
        .entries
        .iter()
        .map(|e| TrendRow {
            group: e.key.to_string(),
            count: e.count,
            avg_value: e
                .mean
                .map(|m| format_number(m, 2))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

pub fn nearest_rows(nearest: &NearestCityAverages) -> Vec<NearestRow> {
    nearest
        .entries
        .iter()
        .zip(nearest.shares())
        .map(|(e, share)| NearestRow {
            column: e.column.clone(),
            min_distance: format_number(e.min_distance, 2),
            tied_rows: e.tied_rows,
            avg_value: format_number(e.mean, 2),
            share_pct: format_number(share, 1),
        })
        .collect()
}

pub fn generate_summary(analysis: &Analysis) -> AnalysisSummary {
    AnalysisSummary {
        generated_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        cleaning: analysis.clean_report.clone(),
        value_column: analysis.value_column.clone(),
        value_summary: analysis.value_summary,
        age_trend: analysis.age_trend.clone(),
        nearest: analysis.nearest.clone(),
        nearest_shares_pct: analysis.nearest.shares(),
        bubble_points: analysis.bubbles.len(),
        map_rows: analysis.map.table.row_count(),
        map_center: analysis.map.center(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;
    use crate::types::{GroupEntry, NearestEntry};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trend_rows_format_missing_mean() {
        let series = GroupedSeries {
            group_column: "Median_Age".into(),
            target_column: "Median_House_Value".into(),
            entries: vec![
                GroupEntry {
                    key: Value::Number(52.0),
                    count: 3,
                    mean: Some(250333.333),
                },
                GroupEntry {
                    key: Value::Number(53.0),
                    count: 0,
                    mean: None,
                },
            ],
        };
        let rows = trend_rows(&series);
        assert_eq!(rows[0].group, "52");
        assert_eq!(rows[0].avg_value, "250,333.33");
        assert_eq!(rows[1].avg_value, "-");
    }

    #[test]
    fn test_nearest_rows_carry_shares() {
        let nearest = NearestCityAverages {
            target_column: "Median_House_Value".into(),
            entries: vec![
                NearestEntry {
                    column: "Distance_to_coast".into(),
                    min_distance: 0.5,
                    tied_rows: 2,
                    mean: 300000.0,
                },
                NearestEntry {
                    column: "Distance_to_LA".into(),
                    min_distance: 420.0,
                    tied_rows: 1,
                    mean: 100000.0,
                },
            ],
        };
        let rows = nearest_rows(&nearest);
        assert_eq!(rows[0].share_pct, "75.0");
        assert_eq!(rows[1].share_pct, "25.0");
        assert_eq!(rows[1].min_distance, "420.00");
    }
}
