//! Descriptive and grouped statistics over a table.
//!
//! All functions resolve their columns before touching any values, so an
//! absent column fails with `ColumnNotFound` and never yields a partial
//! result.

use crate::error::{AnalysisError, Result};
use crate::table::{CellKey, ColumnKind, Table, Value};
use crate::types::{
    BubblePoint, ColumnInfo, ColumnSummary, GroupEntry, GroupedSeries, HistogramBin, StatSummary,
};
use crate::util::{average, median, sample_std_dev};
use std::collections::HashMap;
use tracing::debug;

/// Mean, median, sample standard deviation, min and max of a column.
///
/// Missing values are skipped. Fails with `EmptyColumn` when nothing is
/// left and with `NonNumeric` on a text value.
pub fn describe(table: &Table, column: &str) -> Result<StatSummary> {
    let idx = table.column_index(column)?;
    let values: Vec<f64> = table
        .numeric_column(idx)?
        .into_iter()
        .map(|(_, v)| v)
        .collect();
    summarize(column, values)
}

fn summarize(column: &str, values: Vec<f64>) -> Result<StatSummary> {
    let Some(mean) = average(&values) else {
        return Err(AnalysisError::EmptyColumn(column.to_string()));
    };
    let count = values.len();
    let std_dev = sample_std_dev(&values);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // non-empty, so the median always exists
    let median = median(values).unwrap_or(mean);
    Ok(StatSummary {
        count,
        mean,
        median,
        std_dev,
        min,
        max,
    })
}

/// [`describe`] for every numeric column that has at least one value.
pub fn describe_all(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| table.column_kind(*idx) == ColumnKind::Numeric)
        .filter_map(|(_, name)| {
            describe(table, name).ok().map(|summary| ColumnSummary {
                column: name.clone(),
                summary,
            })
        })
        .collect()
}

/// Name, kind and present/missing counts for every column.
pub fn column_info(table: &Table) -> Vec<ColumnInfo> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let missing = table.column_values(idx).filter(|v| v.is_missing()).count();
            ColumnInfo {
                column: name.clone(),
                kind: table.column_kind(idx),
                non_missing: table.row_count() - missing,
                missing,
            }
        })
        .collect()
}

/// Mean of `target` per distinct value of `group`, ascending by group value.
///
/// Groups compare numerically when the group column is numeric and
/// lexically otherwise. Rows with a missing group value are skipped; a
/// missing target is left out of its group's mean.
pub fn group_mean(table: &Table, group: &str, target: &str) -> Result<GroupedSeries> {
    let group_idx = table.column_index(group)?;
    let target_idx = table.column_index(target)?;

    struct Acc {
        key: Value,
        sum: f64,
        count: usize,
    }

    let mut map: HashMap<CellKey, Acc> = HashMap::new();
    for (row_no, row) in table.rows().iter().enumerate() {
        let key = &row[group_idx];
        if key.is_missing() {
            continue;
        }
        let e = map.entry(key.key()).or_insert_with(|| Acc {
            key: key.clone(),
            sum: 0.0,
            count: 0,
        });
        match &row[target_idx] {
            Value::Missing => {}
            Value::Number(v) => {
                e.sum += v;
                e.count += 1;
            }
            Value::Text(s) => {
                return Err(AnalysisError::NonNumeric {
                    column: target.to_string(),
                    row: row_no,
                    value: s.clone(),
                })
            }
        }
    }

    let mut entries: Vec<GroupEntry> = map
        .into_values()
        .map(|acc| GroupEntry {
            mean: (acc.count > 0).then(|| acc.sum / acc.count as f64),
            key: acc.key,
            count: acc.count,
        })
        .collect();

    match table.column_kind(group_idx) {
        ColumnKind::Numeric => entries.sort_by(|a, b| {
            let a = a.key.as_f64().unwrap_or(f64::NAN);
            let b = b.key.as_f64().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        }),
        ColumnKind::Text => entries.sort_by_key(|e| e.key.to_string()),
    }
    debug!("{} groups of '{}' by '{}'", entries.len(), target, group);

    Ok(GroupedSeries {
        group_column: group.to_string(),
        target_column: target.to_string(),
        entries,
    })
}

/// Equal-width histogram of a column over `[min, max]`.
///
/// The last bin is closed on the right so the maximum is counted. A
/// constant column gives a single bin holding every value.
pub fn histogram(table: &Table, column: &str, bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(AnalysisError::InvalidConfig(
            "histogram needs at least one bin".to_string(),
        ));
    }
    let idx = table.column_index(column)?;
    let values: Vec<f64> = table
        .numeric_column(idx)?
        .into_iter()
        .map(|(_, v)| v)
        .collect();
    if values.is_empty() {
        return Err(AnalysisError::EmptyColumn(column.to_string()));
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return Ok(vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &values {
        let slot = (((v - min) / width) as usize).min(bins - 1);
        counts[slot] += 1;
    }
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect())
}

/// One point per row where `x`, `y` and `size` are all present.
pub fn bubble_points(table: &Table, x: &str, y: &str, size: &str) -> Result<Vec<BubblePoint>> {
    let idx = table.column_indices(&[x, y, size])?;
    let mut points = Vec::with_capacity(table.row_count());
    for (row_no, row) in table.rows().iter().enumerate() {
        let mut vals = [0.0f64; 3];
        let mut complete = true;
        for (slot, &col) in idx.iter().enumerate() {
            match &row[col] {
                Value::Number(v) => vals[slot] = *v,
                Value::Missing => complete = false,
                Value::Text(s) => {
                    return Err(AnalysisError::NonNumeric {
                        column: table.columns()[col].clone(),
                        row: row_no,
                        value: s.clone(),
                    })
                }
            }
        }
        if complete {
            points.push(BubblePoint {
                x: vals[0],
                y: vals[1],
                size: vals[2],
            });
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    fn scenario() -> Table {
        Table::new(
            vec!["value".into(), "age".into(), "dist".into()],
            vec![
                vec![n(100000.0), n(10.0), n(5.0)],
                vec![n(300000.0), n(20.0), n(5.0)],
                vec![n(200000.0), n(10.0), n(15.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_describe() {
        let s = describe(&scenario(), "value").unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.mean, 200000.0);
        assert_eq!(s.median, 200000.0);
        assert_eq!(s.std_dev, 100000.0);
        assert_eq!(s.min, 100000.0);
        assert_eq!(s.max, 300000.0);
    }

    #[test]
    fn test_describe_single_value_has_zero_std() {
        let table = Table::new(vec!["v".into()], vec![vec![n(7.0)], vec![Value::Missing]]).unwrap();
        let s = describe(&table, "v").unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.median, 7.0);
    }

    #[test]
    fn test_describe_errors() {
        let table = Table::new(vec!["v".into()], vec![vec![Value::Missing]]).unwrap();
        assert!(matches!(
            describe(&table, "v"),
            Err(AnalysisError::EmptyColumn(c)) if c == "v"
        ));
        assert!(matches!(
            describe(&table, "w"),
            Err(AnalysisError::ColumnNotFound(c)) if c == "w"
        ));
    }

    #[test]
    fn test_group_mean_scenario() {
        let series = group_mean(&scenario(), "age", "value").unwrap();
        assert_eq!(
            series.entries,
            vec![
                GroupEntry {
                    key: n(10.0),
                    count: 2,
                    mean: Some(150000.0)
                },
                GroupEntry {
                    key: n(20.0),
                    count: 1,
                    mean: Some(300000.0)
                },
            ]
        );
    }

    #[test]
    fn test_group_mean_numeric_order_is_not_lexical() {
        let table = Table::new(
            vec!["g".into(), "t".into()],
            vec![
                vec![n(9.0), n(1.0)],
                vec![n(52.0), n(2.0)],
                vec![n(10.0), n(3.0)],
            ],
        )
        .unwrap();
        let keys: Vec<_> = group_mean(&table, "g", "t")
            .unwrap()
            .entries
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec![n(9.0), n(10.0), n(52.0)]);
    }

    #[test]
    fn test_group_mean_text_keys_sort_lexically() {
        let table = Table::new(
            vec!["g".into(), "t".into()],
            vec![
                vec![Value::text("NEAR BAY"), n(1.0)],
                vec![Value::text("INLAND"), n(2.0)],
                vec![Value::Missing, n(3.0)],
                vec![Value::text("ISLAND"), Value::Missing],
            ],
        )
        .unwrap();
        let series = group_mean(&table, "g", "t").unwrap();
        let keys: Vec<String> = series.entries.iter().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, vec!["INLAND", "ISLAND", "NEAR BAY"]);
        assert_eq!(series.entries[1].mean, None);
    }

    #[test]
    fn test_group_mean_weighted_sum_matches_total() {
        let table = scenario();
        let series = group_mean(&table, "dist", "value").unwrap();
        let weighted: f64 = series
            .entries
            .iter()
            .map(|e| e.count as f64 * e.mean.unwrap_or(0.0))
            .sum();
        assert!((weighted - 600000.0).abs() < 1e-6);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_group_mean_missing_column() {
        let err = group_mean(&scenario(), "age", "nope").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_histogram() {
        let table = Table::new(
            vec!["v".into()],
            [0.0, 1.0, 2.0, 3.0, 4.0].iter().map(|v| vec![n(*v)]).collect(),
        )
        .unwrap();
        let bins = histogram(&table, "v", 2).unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 3);
        assert_eq!(bins[1].upper, 4.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
    }

    #[test]
    fn test_histogram_constant_column() {
        let table = Table::new(vec!["v".into()], vec![vec![n(3.0)], vec![n(3.0)]]).unwrap();
        let bins = histogram(&table, "v", 50).unwrap();
        assert_eq!(
            bins,
            vec![HistogramBin {
                lower: 3.0,
                upper: 3.0,
                count: 2
            }]
        );
    }

    #[test]
    fn test_bubble_points_skip_incomplete_rows() {
        let table = Table::new(
            vec!["x".into(), "y".into(), "s".into()],
            vec![
                vec![n(8.3), n(452600.0), n(322.0)],
                vec![n(7.2), Value::Missing, n(2401.0)],
            ],
        )
        .unwrap();
        let points = bubble_points(&table, "x", "y", "s").unwrap();
        assert_eq!(
            points,
            vec![BubblePoint {
                x: 8.3,
                y: 452600.0,
                size: 322.0
            }]
        );
    }

    #[test]
    fn test_summarize_empty_values_is_empty_column() {
        assert!(matches!(
            summarize("v", Vec::new()),
            Err(AnalysisError::EmptyColumn(c)) if c == "v"
        ));
        let s = summarize("v", vec![4.0, 1.0]).unwrap();
        assert_eq!(s.median, 2.5);
        assert_eq!(s.mean, 2.5);
    }

    #[test]
    fn test_group_mean_text_target_is_non_numeric() {
        let table = Table::new(
            vec!["g".into(), "t".into()],
            vec![vec![n(1.0), n(2.0)], vec![n(1.0), Value::text("n/a")]],
        )
        .unwrap();
        match group_mean(&table, "g", "t") {
            Err(AnalysisError::NonNumeric { column, row, value }) => {
                assert_eq!(column, "t");
                assert_eq!(row, 1);
                assert_eq!(value, "n/a");
            }
            other => panic!("expected NonNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_bubble_points_text_value_is_non_numeric() {
        let table = Table::new(
            vec!["x".into(), "y".into(), "s".into()],
            vec![
                vec![n(8.3), n(452600.0), n(322.0)],
                vec![n(7.2), n(358500.0), Value::text("many")],
            ],
        )
        .unwrap();
        match bubble_points(&table, "x", "y", "s") {
            Err(AnalysisError::NonNumeric { column, row, value }) => {
                assert_eq!(column, "s");
                assert_eq!(row, 1);
                assert_eq!(value, "many");
            }
            other => panic!("expected NonNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_describe_all_and_column_info() {
        let table = Table::new(
            vec!["v".into(), "label".into()],
            vec![
                vec![n(1.0), Value::text("a")],
                vec![n(3.0), Value::Missing],
            ],
        )
        .unwrap();
        let all = describe_all(&table);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].column, "v");
        assert_eq!(all[0].summary.mean, 2.0);

        let info = column_info(&table);
        assert_eq!(info[1].kind, ColumnKind::Text);
        assert_eq!(info[1].non_missing, 1);
        assert_eq!(info[1].missing, 1);
    }
}
