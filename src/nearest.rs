use crate::error::{AnalysisError, Result};
use crate::table::{Table, Value};
use crate::types::{NearestCityAverages, NearestEntry};
use tracing::debug;

/// For each distance column, the mean `target` over the rows sitting at that
/// column's minimum distance.
///
/// Rows tied at the minimum (exact equality) all count toward the mean.
/// Entries come back in the order `distance_columns` was given.
pub fn nearest_averages<S: AsRef<str>>(
    table: &Table,
    target: &str,
    distance_columns: &[S],
) -> Result<NearestCityAverages> {
    if distance_columns.is_empty() {
        return Err(AnalysisError::InvalidConfig(
            "no distance columns given".to_string(),
        ));
    }
    let target_idx = table.column_index(target)?;
    let distance_idx = table.column_indices(distance_columns)?;
    if table.is_empty() {
        return Err(AnalysisError::EmptyTable);
    }

    let entries = distance_columns
        .iter()
        .zip(distance_idx)
        .map(|(name, idx)| nearest_entry(table, name.as_ref(), idx, target, target_idx))
        .collect::<Result<Vec<_>>>()?;

    Ok(NearestCityAverages {
        target_column: target.to_string(),
        entries,
    })
}

fn nearest_entry(
    table: &Table,
    column: &str,
    idx: usize,
    target: &str,
    target_idx: usize,
) -> Result<NearestEntry> {
    let distances = table.numeric_column(idx)?;
    let min_distance = distances
        .iter()
        .map(|(_, d)| *d)
        .reduce(f64::min)
        .ok_or_else(|| AnalysisError::EmptyColumn(column.to_string()))?;

    let tied: Vec<usize> = distances
        .iter()
        .filter(|(_, d)| *d == min_distance)
        .map(|(row, _)| *row)
        .collect();

    let mut sum = 0.0;
    let mut count = 0usize;
    for &row in &tied {
        match &table.rows()[row][target_idx] {
            Value::Missing => {}
            Value::Number(v) => {
                sum += v;
                count += 1;
            }
            Value::Text(s) => {
                return Err(AnalysisError::NonNumeric {
                    column: target.to_string(),
                    row,
                    value: s.clone(),
                })
            }
        }
    }
    if count == 0 {
        return Err(AnalysisError::EmptyColumn(target.to_string()));
    }
    debug!(
        "'{}' minimum {} shared by {} rows",
        column,
        min_distance,
        tied.len()
    );

    Ok(NearestEntry {
        column: column.to_string(),
        min_distance,
        tied_rows: tied.len(),
        mean: sum / count as f64,
    })
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
            vec!["value".into(), "age".into(), "coast".into(), "la".into()],
            vec![
                vec![n(100000.0), n(10.0), n(5.0), n(30.0)],
                vec![n(300000.0), n(20.0), n(5.0), n(12.5)],
                vec![n(200000.0), n(10.0), n(15.0), n(40.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ties_are_averaged() {
        let result = nearest_averages(&scenario(), "value", &["coast"]).unwrap();
        assert_eq!(result.values(), vec![200000.0]);
        assert_eq!(result.entries[0].tied_rows, 2);
        assert_eq!(result.entries[0].min_distance, 5.0);
    }

    #[test]
    fn test_single_minimum_is_exact_and_order_follows_caller() {
        let result = nearest_averages(&scenario(), "value", &["la", "coast"]).unwrap();
        assert_eq!(result.entries[0].column, "la");
        assert_eq!(result.entries[0].mean, 300000.0);
        assert_eq!(result.entries[0].tied_rows, 1);
        assert_eq!(result.entries[1].column, "coast");
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        let result = nearest_averages(&scenario(), "value", &["coast", "la"]).unwrap();
        let shares = result.shares();
        assert_eq!(shares.len(), 2);
        assert!((shares.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        assert!((shares[0] - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_errors() {
        let table = scenario();
        assert_eq!(
            nearest_averages(&table, "value", &["sf"])
                .unwrap_err()
                .error_code(),
            "COLUMN_NOT_FOUND"
        );
        let empty = Table::new(table.columns().to_vec(), vec![]).unwrap();
        assert!(matches!(
            nearest_averages(&empty, "value", &["coast"]),
            Err(AnalysisError::EmptyTable)
        ));
        let none: [&str; 0] = [];
        assert_eq!(
            nearest_averages(&table, "value", &none)
                .unwrap_err()
                .error_code(),
            "INVALID_CONFIG"
        );
    }

    #[test]
    fn test_missing_distances_are_ignored() {
        let table = Table::new(
            vec!["value".into(), "d".into()],
            vec![
                vec![n(1.0), Value::Missing],
                vec![n(2.0), n(3.0)],
                vec![n(4.0), n(8.0)],
            ],
        )
        .unwrap();
        let result = nearest_averages(&table, "value", &["d"]).unwrap();
        assert_eq!(result.values(), vec![2.0]);
    }

    #[test]
    fn test_all_missing_distances_is_empty_column() {
        let table = Table::new(
            vec!["value".into(), "d".into()],
            vec![vec![n(1.0), Value::Missing], vec![n(2.0), Value::Missing]],
        )
        .unwrap();
        assert!(matches!(
            nearest_averages(&table, "value", &["d"]),
            Err(AnalysisError::EmptyColumn(c)) if c == "d"
        ));
    }

    #[test]
    fn test_no_target_among_tied_rows_is_empty_column() {
        let table = Table::new(
            vec!["value".into(), "d".into()],
            vec![
                vec![Value::Missing, n(1.0)],
                vec![Value::Missing, n(1.0)],
                vec![n(5.0), n(9.0)],
            ],
        )
        .unwrap();
        assert!(matches!(
            nearest_averages(&table, "value", &["d"]),
            Err(AnalysisError::EmptyColumn(c)) if c == "value"
        ));
    }
}
