//! Distance normalization for the map view.
//!
//! Each distance column is coerced to numbers, rows missing any distance
//! are dropped, and every value is divided by its column's maximum. The
//! result keeps only coordinates and distance columns.

use crate::config::{COMBINED_INDEX_COLUMN, NORM_SUFFIX};
use crate::error::{AnalysisError, Result};
use crate::table::{Table, Value};
use crate::util::coerce_f64;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMax {
    pub column: String,
    pub max: f64,
}

/// Map-ready table: latitude, longitude, each distance column, its
/// `<name>_norm` companion and the combined index.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
    pub table: Table,
    pub maxima: Vec<ColumnMax>,
    /// Rows dropped because a distance could not be read as a number.
    pub dropped_rows: usize,
}

impl DerivedTable {
    /// Mean latitude and longitude of the numeric coordinates, used to
    /// center a map. `None` when there are none.
    pub fn center(&self) -> Option<(f64, f64)> {
        let mut lat_sum = 0.0;
        let mut lon_sum = 0.0;
        let mut count = 0usize;
        for row in self.table.rows() {
            if let (Some(lat), Some(lon)) = (row[0].as_f64(), row[1].as_f64()) {
                lat_sum += lat;
                lon_sum += lon;
                count += 1;
            }
        }
        (count > 0).then(|| (lat_sum / count as f64, lon_sum / count as f64))
    }
}

pub fn norm_column_name(column: &str) -> String {
    format!("{column}{NORM_SUFFIX}")
}

/// Every output column name must be distinct: coordinates, distances, their
/// `_norm` companions and the combined index.
fn check_output_names(latitude: &str, longitude: &str, names: &[&str]) -> Result<()> {
    let norms: Vec<String> = names.iter().map(|n| norm_column_name(n)).collect();
    let mut seen = HashSet::new();
    let all = [latitude, longitude, COMBINED_INDEX_COLUMN]
        .into_iter()
        .chain(names.iter().copied())
        .chain(norms.iter().map(String::as_str));
    for name in all {
        if !seen.insert(name) {
            return Err(AnalysisError::InvalidConfig(format!(
                "output column '{name}' would appear twice in the map table"
            )));
        }
    }
    Ok(())
}

pub fn normalize<S: AsRef<str>>(
    table: &Table,
    latitude: &str,
    longitude: &str,
    distance_columns: &[S],
) -> Result<DerivedTable> {
    if distance_columns.is_empty() {
        return Err(AnalysisError::InvalidConfig(
            "no distance columns given".to_string(),
        ));
    }
    let lat_idx = table.column_index(latitude)?;
    let lon_idx = table.column_index(longitude)?;
    let dist_idx = table.column_indices(distance_columns)?;
    let names: Vec<&str> = distance_columns.iter().map(|c| c.as_ref()).collect();
    check_output_names(latitude, longitude, &names)?;

    // Coerce; a row survives only if every listed distance is a number
    let mut kept: Vec<(usize, Vec<f64>)> = Vec::with_capacity(table.row_count());
    for (row_no, row) in table.rows().iter().enumerate() {
        let distances: Option<Vec<f64>> = dist_idx.iter().map(|&i| coerce_f64(&row[i])).collect();
        if let Some(d) = distances {
            kept.push((row_no, d));
        }
    }
    let dropped_rows = table.row_count() - kept.len();
    if dropped_rows > 0 {
        warn!(
            "Dropped {} rows without numeric distances",
            dropped_rows
        );
    }
    if kept.is_empty() {
        return Err(AnalysisError::EmptyTable);
    }

    let mut maxima = Vec::with_capacity(names.len());
    for (col, name) in names.iter().enumerate() {
        let mut max = f64::NEG_INFINITY;
        for (row_no, d) in &kept {
            if d[col] < 0.0 {
                return Err(AnalysisError::degenerate(
                    name,
                    format!("negative distance {} at row {}", d[col], row_no),
                ));
            }
            max = max.max(d[col]);
        }
        if !max.is_finite() || max <= 0.0 {
            return Err(AnalysisError::degenerate(
                name,
                format!("maximum is {max}, cannot divide by it"),
            ));
        }
        debug!("'{}' max {}", name, max);
        maxima.push(ColumnMax {
            column: name.to_string(),
            max,
        });
    }

    let mut columns = vec![latitude.to_string(), longitude.to_string()];
    columns.extend(names.iter().map(|n| n.to_string()));
    columns.extend(names.iter().map(|n| norm_column_name(n)));
    columns.push(COMBINED_INDEX_COLUMN.to_string());

    let rows = kept
        .into_iter()
        .map(|(row_no, d)| {
            let src = &table.rows()[row_no];
            let norms: Vec<f64> = d
                .iter()
                .zip(&maxima)
                .map(|(v, m)| v / m.max)
                .collect();
            let combined = norms.iter().sum::<f64>() / norms.len() as f64;
            let mut out = Vec::with_capacity(columns.len());
            out.push(src[lat_idx].clone());
            out.push(src[lon_idx].clone());
            out.extend(d.into_iter().map(Value::Number));
            out.extend(norms.into_iter().map(Value::Number));
            out.push(Value::Number(combined));
            out
        })
        .collect();

    let table = Table::new(columns, rows)?;
    info!(
        "Normalized {} distance columns over {} rows",
        maxima.len(),
        table.row_count()
    );
    Ok(DerivedTable {
        table,
        maxima,
        dropped_rows,
    })
}
