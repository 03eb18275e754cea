//! In-memory table: ordered named columns over ordered rows of [`Value`]s.
//!
//! Tables are immutable once built. Every stage takes `&Table` and hands back
//! a new table or a summary value.

use crate::error::{AnalysisError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
}

/// Hashable identity of a cell, used for duplicate detection and grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CellKey {
    Missing,
    Number(u64),
    Text(String),
}

impl Value {
    /// Build a number cell. NaN is stored as missing.
    pub fn number(v: f64) -> Self {
        if v.is_nan() {
            Value::Missing
        } else {
            Value::Number(v)
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub(crate) fn key(&self) -> CellKey {
        match self {
            Value::Missing => CellKey::Missing,
            // -0.0 and 0.0 compare equal, so they must share a key
            Value::Number(v) if *v == 0.0 => CellKey::Number(0.0f64.to_bits()),
            Value::Number(v) => CellKey::Number(v.to_bits()),
            Value::Text(s) => CellKey::Text(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Semantic type of a column, derived from its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => f.write_str("numeric"),
            ColumnKind::Text => f.write_str("text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, checking that column names are unique and every row
    /// has exactly one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(AnalysisError::format(
                    None,
                    format!("duplicate column name '{name}'"),
                ));
            }
        }
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(AnalysisError::format(
                None,
                format!(
                    "row {} has {} values, expected {}",
                    idx,
                    row.len(),
                    columns.len()
                ),
            ));
        }
        Ok(Self { columns, rows })
    }

    /// Rows taken from an existing table keep its column set, so the
    /// width check is already satisfied.
    pub(crate) fn with_rows(&self, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name`, or `ColumnNotFound`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| AnalysisError::ColumnNotFound(name.to_string()))
    }

    /// Resolve several column names at once, failing on the first absent one.
    pub fn column_indices<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|n| self.column_index(n.as_ref()))
            .collect()
    }

    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |r| &r[idx])
    }

    /// `Numeric` when every present value is a number. An all-missing
    /// column counts as numeric.
    pub fn column_kind(&self, idx: usize) -> ColumnKind {
        if self
            .column_values(idx)
            .all(|v| matches!(v, Value::Missing | Value::Number(_)))
        {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }

    /// Numeric values of a column paired with their row index. Missing cells
    /// are skipped; a text cell is an error.
    pub(crate) fn numeric_column(&self, idx: usize) -> Result<Vec<(usize, f64)>> {
        let mut out = Vec::with_capacity(self.rows.len());
        for (row, value) in self.column_values(idx).enumerate() {
            match value {
                Value::Missing => {}
                Value::Number(v) => out.push((row, *v)),
                Value::Text(s) => {
                    return Err(AnalysisError::NonNumeric {
                        column: self.columns[idx].clone(),
                        row,
                        value: s.clone(),
                    })
                }
            }
        }
        Ok(out)
    }
}
