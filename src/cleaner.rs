//! Row cleaning: drop incomplete rows, then drop exact duplicates.
//!
//! A row survives null removal only if every column is populated; the
//! policy is all-columns on purpose and must not be narrowed to a subset.
//! Duplicate removal keeps the first occurrence and never reorders rows.

use crate::table::{CellKey, Table};
use crate::types::{CleanReport, ColumnCount};
use std::collections::HashSet;
use tracing::{debug, info};

/// Per-column count of missing values, in column order.
pub fn null_counts(table: &Table) -> Vec<ColumnCount> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| ColumnCount {
            column: name.clone(),
            missing: table.column_values(idx).filter(|v| v.is_missing()).count(),
        })
        .collect()
}

/// Number of rows identical (all columns) to an earlier row.
pub fn duplicate_count(table: &Table) -> usize {
    let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(table.row_count());
    table
        .rows()
        .iter()
        .filter(|row| !seen.insert(row.iter().map(|v| v.key()).collect()))
        .count()
}

pub fn clean(table: &Table) -> (Table, CleanReport) {
    info!("Cleaning {} rows...", table.row_count());

    // 1. Drop rows with a missing value in any column
    let nulls_before = null_counts(table);
    let complete: Vec<_> = table
        .rows()
        .iter()
        .filter(|row| !row.iter().any(|v| v.is_missing()))
        .cloned()
        .collect();
    let without_nulls = table.with_rows(complete);
    let nulls_after = null_counts(&without_nulls);
    debug!(
        "Dropped {} rows with missing values",
        table.row_count() - without_nulls.row_count()
    );

    // 2. Drop exact duplicates, first occurrence wins
    let duplicates_before = duplicate_count(&without_nulls);
    let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(without_nulls.row_count());
    let unique: Vec<_> = without_nulls
        .rows()
        .iter()
        .filter(|row| seen.insert(row.iter().map(|v| v.key()).collect()))
        .cloned()
        .collect();
    let cleaned = without_nulls.with_rows(unique);
    let duplicates_after = duplicate_count(&cleaned);
    debug!("Dropped {} duplicate rows", duplicates_before);

    let report = CleanReport {
        rows_before: table.row_count(),
        rows_after_null_drop: without_nulls.row_count(),
        rows_after: cleaned.row_count(),
        nulls_before,
        nulls_after,
        duplicates_before,
        duplicates_after,
    };
    info!(
        "Cleaning complete: {} -> {} rows",
        report.rows_before, report.rows_after
    );
    (cleaned, report)
}
