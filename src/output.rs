use crate::error::Result;
use crate::table::Table;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table as TextTable, Tabled};
use tracing::info;

/// Serialize a table as delimited text: header, then rows in order.
///
/// Missing values become empty fields and numbers use their shortest
/// round-trip form, so loading the output with the same delimiter gives
/// back an equal table.
pub fn export(table: &Table, delimiter: u8) -> Result<String> {
    let mut wtr = writer_builder(delimiter).from_writer(Vec::new());
    write_records(&mut wtr, table)?;
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    // Every field came from a `String` or a formatted number
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write a table to `path` in the same format as [`export`].
pub fn write_table(path: impl AsRef<Path>, table: &Table, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = writer_builder(delimiter).from_path(path)?;
    write_records(&mut wtr, table)?;
    wtr.flush()?;
    info!("Wrote {} rows to {}", table.row_count(), path.display());
    Ok(())
}

fn writer_builder(delimiter: u8) -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(delimiter);
    builder
}

fn write_records<W: std::io::Write>(wtr: &mut csv::Writer<W>, table: &Table) -> Result<()> {
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    Ok(())
}

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Print up to `max_rows` rows as a markdown table.
pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = TextTable::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
