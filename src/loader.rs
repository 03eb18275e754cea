use crate::config::LoadOptions;
use crate::error::{AnalysisError, Result};
use crate::table::Table;
use crate::util::parse_cell;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Parse delimited text into a table.
///
/// The first record is the header; every later record must have the same
/// field count. Values are classified by [`parse_cell`] and nothing more.
pub fn load_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_error)?.clone();
    if headers.is_empty() {
        return Err(AnalysisError::format(None, "source is empty"));
    }
    let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    debug!("Header has {} columns", columns.len());

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_error)?;
        rows.push(
            record
                .iter()
                .map(|field| parse_cell(field, &options.missing_markers))
                .collect(),
        );
    }

    let table = Table::new(columns, rows)?;
    info!(
        "Loaded {} rows x {} columns",
        table.row_count(),
        table.columns().len()
    );
    Ok(table)
}

pub fn load_str(text: &str, options: &LoadOptions) -> Result<Table> {
    load_reader(text.as_bytes(), options)
}

pub fn load_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Table> {
    let path = path.as_ref();
    info!("Reading {}", path.display());
    let file = File::open(path)?;
    load_reader(file, options)
}

fn csv_error(err: csv::Error) -> AnalysisError {
    if err.is_io_error() {
        return AnalysisError::Io(err.into());
    }
    let line = err.position().map(|p| p.line());
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => AnalysisError::format(
            line,
            format!("expected {} fields, found {}", expected_len, len),
        ),
        _ => AnalysisError::format(line, err.to_string()),
    }
}
