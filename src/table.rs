//! Tabular assembly and export.
//!
//! Converts summary or projection records into a Polars `DataFrame` with
//! a stable column order, and writes it out as CSV or Parquet.

use crate::config::OutputFormat;
use crate::constants::columns;
use crate::error::{HeaderError, Result};
use crate::models::{HeaderRecord, ProjectedRecord};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Build the summary table
///
/// The `Julian Date` column is appended when any record came from the
/// mapping pipeline; rows without a timestamp hold nulls.
pub fn summary_frame(records: &[HeaderRecord]) -> Result<DataFrame> {
    let files: Vec<String> = records.iter().map(|r| r.file_id.clone()).collect();
    let status: Vec<&str> = records.iter().map(|r| r.status.as_str()).collect();
    let starts: Vec<Option<f64>> = records.iter().map(|r| r.spectral_range.start()).collect();
    let ends: Vec<Option<f64>> = records.iter().map(|r| r.spectral_range.end()).collect();

    let mut frame_columns = vec![
        Column::new(columns::FILE.into(), files),
        text_column(columns::OBJECT, records, |r| r.object.as_deref()),
        text_column(columns::TYPE, records, |r| r.image_type.as_deref()),
        text_column(columns::INSTRUMENT, records, |r| r.instrument.as_deref()),
        text_column(columns::OBSERVATION_MODE, records, |r| {
            r.observation_mode.as_deref()
        }),
        Column::new(columns::STATUS.into(), status),
        Column::new(columns::LAMBDA_START.into(), starts),
        Column::new(columns::LAMBDA_END.into(), ends),
    ];

    if records.iter().any(|r| r.timestamp.is_applicable()) {
        let dates: Vec<Option<f64>> = records.iter().map(|r| r.timestamp.julian_date()).collect();
        frame_columns.push(Column::new(columns::JULIAN_DATE.into(), dates));
    }

    let frame = DataFrame::new(frame_columns)?;
    debug!("Assembled summary table: {:?}", frame.shape());
    Ok(frame)
}

fn text_column(
    name: &str,
    records: &[HeaderRecord],
    field: impl Fn(&HeaderRecord) -> Option<&str>,
) -> Column {
    let values: Vec<Option<&str>> = records.iter().map(field).collect();
    Column::new(name.into(), values)
}

/// Build a projection table: `Filename` then one text column per key
pub fn projection_frame(records: &[ProjectedRecord], desired_keys: &[String]) -> Result<DataFrame> {
    let mut frame_columns = Vec::with_capacity(desired_keys.len() + 1);

    let files: Vec<String> = records.iter().map(|r| r.file_id.clone()).collect();
    frame_columns.push(Column::new(columns::FILENAME.into(), files));

    for key in desired_keys {
        if key == columns::FILENAME {
            return Err(HeaderError::Configuration {
                message: format!("'{}' is reserved for the file column", key),
            });
        }

        let values: Vec<Option<String>> = records
            .iter()
            .map(|r| r.get(key).map(|value| value.to_string()))
            .collect();
        frame_columns.push(Column::new(key.as_str().into(), values));
    }

    Ok(DataFrame::new(frame_columns)?)
}

/// Write `frame` to `path` in the requested format
pub fn write_frame(frame: &mut DataFrame, path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    match format {
        OutputFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(frame)?;
        }
        OutputFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(frame)?;
        }
    }

    debug!(
        "Wrote {} rows to {} ({:?})",
        frame.height(),
        path.display(),
        format
    );
    Ok(())
}
