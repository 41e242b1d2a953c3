//! FITS Header Processor Library
//!
//! Extracts observation metadata from the headers of astronomical spectra
//! and summarises it as a table.
//!
//! This library provides tools for:
//! - Keyword lookup over raw text header dumps and decoded FITS headers
//! - Deriving the wavelength range of a linear dispersion axis
//! - Converting observation date and time to a Julian Date
//! - Building uniform summary records, or projecting arbitrary keywords
//! - Assembling records into a Polars table and exporting CSV or Parquet

pub mod cli;
pub mod config;
pub mod constants;
pub mod derive;
pub mod discovery;
pub mod error;
pub mod fits;
pub mod header;
pub mod models;
pub mod processor;
pub mod record;
pub mod table;

pub use config::{KeywordSet, OutputFormat, ProcessorConfig};
pub use error::{HeaderError, Result};
pub use header::{HeaderSource, KeywordMap, TextHeader};
pub use models::{
    HeaderRecord, HeaderValue, ObservationTime, ProcessingStats, ProcessingStatus,
    ProjectedRecord, SpectralRange,
};
pub use record::RecordBuilder;
