//! Error handling for header processing operations.
//!
//! Covers failures to obtain a header source (unreadable files, malformed
//! FITS headers), directory discovery and table export. Per-field coercion
//! failures live in [`crate::derive::CoercionError`] and never reach here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to read header source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid FITS header in file: {path} - {reason}")]
    InvalidFitsHeader { path: PathBuf, reason: String },

    #[error("Unsupported header source: {path}")]
    UnsupportedSource { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("No header sources found in the given inputs")]
    NoSources,
}

pub type Result<T> = std::result::Result<T, HeaderError>;
