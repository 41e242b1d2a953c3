//! Core data structures for header processing.
//!
//! Defines header values, the uniform summary record produced by both
//! pipelines, projection records and batch statistics.

use crate::error::HeaderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A single value held by a header source
///
/// Text headers only ever produce [`HeaderValue::Text`]; FITS headers carry
/// the card's native type. No coercion happens at lookup time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HeaderValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Logical(bool),
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Text(s) => f.write_str(s),
            HeaderValue::Integer(i) => write!(f, "{}", i),
            // Keep a trailing `.0` so reals stay distinguishable from integers
            HeaderValue::Real(r) if r.is_finite() && r.fract() == 0.0 && r.abs() < 1e16 => {
                write!(f, "{:.1}", r)
            }
            HeaderValue::Real(r) => write!(f, "{}", r),
            HeaderValue::Logical(true) => f.write_str("T"),
            HeaderValue::Logical(false) => f.write_str("F"),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Integer(value)
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> Self {
        HeaderValue::Real(value)
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        HeaderValue::Logical(value)
    }
}

/// Representation a header was obtained in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Raw `KEY = value` text dump
    Text,
    /// Structured primary header of a FITS file
    Fits,
}

/// Coarse processing status derived from the header's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStatus {
    Processed,
    Unknown,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Processed => "processed",
            ProcessingStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wavelength coverage of the dispersion axis
///
/// Both bounds exist together or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SpectralRange {
    #[default]
    Absent,
    Bounds { start: f64, end: f64 },
}

impl SpectralRange {
    pub fn start(&self) -> Option<f64> {
        match self {
            SpectralRange::Bounds { start, .. } => Some(*start),
            SpectralRange::Absent => None,
        }
    }

    pub fn end(&self) -> Option<f64> {
        match self {
            SpectralRange::Bounds { end, .. } => Some(*end),
            SpectralRange::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, SpectralRange::Absent)
    }
}

/// Observation time of a record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObservationTime {
    /// The pipeline that built the record does not derive a timestamp
    NotApplicable,
    /// Date or time missing, or the pair failed to parse
    Absent,
    JulianDate(f64),
}

impl ObservationTime {
    pub fn julian_date(&self) -> Option<f64> {
        match self {
            ObservationTime::JulianDate(jd) => Some(*jd),
            _ => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, ObservationTime::NotApplicable)
    }
}

/// Uniform summary of one header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub file_id: String,
    pub object: Option<String>,
    pub image_type: Option<String>,
    pub instrument: Option<String>,
    pub observation_mode: Option<String>,
    pub status: ProcessingStatus,
    pub spectral_range: SpectralRange,
    pub timestamp: ObservationTime,
}

/// Selected keyword values of one header, in the order they were requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRecord {
    pub file_id: String,
    pub fields: Vec<(String, Option<HeaderValue>)>,
}

impl ProjectedRecord {
    /// Value of a requested keyword, `None` if absent or never requested
    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == keyword)
            .and_then(|(_, value)| value.as_ref())
    }
}

/// A header source that could not be obtained
#[derive(Debug)]
pub struct SourceSkip {
    pub path: PathBuf,
    pub error: HeaderError,
}

/// Batch processing statistics
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub sources_found: usize,
    pub records_built: usize,
    pub sources_skipped: usize,
    pub output_path: Option<PathBuf>,
    pub processing_time_ms: u128,
}
