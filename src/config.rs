//! Configuration management and validation.
//!
//! Provides the keyword set consulted for each summary field, input file
//! recognition rules and output settings.

use crate::constants::{FITS_EXTENSIONS, TEXT_HEADER_SUFFIX, keywords};
use crate::error::{HeaderError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Keyword names consulted when building summary records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub reference_coordinate: String,
    pub coordinate_increment: String,
    pub axis_length: String,
    pub object: String,
    pub image_type: String,
    pub instrument: String,
    pub observation_mode: String,
    pub date_obs: String,
    pub time_obs: String,
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self {
            reference_coordinate: keywords::REFERENCE_COORDINATE.to_string(),
            coordinate_increment: keywords::COORDINATE_INCREMENT.to_string(),
            axis_length: keywords::AXIS_LENGTH.to_string(),
            object: keywords::OBJECT.to_string(),
            image_type: keywords::IMAGE_TYPE.to_string(),
            instrument: keywords::INSTRUMENT.to_string(),
            observation_mode: keywords::OBSERVATION_MODE.to_string(),
            date_obs: keywords::DATE_OBS.to_string(),
            time_obs: keywords::TIME_OBS.to_string(),
        }
    }
}

impl KeywordSet {
    /// Override the hierarchical observation-mode keyword
    pub fn with_observation_mode(mut self, keyword: impl Into<String>) -> Self {
        self.observation_mode = keyword.into();
        self
    }

    fn iter(&self) -> impl Iterator<Item = &str> {
        [
            &self.reference_coordinate,
            &self.coordinate_increment,
            &self.axis_length,
            &self.object,
            &self.image_type,
            &self.instrument,
            &self.observation_mode,
            &self.date_obs,
            &self.time_obs,
        ]
        .into_iter()
        .map(String::as_str)
    }
}

/// Supported table export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }

    /// Parse a user-supplied format name (csv, parquet)
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "parquet" | "pq" => Ok(OutputFormat::Parquet),
            other => Err(HeaderError::Configuration {
                message: format!("Unknown output format: {} (expected csv or parquet)", other),
            }),
        }
    }
}

/// Which header representations to pick up from the inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceSelection {
    /// Both text dumps and FITS files
    #[default]
    Auto,
    TextOnly,
    FitsOnly,
}

/// Global configuration for header processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Keywords consulted for each summary field
    pub keywords: KeywordSet,

    /// File-name suffix identifying raw text header dumps
    pub text_header_suffix: String,

    /// Extensions identifying FITS files (without the dot)
    pub fits_extensions: Vec<String>,

    /// Which representations discovery should pick up
    pub selection: SourceSelection,

    /// Descend into subdirectories during discovery
    pub recursive: bool,

    /// Table export format
    pub output_format: OutputFormat,

    /// Show a progress bar while reading sources
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordSet::default(),
            text_header_suffix: TEXT_HEADER_SUFFIX.to_string(),
            fits_extensions: FITS_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            selection: SourceSelection::Auto,
            recursive: false,
            output_format: OutputFormat::Csv,
            show_progress: true,
        }
    }
}

impl ProcessorConfig {
    pub fn with_keywords(mut self, keywords: KeywordSet) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_text_header_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.text_header_suffix = suffix.into();
        self
    }

    pub fn with_selection(mut self, selection: SourceSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Whether `path` names a raw text header dump
    pub fn is_text_header(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(&self.text_header_suffix))
    }

    /// Whether `path` names a FITS file
    pub fn is_fits_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.fits_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    /// Reject configurations that could never match a keyword or file
    pub fn validate(&self) -> Result<()> {
        if let Some(empty) = self.keywords.iter().position(|k| k.trim().is_empty()) {
            return Err(HeaderError::Configuration {
                message: format!("Keyword #{} in the keyword set is empty", empty + 1),
            });
        }

        if self.text_header_suffix.is_empty() {
            return Err(HeaderError::Configuration {
                message: "Text header suffix must not be empty".to_string(),
            });
        }

        if self.fits_extensions.is_empty() && self.selection != SourceSelection::TextOnly {
            return Err(HeaderError::Configuration {
                message: "At least one FITS extension is required".to_string(),
            });
        }

        debug!("Configuration validated: {:?}", self.selection);
        Ok(())
    }
}
