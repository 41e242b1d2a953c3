//! Application constants for the FITS header processor
//!
//! Keyword names, output column names, file suffixes and the astronomical
//! constants used by the derived-field computations.

// =============================================================================
// Header Keywords
// =============================================================================

/// Default keyword names consulted when building a summary record
pub mod keywords {
    /// Reference coordinate of the dispersion axis
    pub const REFERENCE_COORDINATE: &str = "CRVAL1";

    /// Coordinate increment per pixel
    pub const COORDINATE_INCREMENT: &str = "CDELT1";

    /// Number of pixels along the dispersion axis
    pub const AXIS_LENGTH: &str = "NAXIS1";

    pub const OBJECT: &str = "OBJECT";
    pub const IMAGE_TYPE: &str = "IMAGETYP";
    pub const INSTRUMENT: &str = "INSTRUME";

    /// ESO pipeline fibre configuration, stored as a hierarchical keyword
    pub const OBSERVATION_MODE: &str = "HIERARCH ESO PRO REC1 FIBRE NAME";

    /// Calendar date of the observation (ISO `YYYY-MM-DD`)
    pub const DATE_OBS: &str = "DATE-OBS";

    /// Universal time of the observation (`HH:MM:SS[.fff]`)
    pub const TIME_OBS: &str = "UT";
}

/// Fragment whose presence anywhere in a header marks it as processed
pub const HISTORY_MARKER: &str = "HISTORY";

/// Commentary keywords that carry free text instead of a value
pub const COMMENTARY_KEYWORDS: &[&str] = &["HISTORY", "COMMENT", ""];

/// Prefix of the ESO hierarchical keyword convention
pub const HIERARCH_PREFIX: &str = "HIERARCH";

// =============================================================================
// Output Columns
// =============================================================================

/// Column names of the summary table, in emission order
pub mod columns {
    pub const FILE: &str = "File";
    pub const OBJECT: &str = "Object";
    pub const TYPE: &str = "Type";
    pub const INSTRUMENT: &str = "Instrument";
    pub const OBSERVATION_MODE: &str = "Observation Mode";
    pub const STATUS: &str = "Status";
    pub const LAMBDA_START: &str = "Lambda_start (Å)";
    pub const LAMBDA_END: &str = "Lambda_end (Å)";
    pub const JULIAN_DATE: &str = "Julian Date";

    /// Identifier column of projection tables
    pub const FILENAME: &str = "Filename";

    /// Fixed columns shared by both pipelines
    pub const SUMMARY: &[&str] = &[
        FILE,
        OBJECT,
        TYPE,
        INSTRUMENT,
        OBSERVATION_MODE,
        STATUS,
        LAMBDA_START,
        LAMBDA_END,
    ];
}

// =============================================================================
// File Patterns
// =============================================================================

/// Suffix of raw text header dumps
pub const TEXT_HEADER_SUFFIX: &str = ".fits_header.txt";

/// Extensions recognised as FITS files
pub const FITS_EXTENSIONS: &[&str] = &["fits", "fit", "fts"];

/// Default output file stem
pub const DEFAULT_OUTPUT_STEM: &str = "header_summary";

// =============================================================================
// FITS Layout
// =============================================================================

/// Size of a FITS logical record
pub const FITS_BLOCK_SIZE: usize = 2880;

/// Size of a single header card
pub const FITS_CARD_SIZE: usize = 80;

/// Width of the keyword field of a card
pub const FITS_KEYWORD_WIDTH: usize = 8;

/// Upper bound on header blocks read before giving up on finding `END`
pub const MAX_HEADER_BLOCKS: usize = 1024;

// =============================================================================
// Time
// =============================================================================

/// Julian Date of the Unix epoch, 1970-01-01T00:00:00 UTC
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Accepted layouts of the combined `"<date> <time>"` string
pub const OBSERVATION_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Get the output filename for a given format extension
pub fn get_output_filename(extension: &str) -> String {
    format!("{}.{}", DEFAULT_OUTPUT_STEM, extension)
}

/// Check whether a keyword introduces commentary rather than a value
pub fn is_commentary_keyword(keyword: &str) -> bool {
    COMMENTARY_KEYWORDS.contains(&keyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commentary_keywords() {
        assert!(is_commentary_keyword("HISTORY"));
        assert!(is_commentary_keyword("COMMENT"));
        assert!(is_commentary_keyword(""));
        assert!(!is_commentary_keyword("OBJECT"));
    }

    #[test]
    fn test_output_filenames() {
        assert_eq!(get_output_filename("csv"), "header_summary.csv");
        assert_eq!(get_output_filename("parquet"), "header_summary.parquet");
    }

    #[test]
    fn test_summary_column_order() {
        assert_eq!(columns::SUMMARY.first(), Some(&columns::FILE));
        assert_eq!(columns::SUMMARY.last(), Some(&columns::LAMBDA_END));
        assert!(!columns::SUMMARY.contains(&columns::JULIAN_DATE));
    }
}
