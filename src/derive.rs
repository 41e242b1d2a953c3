//! Derived-field computation.
//!
//! Turns raw keyword values into a wavelength range (linear dispersion
//! model), a Julian Date (mapping pipeline only) and a processing status.
//! Every routine returns an explicit `Result`; the record builder collapses
//! failures to absence so nothing here can abort a record.

use crate::config::KeywordSet;
use crate::constants::{
    HISTORY_MARKER, OBSERVATION_DATETIME_FORMATS, SECONDS_PER_DAY, UNIX_EPOCH_JD,
};
use crate::header::HeaderSource;
use crate::models::{HeaderValue, ProcessingStatus, SpectralRange};
use chrono::{NaiveDateTime, Timelike};
use thiserror::Error;

/// Why a keyword value could not be turned into a derived quantity
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("keyword {keyword} not present")]
    Missing { keyword: String },

    #[error("keyword {keyword} value '{value}' is not a real number")]
    NotReal { keyword: String, value: String },

    #[error("keyword {keyword} value '{value}' is not an integer")]
    NotInteger { keyword: String, value: String },

    #[error("observation date-time '{value}' is invalid: {reason}")]
    InvalidDateTime { value: String, reason: String },
}

/// Coerce a header value to a real number
///
/// Logical values are rejected rather than read as 1.0/0.0, so a `T`/`F`
/// card never yields a wavelength.
pub fn coerce_real(keyword: &str, value: &HeaderValue) -> Result<f64, CoercionError> {
    let not_real = || CoercionError::NotReal {
        keyword: keyword.to_string(),
        value: value.to_string(),
    };

    match value {
        HeaderValue::Real(r) => Ok(*r),
        HeaderValue::Integer(i) => Ok(*i as f64),
        HeaderValue::Text(s) => s.trim().parse::<f64>().map_err(|_| not_real()),
        HeaderValue::Logical(_) => Err(not_real()),
    }
}

/// Coerce a header value to an integer
///
/// Text must spell an integer exactly; finite reals are truncated toward zero.
pub fn coerce_integer(keyword: &str, value: &HeaderValue) -> Result<i64, CoercionError> {
    let not_integer = || CoercionError::NotInteger {
        keyword: keyword.to_string(),
        value: value.to_string(),
    };

    match value {
        HeaderValue::Integer(i) => Ok(*i),
        HeaderValue::Real(r) if r.is_finite() => Ok(r.trunc() as i64),
        HeaderValue::Text(s) => s.trim().parse::<i64>().map_err(|_| not_integer()),
        HeaderValue::Real(_) | HeaderValue::Logical(_) => Err(not_integer()),
    }
}

fn require<S: HeaderSource + ?Sized>(
    source: &S,
    keyword: &str,
) -> Result<HeaderValue, CoercionError> {
    source.lookup(keyword).ok_or_else(|| CoercionError::Missing {
        keyword: keyword.to_string(),
    })
}

/// Round to two decimal places for emission
///
/// Correctly rounded from the exact binary value, ties to even. Magnitudes
/// of 1e15 and above carry no hundredths and are returned unchanged.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e15 {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Wavelength bounds of a linear dispersion axis
///
/// `start = R`, `end = R + D * (N - 1)`, both rounded to two decimals.
/// A computed bound of exactly zero is a real value and is kept.
pub fn linear_range(reference: f64, increment: f64, length: i64) -> SpectralRange {
    let start = reference;
    let end = reference + increment * (length as f64 - 1.0);

    SpectralRange::Bounds {
        start: round2(start),
        end: round2(end),
    }
}

/// Look up the dispersion keywords and compute the spectral range
///
/// Fails as a whole if any of the three keywords is missing or non-numeric;
/// a partial range is never produced.
pub fn spectral_range<S: HeaderSource + ?Sized>(
    source: &S,
    keywords: &KeywordSet,
) -> Result<SpectralRange, CoercionError> {
    let reference = coerce_real(
        &keywords.reference_coordinate,
        &require(source, &keywords.reference_coordinate)?,
    )?;
    let increment = coerce_real(
        &keywords.coordinate_increment,
        &require(source, &keywords.coordinate_increment)?,
    )?;
    let length = coerce_integer(
        &keywords.axis_length,
        &require(source, &keywords.axis_length)?,
    )?;

    Ok(linear_range(reference, increment, length))
}

/// Parse `"<date> <time>"` as a UTC instant and convert it to a Julian Date
pub fn julian_date(date: &str, time: &str) -> Result<f64, CoercionError> {
    let combined = format!("{} {}", date.trim(), time.trim());

    let mut last_error = None;
    for format in OBSERVATION_DATETIME_FORMATS {
        match NaiveDateTime::parse_from_str(&combined, format) {
            Ok(datetime) => return Ok(datetime_to_jd(&datetime)),
            Err(e) => last_error = Some(e),
        }
    }

    Err(CoercionError::InvalidDateTime {
        value: combined,
        reason: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no accepted layout".to_string()),
    })
}

/// Julian Date of a naive UTC date-time
pub fn datetime_to_jd(datetime: &NaiveDateTime) -> f64 {
    let utc = datetime.and_utc();
    // Leap-second nanos (>= 1e9) are folded into the same calendar second
    let nanos = utc.nanosecond().min(999_999_999);
    let seconds = utc.timestamp() as f64 + f64::from(nanos) / 1e9;

    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Look up the observation date and time and compute the Julian Date
pub fn observation_julian_date<S: HeaderSource + ?Sized>(
    source: &S,
    keywords: &KeywordSet,
) -> Result<f64, CoercionError> {
    let date = require(source, &keywords.date_obs)?;
    let time = require(source, &keywords.time_obs)?;

    julian_date(&date.to_string(), &time.to_string())
}

/// `Processed` iff the history marker occurs anywhere in the rendered header
pub fn processing_status<S: HeaderSource + ?Sized>(source: &S) -> ProcessingStatus {
    if source.contains_fragment(HISTORY_MARKER) {
        ProcessingStatus::Processed
    } else {
        ProcessingStatus::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{KeywordMap, TextHeader};

    fn keywords() -> KeywordSet {
        KeywordSet::default()
    }

    #[test]
    fn test_coerce_real() {
        assert_eq!(coerce_real("K", &HeaderValue::from("4000.0")), Ok(4000.0));
        assert_eq!(coerce_real("K", &HeaderValue::Integer(12)), Ok(12.0));
        assert_eq!(coerce_real("K", &HeaderValue::Real(1.25)), Ok(1.25));
        assert!(coerce_real("K", &HeaderValue::from("abc")).is_err());
        assert!(coerce_real("K", &HeaderValue::Logical(true)).is_err());
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer("K", &HeaderValue::from("100")), Ok(100));
        assert_eq!(coerce_integer("K", &HeaderValue::Integer(100)), Ok(100));
        assert_eq!(coerce_integer("K", &HeaderValue::Real(100.0)), Ok(100));
        assert!(coerce_integer("K", &HeaderValue::from("100.0")).is_err());
        assert!(coerce_integer("K", &HeaderValue::Real(f64::NAN)).is_err());
    }

    #[test]
    fn test_linear_range_formula() {
        let range = linear_range(4000.0, 1.25, 100);
        assert_eq!(range.start(), Some(4000.0));
        assert_eq!(range.end(), Some(4123.75));
    }

    #[test]
    fn test_linear_range_rounds_to_two_decimals() {
        let range = linear_range(3500.123456, 0.0333, 1001);
        assert_eq!(range.start(), Some(3500.12));
        assert_eq!(range.end(), Some(3533.42));
    }

    #[test]
    fn test_round2_ties_and_large_values() {
        // 2.675 is stored just below the tie, 0.125 is an exact tie
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(1e307), 1e307);
        assert_eq!(round2(-1.005), -1.0);
    }

    #[test]
    fn test_single_and_empty_axis() {
        let single = linear_range(4000.0, 1.25, 1);
        assert_eq!(single.start(), Some(4000.0));
        assert_eq!(single.end(), Some(4000.0));

        let empty = linear_range(4000.0, 1.25, 0);
        assert_eq!(empty.end(), Some(3998.75));
    }

    #[test]
    fn test_extreme_axis_length_does_not_panic() {
        let header = TextHeader::new(
            "CRVAL1 = 4000.0\nCDELT1 = 1.25\nNAXIS1 = -9223372036854775808\n",
        );
        let range = spectral_range(&header, &keywords()).unwrap();

        assert_eq!(range.start(), Some(4000.0));
        assert!(range.end().is_some_and(|end| end < 0.0));
    }

    #[test]
    fn test_huge_reference_stays_finite() {
        let header = TextHeader::new("CRVAL1 = 1e307\nCDELT1 = 0\nNAXIS1 = 1\n");
        let range = spectral_range(&header, &keywords()).unwrap();

        assert_eq!(range.start(), Some(1e307));
        assert_eq!(range.end(), Some(1e307));
    }

    #[test]
    fn test_zero_bound_is_preserved() {
        let range = linear_range(0.0, 2.0, 11);
        assert_eq!(range.start(), Some(0.0));
        assert_eq!(range.end(), Some(20.0));
    }

    #[test]
    fn test_spectral_range_from_text() {
        let header = TextHeader::new("CRVAL1 = 4000.0\nCDELT1 = 1.25\nNAXIS1 = 100\n");
        let range = spectral_range(&header, &keywords()).unwrap();
        assert_eq!(
            range,
            SpectralRange::Bounds {
                start: 4000.0,
                end: 4123.75
            }
        );
    }

    #[test]
    fn test_spectral_range_missing_increment() {
        let map: KeywordMap = [
            ("CRVAL1", HeaderValue::Real(4000.0)),
            ("NAXIS1", HeaderValue::Integer(100)),
        ]
        .into_iter()
        .collect();

        match spectral_range(&map, &keywords()) {
            Err(CoercionError::Missing { keyword }) => assert_eq!(keyword, "CDELT1"),
            other => panic!("Expected missing CDELT1, got {:?}", other),
        }
    }

    #[test]
    fn test_spectral_range_non_numeric() {
        let header = TextHeader::new("CRVAL1 = 4000.0\nCDELT1 = 'wide'\nNAXIS1 = 100\n");
        assert!(matches!(
            spectral_range(&header, &keywords()),
            Err(CoercionError::NotReal { .. })
        ));
    }

    #[test]
    fn test_julian_date_noon() {
        assert_eq!(julian_date("2020-01-01", "12:00:00"), Ok(2458850.0));
    }

    #[test]
    fn test_julian_date_trims_components() {
        assert_eq!(julian_date(" 2020-01-01 ", " 00:00:00 "), Ok(2458849.5));
    }

    #[test]
    fn test_julian_date_fractional_seconds() {
        let jd = julian_date("2000-01-01", "18:00:00.000").unwrap();
        assert!((jd - 2451545.25).abs() < 1e-9);
    }

    #[test]
    fn test_julian_date_rejects_malformed_input() {
        assert!(julian_date("2020-02-30", "12:00:00").is_err());
        assert!(julian_date("2020-01-01", "25:00:00").is_err());
        assert!(julian_date("yesterday", "noon").is_err());
        assert!(julian_date("2020-01-01T12:00:00", "12:00:00").is_err());
    }

    #[test]
    fn test_observation_julian_date_missing_time() {
        let map: KeywordMap = [("DATE-OBS", "2020-01-01")].into_iter().collect();
        assert!(matches!(
            observation_julian_date(&map, &keywords()),
            Err(CoercionError::Missing { .. })
        ));
    }

    #[test]
    fn test_processing_status() {
        let processed = TextHeader::new("OBJECT = 'X'\nHISTORY flat fielded\n");
        let unknown = TextHeader::new("OBJECT = 'X'\n");
        assert_eq!(processing_status(&processed), ProcessingStatus::Processed);
        assert_eq!(processing_status(&unknown), ProcessingStatus::Unknown);

        let map: KeywordMap = [("HISTORY", "bias")].into_iter().collect();
        assert_eq!(processing_status(&map), ProcessingStatus::Processed);
    }
}
