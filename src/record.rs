//! Record building.
//!
//! Assembles one [`HeaderRecord`] per header from keyword lookups and
//! derived fields. Derivation failures only blank the affected fields; a
//! record is always produced. The projection variant copies an arbitrary
//! list of keywords without any derivation.

use crate::config::KeywordSet;
use crate::derive::{observation_julian_date, processing_status, spectral_range};
use crate::fits::LoadedHeader;
use crate::header::{HeaderSource, KeywordMap, TextHeader};
use crate::models::{HeaderRecord, ObservationTime, ProjectedRecord, SpectralRange};
use tracing::debug;

/// Builds summary records against a fixed keyword set
#[derive(Debug, Clone)]
pub struct RecordBuilder<'a> {
    keywords: &'a KeywordSet,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(keywords: &'a KeywordSet) -> Self {
        Self { keywords }
    }

    /// Record for a raw text header; no timestamp is derived
    pub fn from_text(&self, file_id: impl Into<String>, header: &TextHeader) -> HeaderRecord {
        self.build(file_id.into(), header, ObservationTime::NotApplicable)
    }

    /// Record for a keyword map, including the Julian Date
    pub fn from_mapping(&self, file_id: impl Into<String>, header: &KeywordMap) -> HeaderRecord {
        let file_id = file_id.into();
        let timestamp = match observation_julian_date(header, self.keywords) {
            Ok(jd) => ObservationTime::JulianDate(jd),
            Err(e) => {
                debug!("{}: no observation time ({})", file_id, e);
                ObservationTime::Absent
            }
        };

        self.build(file_id, header, timestamp)
    }

    /// Record for a header in either representation
    pub fn from_loaded(&self, file_id: impl Into<String>, header: &LoadedHeader) -> HeaderRecord {
        match header {
            LoadedHeader::Text(text) => self.from_text(file_id, text),
            LoadedHeader::Fits(map) => self.from_mapping(file_id, map),
        }
    }

    fn build<S: HeaderSource + ?Sized>(
        &self,
        file_id: String,
        source: &S,
        timestamp: ObservationTime,
    ) -> HeaderRecord {
        let spectral_range = spectral_range(source, self.keywords).unwrap_or_else(|e| {
            debug!("{}: no spectral range ({})", file_id, e);
            SpectralRange::Absent
        });

        let text = |keyword: &str| source.lookup(keyword).map(|value| value.to_string());

        HeaderRecord {
            object: text(&self.keywords.object),
            image_type: text(&self.keywords.image_type),
            instrument: text(&self.keywords.instrument),
            observation_mode: text(&self.keywords.observation_mode),
            status: processing_status(source),
            spectral_range,
            timestamp,
            file_id,
        }
    }
}

/// Copy exactly the requested keywords from a header
pub fn project<S: HeaderSource + ?Sized>(
    file_id: impl Into<String>,
    source: &S,
    desired_keys: &[String],
) -> ProjectedRecord {
    ProjectedRecord {
        file_id: file_id.into(),
        fields: desired_keys
            .iter()
            .map(|key| (key.clone(), source.lookup(key)))
            .collect(),
    }
}

/// Build one record per `(file_id, header)` pair, in input order
pub fn build_records<'h, I, K>(keywords: &KeywordSet, headers: I) -> Vec<HeaderRecord>
where
    I: IntoIterator<Item = (K, &'h LoadedHeader)>,
    K: Into<String>,
{
    let builder = RecordBuilder::new(keywords);
    headers
        .into_iter()
        .map(|(file_id, header)| builder.from_loaded(file_id, header))
        .collect()
}

/// Project every `(file_id, header)` pair onto `desired_keys`
pub fn build_projection<'h, I, K>(desired_keys: &[String], headers: I) -> Vec<ProjectedRecord>
where
    I: IntoIterator<Item = (K, &'h LoadedHeader)>,
    K: Into<String>,
{
    headers
        .into_iter()
        .map(|(file_id, header)| project(file_id, header.as_source(), desired_keys))
        .collect()
}
