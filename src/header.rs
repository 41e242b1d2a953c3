//! Keyword lookup over heterogeneous header representations.
//!
//! A header is either a raw text dump of `KEY = value` lines or a structured
//! keyword map decoded from a FITS file. Both implement [`HeaderSource`] so
//! the derived-field and record-building code never branches on the
//! representation.

use crate::models::HeaderValue;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Read-only keyword lookup shared by every header representation
pub trait HeaderSource {
    /// Value stored under `keyword`, or `None` when the keyword is not present
    fn lookup(&self, keyword: &str) -> Option<HeaderValue>;

    /// Full textual rendering of the header
    fn render(&self) -> Cow<'_, str>;

    /// Whether `fragment` occurs anywhere in the rendered header
    fn contains_fragment(&self, fragment: &str) -> bool {
        self.render().contains(fragment)
    }
}

/// Raw text header, searched by pattern matching
#[derive(Debug, Clone)]
pub struct TextHeader {
    text: String,
}

impl TextHeader {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Find the first line assigning `keyword` and return its trimmed value
    ///
    /// The keyword is escaped so compound keys and metacharacters match
    /// literally. An optional opening quote is skipped and the capture stops
    /// at the next quote or the end of the line.
    pub fn find_value(&self, keyword: &str) -> Option<&str> {
        let pattern = format!(
            r"(?m)^[ \t]*{}[ \t]*=[ \t]*'?([^\n']+)'?",
            regex::escape(keyword)
        );

        let regex = match Regex::new(&pattern) {
            Ok(regex) => regex,
            Err(e) => {
                warn!("Could not build lookup pattern for {}: {}", keyword, e);
                return None;
            }
        };

        regex
            .captures(&self.text)
            .and_then(|caps| caps.get(1))
            .map(|value| value.as_str().trim())
    }
}

impl HeaderSource for TextHeader {
    fn lookup(&self, keyword: &str) -> Option<HeaderValue> {
        self.find_value(keyword).map(HeaderValue::from)
    }

    fn render(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }
}

/// Structured keyword/value header with exact, case-sensitive keys
///
/// Entries keep their original order; repeated keys (commentary cards) are
/// all retained but lookups resolve to the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct KeywordMap {
    entries: Vec<(String, HeaderValue)>,
    index: HashMap<String, usize>,
}

impl KeywordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, keyword: impl Into<String>, value: impl Into<HeaderValue>) {
        let keyword = keyword.into();
        self.index
            .entry(keyword.clone())
            .or_insert(self.entries.len());
        self.entries.push((keyword, value.into()));
    }

    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.index
            .get(keyword)
            .map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, keyword: &str) -> bool {
        self.index.contains_key(keyword)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries
            .iter()
            .map(|(keyword, value)| (keyword.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for KeywordMap
where
    K: Into<String>,
    V: Into<HeaderValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = KeywordMap::new();
        for (keyword, value) in iter {
            map.push(keyword, value);
        }
        map
    }
}

impl fmt::Display for KeywordMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (keyword, value) in &self.entries {
            if crate::constants::is_commentary_keyword(keyword) {
                writeln!(f, "{} {}", keyword, value)?;
            } else {
                writeln!(f, "{} = {}", keyword, value)?;
            }
        }
        Ok(())
    }
}

impl HeaderSource for KeywordMap {
    fn lookup(&self, keyword: &str) -> Option<HeaderValue> {
        self.get(keyword).cloned()
    }

    fn render(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "SIMPLE  = T\n\
                          OBJECT  = 'NGC1234 '\n\
                          CRVAL1  = 4000.0\n\
                          HIERARCH ESO PRO REC1 FIBRE NAME = 'OBJECT'\n\
                          OBJECT = 'SECOND'\n";

    #[test]
    fn test_text_lookup_strips_quotes_and_whitespace() {
        let header = TextHeader::new(SAMPLE);
        assert_eq!(header.find_value("OBJECT"), Some("NGC1234"));
        assert_eq!(header.find_value("CRVAL1"), Some("4000.0"));
    }

    #[test]
    fn test_text_lookup_first_match_wins() {
        let header = TextHeader::new("OBJECT = 'FIRST'\nOBJECT = 'SECOND'\n");
        assert_eq!(header.find_value("OBJECT"), Some("FIRST"));
    }

    #[test]
    fn test_text_lookup_missing_keyword() {
        let header = TextHeader::new(SAMPLE);
        assert_eq!(header.find_value("CDELT1"), None);
        assert_eq!(header.lookup("CDELT1"), None);
    }

    #[test]
    fn test_text_lookup_compound_keyword() {
        let header = TextHeader::new(SAMPLE);
        assert_eq!(
            header.find_value("HIERARCH ESO PRO REC1 FIBRE NAME"),
            Some("OBJECT")
        );
    }

    #[test]
    fn test_text_lookup_is_literal() {
        // `.` must not act as a wildcard
        let header = TextHeader::new("CRVALX1 = 12\nESOXPRO = 3\n");
        assert_eq!(header.find_value("CRVAL.1"), None);
        assert_eq!(header.find_value("ESO.PRO"), None);

        let header = TextHeader::new("CRVAL.1 = 12\n");
        assert_eq!(header.find_value("CRVAL.1"), Some("12"));
    }

    #[test]
    fn test_text_lookup_does_not_match_keyword_suffix() {
        let header = TextHeader::new("ZNAXIS1 = 7\nNAXIS1 = 100\n");
        assert_eq!(header.find_value("NAXIS1"), Some("100"));
    }

    #[test]
    fn test_text_lookup_stays_on_one_line() {
        let header = TextHeader::new("OBJECT =\nINSTRUME = 'UVES'\n");
        assert_eq!(header.find_value("OBJECT"), None);
        assert_eq!(header.find_value("INSTRUME"), Some("UVES"));
    }

    #[test]
    fn test_keyword_map_exact_lookup() {
        let map: KeywordMap = [("DATE-OBS", "2020-01-01"), ("UT", "12:00:00")]
            .into_iter()
            .collect();

        assert_eq!(map.lookup("DATE-OBS"), Some(HeaderValue::from("2020-01-01")));
        assert_eq!(map.lookup("date-obs"), None);
        assert_eq!(map.lookup(" UT"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_keyword_map_first_occurrence() {
        let mut map = KeywordMap::new();
        map.push("HISTORY", "bias subtracted");
        map.push("HISTORY", "flat fielded");

        assert_eq!(map.get("HISTORY"), Some(&HeaderValue::from("bias subtracted")));
        assert_eq!(map.iter().count(), 2);
    }

    #[test]
    fn test_keyword_map_render() {
        let mut map = KeywordMap::new();
        map.push("NAXIS1", 100_i64);
        map.push("HISTORY", "reduced");

        let rendered = map.render();
        assert!(rendered.contains("NAXIS1 = 100"));
        assert!(rendered.contains("HISTORY reduced"));
        assert!(map.contains_fragment("HISTORY"));
    }
}
