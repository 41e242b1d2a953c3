//! Header source provider.
//!
//! Obtains a header for a file path, either as a raw text dump
//! (`*.fits_header.txt`) or as a [`KeywordMap`] decoded from the primary
//! header of a FITS file.
//!
//! FITS layout:
//! - 2880-byte blocks
//! - 80-character cards, `KEYWORD = value / comment`
//! - header terminated by an `END` card

use crate::config::ProcessorConfig;
use crate::constants::{
    FITS_BLOCK_SIZE, FITS_CARD_SIZE, FITS_KEYWORD_WIDTH, HIERARCH_PREFIX, MAX_HEADER_BLOCKS,
    is_commentary_keyword,
};
use crate::error::{HeaderError, Result};
use crate::header::{HeaderSource, KeywordMap, TextHeader};
use crate::models::{HeaderValue, SourceKind};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::debug;

/// A header obtained from disk, in whichever representation it came in
#[derive(Debug, Clone)]
pub enum LoadedHeader {
    Text(TextHeader),
    Fits(KeywordMap),
}

impl LoadedHeader {
    pub fn kind(&self) -> SourceKind {
        match self {
            LoadedHeader::Text(_) => SourceKind::Text,
            LoadedHeader::Fits(_) => SourceKind::Fits,
        }
    }

    pub fn as_source(&self) -> &dyn HeaderSource {
        match self {
            LoadedHeader::Text(header) => header,
            LoadedHeader::Fits(map) => map,
        }
    }
}

/// Load the header of `path`, choosing the reader from the file name
pub fn load_header(path: &Path, config: &ProcessorConfig) -> Result<LoadedHeader> {
    if config.is_text_header(path) {
        read_text_header(path).map(LoadedHeader::Text)
    } else if config.is_fits_file(path) {
        read_fits_header(path).map(LoadedHeader::Fits)
    } else {
        Err(HeaderError::UnsupportedSource {
            path: path.to_path_buf(),
        })
    }
}

/// Read a raw text header dump
pub fn read_text_header(path: &Path) -> Result<TextHeader> {
    let bytes = std::fs::read(path).map_err(|source| HeaderError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Read {} bytes of text header from {}", bytes.len(), path.display());
    Ok(TextHeader::new(String::from_utf8_lossy(&bytes)))
}

/// Read the primary header of a FITS file
pub fn read_fits_header(path: &Path) -> Result<KeywordMap> {
    let file = File::open(path).map_err(|source| HeaderError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;

    let map = parse_primary_header(&mut BufReader::new(file), path)?;
    debug!("Parsed {} header cards from {}", map.len(), path.display());
    Ok(map)
}

/// Decode header cards from `reader` until the `END` card
pub fn parse_primary_header<R: Read>(reader: &mut R, path: &Path) -> Result<KeywordMap> {
    let invalid = |reason: &str| HeaderError::InvalidFitsHeader {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let mut map = KeywordMap::new();
    let mut block = [0u8; FITS_BLOCK_SIZE];

    for block_index in 0..MAX_HEADER_BLOCKS {
        match reader.read_exact(&mut block) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(if block_index == 0 {
                    invalid("file is shorter than one FITS block")
                } else {
                    invalid("header ends without an END card")
                });
            }
            Err(source) => {
                return Err(HeaderError::SourceRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }

        for (card_index, card) in block.chunks_exact(FITS_CARD_SIZE).enumerate() {
            let keyword = card_keyword(card);

            if block_index == 0 && card_index == 0 && keyword != "SIMPLE" {
                return Err(invalid("first card is not SIMPLE"));
            }

            if keyword == "END" {
                return Ok(map);
            }

            if let Some((keyword, value)) = parse_card(card) {
                map.push(keyword, value);
            }
        }
    }

    Err(invalid("no END card within the header block limit"))
}

fn card_keyword(card: &[u8]) -> String {
    String::from_utf8_lossy(&card[..FITS_KEYWORD_WIDTH])
        .trim_end()
        .to_string()
}

/// Decode a single 80-byte card into a keyword and value
///
/// Returns `None` for blank cards, cards without a value indicator and
/// cards whose value is undefined.
pub fn parse_card(card: &[u8]) -> Option<(String, HeaderValue)> {
    let keyword = card_keyword(card);
    let rest = String::from_utf8_lossy(&card[FITS_KEYWORD_WIDTH..]);

    if keyword == HIERARCH_PREFIX {
        let (path, value) = rest.split_once('=')?;
        let path = path.split_whitespace().collect::<Vec<_>>().join(" ");
        if path.is_empty() {
            return None;
        }
        return Some((
            format!("{} {}", HIERARCH_PREFIX, path),
            parse_value(value)?,
        ));
    }

    if is_commentary_keyword(&keyword) {
        let text = rest.trim();
        if keyword.is_empty() && text.is_empty() {
            return None;
        }
        return Some((keyword, HeaderValue::Text(text.to_string())));
    }

    let value = rest.strip_prefix("= ")?;
    Some((keyword, parse_value(value)?))
}

/// Parse the value field of a card, dropping any trailing comment
pub fn parse_value(field: &str) -> Option<HeaderValue> {
    let field = field.trim_start();

    if let Some(quoted) = field.strip_prefix('\'') {
        return Some(HeaderValue::Text(parse_quoted(quoted)));
    }

    let value = match field.split_once('/') {
        Some((value, _comment)) => value.trim(),
        None => field.trim(),
    };

    if value.is_empty() {
        return None;
    }

    let parsed = match value {
        "T" => HeaderValue::Logical(true),
        "F" => HeaderValue::Logical(false),
        _ => {
            if let Ok(i) = value.parse::<i64>() {
                HeaderValue::Integer(i)
            } else if let Ok(r) = value.replace(['D', 'd'], "E").parse::<f64>() {
                HeaderValue::Real(r)
            } else {
                HeaderValue::Text(value.to_string())
            }
        }
    };

    Some(parsed)
}

/// Body of a quoted string after the opening quote; `''` is an escaped quote
fn parse_quoted(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                out.push('\'');
                chars.next();
            } else {
                break;
            }
        } else {
            out.push(c);
        }
    }

    // Trailing blanks in FITS strings are padding
    out.trim_end().to_string()
}
