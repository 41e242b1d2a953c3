//! Shared fixtures for integration tests

use std::fs;
use std::path::{Path, PathBuf};

/// Encode header cards as a FITS primary header padded to whole blocks
pub fn fits_header_bytes(cards: &[&str]) -> Vec<u8> {
    let mut bytes: Vec<u8> = cards
        .iter()
        .flat_map(|card| format!("{:<80}", card).into_bytes())
        .collect();
    let padding = (2880 - bytes.len() % 2880) % 2880;
    bytes.extend(std::iter::repeat_n(b' ', padding));
    bytes
}

/// Write a FITS file holding only a primary header
pub fn write_fits(dir: &Path, name: &str, cards: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut all_cards = vec!["SIMPLE  =                    T"];
    all_cards.extend_from_slice(cards);
    all_cards.push("END");
    fs::write(&path, fits_header_bytes(&all_cards)).unwrap();
    path
}

/// Write a raw text header dump
pub fn write_text_header(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}
