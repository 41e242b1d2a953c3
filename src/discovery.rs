//! File discovery for header sources
//!
//! Scans input directories for raw text header dumps and FITS files.
//! Inputs that are not directories are skipped with a warning.

use crate::config::{ProcessorConfig, SourceSelection};
use crate::error::Result;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Discover header sources in every directory of `directories`
///
/// The result is sorted and free of duplicates so row order is stable
/// across runs.
pub fn scan_directories<P: AsRef<Path>>(
    directories: &[P],
    config: &ProcessorConfig,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for directory in directories {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            warn!("Skipping {}: not a directory", directory.display());
            continue;
        }

        let found = if config.recursive {
            walk_directory(directory, config)
        } else {
            glob_directory(directory, config)?
        };

        debug!(
            "Found {} header sources in {}",
            found.len(),
            directory.display()
        );
        files.extend(found);
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Whether discovery should pick up `path` under the current selection
pub fn is_header_source(path: &Path, config: &ProcessorConfig) -> bool {
    match config.selection {
        SourceSelection::Auto => config.is_text_header(path) || config.is_fits_file(path),
        SourceSelection::TextOnly => config.is_text_header(path),
        SourceSelection::FitsOnly => config.is_fits_file(path),
    }
}

fn glob_directory(directory: &Path, config: &ProcessorConfig) -> Result<Vec<PathBuf>> {
    let escaped = Pattern::escape(&directory.to_string_lossy());
    let pattern = format!("{}/*", escaped);

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() && is_header_source(&path, config) => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("Could not read directory entry: {}", e),
        }
    }

    Ok(files)
}

fn walk_directory(directory: &Path, config: &ProcessorConfig) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Could not read directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_header_source(path, config))
        .collect()
}
