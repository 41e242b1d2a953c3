//! Batch processing of header sources.
//!
//! Reads every discovered source, builds one record per readable header and
//! reports unreadable sources through an injected sink. A failure on one
//! source never affects the others.

use crate::config::ProcessorConfig;
use crate::error::{HeaderError, Result};
use crate::fits::{LoadedHeader, load_header};
use crate::models::{HeaderRecord, ProcessingStats, ProjectedRecord, SourceSkip};
use crate::record::{build_projection, build_records};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// Diagnostics sink that forwards skipped sources to the log
pub fn log_skip(skip: &SourceSkip) {
    error!("Error reading {}: {}", skip.path.display(), skip.error);
}

/// Identifier used for summary rows: the file name
pub fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Main processor for header batches
#[derive(Debug, Clone)]
pub struct HeaderProcessor {
    config: ProcessorConfig,
}

impl HeaderProcessor {
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Read the headers of `paths`, reporting unreadable ones to `on_skip`
    ///
    /// Returns the readable headers in input order alongside their paths.
    pub fn load_headers<F>(
        &self,
        paths: &[PathBuf],
        mut on_skip: F,
    ) -> (Vec<(PathBuf, LoadedHeader)>, usize)
    where
        F: FnMut(&SourceSkip),
    {
        let progress = self.progress_bar(paths.len());
        let mut headers = Vec::with_capacity(paths.len());
        let mut skipped = 0usize;

        for path in paths {
            if let Some(file_name) = path.file_name() {
                progress.set_message(format!("Reading: {}", file_name.to_string_lossy()));
            }

            match load_header(path, &self.config) {
                Ok(header) => {
                    debug!("Loaded {:?} header: {}", header.kind(), path.display());
                    headers.push((path.clone(), header));
                }
                Err(error) => {
                    skipped += 1;
                    on_skip(&SourceSkip {
                        path: path.clone(),
                        error,
                    });
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        (headers, skipped)
    }

    /// Build a summary record for every readable source
    pub fn summarize<F>(&self, paths: &[PathBuf], on_skip: F) -> (Vec<HeaderRecord>, ProcessingStats)
    where
        F: FnMut(&SourceSkip),
    {
        let start_time = Instant::now();
        let (headers, skipped) = self.load_headers(paths, on_skip);

        let records = build_records(
            &self.config.keywords,
            headers.iter().map(|(path, header)| (file_id(path), header)),
        );

        let stats = self.stats(paths.len(), records.len(), skipped, start_time);
        info!(
            "Built {} records from {} sources ({} skipped)",
            stats.records_built, stats.sources_found, stats.sources_skipped
        );
        (records, stats)
    }

    /// Project every readable source onto `desired_keys`
    pub fn project<F>(
        &self,
        paths: &[PathBuf],
        desired_keys: &[String],
        on_skip: F,
    ) -> Result<(Vec<ProjectedRecord>, ProcessingStats)>
    where
        F: FnMut(&SourceSkip),
    {
        if desired_keys.is_empty() {
            return Err(HeaderError::Configuration {
                message: "Projection requires at least one keyword".to_string(),
            });
        }

        let start_time = Instant::now();
        let (headers, skipped) = self.load_headers(paths, on_skip);

        let records = build_projection(
            desired_keys,
            headers
                .iter()
                .map(|(path, header)| (path.display().to_string(), header)),
        );

        let stats = self.stats(paths.len(), records.len(), skipped, start_time);
        info!(
            "Projected {} keywords over {} sources ({} skipped)",
            desired_keys.len(),
            stats.sources_found,
            stats.sources_skipped
        );
        Ok((records, stats))
    }

    fn stats(
        &self,
        found: usize,
        built: usize,
        skipped: usize,
        start_time: Instant,
    ) -> ProcessingStats {
        ProcessingStats {
            sources_found: found,
            records_built: built,
            sources_skipped: skipped,
            output_path: None,
            processing_time_ms: start_time.elapsed().as_millis(),
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

/// Print a coloured summary of a finished batch
pub fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Sources found:".bright_cyan(),
        stats.sources_found.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Records built:".bright_cyan(),
        stats.records_built.to_string().bright_white().bold()
    );
    if stats.sources_skipped > 0 {
        println!(
            "  {} {}",
            "Sources skipped:".bright_red(),
            stats.sources_skipped.to_string().bright_red().bold()
        );
    }
    if let Some(path) = &stats.output_path {
        println!("  {} {}", "Output:".bright_cyan(), path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessingStatus;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_processor() -> HeaderProcessor {
        HeaderProcessor::new(ProcessorConfig::default().without_progress()).unwrap()
    }

    #[test]
    fn test_file_id_uses_file_name() {
        assert_eq!(file_id(Path::new("/data/night1/a.fits")), "a.fits");
    }

    #[test]
    fn test_summarize_reports_unreadable_sources() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("a.fits_header.txt");
        fs::write(&good, "OBJECT = 'NGC1234'\nHISTORY done\n").unwrap();
        let missing = temp_dir.path().join("gone.fits_header.txt");

        let mut skips = Vec::new();
        let (records, stats) =
            quiet_processor().summarize(&[missing.clone(), good], |skip| skips.push(skip.path.clone()));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].object.as_deref(), Some("NGC1234"));
        assert_eq!(records[0].status, ProcessingStatus::Processed);
        assert_eq!(skips, vec![missing]);
        assert_eq!(stats.sources_found, 2);
        assert_eq!(stats.sources_skipped, 1);
        assert_eq!(stats.records_built, 1);
    }

    #[test]
    fn test_project_requires_keys() {
        let result = quiet_processor().project(&[], &[], log_skip);
        assert!(matches!(result, Err(HeaderError::Configuration { .. })));
    }

    #[test]
    fn test_project_uses_full_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.fits_header.txt");
        fs::write(&path, "EXPTIME = 300\n").unwrap();

        let keys = vec!["EXPTIME".to_string()];
        let (records, _) = quiet_processor()
            .project(&[path.clone()], &keys, log_skip)
            .unwrap();

        assert_eq!(records[0].file_id, path.display().to_string());
        assert_eq!(records[0].get("EXPTIME").map(|v| v.to_string()), Some("300".to_string()));
    }
}
