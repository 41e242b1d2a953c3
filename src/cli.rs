//! Command-line interface components.

use crate::config::{OutputFormat, ProcessorConfig, SourceSelection};
use crate::constants::get_output_filename;
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

/// Which header representations to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Text dumps and FITS files
    Auto,
    /// Only `*.fits_header.txt` dumps
    Text,
    /// Only FITS primary headers
    Fits,
}

impl From<Mode> for SourceSelection {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Auto => SourceSelection::Auto,
            Mode::Text => SourceSelection::TextOnly,
            Mode::Fits => SourceSelection::FitsOnly,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fits-headers")]
#[command(about = "Summarise FITS spectral headers into a table of object, instrument, wavelength range and observation time")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directories to scan for header sources
    #[arg(value_name = "INPUT_DIR", default_value = ".")]
    pub inputs: Vec<PathBuf>,

    /// Output file for the table (defaults to header_summary.<format>)
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Table format (csv, parquet)
    #[arg(long, default_value = "csv")]
    pub format: String,

    /// Header representations to read
    #[arg(long, value_enum, default_value_t = Mode::Auto)]
    pub mode: Mode,

    /// Comma-separated keywords to project instead of the fixed summary
    #[arg(long, value_delimiter = ',')]
    pub keys: Vec<String>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Number of table rows to print after writing
    #[arg(long, default_value_t = 5)]
    pub preview: usize,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::parse(&self.format)
    }

    /// Get the output path, defaulting to header_summary.<ext> in the working directory
    pub fn get_output_path(&self, format: OutputFormat) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => PathBuf::from(get_output_filename(format.extension())),
        }
    }

    /// Keywords requested for projection, blanks removed
    pub fn projection_keys(&self) -> Vec<String> {
        self.keys
            .iter()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect()
    }

    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Translate arguments into a processor configuration
    pub fn to_config(&self) -> Result<ProcessorConfig> {
        let mut config = ProcessorConfig::default()
            .with_selection(self.mode.into())
            .with_output_format(self.output_format()?);

        if self.recursive {
            config = config.with_recursive();
        }
        if self.no_progress || self.quiet {
            config = config.without_progress();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flags. Colours are only
/// emitted when stderr is a terminal.
pub fn setup_logging(args: &Args) {
    use std::io::IsTerminal;
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

fn log_directive(level: &str) -> String {
    format!("{}={}", env!("CARGO_CRATE_NAME"), level)
}
