use anyhow::{Context, bail};
use clap::Parser;
use fits_header_processor::cli::{Args, setup_logging};
use fits_header_processor::discovery::scan_directories;
use fits_header_processor::processor::{HeaderProcessor, log_skip, print_summary};
use fits_header_processor::table::{projection_frame, summary_frame, write_frame};
use fits_header_processor::{HeaderError, ProcessingStats};
use std::process;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    match run(&args) {
        Ok(stats) => {
            if !args.quiet {
                print_summary(&stats);
            }
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ProcessingStats> {
    let config = args.to_config().context("Invalid command-line options")?;
    let output_path = args.get_output_path(config.output_format);

    let sources = scan_directories(&args.inputs, &config).context("Failed to scan inputs")?;
    if sources.is_empty() {
        bail!(HeaderError::NoSources);
    }

    let processor = HeaderProcessor::new(config)?;
    let keys = args.projection_keys();

    let (mut frame, mut stats) = if keys.is_empty() {
        let (records, stats) = processor.summarize(&sources, log_skip);
        (summary_frame(&records)?, stats)
    } else {
        let (records, stats) = processor.project(&sources, &keys, log_skip)?;
        (projection_frame(&records, &keys)?, stats)
    };

    write_frame(&mut frame, &output_path, processor.config().output_format)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    stats.output_path = Some(output_path);

    if args.preview > 0 && !args.quiet {
        println!("{}", frame.head(Some(args.preview)));
    }

    Ok(stats)
}
