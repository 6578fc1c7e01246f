//! seedlogo - Seed Region Frequencies
//!
//! Collects the unique seed regions of one species' sequences and the
//! per-position nucleotide frequencies used to draw a sequence logo.
//!
//! ## Usage
//!
//! ```bash
//! seedlogo -f mature.fa -s mmu -b 2 -e 8
//! seedlogo -f mature.fa -s hsa -b 2 -e 8 -o results/ --log-dir logfiles -v
//! ```
//!
//! ## Outputs
//!
//! - `<stem>__uniqseeds.fa`: unique seeds, named `uniqseed_1`, `uniqseed_2`, ...
//! - `<stem>__uniqseeds_logo.tsv`: A/C/G/T frequency per seed position

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::info;

use seedlogo::logging::init_logging;
use seedlogo::pipeline::{run, AnalysisOptions, PipelineConfig, PipelineError};
use seedlogo::seed::SeedRange;

/// seedlogo - Unique seed regions and their nucleotide frequencies
///
/// Keeps the FASTA records whose header starts with the species code,
/// extracts the seed window from each, and writes the unique seeds plus a
/// per-position frequency table for logo plotting.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// FASTA file with the sequences to analyze
    #[arg(short = 'f', long = "fasta-file")]
    fasta_file: PathBuf,

    /// Species code; only headers starting with it are kept (default: keep all)
    #[arg(short = 's', long = "species-code", default_value = "")]
    species_code: String,

    /// First position of the seed region (one-based)
    #[arg(short = 'b', long = "seed-begin")]
    seed_begin: usize,

    /// Last position of the seed region (one-based, inclusive)
    #[arg(short = 'e', long = "seed-end")]
    seed_end: usize,

    /// Directory for output files (default: next to the FASTA file)
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Stop at the first record or position that cannot be measured
    #[arg(long = "strict")]
    strict: bool,

    /// Only print the summary, do not write output files
    #[arg(long = "no-write")]
    no_write: bool,

    /// Also write the log to a file in this directory
    #[arg(long = "log-dir")]
    log_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Validate the seed window once, before any input is read
    let seed_range = SeedRange::new(args.seed_begin, args.seed_end)
        .context("Invalid seed region (-b/--seed-begin, -e/--seed-end)")?;

    let log_path = init_logging(args.verbose, args.log_dir.as_deref(), &args.fasta_file)
        .context("Failed to set up logging")?;
    if let Some(path) = log_path {
        info!("Project log file is <{}>", path.display());
    }

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let config = PipelineConfig {
        fasta_path: args.fasta_file,
        output_dir: args.output_dir,
        write_outputs: !args.no_write,
        analysis: AnalysisOptions {
            species_code: args.species_code,
            seed_range,
            strict: args.strict,
        },
    };

    match run(&config) {
        Ok(report) => {
            print!("{}", report);
            Ok(())
        }
        // Already logged by the pipeline; reported as is
        Err(e @ PipelineError::NoMatchingRecords { .. }) => Err(e.into()),
        Err(e) => Err(e).with_context(|| format!("Failed to process {}", config.fasta_path.display())),
    }
}
