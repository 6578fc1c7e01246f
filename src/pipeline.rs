//! Pipeline driver.
//!
//! Wires the stages in order:
//! FASTA reader → seed extraction → deduplication → frequency matrix,
//! then hands the unique seeds and the matrix to the output writers.
//!
//! All settings travel in `PipelineConfig`; nothing is kept between runs.

use std::fmt;
use std::io::BufRead;
use std::path::PathBuf;

use log::{debug, info, warn};
use thiserror::Error;

use crate::fasta::{parse_fasta, parse_fasta_file, FastaError, ParsedFasta};
use crate::frequency::{build_frequency_matrix, build_frequency_matrix_lenient, FrequencyError, FrequencyMatrix};
use crate::model::{CompositionError, SequenceRecord};
use crate::output::{write_frequency_table_file, write_unique_seeds_file, OutputError, OutputPaths};
use crate::seed::{collect_unique_seeds, SeedRange};

/// Errors that end a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] FastaError),

    #[error("No records match species code {species_code:?} ({headers_seen} headers scanned)")]
    NoMatchingRecords {
        species_code: String,
        headers_seen: usize,
    },

    #[error("Record <{header}>: {source}")]
    Composition {
        header: String,
        #[source]
        source: CompositionError,
    },

    #[error("Frequency matrix: {0}")]
    Frequency(#[from] FrequencyError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Settings for the analysis stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Header prefix to keep; empty keeps every record
    pub species_code: String,
    pub seed_range: SeedRange,
    /// Abort on the first per-record or per-position problem
    pub strict: bool,
}

/// Settings for a full run over one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub fasta_path: PathBuf,
    /// Directory for output files; defaults to the input's directory
    pub output_dir: Option<PathBuf>,
    /// Write the unique-seed FASTA and the logo table
    pub write_outputs: bool,
    pub analysis: AnalysisOptions,
}

/// GC composition over the retained records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcSummary {
    /// Mean GC fraction over records with a defined composition
    pub mean_gc: Option<f64>,
    /// Records that contributed to the mean
    pub measured: usize,
    /// Records without any A/C/G/T, by header
    pub failures: Vec<(String, CompositionError)>,
}

/// Computes per-record GC and the mean over measurable records.
///
/// In strict mode the first record without A/C/G/T fails the call.
pub fn summarize_gc(records: &[SequenceRecord], strict: bool) -> PipelineResult<GcSummary> {
    let mut summary = GcSummary::default();
    let mut total = 0.0;

    for record in records {
        match record.gc_metrics() {
            Ok(metrics) => {
                debug!("GC% for <{}> is {:.2}", record.header, 100.0 * metrics.gc_percent);
                total += metrics.gc_percent;
                summary.measured += 1;
            }
            Err(source) if strict => {
                return Err(PipelineError::Composition {
                    header: record.header.clone(),
                    source,
                });
            }
            Err(e) => {
                warn!("Skipping GC for <{}>: {}", record.header, e);
                summary.failures.push((record.header.clone(), e));
            }
        }
    }

    if summary.measured > 0 {
        summary.mean_gc = Some(total / summary.measured as f64);
    }
    Ok(summary)
}

/// Everything computed for one input.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedAnalysis {
    pub headers_seen: usize,
    pub empty_records: usize,
    pub records: Vec<SequenceRecord>,
    /// One seed per record, in record order
    pub seeds: Vec<String>,
    pub unique_seeds: Vec<String>,
    pub matrix: FrequencyMatrix,
    pub gc: GcSummary,
    /// Seeds or positions left out of the matrix (lenient mode only)
    pub matrix_problems: Vec<FrequencyError>,
}

impl SeedAnalysis {
    /// Number of per-record and per-position problems.
    pub fn problem_count(&self) -> usize {
        self.gc.failures.len() + self.matrix_problems.len()
    }
}

/// Runs extraction, deduplication, GC and the frequency matrix on parsed records.
///
/// Fails with `NoMatchingRecords` when the filter kept nothing.
pub fn analyze(parsed: ParsedFasta, options: &AnalysisOptions) -> PipelineResult<SeedAnalysis> {
    let ParsedFasta {
        records,
        headers_seen,
        empty_records,
    } = parsed;

    info!(
        "Loaded {} records and kept {} with species code [{}]",
        headers_seen,
        records.len(),
        options.species_code
    );

    if records.is_empty() {
        warn!("No records match species code [{}]", options.species_code);
        return Err(PipelineError::NoMatchingRecords {
            species_code: options.species_code.clone(),
            headers_seen,
        });
    }

    let range = options.seed_range;
    info!("Seed region runs from {} to {}", range.begin(), range.end());

    let seeds: Vec<String> = records.iter().map(|r| range.extract(r)).collect();
    for (record, seed) in records.iter().zip(&seeds) {
        let length = seed.chars().count();
        if length < range.width() {
            debug!("Seed for <{}> truncated to {} of {} positions", record.header, length, range.width());
        }
    }

    let unique_seeds = collect_unique_seeds(&seeds);
    info!("Found {} unique seed sequences", unique_seeds.len());

    let gc = summarize_gc(&records, options.strict)?;

    let (matrix, matrix_problems) = if options.strict {
        (build_frequency_matrix(&unique_seeds, range.width())?, Vec::new())
    } else {
        build_frequency_matrix_lenient(&unique_seeds, range.width())
    };

    Ok(SeedAnalysis {
        headers_seen,
        empty_records,
        records,
        seeds,
        unique_seeds,
        matrix,
        gc,
        matrix_problems,
    })
}

/// Parses FASTA from a reader and analyzes it.
pub fn analyze_reader<R: BufRead>(reader: R, options: &AnalysisOptions) -> PipelineResult<SeedAnalysis> {
    let parsed = parse_fasta(reader, &options.species_code)?;
    analyze(parsed, options)
}

/// Result of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub analysis: SeedAnalysis,
    /// Files written, if any
    pub outputs: Option<OutputPaths>,
}

/// Reads the configured file, analyzes it, and writes the output files.
pub fn run(config: &PipelineConfig) -> PipelineResult<RunReport> {
    info!("Loading sequences from <{}>", config.fasta_path.display());
    let parsed = parse_fasta_file(&config.fasta_path, &config.analysis.species_code)?;
    let analysis = analyze(parsed, &config.analysis)?;

    let outputs = if config.write_outputs {
        let paths = OutputPaths::for_input(&config.fasta_path, config.output_dir.as_deref())?;

        info!("Writing unique seed sequences to <{}>", paths.unique_seeds.display());
        write_unique_seeds_file(&paths.unique_seeds, &analysis.unique_seeds)?;

        info!("Writing logo frequency table to <{}>", paths.logo_table.display());
        write_frequency_table_file(&paths.logo_table, &analysis.matrix)?;

        Some(paths)
    } else {
        None
    };

    Ok(RunReport { analysis, outputs })
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.analysis;
        writeln!(f, "Headers scanned:   {}", a.headers_seen)?;
        writeln!(f, "Records retained:  {}", a.records.len())?;
        writeln!(f, "Empty records:     {} (header without sequence)", a.empty_records)?;
        writeln!(f, "Seeds extracted:   {}", a.seeds.len())?;
        writeln!(f, "Unique seeds:      {}", a.unique_seeds.len())?;
        match a.gc.mean_gc {
            Some(gc) => writeln!(f, "Mean GC%:          {:.2} (over {} records)", 100.0 * gc, a.gc.measured)?,
            None => writeln!(f, "Mean GC%:          n/a")?,
        }
        writeln!(f, "Problems:          {}", a.problem_count())?;
        for (header, e) in &a.gc.failures {
            writeln!(f, "  <{}>: {}", header, e)?;
        }
        for e in &a.matrix_problems {
            writeln!(f, "  {}", e)?;
        }
        if let Some(paths) = &self.outputs {
            writeln!(f, "Unique seeds file: {}", paths.unique_seeds.display())?;
            writeln!(f, "Logo table file:   {}", paths.logo_table.display())?;
        }
        Ok(())
    }
}
