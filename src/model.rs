//! Data model for the seed pipeline.
//!
//! This module contains the data structures shared by every stage:
//! - `SequenceRecord`: one FASTA record (header + sequence)
//! - `GcMetrics`: GC composition derived from a record
//! - `Base`: the four nucleotide symbols used as frequency keys

use std::fmt;

use thiserror::Error;

/// Errors raised when a composition cannot be computed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("No A/C/G/T bases in sequence (length {length})")]
    EmptyComposition { length: usize },
}

/// Result type for composition operations.
pub type CompositionResult<T> = Result<T, CompositionError>;

/// Represents a single FASTA record retained by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// The header line, without the leading '>' and trimmed
    pub header: String,
    /// The sequence data, all lines concatenated, case as given
    pub sequence: String,
}

impl SequenceRecord {
    /// Creates a new record.
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// Returns true if the header starts with the given species code.
    ///
    /// An empty code matches every header.
    pub fn matches_species(&self, species_code: &str) -> bool {
        self.header.starts_with(species_code)
    }

    /// Computes the GC composition of this record's sequence.
    pub fn gc_metrics(&self) -> CompositionResult<GcMetrics> {
        compute_gc(&self.sequence)
    }
}

/// GC composition of a sequence.
///
/// Both counts only consider A/C/G/T (either case); every other
/// character is left out of numerator and denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcMetrics {
    pub gc_count: usize,
    pub nt_count: usize,
    /// `gc_count / nt_count`, in `[0, 1]`
    pub gc_percent: f64,
}

/// Computes GC metrics for a sequence in a single scan.
///
/// Fails with `CompositionError::EmptyComposition` when the sequence has no
/// A/C/G/T character at all.
pub fn compute_gc(seq: &str) -> CompositionResult<GcMetrics> {
    let mut gc_count = 0;
    let mut nt_count = 0;

    for b in seq.bytes() {
        match b {
            b'G' | b'g' | b'C' | b'c' => {
                gc_count += 1;
                nt_count += 1;
            }
            b'A' | b'a' | b'T' | b't' => nt_count += 1,
            _ => {}
        }
    }

    if nt_count == 0 {
        return Err(CompositionError::EmptyComposition {
            length: seq.chars().count(),
        });
    }

    Ok(GcMetrics {
        gc_count,
        nt_count,
        gc_percent: gc_count as f64 / nt_count as f64,
    })
}

/// A nucleotide symbol used as a frequency key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// All bases in column order.
    pub const ALL: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

    /// Classifies a character, folding U into T.
    ///
    /// Returns `None` for anything outside A/C/G/T/U (either case).
    pub fn classify(c: char) -> Option<Base> {
        match c {
            'A' | 'a' => Some(Base::A),
            'C' | 'c' => Some(Base::C),
            'G' | 'g' => Some(Base::G),
            'T' | 't' | 'U' | 'u' => Some(Base::T),
            _ => None,
        }
    }

    /// Returns the upper-case symbol for this base.
    pub fn symbol(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }

    /// Index of the base in `Base::ALL`.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
