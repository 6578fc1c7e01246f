//! Seed region extraction and deduplication.
//!
//! A seed is the sub-sequence between two one-based, inclusive positions.
//! Extraction mirrors truncating slice semantics: positions past the end
//! of a sequence shorten the result instead of failing.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::model::SequenceRecord;

/// Errors raised when validating a seed window.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedRangeError {
    #[error("Seed begin must be at least 1 (got {0})")]
    NonPositiveBegin(usize),

    #[error("Seed begin ({begin}) is after seed end ({end})")]
    BeginAfterEnd { begin: usize, end: usize },
}

/// A validated one-based, inclusive seed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedRange {
    begin: usize,
    end: usize,
}

impl SeedRange {
    /// Creates a seed window, checking `1 <= begin <= end`.
    pub fn new(begin: usize, end: usize) -> Result<Self, SeedRangeError> {
        if begin < 1 {
            return Err(SeedRangeError::NonPositiveBegin(begin));
        }
        if begin > end {
            return Err(SeedRangeError::BeginAfterEnd { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// First position (one-based).
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Last position (one-based, inclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of positions in the window.
    pub fn width(&self) -> usize {
        self.end - self.begin + 1
    }

    /// Extracts this window from a record.
    pub fn extract(&self, record: &SequenceRecord) -> String {
        extract_seed(record, self.begin, self.end)
    }
}

impl fmt::Display for SeedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

/// Extracts `sequence[begin-1 .. end]` from a record.
///
/// Positions are one-based and inclusive. Out-of-range positions truncate:
/// a `begin` past the end yields an empty string, an `end` past the end is
/// clamped, and `begin > end` yields an empty string.
pub fn extract_seed(record: &SequenceRecord, begin: usize, end: usize) -> String {
    let start = begin.saturating_sub(1);
    let count = end.saturating_sub(start);
    record.sequence.chars().skip(start).take(count).collect()
}

/// Returns the distinct seeds in first-occurrence order.
///
/// Equality is exact and case-sensitive.
pub fn collect_unique_seeds<I, S>(seeds: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for seed in seeds {
        let seed = seed.as_ref();
        if !seen.contains(seed) {
            seen.insert(seed.to_string());
            unique.push(seed.to_string());
        }
    }

    unique
}
