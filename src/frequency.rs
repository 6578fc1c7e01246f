//! Per-position nucleotide frequencies over a set of seeds.
//!
//! Each column counts A/C/G/T at one offset across every seed, with U
//! folded into T. Characters outside that set are left out of the four
//! counts and therefore out of the column total as well.

use std::ops::Index;

use log::warn;
use thiserror::Error;

use crate::model::Base;

/// Errors raised while building a frequency matrix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrequencyError {
    #[error("Seed #{} has length {}, shorter than the matrix width {}", .index + 1, .length, .width)]
    ShortSeed {
        /// Zero-based position in the seed list
        index: usize,
        length: usize,
        width: usize,
    },

    #[error("No A/C/G/T/U characters at position {position}")]
    EmptyColumn { position: usize },
}

/// Result type for frequency operations.
pub type FrequencyResult<T> = Result<T, FrequencyError>;

/// Raw A/C/G/T counts for one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseCounts {
    counts: [usize; 4],
}

impl BaseCounts {
    /// Counts a character; anything outside A/C/G/T/U is ignored.
    pub fn add(&mut self, c: char) {
        if let Some(base) = Base::classify(c) {
            self.counts[base.index()] += 1;
        }
    }

    /// Sum of the four counts.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Divides every count by the total, failing on an empty column.
    pub fn frequencies(&self, position: usize) -> FrequencyResult<BaseFrequencies> {
        let total = self.total();
        if total == 0 {
            return Err(FrequencyError::EmptyColumn { position });
        }
        let total = total as f64;
        Ok(BaseFrequencies {
            values: self.counts.map(|n| n as f64 / total),
        })
    }
}

/// A/C/G/T frequencies for one position, addressed by `Base`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BaseFrequencies {
    values: [f64; 4],
}

impl BaseFrequencies {
    /// Frequency of one base.
    pub fn get(&self, base: Base) -> f64 {
        self.values[base.index()]
    }

    /// Sum over the four bases (1.0 for any non-empty column).
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Iterates `(base, frequency)` pairs in A, C, G, T order.
    pub fn iter(&self) -> impl Iterator<Item = (Base, f64)> + '_ {
        Base::ALL.iter().map(move |&b| (b, self.get(b)))
    }
}

impl Index<Base> for BaseFrequencies {
    type Output = f64;

    fn index(&self, base: Base) -> &f64 {
        &self.values[base.index()]
    }
}

/// Ordered per-position frequencies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyMatrix {
    columns: Vec<BaseFrequencies>,
}

impl FrequencyMatrix {
    /// Number of positions.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Frequencies at a zero-based offset.
    pub fn column(&self, position: usize) -> Option<&BaseFrequencies> {
        self.columns.get(position)
    }

    /// All columns in offset order.
    pub fn columns(&self) -> &[BaseFrequencies] {
        &self.columns
    }
}

/// Counts bases per column over the first `width` characters of each seed.
///
/// Every seed must hold at least `width` characters.
pub fn count_columns<S: AsRef<str>>(seeds: &[S], width: usize) -> FrequencyResult<Vec<BaseCounts>> {
    let mut columns = vec![BaseCounts::default(); width];

    for (index, seed) in seeds.iter().enumerate() {
        let seed = seed.as_ref();
        let mut length = 0;
        for (column, c) in columns.iter_mut().zip(seed.chars()) {
            column.add(c);
            length += 1;
        }
        if length < width {
            return Err(FrequencyError::ShortSeed {
                index,
                length: seed.chars().count(),
                width,
            });
        }
    }

    Ok(columns)
}

/// Builds the frequency matrix for `width` positions.
///
/// Fails on the first seed shorter than `width` or the first position
/// with no classifiable character.
pub fn build_frequency_matrix<S: AsRef<str>>(seeds: &[S], width: usize) -> FrequencyResult<FrequencyMatrix> {
    let columns = count_columns(seeds, width)?
        .iter()
        .enumerate()
        .map(|(position, counts)| counts.frequencies(position))
        .collect::<FrequencyResult<Vec<_>>>()?;

    Ok(FrequencyMatrix { columns })
}

/// Builds the frequency matrix, collecting problems instead of failing.
///
/// Seeds shorter than `width` are left out, and positions with no
/// classifiable character become all-zero columns. Each is returned as an
/// error alongside the matrix.
pub fn build_frequency_matrix_lenient<S: AsRef<str>>(
    seeds: &[S],
    width: usize,
) -> (FrequencyMatrix, Vec<FrequencyError>) {
    let mut problems = Vec::new();

    let full_width: Vec<&str> = seeds
        .iter()
        .enumerate()
        .filter_map(|(index, seed)| {
            let seed = seed.as_ref();
            let length = seed.chars().count();
            if length < width {
                let problem = FrequencyError::ShortSeed { index, length, width };
                warn!("{} ({:?}); leaving it out of the frequency matrix", problem, seed);
                problems.push(problem);
                None
            } else {
                Some(seed)
            }
        })
        .collect();

    // All remaining seeds are at least `width` long
    let counts = match count_columns(&full_width, width) {
        Ok(counts) => counts,
        Err(e) => {
            problems.push(e);
            return (FrequencyMatrix::default(), problems);
        }
    };

    let columns = counts
        .iter()
        .enumerate()
        .map(|(position, c)| {
            c.frequencies(position).unwrap_or_else(|e| {
                warn!("{}; emitting an empty column", e);
                problems.push(e);
                BaseFrequencies::default()
            })
        })
        .collect();

    (FrequencyMatrix { columns }, problems)
}
