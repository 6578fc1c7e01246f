//! Output files: unique seeds as FASTA and the logo frequency table.
//!
//! File names derive from the input stem:
//! - `<stem>__uniqseeds.fa`
//! - `<stem>__uniqseeds_logo.tsv`

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::frequency::FrequencyMatrix;
use crate::model::Base;

/// Line terminator used for every written file.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Errors that can occur while writing output files.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot derive an output name from {0}")]
    NoFileStem(PathBuf),
}

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Paths of the files produced for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub unique_seeds: PathBuf,
    pub logo_table: PathBuf,
}

impl OutputPaths {
    /// Derives output paths for `input`, placed in `output_dir` or next to the input.
    pub fn for_input(input: &Path, output_dir: Option<&Path>) -> OutputResult<Self> {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| OutputError::NoFileStem(input.to_path_buf()))?;

        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        Ok(Self {
            unique_seeds: dir.join(format!("{}__uniqseeds.fa", stem)),
            logo_table: dir.join(format!("{}__uniqseeds_logo.tsv", stem)),
        })
    }
}

/// Writes unique seeds as FASTA records named `uniqseed_<n>`, `n` starting at 1.
pub fn write_unique_seeds<W: Write, S: AsRef<str>>(writer: &mut W, seeds: &[S]) -> io::Result<()> {
    for (i, seed) in seeds.iter().enumerate() {
        write!(writer, ">uniqseed_{}{}", i + 1, LINE_ENDING)?;
        write!(writer, "{}{}", seed.as_ref(), LINE_ENDING)?;
    }
    Ok(())
}

/// Writes the frequency matrix as a tab-separated table.
///
/// One row per zero-based position, one column per base in A, C, G, T order.
pub fn write_frequency_table<W: Write>(writer: &mut W, matrix: &FrequencyMatrix) -> io::Result<()> {
    write!(writer, "position")?;
    for base in Base::ALL {
        write!(writer, "\t{}", base)?;
    }
    write!(writer, "{}", LINE_ENDING)?;

    for (position, column) in matrix.columns().iter().enumerate() {
        write!(writer, "{}", position)?;
        for (_, freq) in column.iter() {
            write!(writer, "\t{:.6}", freq)?;
        }
        write!(writer, "{}", LINE_ENDING)?;
    }
    Ok(())
}

/// Creates `path` and fills it through `write_fn`.
fn write_file<F>(path: &Path, write_fn: F) -> OutputResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let to_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    write_fn(&mut writer).map_err(to_error)?;
    writer.flush().map_err(to_error)
}

/// Writes the unique-seed FASTA file.
pub fn write_unique_seeds_file<S: AsRef<str>>(path: &Path, seeds: &[S]) -> OutputResult<()> {
    write_file(path, |w| write_unique_seeds(w, seeds))
}

/// Writes the logo frequency table file.
pub fn write_frequency_table_file(path: &Path, matrix: &FrequencyMatrix) -> OutputResult<()> {
    write_file(path, |w| write_frequency_table(w, matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::build_frequency_matrix;

    #[test]
    fn test_write_unique_seeds() {
        let mut buf = Vec::new();
        write_unique_seeds(&mut buf, &["ACGT", "ACGA"]).unwrap();

        let expected = format!(">uniqseed_1{le}ACGT{le}>uniqseed_2{le}ACGA{le}", le = LINE_ENDING);
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[test]
    fn test_write_no_seeds() {
        let mut buf = Vec::new();
        let seeds: [&str; 0] = [];
        write_unique_seeds(&mut buf, &seeds).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_write_frequency_table() {
        let matrix = build_frequency_matrix(&["AC", "AG"], 2).unwrap();
        let mut buf = Vec::new();
        write_frequency_table(&mut buf, &matrix).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "position\tA\tC\tG\tT");
        assert_eq!(lines[1], "0\t1.000000\t0.000000\t0.000000\t0.000000");
        assert_eq!(lines[2], "1\t0.000000\t0.500000\t0.500000\t0.000000");
    }

    #[test]
    fn test_output_paths_next_to_input() {
        let paths = OutputPaths::for_input(Path::new("data/mature.fa"), None).unwrap();
        assert_eq!(paths.unique_seeds, Path::new("data/mature__uniqseeds.fa"));
        assert_eq!(paths.logo_table, Path::new("data/mature__uniqseeds_logo.tsv"));
    }

    #[test]
    fn test_output_paths_in_output_dir() {
        let paths = OutputPaths::for_input(Path::new("data/mature.fa"), Some(Path::new("out"))).unwrap();
        assert_eq!(paths.unique_seeds, Path::new("out/mature__uniqseeds.fa"));
    }

    #[test]
    fn test_output_paths_bare_file_name() {
        let paths = OutputPaths::for_input(Path::new("mature.fa"), None).unwrap();
        assert_eq!(paths.unique_seeds, Path::new("mature__uniqseeds.fa"));
    }

    #[test]
    fn test_output_paths_without_stem() {
        let result = OutputPaths::for_input(Path::new(""), None);
        assert!(matches!(result, Err(OutputError::NoFileStem(_))));
    }
}
