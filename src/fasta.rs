//! FASTA file parser with species filtering.
//!
//! This module handles reading FASTA files and keeping the records whose
//! header starts with a species code. Sequences may be wrapped over
//! several lines.
//!
//! ## FASTA Format
//!
//! ```text
//! >mmu-let-7a MIMAT0000521 Mus musculus let-7a-5p
//! UGAGGUAGUAGGUUGUAUAGUU
//! >hsa-let-7a MIMAT0000062 Homo sapiens let-7a-5p
//! UGAGGUAGUAGG
//! UUGUAUAGUU
//! ```
//!
//! A header is only known to be complete when the next `>` line (or the end
//! of input) is reached, so the scan is strictly sequential.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::model::SequenceRecord;

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read FASTA input at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Records kept by the reader, plus how many headers were scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFasta {
    /// Records whose header matched the species code, in file order
    pub records: Vec<SequenceRecord>,
    /// Number of header lines encountered
    pub headers_seen: usize,
    /// Matching headers dropped because no sequence followed them
    pub empty_records: usize,
}

impl ParsedFasta {
    /// Returns the number of records kept.
    pub fn kept(&self) -> usize {
        self.records.len()
    }
}

/// Scan state for one parse call.
#[derive(Default)]
struct Scan<'a> {
    species_code: &'a str,
    parsed: ParsedFasta,
    current_header: Option<String>,
    current_seq: String,
}

impl<'a> Scan<'a> {
    fn new(species_code: &'a str) -> Self {
        Self {
            species_code,
            ..Default::default()
        }
    }

    /// Finalizes the in-progress record if its header matches.
    ///
    /// Sequence lines seen before any header have no header to match and
    /// are dropped here.
    fn flush(&mut self) {
        let seq = std::mem::take(&mut self.current_seq);
        let Some(header) = self.current_header.take() else {
            if !seq.is_empty() {
                debug!("Dropping {} sequence characters found before the first header", seq.len());
            }
            return;
        };

        let record = SequenceRecord::new(header, seq);
        if !record.matches_species(self.species_code) {
            return;
        }

        if record.sequence.is_empty() {
            debug!("Dropping record <{}>: no sequence", record.header);
            self.parsed.empty_records += 1;
            return;
        }

        self.parsed.records.push(record);
    }

    fn push_line(&mut self, line: &str) {
        if let Some(header) = line.strip_prefix('>') {
            self.flush();
            self.parsed.headers_seen += 1;
            self.current_header = Some(header.trim().to_string());
        } else {
            self.current_seq.push_str(line.trim());
        }
    }

    fn finish(mut self) -> ParsedFasta {
        // End of input does not come with a trailing '>' line
        self.flush();
        self.parsed
    }
}

/// Parses a FASTA file, keeping records whose header starts with `species_code`.
///
/// # Examples
///
/// ```no_run
/// use seedlogo::fasta::parse_fasta_file;
///
/// let parsed = parse_fasta_file("mature.fa", "mmu").unwrap();
/// println!("Kept {} of {} records", parsed.kept(), parsed.headers_seen);
/// ```
pub fn parse_fasta_file<P: AsRef<Path>>(path: P, species_code: &str) -> FastaResult<ParsedFasta> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FastaError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_fasta(BufReader::new(file), species_code)
}

/// Parses FASTA content from a reader.
///
/// An empty `species_code` keeps every record.
pub fn parse_fasta<R: BufRead>(reader: R, species_code: &str) -> FastaResult<ParsedFasta> {
    let mut scan = Scan::new(species_code);

    for (index, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| FastaError::Read {
            line: index + 1,
            source,
        })?;
        scan.push_line(&line);
    }

    Ok(scan.finish())
}

/// Parses FASTA content from a string.
///
/// Useful for testing or processing in-memory data.
pub fn parse_fasta_str(content: &str, species_code: &str) -> FastaResult<ParsedFasta> {
    parse_fasta(content.as_bytes(), species_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_fasta() {
        let content = ">seq1\nACGT\n>seq2\nTGCA\n";
        let parsed = parse_fasta_str(content, "").unwrap();

        assert_eq!(parsed.kept(), 2);
        assert_eq!(parsed.headers_seen, 2);
        assert_eq!(parsed.records[0], SequenceRecord::new("seq1", "ACGT"));
        assert_eq!(parsed.records[1], SequenceRecord::new("seq2", "TGCA"));
    }

    #[test]
    fn test_parse_multiline_sequence() {
        let content = ">seq1\nACGT\nTGCA\nAAAA\n";
        let parsed = parse_fasta_str(content, "").unwrap();

        assert_eq!(parsed.kept(), 1);
        assert_eq!(parsed.records[0].sequence, "ACGTTGCAAAAA");
    }

    #[test]
    fn test_header_keeps_description() {
        let content = ">mmu-let-7a MIMAT0000521 Mus musculus  \nUGAGGUAG\n";
        let parsed = parse_fasta_str(content, "mmu").unwrap();

        assert_eq!(parsed.records[0].header, "mmu-let-7a MIMAT0000521 Mus musculus");
    }

    #[test]
    fn test_species_prefix_filter() {
        let content = ">mmu-let-7a\nUGAGGUAG\n>hsa-let-7a\nUGAGGUAG\n>mmu-miR-1\nUGGAAUGU\n";

        let mmu = parse_fasta_str(content, "mmu").unwrap();
        assert_eq!(mmu.headers_seen, 3);
        let headers: Vec<&str> = mmu.records.iter().map(|r| r.header.as_str()).collect();
        assert_eq!(headers, vec!["mmu-let-7a", "mmu-miR-1"]);

        let hsa = parse_fasta_str(content, "hsa").unwrap();
        assert_eq!(hsa.kept(), 1);
        assert_eq!(hsa.records[0].header, "hsa-let-7a");
    }

    #[test]
    fn test_non_matching_record_sequence_is_discarded() {
        // The spB sequence must not leak into the following spA record
        let content = ">spA_1\nAAAA\n>spB_1\nCCCC\nCCCC\n>spA_2\nGGGG\n";
        let parsed = parse_fasta_str(content, "spA").unwrap();

        assert_eq!(parsed.records[0].sequence, "AAAA");
        assert_eq!(parsed.records[1].sequence, "GGGG");
    }

    #[test]
    fn test_last_record_is_flushed_without_trailing_newline() {
        let content = ">seq1\nACGT\n>seq2\nTTTT";
        let parsed = parse_fasta_str(content, "").unwrap();

        assert_eq!(parsed.kept(), 2);
        assert_eq!(parsed.records[1].sequence, "TTTT");
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = ">seq1\r\nACGT\r\nAC\r\n";
        let parsed = parse_fasta_str(content, "").unwrap();

        assert_eq!(parsed.records[0].header, "seq1");
        assert_eq!(parsed.records[0].sequence, "ACGTAC");
    }

    #[test]
    fn test_sequence_before_header_is_dropped() {
        let content = "ACGT\n>seq1\nTGCA\n";
        let parsed = parse_fasta_str(content, "").unwrap();

        assert_eq!(parsed.kept(), 1);
        assert_eq!(parsed.records[0], SequenceRecord::new("seq1", "TGCA"));
    }

    #[test]
    fn test_header_without_sequence_is_dropped() {
        let content = ">seq1\n>seq2\nACGT\n>seq3\n";
        let parsed = parse_fasta_str(content, "").unwrap();

        assert_eq!(parsed.headers_seen, 3);
        assert_eq!(parsed.kept(), 1);
        assert_eq!(parsed.empty_records, 2);
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse_fasta_str("", "").unwrap();
        assert_eq!(parsed, ParsedFasta::default());
    }

    #[test]
    fn test_no_matching_species() {
        let content = ">hsa-1\nACGT\n>hsa-2\nACGA\n";
        let parsed = parse_fasta_str(content, "mmu").unwrap();

        assert_eq!(parsed.headers_seen, 2);
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_kept_never_exceeds_headers() {
        let content = ">a\nAC\n\n>b\n\n>c\nGT\nACGT\n>d\nN\n";
        for code in ["", "a", "b", "z"] {
            let parsed = parse_fasta_str(content, code).unwrap();
            assert!(parsed.kept() <= parsed.headers_seen);
        }
    }

    #[test]
    fn test_empty_filter_keeps_every_record_with_sequence() {
        let content = ">a\nAC\n>b\nGT\nTT\n>c\nN\n>d\nacgu";
        let parsed = parse_fasta_str(content, "").unwrap();
        assert_eq!(parsed.kept(), parsed.headers_seen);
        assert_eq!(parsed.kept(), 4);

        // Headers without sequence are the only records an empty filter drops
        let content = ">a\nAC\n>b\n>c\nGT\n";
        let parsed = parse_fasta_str(content, "").unwrap();
        assert_eq!(parsed.kept() + parsed.empty_records, parsed.headers_seen);
    }

    #[test]
    fn test_case_preservation() {
        let content = ">seq1\nacgu\n";
        let parsed = parse_fasta_str(content, "").unwrap();
        assert_eq!(parsed.records[0].sequence, "acgu");
    }

    #[test]
    fn test_missing_file() {
        let result = parse_fasta_file("/nonexistent/dir/mature.fa", "");
        assert!(matches!(result, Err(FastaError::Open { .. })));
    }
}
