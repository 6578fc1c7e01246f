//! # seedlogo - Seed Region Frequencies
//!
//! Extracts a fixed seed window from FASTA records of one species, collects
//! the unique seeds, and computes per-position nucleotide frequencies for
//! sequence logo plots.
//!
//! ## Architecture
//!
//! The pipeline runs as a chain of pure stages:
//! - `fasta`: FASTA parsing with species-prefix filtering
//! - `model`: Sequence records, GC composition and nucleotide symbols
//! - `seed`: One-based seed extraction and order-preserving deduplication
//! - `frequency`: Per-position A/C/G/T frequency matrix
//! - `output`: Unique-seed FASTA and logo table writers
//! - `pipeline`: Wiring of the stages and the run summary
//! - `logging`: Logger setup for the command-line tool

pub mod fasta;
pub mod frequency;
pub mod logging;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod seed;
