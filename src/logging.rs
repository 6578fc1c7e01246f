//! Logger setup.
//!
//! Logs go to stderr through `env_logger`. With a log directory, every line
//! is also appended to `<input stem>__<unix seconds>__<tag>.log`, where the
//! tag is eight random hex digits so that parallel runs never collide.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use rand::Rng;

/// Maps a `-v` count to a default level. `RUST_LOG` overrides it.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Builds the log file path for an input file.
pub fn log_file_path(log_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("seedlogo");
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let tag: u32 = rand::rng().random();
    log_dir.join(format!("{}__{}__{:08x}.log", stem, seconds, tag))
}

/// Writes every log line to stderr and to a file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Initializes the global logger.
///
/// Returns the path of the log file when `log_dir` is given.
pub fn init_logging(verbose: u8, log_dir: Option<&Path>, input: &Path) -> io::Result<Option<PathBuf>> {
    let default_level = level_for_verbosity(verbose).to_string().to_lowercase();
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));
    builder.format_timestamp_secs();

    let log_path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = log_file_path(dir, input);
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder.target(Target::Pipe(Box::new(Tee { file })));
            Some(path)
        }
        None => None,
    };

    builder.init();
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(9), LevelFilter::Trace);
    }

    #[test]
    fn test_log_file_path() {
        let path = log_file_path(Path::new("logfiles"), Path::new("data/mature.fa"));
        assert_eq!(path.parent(), Some(Path::new("logfiles")));

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("mature__"));
        assert!(name.ends_with(".log"));
        let tag = name.trim_end_matches(".log").rsplit("__").next().unwrap();
        assert_eq!(tag.len(), 8);
        assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
