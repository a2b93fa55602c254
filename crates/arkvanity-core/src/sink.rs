//! Result sinks: where confirmed matches go

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::jobs::Match;

/// Receives every confirmed match, synchronously, from the dispatch loop.
///
/// Sinks deal with their own failures; nothing they do can stop the search.
pub trait ResultSink {
    fn emit(&mut self, found: &Match);
}

/// Prints matches to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn emit(&mut self, found: &Match) {
        println!();
        println!("Address: {}", found.address);
        println!("Passphrase: {}", found.passphrase);
        println!("WIF: {} ({})", found.wif, found.network);
    }
}

/// Appends `Address:` / `Passphrase:` lines to a file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, found: &Match) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "Address: {}", found.address)?;
        writeln!(file, "Passphrase: {}", found.passphrase)?;
        Ok(())
    }
}

impl ResultSink for FileSink {
    fn emit(&mut self, found: &Match) {
        if let Err(e) = self.append(found) {
            warn!(
                "Could not write result for {} to {}: {}",
                found.address,
                self.path.display(),
                e
            );
        }
    }
}

/// Collects matches in memory
impl ResultSink for Vec<Match> {
    fn emit(&mut self, found: &Match) {
        self.push(found.clone());
    }
}
