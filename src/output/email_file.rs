//! Append-only identifier file
//!
//! One address per line. Each line is flushed as soon as it is written, so an
//! interrupted crawl loses nothing it has already confirmed. Addresses already
//! present in the file (compared case-insensitively) are never appended again.

use crate::output::traits::{IdentifierSink, OutputError, OutputResult};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File-backed [`IdentifierSink`]
#[derive(Debug)]
pub struct EmailFile {
    path: PathBuf,
    file: File,
    known: HashSet<String>,
}

impl EmailFile {
    /// Opens (creating if needed) the identifier file for appending
    ///
    /// Existing lines are loaded so that re-runs do not duplicate them.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the identifier file
    ///
    /// # Returns
    ///
    /// * `Ok(EmailFile)` - The file is open and ready
    /// * `Err(OutputError)` - The file could not be read or opened
    pub fn open(path: impl AsRef<Path>) -> OutputResult<Self> {
        let path = path.as_ref().to_path_buf();
        let (known, missing_newline) = read_existing(&path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if missing_newline {
            writeln!(file)?;
        }

        if !known.is_empty() {
            tracing::info!(
                "Loaded {} existing addresses from {}",
                known.len(),
                path.display()
            );
        }

        Ok(Self { path, file, known })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentifierSink for EmailFile {
    fn record_email(&mut self, email: &str) -> OutputResult<bool> {
        if !self.known.insert(email.to_lowercase()) {
            tracing::debug!("{} already in {}", email, self.path.display());
            return Ok(false);
        }

        writeln!(self.file, "{}", email)
            .and_then(|_| self.file.flush())
            .map_err(|e| OutputError::Write(format!("{}: {}", self.path.display(), e)))?;
        Ok(true)
    }

    fn len(&self) -> usize {
        self.known.len()
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

/// Loads the lowercased addresses in `path` and whether its last line is unterminated
fn read_existing(path: &Path) -> OutputResult<(HashSet<String>, bool)> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok((HashSet::new(), false)),
        Err(e) => return Err(e.into()),
    };

    let known = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect();
    let missing_newline = !content.is_empty() && !content.ends_with('\n');

    Ok((known, missing_newline))
}
