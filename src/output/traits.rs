//! Output sink trait and error types
//!
//! The crawl loop hands every newly confirmed address to an
//! [`IdentifierSink`]; the sink decides where it is persisted.

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for identifier sinks
///
/// A sink receives each address once per run, in discovery order, as soon
/// as it is confirmed. Implementations must make the address durable before
/// returning `Ok`.
pub trait IdentifierSink {
    /// Records a validated address
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The address was persisted
    /// * `Ok(false)` - The sink already held it (e.g. from a previous run)
    /// * `Err(OutputError)` - The address could not be persisted
    fn record_email(&mut self, email: &str) -> OutputResult<bool>;

    /// Number of addresses the sink holds, including earlier runs
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flushes any buffered state; called once when the crawl ends
    fn finalize(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// A sink that keeps addresses in memory only
///
/// Used when no output file is wanted and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    emails: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emails(&self) -> &[String] {
        &self.emails
    }
}

impl IdentifierSink for MemorySink {
    fn record_email(&mut self, email: &str) -> OutputResult<bool> {
        if self.emails.iter().any(|e| e.eq_ignore_ascii_case(email)) {
            return Ok(false);
        }
        self.emails.push(email.to_string());
        Ok(true)
    }

    fn len(&self) -> usize {
        self.emails.len()
    }
}
