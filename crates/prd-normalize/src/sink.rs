//! Diagnostic sinks for raw model output and normalized snapshots
//!
//! The normalizer hands every raw response, and every document it produces,
//! to a [`DiagnosticSink`]. Snapshots are never read back by the pipeline.

use crate::error::SinkError;
use chrono::Local;
use parking_lot::Mutex;
use prd_schema::Document;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for diagnostic artifacts
pub trait DiagnosticSink: Send + Sync {
    /// Persist raw model text, returning where it went if it has a location
    ///
    /// # Errors
    /// Returns error if the text could not be persisted
    fn record_raw(&self, raw: &str) -> Result<Option<PathBuf>, SinkError>;

    /// Persist a normalized document snapshot
    ///
    /// # Errors
    /// Returns error if the snapshot could not be persisted
    fn record_document(&self, document: &Document) -> Result<Option<PathBuf>, SinkError>;
}

/// Writes time-stamped files into a debug directory
#[derive(Debug, Clone)]
pub struct FsDiagnosticSink {
    dir: PathBuf,
}

impl FsDiagnosticSink {
    /// Create a sink writing under `dir`; the directory is created on first write
    #[inline]
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, prefix: &str, extension: &str, contents: &[u8]) -> Result<PathBuf, SinkError> {
        fs::create_dir_all(&self.dir).map_err(|e| SinkError::io_error(&self.dir, e))?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
        let path = self.dir.join(format!("{prefix}_{stamp}.{extension}"));
        fs::write(&path, contents).map_err(|e| SinkError::io_error(&path, e))?;
        Ok(path)
    }
}

impl DiagnosticSink for FsDiagnosticSink {
    fn record_raw(&self, raw: &str) -> Result<Option<PathBuf>, SinkError> {
        let path = self.write("raw_response", "txt", raw.as_bytes())?;
        tracing::debug!(path = %path.display(), "saved raw model response");
        Ok(Some(path))
    }

    fn record_document(&self, document: &Document) -> Result<Option<PathBuf>, SinkError> {
        let json = serde_json::to_vec_pretty(&document.to_canonical_json())?;
        let path = self.write("prd_content", "json", &json)?;
        tracing::debug!(path = %path.display(), "saved normalized document");
        Ok(Some(path))
    }
}

/// Keeps diagnostics in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryDiagnosticSink {
    raw: Mutex<Vec<String>>,
    documents: Mutex<Vec<Value>>,
}

impl MemoryDiagnosticSink {
    /// Create an empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw texts recorded so far
    #[must_use]
    pub fn raw_records(&self) -> Vec<String> {
        self.raw.lock().clone()
    }

    /// Canonical JSON of documents recorded so far
    #[must_use]
    pub fn documents(&self) -> Vec<Value> {
        self.documents.lock().clone()
    }
}

impl DiagnosticSink for MemoryDiagnosticSink {
    fn record_raw(&self, raw: &str) -> Result<Option<PathBuf>, SinkError> {
        self.raw.lock().push(raw.to_string());
        Ok(None)
    }

    fn record_document(&self, document: &Document) -> Result<Option<PathBuf>, SinkError> {
        self.documents.lock().push(document.to_canonical_json());
        Ok(None)
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record_raw(&self, _raw: &str) -> Result<Option<PathBuf>, SinkError> {
        Ok(None)
    }

    fn record_document(&self, _document: &Document) -> Result<Option<PathBuf>, SinkError> {
        Ok(None)
    }
}
