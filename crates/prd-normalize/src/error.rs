//! Error types for normalization
//!
//! Only [`ErrorKind::Unparseable`] is fatal to a generation run. Sink
//! failures are reported through [`SinkError`] but never escape
//! [`Normalizer::normalize`](crate::Normalizer::normalize).

use std::path::PathBuf;

/// Classification of normalization failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No recoverable JSON object in the input
    Unparseable,
}

/// Why the input could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnparseableCause {
    /// Input was empty or whitespace only
    #[error("input is empty")]
    EmptyInput,

    /// No `{` anywhere in the input
    #[error("no JSON object found")]
    NoJsonObject,

    /// Candidate text was not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Valid JSON but not an object
    #[error("top-level JSON value is not an object")]
    NotAnObject,
}

/// Normalization failure carrying the raw text for diagnosis
#[derive(Debug, Clone, thiserror::Error)]
#[error("unparseable model response: {cause}")]
pub struct NormalizationError {
    /// Failure class
    pub kind: ErrorKind,
    /// Specific cause
    pub cause: UnparseableCause,
    /// Raw input as received
    pub raw: String,
    /// Where the diagnostic sink saved the raw input, if it did
    pub raw_artifact: Option<PathBuf>,
}

impl NormalizationError {
    /// Create an unparseable error
    pub fn unparseable(cause: UnparseableCause, raw: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unparseable,
            cause,
            raw: raw.into(),
            raw_artifact: None,
        }
    }

    /// With the saved raw-text location
    #[inline]
    #[must_use]
    pub fn with_raw_artifact(mut self, path: Option<PathBuf>) -> Self {
        self.raw_artifact = path;
        self
    }
}

/// Errors writing diagnostics
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// IO error writing a diagnostic file
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document could not be serialized
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SinkError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_display() {
        let err = NormalizationError::unparseable(UnparseableCause::EmptyInput, "");
        assert_eq!(err.to_string(), "unparseable model response: input is empty");
        assert_eq!(err.kind, ErrorKind::Unparseable);
        assert!(err.raw_artifact.is_none());
    }

    #[test]
    fn raw_artifact_attached() {
        let err = NormalizationError::unparseable(UnparseableCause::NoJsonObject, "hi")
            .with_raw_artifact(Some(PathBuf::from("debug/raw_response_x.txt")));
        assert_eq!(
            err.raw_artifact.as_deref(),
            Some(std::path::Path::new("debug/raw_response_x.txt"))
        );
    }

    #[test]
    fn sink_error_display() {
        let err = SinkError::io_error(
            "debug",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("io error writing debug"));
    }
}
