//! Error types for the generation pipeline

use prd_assemble::AssemblyError;
use prd_normalize::NormalizationError;
use prd_render::RenderError;
use std::path::{Path, PathBuf};

/// Language model failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    /// Request could not be completed
    #[error("language model request failed: {0}")]
    Request(String),

    /// Model server answered with an error status
    #[error("language model returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("invalid language model response: {0}")]
    InvalidResponse(String),

    /// Model did not answer in time
    #[error("language model timed out")]
    Timeout,

    /// Configured model is not installed on the server
    #[error("model '{0}' is not installed on the language model server")]
    ModelNotFound(String),

    /// Model answered with no text
    #[error("language model returned an empty response")]
    EmptyResponse,
}

impl LlmError {
    /// Classify a transport error
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// An HTTP client could not be built
    #[error("http client error: {0}")]
    Client(String),
}

impl ConfigError {
    /// Create IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create invalid-value error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for ConfigError {
    fn from(err: reqwest::Error) -> Self {
        Self::Client(err.to_string())
    }
}

/// Top-level pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Language model call failed
    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),

    /// Model output could not be parsed
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// Document broke its shape contract
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Rendering failed
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    /// Configuration was invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cancelled before any content existed
    #[error("run cancelled before content was generated")]
    Cancelled,
}

impl PipelineError {
    /// Whether the run failed on its own rather than being cancelled
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Saved raw model output, for unparseable responses
    #[must_use]
    pub fn raw_artifact(&self) -> Option<&Path> {
        match self {
            Self::Normalization(err) => err.raw_artifact.as_deref(),
            _ => None,
        }
    }
}
