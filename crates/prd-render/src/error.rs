//! Render errors

use std::path::PathBuf;

/// Rendering failures
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Page too small to hold body text and footer
    #[error("invalid page size {width}x{height}: need at least {min_width}x{min_height}")]
    InvalidPageSize {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },

    /// Writing the artifact failed
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Create IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
