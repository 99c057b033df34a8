//! Renderer inputs and outputs

use crate::error::RenderError;
use chrono::{Local, NaiveDateTime};
use std::path::Path;

/// Attribution printed in every footer by default
pub const DEFAULT_ATTRIBUTION: &str = "Powered by AI";

/// Footer timestamp format
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Data printed in every page footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterMetadata {
    /// Generation time, local wall clock
    pub generated_at: NaiveDateTime,
    /// Attribution text
    pub attribution: String,
}

impl FooterMetadata {
    /// Footer for a document generated at `generated_at`
    #[must_use]
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self {
            generated_at,
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }

    /// Footer stamped with the current local time
    #[must_use]
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// With custom attribution
    #[inline]
    #[must_use]
    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    /// Formatted timestamp
    #[must_use]
    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// A rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Page contents, in order
    pub pages: Vec<String>,
    /// MIME type of [`Self::to_bytes`]
    pub media_type: &'static str,
}

impl RenderedArtifact {
    /// Number of pages
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages joined with form feeds
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pages.join("\u{c}").into_bytes()
    }

    /// Write the artifact to `path`, creating parent directories
    ///
    /// # Errors
    /// Returns [`RenderError::Io`] if the file cannot be written
    pub fn write_to(&self, path: &Path) -> Result<(), RenderError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| RenderError::io_error(parent, e))?;
        }
        std::fs::write(path, self.to_bytes()).map_err(|e| RenderError::io_error(path, e))?;
        tracing::info!(path = %path.display(), pages = self.pages.len(), "artifact written");
        Ok(())
    }
}
