//! Raw text to [`Document`]

use crate::coerce::coerce_document;
use crate::error::{NormalizationError, UnparseableCause};
use crate::extract::{parse_object, strip_thinking};
use crate::sink::{DiagnosticSink, NullSink};
use prd_schema::Document;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

/// Parses and repairs raw model output into the canonical schema
#[derive(Clone)]
pub struct Normalizer {
    strip_thinking: bool,
    sink: Arc<dyn DiagnosticSink>,
}

impl Normalizer {
    /// Normalizer that strips thinking blocks and records nothing
    #[must_use]
    pub fn new() -> Self {
        Self {
            strip_thinking: true,
            sink: Arc::new(NullSink),
        }
    }

    /// With a diagnostic sink
    #[inline]
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Enable or disable `<think>` block removal
    #[inline]
    #[must_use]
    pub fn with_strip_thinking(mut self, strip: bool) -> Self {
        self.strip_thinking = strip;
        self
    }

    /// Normalize raw model text
    ///
    /// The raw text is always handed to the diagnostic sink, and the
    /// document too when one is produced. Sink failures are logged and
    /// otherwise ignored.
    ///
    /// # Errors
    /// Returns [`NormalizationError`] when the text is empty or holds no
    /// recoverable JSON object
    #[tracing::instrument(skip_all, fields(raw_len = raw.len()))]
    pub fn normalize(&self, raw: &str) -> Result<Document, NormalizationError> {
        let parsed = self.parse(raw);
        let raw_artifact = self.record(raw, parsed.as_ref().ok());

        match parsed {
            Ok(document) => {
                let populated = document
                    .sections()
                    .iter()
                    .filter(|s| !s.is_blank())
                    .count();
                tracing::info!(
                    sections = populated,
                    images = document.image_suggestions.len(),
                    metadata = document.metadata.len(),
                    "normalized model response"
                );
                Ok(document)
            }
            Err(cause) => {
                let error = NormalizationError::unparseable(cause, raw).with_raw_artifact(raw_artifact);
                tracing::error!(
                    error = %error,
                    raw_artifact = ?error.raw_artifact,
                    "model response could not be normalized"
                );
                Err(error)
            }
        }
    }

    fn parse(&self, raw: &str) -> Result<Document, UnparseableCause> {
        let text = if self.strip_thinking {
            strip_thinking(raw)
        } else {
            Cow::Borrowed(raw)
        };
        let root = parse_object(&text)?;
        Ok(coerce_document(root))
    }

    fn record(&self, raw: &str, document: Option<&Document>) -> Option<PathBuf> {
        let raw_artifact = self.sink.record_raw(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to record raw response");
            None
        });
        if let Some(document) = document {
            if let Err(e) = self.sink.record_document(document) {
                tracing::warn!(error = %e, "failed to record document snapshot");
            }
        }
        raw_artifact
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("strip_thinking", &self.strip_thinking)
            .finish_non_exhaustive()
    }
}
