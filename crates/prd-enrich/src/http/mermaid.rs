//! Mermaid rendering microservice client

use super::client_with_timeout;
use crate::collaborator::DiagramRenderer;
use crate::error::DiagramError;
use async_trait::async_trait;
use prd_schema::{ContentHash, DiagramKind, ImageHandle};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default conversion endpoint
pub const DEFAULT_MERMAID_URL: &str = "http://localhost:3000/convert/image";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertRequest<'a> {
    mermaid_syntax: &'a str,
}

/// Posts Mermaid source to a conversion service and stores the returned PNG
#[derive(Debug, Clone)]
pub struct MermaidServiceClient {
    client: Client,
    endpoint: String,
    output_dir: PathBuf,
}

impl MermaidServiceClient {
    /// Create a client writing images into `output_dir`
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(
        endpoint: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client: client_with_timeout(timeout)?,
            endpoint: endpoint.into(),
            output_dir: output_dir.into(),
        })
    }

    /// Conversion endpoint
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Directory rendered images are written to
    #[inline]
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Image path for a diagram source; identical sources share a file
    #[must_use]
    pub fn image_path(&self, source: &str, kind: DiagramKind) -> PathBuf {
        let hash = ContentHash::compute_parts(&[kind.as_str(), source]);
        self.output_dir.join(format!("diagram_{}.png", hash.short()))
    }
}

fn classify_status(status: StatusCode, body: String) -> DiagramError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            DiagramError::InvalidSyntax(body)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => DiagramError::Timeout,
        other => DiagramError::Unavailable(format!("status {other}")),
    }
}

fn transport_error(err: &reqwest::Error) -> DiagramError {
    if err.is_timeout() {
        DiagramError::Timeout
    } else {
        DiagramError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl DiagramRenderer for MermaidServiceClient {
    async fn render(&self, source: &str, kind: DiagramKind) -> Result<ImageHandle, DiagramError> {
        tracing::debug!(endpoint = %self.endpoint, kind = kind.as_str(), "rendering diagram");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ConvertRequest {
                mermaid_syntax: source.trim(),
            })
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let bytes = response.bytes().await.map_err(|e| transport_error(&e))?;
        if bytes.is_empty() {
            return Err(DiagramError::Unavailable("empty image body".into()));
        }

        let path = self.image_path(source, kind);
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| DiagramError::Unavailable(format!("{}: {e}", self.output_dir.display())))?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| DiagramError::Unavailable(format!("{}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "diagram rendered");
        Ok(ImageHandle::Path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_service_field_name() {
        let body = serde_json::to_value(ConvertRequest {
            mermaid_syntax: "graph TD\nA-->B",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"mermaidSyntax": "graph TD\nA-->B"}));
    }

    #[test]
    fn status_classification() {
        assert_eq!(
            classify_status(StatusCode::BAD_REQUEST, "Parse error".into()),
            DiagramError::InvalidSyntax("Parse error".into())
        );
        assert_eq!(
            classify_status(StatusCode::GATEWAY_TIMEOUT, String::new()),
            DiagramError::Timeout
        );
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            DiagramError::Unavailable(_)
        ));
    }

    #[test]
    fn image_path_is_stable_per_source() {
        let dir = tempfile::tempdir().unwrap();
        let client =
            MermaidServiceClient::new(DEFAULT_MERMAID_URL, dir.path(), Duration::from_secs(1))
                .unwrap();
        let a = client.image_path("graph TD\nA-->B", DiagramKind::Flowchart);
        let b = client.image_path("graph TD\nA-->B", DiagramKind::Flowchart);
        let c = client.image_path("graph TD\nA-->C", DiagramKind::Flowchart);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with(dir.path()));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("png"));
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let client = MermaidServiceClient::new(
            "http://127.0.0.1:9/convert/image",
            dir.path(),
            Duration::from_secs(2),
        )
        .unwrap();
        let result = client.render("graph TD\nA-->B", DiagramKind::Flowchart).await;
        assert!(matches!(
            result,
            Err(DiagramError::Unavailable(_) | DiagramError::Timeout)
        ));
    }
}
