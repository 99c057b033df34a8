//! Language model seam and the Ollama client

use crate::config::LlmConfig;
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// Produces raw text for a prompt
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion
    ///
    /// # Errors
    /// Returns [`LlmError`] if the model cannot be reached or answers badly
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Check the model can serve requests before a run starts
    ///
    /// # Errors
    /// Returns [`LlmError`] if the model is missing or the server is unreachable
    async fn ensure_ready(&self) -> Result<(), LlmError> {
        Ok(())
    }
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Text of a non-streaming `/api/generate` response
///
/// # Errors
/// Returns [`LlmError::InvalidResponse`] without a `response` string, or
/// [`LlmError::EmptyResponse`] when it is blank
pub fn parse_generate_response(body: &Value) -> Result<String, LlmError> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return Err(LlmError::InvalidResponse(error.to_string()));
    }
    let text = body
        .get("response")
        .and_then(Value::as_str)
        .ok_or_else(|| LlmError::InvalidResponse("missing response field".into()))?;
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Model names from a `/api/tags` response
#[must_use]
pub fn parse_model_tags(body: &Value) -> Vec<String> {
    body.get("models")
        .and_then(Value::as_array)
        .map(|models| {
            models
                .iter()
                .filter_map(|m| m.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Ollama HTTP client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    host: String,
    model: String,
    temperature: f32,
}

impl OllamaClient {
    /// Client for the configured host and model
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &LlmConfig) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(config.timeout()).build()?,
            host: config.host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Model name
    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Model names installed on the server
    async fn installed_models(&self) -> Result<Vec<String>, LlmError> {
        let body: Value = self
            .client
            .get(format!("{}/api/tags", self.host))
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(&e))?
            .error_for_status()
            .map_err(|e| LlmError::from_reqwest(&e))?
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        Ok(parse_model_tags(&body))
    }
}

/// Whether `model` is among `installed`, with or without a `:tag` suffix
fn is_installed(installed: &[String], model: &str) -> bool {
    installed
        .iter()
        .any(|name| name == model || name.split(':').next() == Some(model))
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.host);
        tracing::info!(model = %self.model, prompt_chars = prompt.len(), "requesting completion");

        let body: Value = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
                options: GenerateOptions {
                    temperature: self.temperature,
                },
            })
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(&e))?
            .error_for_status()
            .map_err(|e| LlmError::from_reqwest(&e))?
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let text = parse_generate_response(&body)?;
        tracing::debug!(response_chars = text.len(), "completion received");
        Ok(text)
    }

    async fn ensure_ready(&self) -> Result<(), LlmError> {
        let installed = self.installed_models().await?;
        if is_installed(&installed, &self.model) {
            return Ok(());
        }
        tracing::error!(model = %self.model, installed = ?installed, "model is not installed");
        Err(LlmError::ModelNotFound(self.model.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_shape() {
        let body = serde_json::to_value(GenerateRequest {
            model: "llama3",
            prompt: "hi",
            stream: false,
            options: GenerateOptions { temperature: 0.5 },
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"model": "llama3", "prompt": "hi", "stream": false, "options": {"temperature": 0.5}})
        );
    }

    #[test]
    fn parses_response_text() {
        let body = json!({"model": "llama3", "response": "{\"a\": 1}", "done": true});
        assert_eq!(parse_generate_response(&body).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn error_and_blank_responses() {
        assert!(matches!(
            parse_generate_response(&json!({"error": "model 'x' not found"})),
            Err(LlmError::InvalidResponse(_))
        ));
        assert_eq!(
            parse_generate_response(&json!({"response": "  "})),
            Err(LlmError::EmptyResponse)
        );
        assert!(matches!(
            parse_generate_response(&json!({})),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn model_tags() {
        let body = json!({"models": [{"name": "llama3:latest"}, {"name": "mistral"}]});
        assert_eq!(parse_model_tags(&body), vec!["llama3:latest", "mistral"]);
        assert!(parse_model_tags(&json!({})).is_empty());
    }

    #[test]
    fn installed_model_matches_with_or_without_tag() {
        let installed = vec!["llama3:latest".to_string(), "mistral".to_string()];
        assert!(is_installed(&installed, "llama3"));
        assert!(is_installed(&installed, "llama3:latest"));
        assert!(is_installed(&installed, "mistral"));
        assert!(!is_installed(&installed, "llama3:70b"));
        assert!(!is_installed(&installed, "qwen2"));
        assert!(!is_installed(&[], "llama3"));
    }

    #[tokio::test]
    async fn unreachable_server_fails_readiness() {
        let config = LlmConfig {
            host: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..LlmConfig::default()
        };
        let client = OllamaClient::new(&config).unwrap();
        let err = client.ensure_ready().await.unwrap_err();
        assert!(matches!(err, LlmError::Request(_) | LlmError::Timeout));
    }

    #[test]
    fn host_trailing_slash_is_trimmed() {
        let config = LlmConfig {
            host: "http://localhost:11434/".into(),
            ..LlmConfig::default()
        };
        let client = OllamaClient::new(&config).unwrap();
        assert_eq!(client.host, "http://localhost:11434");
        assert_eq!(client.model(), "llama3");
    }
}
