//! Generator configuration
//!
//! Loaded from TOML, then overlaid from the environment. Every field has a
//! default, so an empty file is a valid configuration.

use crate::error::ConfigError;
use prd_enrich::EnrichmentConfig;
use prd_render::{MIN_HEIGHT, MIN_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama server base URL
    pub host: String,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            temperature: 0.3,
            timeout_secs: 300,
        }
    }
}

impl LlmConfig {
    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// External service endpoints and credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Mermaid conversion endpoint
    pub mermaid_url: String,
    /// Pixabay API key; image lookup is skipped without one
    pub pixabay_api_key: Option<String>,
    /// Google search engine id
    pub google_pse_cx: Option<String>,
    /// Google API key; reference search is skipped without it and the engine id
    pub google_pse_api_key: Option<String>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            mermaid_url: prd_enrich::http::DEFAULT_MERMAID_URL.to_string(),
            pixabay_api_key: None,
            google_pse_cx: None,
            google_pse_api_key: None,
        }
    }
}

/// Normalizer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Remove `<think>` blocks before parsing
    pub strip_thinking: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strip_thinking: true,
        }
    }
}

/// Output layout and locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Raw responses and parsed snapshots
    pub debug_dir: PathBuf,
    /// Rendered diagrams
    pub asset_dir: PathBuf,
    /// Title heading
    pub document_title: String,
    /// Footer attribution
    pub attribution: String,
    /// Page width in columns
    pub page_width: usize,
    /// Page height in lines
    pub page_height: usize,
    /// Page break between sections
    pub page_breaks: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            debug_dir: PathBuf::from("data/debug"),
            asset_dir: PathBuf::from("data/assets"),
            document_title: "Product Requirements Document".to_string(),
            attribution: prd_render::DEFAULT_ATTRIBUTION.to_string(),
            page_width: 96,
            page_height: 60,
            page_breaks: true,
        }
    }
}

/// Complete generator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub llm: LlmConfig,
    pub enrichment: EnrichmentConfig,
    pub services: ServicesConfig,
    pub normalizer: NormalizerConfig,
    pub output: OutputConfig,
}

impl GeneratorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML or mistyped fields
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Overlay values from process environment variables
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup
    ///
    /// Unparseable numbers are logged and ignored.
    #[must_use]
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(host) = get("OLLAMA_HOST") {
            self.llm.host = host;
        }
        if let Some(model) = get("OLLAMA_MODEL") {
            self.llm.model = model;
        }
        if let Some(raw) = get("OLLAMA_TEMPERATURE") {
            match raw.parse::<f32>() {
                Ok(temperature) => self.llm.temperature = temperature,
                Err(_) => tracing::warn!(value = %raw, "ignoring unparseable OLLAMA_TEMPERATURE"),
            }
        }
        if let Some(url) = get("MERMAID_SERVICE_URL") {
            self.services.mermaid_url = url;
        }
        if let Some(flag) = get("ENABLE_SEARCH") {
            self.enrichment.references = parse_bool(&flag);
        }
        if let Some(flag) = get("GENERATE_IMAGES") {
            self.enrichment.images = parse_bool(&flag);
        }
        if let Some(flag) = get("GENERATE_DIAGRAMS") {
            self.enrichment.diagrams = parse_bool(&flag);
        }
        if let Some(flag) = get("HANDLE_THINKING") {
            self.normalizer.strip_thinking = parse_bool(&flag);
        }
        if let Some(key) = get("PIXABAY_API_KEY") {
            self.services.pixabay_api_key = Some(key);
        }
        if let Some(cx) = get("GOOGLE_PSE_CX") {
            self.services.google_pse_cx = Some(cx);
        }
        if let Some(key) = get("GOOGLE_PSE_API_KEY") {
            self.services.google_pse_api_key = Some(key);
        }
        self
    }

    /// Check values are in range
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::invalid(
                "llm.temperature",
                format!("{} is outside 0.0..=2.0", self.llm.temperature),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::invalid("llm.model", "must not be empty"));
        }
        if self.enrichment.max_concurrency == 0 {
            return Err(ConfigError::invalid("enrichment.max_concurrency", "must be at least 1"));
        }
        if self.enrichment.call_timeout_secs == 0 {
            return Err(ConfigError::invalid("enrichment.call_timeout_secs", "must be at least 1"));
        }
        if self.output.page_width < MIN_WIDTH {
            return Err(ConfigError::invalid(
                "output.page_width",
                format!("must be at least {MIN_WIDTH}"),
            ));
        }
        if self.output.page_height < MIN_HEIGHT {
            return Err(ConfigError::invalid(
                "output.page_height",
                format!("must be at least {MIN_HEIGHT}"),
            ));
        }
        Ok(())
    }
}

/// `true`, `1`, `yes` and `y`, in any case, are true; anything else is false
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_local_services() {
        let config = GeneratorConfig::default();
        assert_eq!(config.llm.host, "http://localhost:11434");
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.services.mermaid_url, "http://localhost:3000/convert/image");
        assert_eq!(config.output.document_title, "Product Requirements Document");
        assert!(config.normalizer.strip_thinking);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            [llm]
            model = "mistral"

            [enrichment]
            images = false
            max_concurrency = 2

            [output]
            page_breaks = false
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.host, "http://localhost:11434");
        assert!(!config.enrichment.images);
        assert!(config.enrichment.diagrams);
        assert_eq!(config.enrichment.max_concurrency, 2);
        assert!(!config.output.page_breaks);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("[llm\nmodel = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prd.toml");
        std::fs::write(&path, "[llm]\ntemperature = 0.7\n").unwrap();
        let config = GeneratorConfig::load(&path).unwrap();
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);

        assert!(matches!(
            GeneratorConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = GeneratorConfig::default().with_env_lookup(env(&[
            ("OLLAMA_HOST", "http://gpu-box:11434"),
            ("OLLAMA_MODEL", "qwen2"),
            ("OLLAMA_TEMPERATURE", "0.9"),
            ("ENABLE_SEARCH", "no"),
            ("GENERATE_IMAGES", "Yes"),
            ("GENERATE_DIAGRAMS", "0"),
            ("HANDLE_THINKING", "false"),
            ("PIXABAY_API_KEY", "pk"),
            ("GOOGLE_PSE_CX", "cx"),
            ("GOOGLE_PSE_API_KEY", "gk"),
            ("MERMAID_SERVICE_URL", "http://mermaid:3000/convert/image"),
        ]));
        assert_eq!(config.llm.host, "http://gpu-box:11434");
        assert_eq!(config.llm.model, "qwen2");
        assert!((config.llm.temperature - 0.9).abs() < f32::EPSILON);
        assert!(!config.enrichment.references);
        assert!(config.enrichment.images);
        assert!(!config.enrichment.diagrams);
        assert!(!config.normalizer.strip_thinking);
        assert_eq!(config.services.pixabay_api_key.as_deref(), Some("pk"));
        assert_eq!(config.services.google_pse_cx.as_deref(), Some("cx"));
        assert_eq!(config.services.google_pse_api_key.as_deref(), Some("gk"));
        assert_eq!(config.services.mermaid_url, "http://mermaid:3000/convert/image");
    }

    #[test]
    fn bad_number_and_blank_values_are_ignored() {
        let config = GeneratorConfig::default().with_env_lookup(env(&[
            ("OLLAMA_TEMPERATURE", "warm"),
            ("OLLAMA_MODEL", "   "),
        ]));
        assert!((config.llm.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.llm.model, "llama3");
    }

    #[test]
    fn bool_parsing() {
        for yes in ["true", "TRUE", "1", "yes", "Y", " y "] {
            assert!(parse_bool(yes), "{yes}");
        }
        for no in ["false", "0", "no", "on", ""] {
            assert!(!parse_bool(no), "{no}");
        }
    }

    #[test]
    fn validation_rejects_out_of_range() {
        let mut config = GeneratorConfig::default();
        config.llm.temperature = 3.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "llm.temperature", .. })
        ));

        let mut config = GeneratorConfig::default();
        config.output.page_width = 10;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "output.page_width", .. })
        ));
    }
}
