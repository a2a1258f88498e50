//! Configuration for the Learnflow service.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::llm::GenerativeConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Video catalog API settings
    pub catalog: CatalogConfig,

    /// Generative text service settings
    pub generative: GenerativeConfig,

    /// Transcript retrieval settings
    pub transcript: TranscriptConfig,

    /// HTTP server settings
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API key for the video catalog. Required before any catalog call.
    pub api_key: Option<String>,

    /// Base URL of the catalog API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Timed-text endpoint URL
    pub endpoint: String,

    /// Ordered language hints tried before the unhinted attempt
    pub languages: Vec<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the HTTP API
    pub port: u16,

    /// Log level filter
    pub log_level: String,
}

impl Config {
    /// Load configuration from file, falling back to environment variables.
    pub fn load() -> Result<Self> {
        let config_paths = [
            "learnflow.toml",
            "config/learnflow.toml",
            "~/.config/learnflow/config.toml",
            "/etc/learnflow/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Build configuration from environment variables over defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(api_key) = std::env::var("YT_API_KEY") {
            config.catalog.api_key = Some(api_key);
        }

        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            config.generative.api_key = Some(api_key);
        }

        if let Ok(port) = std::env::var("LEARNFLOW_PORT") {
            config.server.port = port.parse().unwrap_or(config.server.port);
        }

        if let Ok(log_level) = std::env::var("LEARNFLOW_LOG_LEVEL") {
            config.server.log_level = log_level;
        }

        if let Ok(langs) = std::env::var("LEARNFLOW_TRANSCRIPT_LANGS") {
            let langs: Vec<String> = langs
                .split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
            if !langs.is_empty() {
                config.transcript.languages = langs;
            }
        }

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.catalog.base_url).is_err() {
            return Err(anyhow!(
                "catalog.base_url is not a valid URL: {}",
                self.catalog.base_url
            ));
        }

        if url::Url::parse(&self.transcript.endpoint).is_err() {
            return Err(anyhow!(
                "transcript.endpoint is not a valid URL: {}",
                self.transcript.endpoint
            ));
        }

        if self.catalog.timeout_seconds == 0 || self.transcript.timeout_seconds == 0 {
            return Err(anyhow!("request timeouts must be greater than 0"));
        }

        if self.transcript.languages.is_empty() {
            return Err(anyhow!("transcript.languages must list at least one hint"));
        }

        if self.generative.timeout_seconds == 0 {
            return Err(anyhow!("generative.timeout_seconds must be greater than 0"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                api_key: None,
                base_url: "https://www.googleapis.com/youtube/v3".to_string(),
                timeout_seconds: 8,
            },
            generative: GenerativeConfig::default(),
            transcript: TranscriptConfig {
                endpoint: "https://video.google.com/timedtext".to_string(),
                languages: vec![
                    "en".to_string(),
                    "en-US".to_string(),
                    "en-GB".to_string(),
                ],
                timeout_seconds: 5,
            },
            server: ServerConfig {
                port: 8080,
                log_level: "info".to_string(),
            },
        }
    }
}

/// Builder for programmatic config creation.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_catalog_api_key(mut self, api_key: String) -> Self {
        self.config.catalog.api_key = Some(api_key);
        self
    }

    pub fn with_generative_api_key(mut self, api_key: String) -> Self {
        self.config.generative.api_key = Some(api_key);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_transcript_languages(mut self, languages: Vec<String>) -> Self {
        self.config.transcript.languages = languages;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.catalog.api_key.is_none());
        assert_eq!(config.transcript.languages[0], "en");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_catalog_api_key("key-123".to_string())
            .with_port(9090)
            .with_transcript_languages(vec!["es".to_string()])
            .build();

        assert_eq!(config.catalog.api_key.as_deref(), Some("key-123"));
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.transcript.languages, vec!["es"]);
    }

    #[test]
    fn test_validation_rejects_empty_languages() {
        let mut config = Config::default();
        config.transcript.languages.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_base_url() {
        let mut config = Config::default();
        config.catalog.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learnflow.toml");
        let config = ConfigBuilder::new()
            .with_catalog_api_key("file-key".to_string())
            .build();
        config.save(path.to_str().unwrap()).unwrap();

        let loaded: Config =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.catalog.api_key.as_deref(), Some("file-key"));
    }
}
