//! Generative text service integration.
//!
//! The service is consumed through a single prompt-in, text-out capability.
//! Every caller treats a failed or empty completion as "unavailable" and
//! falls back to its own deterministic path; nothing here retries.

pub mod curation;
pub mod providers;
pub mod tips;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Supported generative providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum GenerativeProvider {
    Gemini,
    OpenAI,
}

/// Generative service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativeConfig {
    pub provider: GenerativeProvider,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            provider: GenerativeProvider::Gemini,
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            max_tokens: 2048,
            temperature: 0.4,
            timeout_seconds: 20,
        }
    }
}

/// Prompt-in, text-out capability of the generative service.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
    fn provider_type(&self) -> GenerativeProvider;
}

/// Create a generative model from configuration. Returns `None` when no API
/// key is configured; the pipelines then run on their deterministic
/// fallbacks alone.
pub fn create_model(config: &GenerativeConfig) -> Option<Arc<dyn GenerativeModel>> {
    if config.api_key.is_none() {
        return None;
    }
    let model: Arc<dyn GenerativeModel> = match config.provider {
        GenerativeProvider::Gemini => Arc::new(providers::GeminiModel::new(config.clone())),
        GenerativeProvider::OpenAI => Arc::new(providers::OpenAiModel::new(config.clone())),
    };
    Some(model)
}

/// Strip markdown code fences and stray backticks from a model response so
/// the JSON underneath can be parsed.
pub(crate) fn clean_model_response(content: &str) -> String {
    let content = content.trim();

    if content.starts_with("```") {
        if let Some(start) = content.find('\n') {
            if let Some(end) = content.rfind("```") {
                if end > start {
                    return content[start + 1..end].trim().to_string();
                }
            }
        }
    }

    content.replace("```", "").trim().to_string()
}
