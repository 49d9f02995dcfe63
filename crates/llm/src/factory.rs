//! LLM Factory
//!
//! Builds the configured backend and wraps it as an [`ExternalAi`].
//!
//! ## Supported Providers
//! - **OpenAI**: OpenAI or any compatible chat completions endpoint
//! - **Ollama**: local models

use medassist_config::{AiConfig, AiProvider};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    assistant::{ExternalAi, LlmAssistant},
    backend::{LlmBackend, LlmConfig, OllamaBackend, OpenAIBackend},
    LlmError,
};

impl From<&AiConfig> for LlmConfig {
    fn from(config: &AiConfig) -> Self {
        Self {
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// Create the backend for the configured provider
pub fn create_backend(config: &AiConfig) -> Result<Arc<dyn LlmBackend>, LlmError> {
    let llm_config = LlmConfig::from(config);
    let backend: Arc<dyn LlmBackend> = match config.provider {
        AiProvider::OpenAi => Arc::new(OpenAIBackend::new(llm_config)?),
        AiProvider::Ollama => Arc::new(OllamaBackend::new(llm_config)?),
    };
    Ok(backend)
}

/// External AI for the given settings, `None` when disabled
pub fn create_assistant(config: &AiConfig) -> Result<Option<Arc<dyn ExternalAi>>, LlmError> {
    if !config.enabled {
        tracing::info!("External AI disabled, using rule-based classification only");
        return Ok(None);
    }

    let backend = create_backend(config)?;
    tracing::info!(
        provider = ?config.provider,
        model = backend.model_name(),
        timeout_ms = config.timeout_ms,
        "External AI configured"
    );

    let assistant = LlmAssistant::new(backend, Duration::from_millis(config.timeout_ms));
    Ok(Some(Arc::new(assistant)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_yields_none() {
        let config = AiConfig::default();
        assert!(create_assistant(&config).unwrap().is_none());
    }

    #[test]
    fn test_ollama_assistant() {
        let config = AiConfig::ollama("llama3.2");
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.model_name(), "llama3.2");
        assert!(create_assistant(&config).unwrap().is_some());
    }

    #[test]
    fn test_remote_openai_without_key_fails() {
        let config = AiConfig {
            enabled: true,
            ..AiConfig::default()
        };
        assert!(matches!(
            create_assistant(&config),
            Err(LlmError::Configuration(_))
        ));
    }

    #[test]
    fn test_config_conversion() {
        let config = AiConfig {
            timeout_ms: 1500,
            ..AiConfig::ollama("qwen")
        };
        let llm = LlmConfig::from(&config);
        assert_eq!(llm.timeout, Duration::from_millis(1500));
        assert_eq!(llm.endpoint, "http://localhost:11434");
    }
}
