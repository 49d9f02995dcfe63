//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{endpoints, replies, session, timeouts};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Session history and expiry
    #[serde(default)]
    pub session: SessionConfig,

    /// External AI classifier and free-form replies
    #[serde(default)]
    pub ai: AiConfig,

    /// Conversation behaviour tunables
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Doctor directory source
    #[serde(default)]
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_session()?;
        self.validate_ai()?;
        self.validate_assistant()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block legitimate requests."
            );
        }

        Ok(())
    }

    fn validate_session(&self) -> Result<(), ConfigError> {
        let session = &self.session;

        // One user turn plus one assistant turn at minimum
        if session.history_limit < 2 {
            return Err(ConfigError::InvalidValue {
                field: "session.history_limit".to_string(),
                message: format!("Must be at least 2, got {}", session.history_limit),
            });
        }

        if session.idle_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.idle_timeout_secs".to_string(),
                message: "Idle timeout must be at least 1 second".to_string(),
            });
        }

        if session.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.sweep_interval_secs".to_string(),
                message: "Sweep interval must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_ai(&self) -> Result<(), ConfigError> {
        let ai = &self.ai;
        if !ai.enabled {
            return Ok(());
        }

        if ai.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("ai.endpoint".to_string()));
        }

        if ai.model.trim().is_empty() {
            return Err(ConfigError::MissingField("ai.model".to_string()));
        }

        if !(100..=60_000).contains(&ai.timeout_ms) {
            return Err(ConfigError::InvalidValue {
                field: "ai.timeout_ms".to_string(),
                message: format!("Must be between 100 and 60000, got {}", ai.timeout_ms),
            });
        }

        if !(0.0..=2.0).contains(&ai.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "ai.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", ai.temperature),
            });
        }

        if ai.provider == AiProvider::OpenAi
            && ai.api_key.as_deref().map_or(true, str::is_empty)
            && !ai.endpoint.starts_with("http://localhost")
        {
            return Err(ConfigError::InvalidValue {
                field: "ai.api_key".to_string(),
                message: "API key required for remote endpoints".to_string(),
            });
        }

        Ok(())
    }

    fn validate_assistant(&self) -> Result<(), ConfigError> {
        let assistant = &self.assistant;

        if !(1..=20).contains(&assistant.max_doctor_results) {
            return Err(ConfigError::InvalidValue {
                field: "assistant.max_doctor_results".to_string(),
                message: format!(
                    "Must be between 1 and 20, got {}",
                    assistant.max_doctor_results
                ),
            });
        }

        if assistant.max_listed_slots == 0 {
            return Err(ConfigError::InvalidValue {
                field: "assistant.max_listed_slots".to_string(),
                message: "Must list at least one slot".to_string(),
            });
        }

        if !(5..=240).contains(&assistant.slot_minutes) {
            return Err(ConfigError::InvalidValue {
                field: "assistant.slot_minutes".to_string(),
                message: format!("Must be between 5 and 240, got {}", assistant.slot_minutes),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
        }
    }
}

/// Session history and expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Turns kept per session
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Idle threshold after which a session is swept
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// How often the sweeper runs
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_history_limit() -> usize {
    session::HISTORY_LIMIT
}
fn default_idle_timeout() -> u64 {
    session::IDLE_TIMEOUT_SECS
}
fn default_sweep_interval() -> u64 {
    session::SWEEP_INTERVAL_SECS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// External AI provider flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// OpenAI-compatible chat completions API
    #[default]
    OpenAi,
    /// Ollama chat API
    Ollama,
}

/// External AI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Disabled means the rule cascade handles every message
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub provider: AiProvider,

    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_ai_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound on a single call, after which the fallback path is taken
    #[serde(default = "default_ai_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_ai_endpoint() -> String {
    endpoints::OPENAI_DEFAULT.to_string()
}
fn default_ai_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_ai_timeout_ms() -> u64 {
    timeouts::AI_REQUEST_MS
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> usize {
    400
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: AiProvider::default(),
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
            api_key: None,
            timeout_ms: default_ai_timeout_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl AiConfig {
    /// Settings for a local Ollama model
    pub fn ollama(model: impl Into<String>) -> Self {
        Self {
            enabled: true,
            provider: AiProvider::Ollama,
            endpoint: endpoints::OLLAMA_DEFAULT.to_string(),
            model: model.into(),
            ..Self::default()
        }
    }
}

/// Which classifier is consulted first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationStrategy {
    /// External AI first, rule cascade when it fails
    #[default]
    AiFirst,
    /// Rule cascade first, external AI only when the rules resolve nothing
    RulesFirst,
}

/// Conversation behaviour tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub classification_strategy: ClassificationStrategy,

    /// Skip specialization extraction when the message mentions "appointment"
    #[serde(default)]
    pub suppress_specialization_with_appointment: bool,

    #[serde(default = "default_max_doctor_results")]
    pub max_doctor_results: usize,

    #[serde(default = "default_max_listed_slots")]
    pub max_listed_slots: usize,

    /// Slot length used when deriving open slots from working hours
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,

    /// Turns of history passed to free-form AI replies
    #[serde(default = "default_ai_context_turns")]
    pub ai_context_turns: usize,
}

fn default_max_doctor_results() -> usize {
    replies::MAX_DOCTOR_RESULTS
}
fn default_max_listed_slots() -> usize {
    replies::MAX_LISTED_SLOTS
}
fn default_slot_minutes() -> u32 {
    replies::SLOT_MINUTES
}
fn default_ai_context_turns() -> usize {
    session::AI_CONTEXT_TURNS
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            classification_strategy: ClassificationStrategy::default(),
            suppress_specialization_with_appointment: false,
            max_doctor_results: default_max_doctor_results(),
            max_listed_slots: default_max_listed_slots(),
            slot_minutes: default_slot_minutes(),
            ai_context_turns: default_ai_context_turns(),
        }
    }
}

/// Doctor directory source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// YAML or JSON file with doctor records
    #[serde(default = "default_directory_path")]
    pub path: String,
}

fn default_directory_path() -> String {
    "config/doctors.yaml".to_string()
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            path: default_directory_path(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (MEDASSIST__ prefix, `__` separated)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Same as [`load_settings`] with an explicit config directory
pub fn load_settings_from(dir: &str, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name(&format!("{}/default", dir)).required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("{}/{}", dir, env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("MEDASSIST")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.session.history_limit, 20);
        assert_eq!(settings.session.idle_timeout_secs, 1800);
        assert!(!settings.ai.enabled);
        assert_eq!(
            settings.assistant.classification_strategy,
            ClassificationStrategy::AiFirst
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate_server().is_err());

        settings.server.port = 8080;
        settings.server.timeout_seconds = 0;
        assert!(settings.validate_server().is_err());
    }

    #[test]
    fn test_session_validation() {
        let mut settings = Settings::default();
        settings.session.history_limit = 1;
        assert!(settings.validate_session().is_err());

        settings.session.history_limit = 20;
        settings.session.idle_timeout_secs = 0;
        assert!(settings.validate_session().is_err());
    }

    #[test]
    fn test_ai_validation_only_when_enabled() {
        let mut settings = Settings::default();
        settings.ai.model = String::new();
        assert!(settings.validate_ai().is_ok());

        settings.ai.enabled = true;
        settings.ai.api_key = Some("key".to_string());
        assert!(settings.validate_ai().is_err());

        settings.ai.model = "gpt-4o-mini".to_string();
        assert!(settings.validate_ai().is_ok());

        settings.ai.timeout_ms = 10;
        assert!(settings.validate_ai().is_err());
    }

    #[test]
    fn test_remote_openai_requires_key() {
        let mut settings = Settings::default();
        settings.ai.enabled = true;
        assert!(settings.validate_ai().is_err());

        settings.ai = AiConfig::ollama("llama3.2");
        assert!(settings.validate_ai().is_ok());
    }

    #[test]
    fn test_assistant_validation() {
        let mut settings = Settings::default();
        settings.assistant.max_doctor_results = 0;
        assert!(settings.validate_assistant().is_err());

        settings.assistant.max_doctor_results = 5;
        settings.assistant.slot_minutes = 1;
        assert!(settings.validate_assistant().is_err());
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.yaml")).unwrap();
        writeln!(
            file,
            "server:\n  port: 9000\nsession:\n  history_limit: 10\nassistant:\n  classification_strategy: rules_first\n  suppress_specialization_with_appointment: true"
        )
        .unwrap();

        let settings = load_settings_from(dir.path().to_str().unwrap(), None).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.session.history_limit, 10);
        assert_eq!(
            settings.assistant.classification_strategy,
            ClassificationStrategy::RulesFirst
        );
        assert!(settings.assistant.suppress_specialization_with_appointment);
        // Untouched sections keep their defaults
        assert_eq!(settings.session.idle_timeout_secs, 1800);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.yaml")).unwrap();
        writeln!(file, "server:\n  port: 0").unwrap();

        assert!(load_settings_from(dir.path().to_str().unwrap(), None).is_err());
    }
}
