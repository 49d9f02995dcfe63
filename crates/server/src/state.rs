//! Application State
//!
//! Shared state across all handlers.

use parking_lot::RwLock;
use std::sync::Arc;

use medassist_agent::{InMemoryDoctorDirectory, InMemorySessionStore, Orchestrator, OrchestratorConfig};
use medassist_config::Settings;
use medassist_core::SessionStore;
use medassist_llm::create_assistant;

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Settings the server was started with
    pub config: Arc<RwLock<Settings>>,
    /// Conversation orchestrator
    pub orchestrator: Arc<Orchestrator>,
    /// Session store shared with the orchestrator and the sweeper
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// State around an already-built orchestrator
    pub fn new(config: Settings, orchestrator: Orchestrator) -> Self {
        let sessions = orchestrator.sessions().clone();
        Self {
            config: Arc::new(RwLock::new(config)),
            orchestrator: Arc::new(orchestrator),
            sessions,
        }
    }

    /// Build everything from settings: doctor directory, in-memory session
    /// store and (when enabled) the external AI.
    pub fn from_settings(config: Settings) -> Result<Self, ServerError> {
        let directory = InMemoryDoctorDirectory::from_file(&config.directory.path)?
            .with_slot_minutes(config.assistant.slot_minutes);
        if directory.is_empty() {
            tracing::warn!(path = %config.directory.path, "Doctor directory is empty");
        }

        let ai = create_assistant(&config.ai).map_err(|e| ServerError::Config(e.to_string()))?;

        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let orchestrator = Orchestrator::new(
            sessions,
            Arc::new(directory),
            OrchestratorConfig::from(&config),
        )
        .with_ai(ai);

        Ok(Self::new(config, orchestrator))
    }
}
