//! Conversation orchestrator
//!
//! Runs the per-message pipeline:
//! 1. Load or create the session
//! 2. Classify the message (external AI or rule cascade)
//! 3. Continue the previous flow when a bare follow-up only carries slots
//! 4. Merge new slots into the session context
//! 5. Dispatch to the handler for the resolved intent
//! 6. Record both turns and persist the session
//!
//! Any error inside the pipeline is turned into an apology reply; the caller
//! always gets a response.

mod handlers;

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use medassist_config::{AssistantConfig, ClassificationStrategy, SessionConfig, Settings};
use medassist_core::{
    Clock, DoctorDirectory, Entities, Intent, Session, SessionStore, SystemClock, Turn,
    TurnMetadata,
};
use medassist_llm::ExternalAi;
use medassist_text_processing::{EntityExtractor, ExtractorConfig};

use crate::classifier::IntentResolver;
use handlers::SearchTarget;
use crate::responses;
use crate::AgentError;

/// Orchestrator tunables
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub strategy: ClassificationStrategy,
    pub suppress_specialization_with_appointment: bool,
    pub history_limit: usize,
    pub max_doctor_results: usize,
    pub max_listed_slots: usize,
    pub ai_context_turns: usize,
}

impl OrchestratorConfig {
    pub fn new(assistant: &AssistantConfig, session: &SessionConfig) -> Self {
        Self {
            strategy: assistant.classification_strategy,
            suppress_specialization_with_appointment: assistant
                .suppress_specialization_with_appointment,
            history_limit: session.history_limit,
            max_doctor_results: assistant.max_doctor_results,
            max_listed_slots: assistant.max_listed_slots,
            ai_context_turns: assistant.ai_context_turns,
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::new(&AssistantConfig::default(), &SessionConfig::default())
    }
}

impl From<&Settings> for OrchestratorConfig {
    fn from(settings: &Settings) -> Self {
        Self::new(&settings.assistant, &settings.session)
    }
}

/// Reply to one chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub intent: Intent,
    pub entities: Entities,
}

/// Intent to act on, given the classified one and the session's last intent.
///
/// A generic message that still carries booking slots ("tomorrow at 3pm")
/// continues whatever flow the session was in.
pub fn resolve_continuation(classified: Intent, last_intent: Option<Intent>, entities: &Entities) -> Intent {
    match last_intent {
        Some(last) if classified.is_generic() && entities.has_flow_slots() => last,
        _ => classified,
    }
}

/// Conversation orchestrator
pub struct Orchestrator {
    sessions: Arc<dyn SessionStore>,
    directory: Arc<dyn DoctorDirectory>,
    resolver: IntentResolver,
    ai: Option<Arc<dyn ExternalAi>>,
    clock: Arc<dyn Clock>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        directory: Arc<dyn DoctorDirectory>,
        config: OrchestratorConfig,
    ) -> Self {
        let extractor = EntityExtractor::with_config(ExtractorConfig {
            suppress_specialization_with_appointment: config.suppress_specialization_with_appointment,
        });
        Self {
            sessions,
            directory,
            resolver: IntentResolver::new(extractor, config.strategy),
            ai: None,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Attach the external AI (or explicitly run without one)
    pub fn with_ai(mut self, ai: Option<Arc<dyn ExternalAi>>) -> Self {
        self.resolver = self.resolver.with_ai(ai.clone());
        self.ai = ai;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    /// Create an empty session and return its id
    pub async fn create_session(&self) -> Result<String, AgentError> {
        let id = Uuid::new_v4().to_string();
        self.sessions.set(Session::new(id.clone())).await?;
        tracing::info!(session_id = %id, "Session created");
        Ok(id)
    }

    /// Handle one user message. Always produces a reply.
    ///
    /// `caller` is the authenticated user id, if any; it gates the intents
    /// that act on the caller's own appointments.
    pub async fn process_message(
        &self,
        session_id: &str,
        message: &str,
        caller: Option<&str>,
    ) -> ChatReply {
        let start = Instant::now();

        let reply = match self.run_pipeline(session_id, message, caller).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(session_id, error = %e, "Message processing failed");
                metrics::counter!("medassist_processing_errors_total").increment(1);

                let reply = ChatReply {
                    response: responses::apology(),
                    intent: Intent::Other,
                    entities: Entities::new(),
                };
                if let Err(e) = self.record_failed_exchange(session_id, message, &reply).await {
                    tracing::warn!(session_id, error = %e, "Could not record failed exchange");
                }
                reply
            }
        };

        metrics::counter!("medassist_messages_total", "intent" => reply.intent.as_str()).increment(1);
        metrics::histogram!("medassist_message_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        reply
    }

    async fn run_pipeline(
        &self,
        session_id: &str,
        message: &str,
        caller: Option<&str>,
    ) -> Result<ChatReply, AgentError> {
        let mut session = self.sessions.get_or_create(session_id).await?;
        let today = self.clock.today();

        let classification = self.resolver.classify(message, today).await.into_classification();
        let entities = classification.entities;
        let intent = resolve_continuation(classification.intent, session.context.last_intent, &entities);

        if intent != classification.intent {
            tracing::debug!(
                session_id,
                classified = %classification.intent,
                continued = %intent,
                "Continuing previous flow"
            );
        }

        // History before this exchange feeds free-form AI replies
        let recent = session.recent_turns(self.config.ai_context_turns);

        session.context.merge(&entities);
        session.context.record_intent(intent);

        let response = self
            .dispatch(intent, message, &entities, &session, &recent, caller)
            .await?;

        // A summarized request is done; the next booking asks for its own
        // date and time
        if intent == Intent::BookAppointment
            && caller.is_some()
            && !SearchTarget::resolve(&entities, &session).is_empty()
            && session.context.date.is_some()
            && session.context.time.is_some()
        {
            session.context.clear_schedule();
        }

        let metadata = TurnMetadata::new()
            .with_intent(intent)
            .with_entities(entities.clone())
            .with_confidence(classification.confidence);
        session.push_turn(Turn::user(message).with_metadata(metadata), self.config.history_limit);
        session.push_turn(
            Turn::assistant(response.clone()).with_metadata(TurnMetadata::new().with_intent(intent)),
            self.config.history_limit,
        );
        session.touch();
        self.sessions.set(session).await?;

        tracing::info!(session_id, intent = %intent, slots = entities.count(), "Message handled");

        Ok(ChatReply {
            response,
            intent,
            entities,
        })
    }

    async fn record_failed_exchange(
        &self,
        session_id: &str,
        message: &str,
        reply: &ChatReply,
    ) -> Result<(), AgentError> {
        let cap = self.config.history_limit;
        self.sessions.append(session_id, Turn::user(message), cap).await?;
        self.sessions
            .append(session_id, Turn::assistant(reply.response.clone()), cap)
            .await?;
        Ok(())
    }
}
