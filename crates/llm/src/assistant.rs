//! External AI port used by the conversation layer
//!
//! [`ExternalAi`] is what the agent sees: a closed-set classifier and a
//! free-form reply generator. [`LlmAssistant`] implements it on top of any
//! [`LlmBackend`], bounding each call with a timeout. There are no retries;
//! a failed call is reported once and the caller falls back.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use medassist_core::{
    heuristic_confidence, strip_title, Classification, Clock, Entities, Intent, SystemClock, Turn,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::LlmBackend;
use crate::prompt::{classification_messages, freeform_messages, Message};
use crate::LlmError;

/// External natural-language model
#[async_trait]
pub trait ExternalAi: Send + Sync {
    /// Closed-set classification of one message
    async fn classify_intent(&self, message: &str) -> Result<Classification, LlmError>;

    /// Free-form reply given recent history; `None` means unavailable
    async fn generate_freeform(&self, prompt: &str, recent: &[Turn]) -> Option<String>;
}

/// [`ExternalAi`] backed by an LLM chat backend
pub struct LlmAssistant {
    backend: Arc<dyn LlmBackend>,
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl LlmAssistant {
    pub fn new(backend: Arc<dyn LlmBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a specific clock for resolving relative dates in prompts
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// One bounded call to the backend
    async fn call(&self, operation: &'static str, messages: &[Message]) -> Result<String, LlmError> {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.backend.generate(messages)).await {
            Ok(result) => result.map(|r| r.text),
            Err(_) => Err(LlmError::Timeout),
        };

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::histogram!(
            "medassist_ai_request_duration_seconds",
            "operation" => operation,
            "outcome" => outcome
        )
        .record(start.elapsed().as_secs_f64());

        result
    }
}

#[async_trait]
impl ExternalAi for LlmAssistant {
    async fn classify_intent(&self, message: &str) -> Result<Classification, LlmError> {
        let messages = classification_messages(message, self.clock.today());
        let text = self.call("classify", &messages).await?;
        parse_classification(&text)
    }

    async fn generate_freeform(&self, prompt: &str, recent: &[Turn]) -> Option<String> {
        let messages = freeform_messages(prompt, recent);
        match self.call("freeform", &messages).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, model = self.backend.model_name(), "Free-form generation failed");
                None
            }
        }
    }
}

/// Raw classification object as returned by the model
#[derive(Debug, Deserialize)]
struct RawClassification {
    intent: String,
    #[serde(default)]
    entities: RawEntities,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntities {
    #[serde(default)]
    specialization: Option<String>,
    #[serde(default)]
    doctor_name: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    appointment_id: Option<serde_json::Value>,
}

impl RawEntities {
    /// Keep only well-formed, non-empty values
    fn into_entities(self) -> Entities {
        let non_empty = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
        };

        Entities {
            specialization: non_empty(self.specialization),
            doctor_name: non_empty(self.doctor_name)
                .map(|name| strip_title(&name).to_string())
                .filter(|name| !name.is_empty()),
            date: non_empty(self.date)
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            time: non_empty(self.time)
                .and_then(|t| NaiveTime::parse_from_str(&t, "%H:%M").ok()),
            appointment_id: match self.appointment_id {
                Some(serde_json::Value::String(id)) => non_empty(Some(id)),
                Some(serde_json::Value::Number(n)) => Some(n.to_string()),
                _ => None,
            },
        }
    }
}

/// Parse the first JSON object in a model reply into a classification.
///
/// Unknown intents and missing JSON are [`LlmError::InvalidResponse`].
pub fn parse_classification(text: &str) -> Result<Classification, LlmError> {
    let start = text
        .find('{')
        .ok_or_else(|| LlmError::InvalidResponse("No JSON object in reply".to_string()))?;
    let end = text
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| LlmError::InvalidResponse("Unterminated JSON object".to_string()))?;

    let raw: RawClassification = serde_json::from_str(&text[start..=end])
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    let intent: Intent = raw
        .intent
        .parse()
        .map_err(|_| LlmError::InvalidResponse(format!("Unknown intent: {}", raw.intent)))?;

    let entities = raw.entities.into_entities();
    let confidence = raw
        .confidence
        .filter(|c| c.is_finite() && *c > 0.0)
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or_else(|| heuristic_confidence(intent, &entities));

    Ok(Classification {
        intent,
        entities,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FinishReason, GenerationResult};
    use medassist_core::FixedClock;
    use parking_lot::Mutex;

    /// Backend replying with a canned text after an optional delay
    struct ScriptedBackend {
        reply: Result<String, ()>,
        delay: Duration,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedBackend {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmBackend for ScriptedBackend {
        async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
            self.seen.lock().push(messages.to_vec());
            tokio::time::sleep(self.delay).await;
            match &self.reply {
                Ok(text) => Ok(GenerationResult {
                    text: text.clone(),
                    tokens: 0,
                    total_time_ms: 0,
                    finish_reason: FinishReason::Stop,
                }),
                Err(()) => Err(LlmError::Api("HTTP 500".to_string())),
            }
        }

        async fn is_available(&self) -> bool {
            self.reply.is_ok()
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn scripted(backend: ScriptedBackend) -> (LlmAssistant, Arc<ScriptedBackend>) {
        let backend = Arc::new(backend);
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let assistant = LlmAssistant::new(backend.clone(), Duration::from_millis(100))
            .with_clock(Arc::new(FixedClock::new(today)));
        (assistant, backend)
    }

    #[test]
    fn test_parse_plain_json() {
        let result = parse_classification(
            r#"{"intent": "book_appointment", "entities": {"specialization": "Cardiologist", "date": "2024-03-16", "time": "15:00"}, "confidence": 0.92}"#,
        )
        .unwrap();
        assert_eq!(result.intent, Intent::BookAppointment);
        assert_eq!(result.entities.specialization.as_deref(), Some("Cardiologist"));
        assert_eq!(result.entities.date, NaiveDate::from_ymd_opt(2024, 3, 16));
        assert_eq!(result.entities.time, NaiveTime::from_hms_opt(15, 0, 0));
        assert!((result.confidence - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_parse_fenced_reply_with_nulls() {
        let text = "Sure!\n```json\n{\"intent\": \"find_doctor\", \"entities\": {\"doctorName\": \"Dr. Sharma\", \"date\": null, \"appointmentId\": 42}}\n```";
        let result = parse_classification(text).unwrap();
        assert_eq!(result.intent, Intent::FindDoctor);
        assert_eq!(result.entities.doctor_name.as_deref(), Some("Sharma"));
        assert_eq!(result.entities.appointment_id.as_deref(), Some("42"));
        assert!(result.entities.date.is_none());
        // No confidence given: heuristic
        assert!((result.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_rejects_unknown_intent_and_garbage() {
        assert!(matches!(
            parse_classification(r#"{"intent": "order_pizza"}"#),
            Err(LlmError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_classification("I think this is a greeting"),
            Err(LlmError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_classification("{not json}"),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_malformed_entity_values_are_dropped() {
        let result = parse_classification(
            r#"{"intent": "book_appointment", "entities": {"date": "next week", "time": "3pm", "specialization": ""}}"#,
        )
        .unwrap();
        assert!(result.entities.is_empty());
    }

    #[tokio::test]
    async fn test_classify_sends_closed_set_prompt() {
        let (assistant, backend) = scripted(ScriptedBackend::replying(r#"{"intent": "greeting"}"#));
        let result = assistant.classify_intent("hello").await.unwrap();
        assert_eq!(result.intent, Intent::Greeting);

        let seen = backend.seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0][0].content.contains("2024-03-15"));
        assert_eq!(seen[0][1], Message::user("hello"));
    }

    #[tokio::test]
    async fn test_classify_times_out_without_retry() {
        let mut backend = ScriptedBackend::replying(r#"{"intent": "greeting"}"#);
        backend.delay = Duration::from_secs(2);
        let (assistant, backend) = scripted(backend);

        let result = assistant.classify_intent("hello").await;
        assert!(matches!(result, Err(LlmError::Timeout)));
        assert_eq!(backend.seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_freeform_failure_is_none() {
        let (assistant, _) = scripted(ScriptedBackend::failing());
        assert!(assistant.generate_freeform("hi", &[]).await.is_none());

        let (assistant, _) = scripted(ScriptedBackend::replying("   "));
        assert!(assistant.generate_freeform("hi", &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_freeform_includes_history() {
        let (assistant, backend) = scripted(ScriptedBackend::replying(" Happy to help. "));
        let history = vec![Turn::user("hi"), Turn::assistant("Hello!")];
        let reply = assistant.generate_freeform("what next?", &history).await;
        assert_eq!(reply.as_deref(), Some("Happy to help."));
        assert_eq!(backend.seen.lock()[0].len(), 4);
    }
}
