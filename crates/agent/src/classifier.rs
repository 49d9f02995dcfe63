//! Intent resolution
//!
//! Combines the external AI classifier with the local rule cascade. Which one
//! is consulted first depends on [`ClassificationStrategy`]; whichever path
//! produces the result, slots found by the local extractor take precedence
//! over slots reported by the model. The specialization suppression flag
//! applies to both.

use chrono::NaiveDate;
use std::sync::Arc;

use medassist_config::ClassificationStrategy;
use medassist_core::{Classification, Entities};
use medassist_llm::ExternalAi;
use medassist_text_processing::{match_specialization, EntityExtractor, IntentClassifier};

/// Where a classification came from
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationResult {
    /// Produced by the external AI
    Ai(Classification),
    /// Produced by the local rule cascade
    Fallback(Classification),
}

impl ClassificationResult {
    pub fn classification(&self) -> &Classification {
        match self {
            ClassificationResult::Ai(c) | ClassificationResult::Fallback(c) => c,
        }
    }

    pub fn into_classification(self) -> Classification {
        match self {
            ClassificationResult::Ai(c) | ClassificationResult::Fallback(c) => c,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            ClassificationResult::Ai(_) => "ai",
            ClassificationResult::Fallback(_) => "rules",
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, ClassificationResult::Ai(_))
    }
}

/// Resolves a message into an intent plus slots
pub struct IntentResolver {
    extractor: EntityExtractor,
    rules: IntentClassifier,
    ai: Option<Arc<dyn ExternalAi>>,
    strategy: ClassificationStrategy,
}

impl IntentResolver {
    pub fn new(extractor: EntityExtractor, strategy: ClassificationStrategy) -> Self {
        Self {
            extractor,
            rules: IntentClassifier::new(),
            ai: None,
            strategy,
        }
    }

    pub fn with_ai(mut self, ai: Option<Arc<dyn ExternalAi>>) -> Self {
        self.ai = ai;
        self
    }

    pub fn with_rules(mut self, rules: IntentClassifier) -> Self {
        self.rules = rules;
        self
    }

    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    /// Rule-based classification only
    pub fn fallback(&self, message: &str, today: NaiveDate) -> Classification {
        let entities = self.extractor.extract_at(message, today);
        self.rules.classify(message, &entities)
    }

    /// Classify one message. Never fails: any AI problem degrades to the rules.
    pub async fn classify(&self, message: &str, today: NaiveDate) -> ClassificationResult {
        let local = self.extractor.extract_at(message, today);

        let result = match (&self.ai, self.strategy) {
            (None, _) => ClassificationResult::Fallback(self.rules.classify(message, &local)),
            (Some(ai), ClassificationStrategy::AiFirst) => {
                match self.ask_ai(ai.as_ref(), message, &local).await {
                    Some(classification) => ClassificationResult::Ai(classification),
                    None => ClassificationResult::Fallback(self.rules.classify(message, &local)),
                }
            }
            (Some(ai), ClassificationStrategy::RulesFirst) => {
                let by_rules = self.rules.classify(message, &local);
                if !by_rules.intent.is_generic() {
                    ClassificationResult::Fallback(by_rules)
                } else {
                    match self.ask_ai(ai.as_ref(), message, &local).await {
                        Some(classification) => ClassificationResult::Ai(classification),
                        None => ClassificationResult::Fallback(by_rules),
                    }
                }
            }
        };

        metrics::counter!("medassist_classifications_total", "source" => result.source())
            .increment(1);
        tracing::debug!(
            source = result.source(),
            intent = %result.classification().intent,
            confidence = result.classification().confidence,
            "Message classified"
        );

        result
    }

    async fn ask_ai(
        &self,
        ai: &dyn ExternalAi,
        message: &str,
        local: &Entities,
    ) -> Option<Classification> {
        match ai.classify_intent(message).await {
            Ok(classification) => {
                let mut remote = normalize_remote(classification.entities);
                if self.extractor.suppresses_specialization(message) {
                    remote.specialization = None;
                }
                Some(Classification {
                    intent: classification.intent,
                    entities: local.clone().or(&remote),
                    confidence: classification.confidence,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "AI classification failed, using rule cascade");
                None
            }
        }
    }
}

/// Map the model's free-text specialization onto the canonical names used by
/// the directory.
fn normalize_remote(mut entities: Entities) -> Entities {
    if let Some(specialization) = entities.specialization.take() {
        entities.specialization = Some(match_specialization(&specialization).unwrap_or(specialization));
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medassist_core::{Intent, Turn};
    use medassist_llm::LlmError;
    use medassist_text_processing::ExtractorConfig;
    use parking_lot::Mutex;

    struct StubAi {
        reply: Option<Classification>,
        calls: Mutex<usize>,
    }

    impl StubAi {
        fn answering(intent: Intent, entities: Entities) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(Classification {
                    intent,
                    entities,
                    confidence: 0.9,
                }),
                calls: Mutex::new(0),
            })
        }

        fn broken() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: Mutex::new(0),
            })
        }
    }

    #[async_trait]
    impl ExternalAi for StubAi {
        async fn classify_intent(&self, _message: &str) -> Result<Classification, LlmError> {
            *self.calls.lock() += 1;
            self.reply.clone().ok_or(LlmError::Timeout)
        }

        async fn generate_freeform(&self, _prompt: &str, _recent: &[Turn]) -> Option<String> {
            None
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn resolver(strategy: ClassificationStrategy, ai: Option<Arc<StubAi>>) -> IntentResolver {
        IntentResolver::new(EntityExtractor::new(), strategy)
            .with_ai(ai.map(|ai| ai as Arc<dyn ExternalAi>))
    }

    #[tokio::test]
    async fn test_no_ai_uses_rules() {
        let result = resolver(ClassificationStrategy::AiFirst, None)
            .classify("hello", today())
            .await;
        assert_eq!(result.source(), "rules");
        assert_eq!(result.classification().intent, Intent::Greeting);
    }

    #[tokio::test]
    async fn test_ai_first_prefers_model() {
        let ai = StubAi::answering(Intent::FindDoctor, Entities::new());
        let result = resolver(ClassificationStrategy::AiFirst, Some(ai.clone()))
            .classify("hello", today())
            .await;
        assert!(result.is_ai());
        assert_eq!(result.classification().intent, Intent::FindDoctor);
        assert_eq!(*ai.calls.lock(), 1);
    }

    #[tokio::test]
    async fn test_ai_failure_falls_back() {
        let result = resolver(ClassificationStrategy::AiFirst, Some(StubAi::broken()))
            .classify("I need a cardiologist", today())
            .await;
        assert_eq!(result.source(), "rules");
        assert_eq!(result.classification().intent, Intent::FindDoctor);
        assert_eq!(
            result.classification().entities.specialization.as_deref(),
            Some("Cardiologist")
        );
    }

    #[tokio::test]
    async fn test_local_entities_take_precedence() {
        let remote = Entities::new()
            .with_specialization("heart specialist")
            .with_doctor_name("Someone Else");
        let ai = StubAi::answering(Intent::BookAppointment, remote);
        let result = resolver(ClassificationStrategy::AiFirst, Some(ai))
            .classify("book with Dr. Sharma", today())
            .await;

        let entities = &result.classification().entities;
        assert_eq!(entities.doctor_name.as_deref(), Some("Sharma"));
        // Remote-only slot kept and normalized
        assert_eq!(entities.specialization.as_deref(), Some("Cardiologist"));
    }

    #[tokio::test]
    async fn test_rules_first_consults_ai_only_for_generic() {
        let ai = StubAi::answering(Intent::PlatformHelp, Entities::new());
        let resolver = resolver(ClassificationStrategy::RulesFirst, Some(ai.clone()));

        let result = resolver.classify("hello", today()).await;
        assert_eq!(result.classification().intent, Intent::Greeting);
        assert_eq!(*ai.calls.lock(), 0);

        let result = resolver.classify("what's the weather like", today()).await;
        assert!(result.is_ai());
        assert_eq!(*ai.calls.lock(), 1);
    }

    #[tokio::test]
    async fn test_suppression_applies_to_model_slots() {
        let extractor = EntityExtractor::with_config(ExtractorConfig {
            suppress_specialization_with_appointment: true,
        });
        let ai = StubAi::answering(
            Intent::BookAppointment,
            Entities::new().with_specialization("cardiology"),
        );
        let resolver = IntentResolver::new(extractor, ClassificationStrategy::AiFirst)
            .with_ai(Some(ai as Arc<dyn ExternalAi>));

        let result = resolver.classify("cardiology appointment tomorrow", today()).await;
        assert!(result.is_ai());
        assert!(result.classification().entities.specialization.is_none());
        assert!(result.classification().entities.date.is_some());

        let result = resolver.classify("find a cardiologist", today()).await;
        assert_eq!(
            result.classification().entities.specialization.as_deref(),
            Some("Cardiologist")
        );
    }

    #[test]
    fn test_fallback_respects_extractor_config() {
        let extractor = EntityExtractor::with_config(ExtractorConfig {
            suppress_specialization_with_appointment: true,
        });
        let resolver = IntentResolver::new(extractor, ClassificationStrategy::AiFirst);
        let result = resolver.fallback("book a cardiologist appointment", today());
        assert_eq!(result.intent, Intent::BookAppointment);
        assert!(result.entities.specialization.is_none());
    }
}
