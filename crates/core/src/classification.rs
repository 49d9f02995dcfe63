//! Classification output shared by the AI and rule-based classifiers

use serde::{Deserialize, Serialize};

use crate::{Entities, Intent};

const BASE_CONFIDENCE: f32 = 0.5;
const RESOLVED_BONUS: f32 = 0.3;
const PER_ENTITY_BONUS: f32 = 0.1;
const MAX_ENTITY_BONUS: f32 = 0.2;

/// Intent, slots and advisory confidence for one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    #[serde(default)]
    pub entities: Entities,
    pub confidence: f32,
}

impl Classification {
    /// Classification scored with the heuristic confidence
    pub fn scored(intent: Intent, entities: Entities) -> Self {
        let confidence = heuristic_confidence(intent, &entities);
        Self {
            intent,
            entities,
            confidence,
        }
    }
}

/// 0.5 base, +0.3 when resolved to a specific intent, +0.1 per slot up to +0.2.
///
/// Advisory only; nothing branches on it.
pub fn heuristic_confidence(intent: Intent, entities: &Entities) -> f32 {
    let mut confidence = BASE_CONFIDENCE;
    if !intent.is_generic() {
        confidence += RESOLVED_BONUS;
    }
    confidence += (entities.count() as f32 * PER_ENTITY_BONUS).min(MAX_ENTITY_BONUS);
    confidence
}
