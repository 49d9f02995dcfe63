//! Text processing for the booking assistant
//!
//! This crate provides the deterministic language layer:
//! - **Entity Extraction**: specialization, doctor name, date, time and
//!   appointment reference pulled out of free text
//! - **Intent Classification**: ordered rule cascade mapping a message to one
//!   of the closed set of intents
//!
//! Both are pure and never fail; the agent crate composes them with the
//! external AI classifier.
//!
//! # Example
//!
//! ```ignore
//! use medassist_text_processing::{EntityExtractor, IntentClassifier};
//!
//! let entities = EntityExtractor::new().extract("book a cardiologist tomorrow");
//! let result = IntentClassifier::new().classify("book a cardiologist tomorrow", &entities);
//! ```

pub mod entities;
pub mod intent;

pub use entities::{match_specialization, EntityExtractor, ExtractorConfig};
pub use intent::{default_rules, normalize, IntentClassifier, IntentRule, RuleInput};
