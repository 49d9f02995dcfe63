//! Core types and ports for the appointment booking assistant
//!
//! This crate provides the types shared by every other crate:
//! - Intent enumeration and classification results
//! - Extracted entity slots and the per-session slot context
//! - Conversation turns and sessions
//! - Doctor records returned by the directory
//! - Ports for session storage, doctor lookup and the clock

pub mod classification;
pub mod conversation;
pub mod doctor;
pub mod entities;
pub mod error;
pub mod intent;
pub mod session;
pub mod traits;

pub use classification::{heuristic_confidence, Classification};
pub use conversation::{Turn, TurnMetadata, TurnRole};
pub use doctor::{strip_title, weekday_key, DayAvailability, Doctor, DoctorQuery, DoctorSort, Rating};
pub use entities::Entities;
pub use error::{Error, Result};
pub use intent::Intent;
pub use session::{DoctorReference, Session, SessionContext};
pub use traits::{Clock, DoctorDirectory, FixedClock, SessionStore, SystemClock};
