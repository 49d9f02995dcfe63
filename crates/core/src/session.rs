//! Conversation session state
//!
//! A session carries the rolling turn history and the slot context that
//! accumulates across turns. The context is what lets a bare follow-up like
//! "tomorrow at 3pm" continue a booking started earlier.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::{Entities, Intent, Turn};

/// Which doctor reference slots the latest referring turn supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctorReference {
    Name,
    Specialization,
    Both,
}

/// Slot values accumulated across the turns of one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "crate::entities::hhmm", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    /// Last non-generic intent, drives continuation of multi-turn flows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<DoctorReference>,
}

impl SessionContext {
    /// Merge newly extracted slots. Last non-empty value wins; absent slots
    /// never clear what is already stored.
    pub fn merge(&mut self, entities: &Entities) {
        if let Some(ref specialization) = entities.specialization {
            self.specialization = Some(specialization.clone());
        }
        if let Some(ref name) = entities.doctor_name {
            self.doctor_name = Some(name.clone());
        }
        if let Some(date) = entities.date {
            self.date = Some(date);
        }
        if let Some(time) = entities.time {
            self.time = Some(time);
        }

        self.reference = match (&entities.doctor_name, &entities.specialization) {
            (Some(_), Some(_)) => Some(DoctorReference::Both),
            (Some(_), None) => Some(DoctorReference::Name),
            (None, Some(_)) => Some(DoctorReference::Specialization),
            (None, None) => self.reference,
        };
    }

    /// Doctor name and specialization as the latest referring turn gave
    /// them. Both slots stay stored; only the ones supplied together with
    /// the most recent reference are returned.
    pub fn doctor_reference(&self) -> (Option<&str>, Option<&str>) {
        let name = self.doctor_name.as_deref();
        let specialization = self.specialization.as_deref();
        match self.reference {
            Some(DoctorReference::Name) => (name, None),
            Some(DoctorReference::Specialization) => (None, specialization),
            Some(DoctorReference::Both) | None => (name, specialization),
        }
    }

    /// Forget the date and time once a booking request has been summarized
    pub fn clear_schedule(&mut self) {
        self.date = None;
        self.time = None;
    }

    /// Remember the resolved intent unless it is the generic one
    pub fn record_intent(&mut self, intent: Intent) {
        if !intent.is_generic() {
            self.last_intent = Some(intent);
        }
    }
}

/// Server-side conversational state keyed by an opaque id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub history: VecDeque<Turn>,
    pub context: SessionContext,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            history: VecDeque::new(),
            context: SessionContext::default(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Append a turn, evicting the oldest ones beyond `cap`
    pub fn push_turn(&mut self, turn: Turn, cap: usize) {
        self.history.push_back(turn);
        while self.history.len() > cap {
            self.history.pop_front();
        }
    }

    /// Most recent `n` turns, oldest first
    pub fn recent_turns(&self, n: usize) -> Vec<Turn> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).cloned().collect()
    }

    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Whether the session has been idle longer than `max_idle` at `now`
    pub fn is_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> bool {
        now.signed_duration_since(self.last_activity) > max_idle
    }
}
