//! Ports to the assistant's collaborators
//!
//! - [`SessionStore`]: where conversation sessions live (in-process map in
//!   tests, a shared store in production)
//! - [`DoctorDirectory`]: read-only doctor lookups owned by the booking system
//! - [`Clock`]: source of "today" for relative date resolution

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};

use crate::{Doctor, DoctorQuery, Entities, Result, Session, Turn};

/// Session storage backend
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session by id
    async fn get(&self, id: &str) -> Result<Option<Session>>;

    /// Insert or replace a session
    async fn set(&self, session: Session) -> Result<()>;

    /// Remove a session, returning whether it existed
    async fn delete(&self, id: &str) -> Result<bool>;

    /// List all stored session ids
    async fn list_ids(&self) -> Result<Vec<String>>;

    /// Remove sessions idle longer than `max_idle`, returning how many were removed
    async fn sweep_expired(&self, max_idle: Duration) -> Result<usize>;

    /// Load a session, creating an empty one for unknown ids
    async fn get_or_create(&self, id: &str) -> Result<Session> {
        match self.get(id).await? {
            Some(session) => Ok(session),
            None => {
                let session = Session::new(id);
                self.set(session.clone()).await?;
                tracing::info!(session_id = %id, "Created session");
                Ok(session)
            }
        }
    }

    /// Append one turn to a session's history
    async fn append(&self, id: &str, turn: Turn, cap: usize) -> Result<()> {
        let mut session = self.get_or_create(id).await?;
        session.push_turn(turn, cap);
        session.touch();
        self.set(session).await
    }

    /// Merge extracted slots into a session's context
    async fn merge_context(&self, id: &str, entities: &Entities) -> Result<()> {
        let mut session = self.get_or_create(id).await?;
        session.context.merge(entities);
        session.touch();
        self.set(session).await
    }
}

/// Read-only doctor lookup
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    /// Doctors matching the query, ordered and truncated as requested
    async fn find_doctors(&self, query: &DoctorQuery) -> Result<Vec<Doctor>>;

    /// Bookable `HH:MM` start times for a doctor on a date.
    ///
    /// Directories that do not expose slot data return an empty list.
    async fn open_slots(&self, _doctor: &Doctor, _date: NaiveDate) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Time source
pub trait Clock: Send + Sync {
    /// Calendar date used to resolve "today", "tomorrow" and weekday names
    fn today(&self) -> NaiveDate;
}

/// Wall clock, local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}
