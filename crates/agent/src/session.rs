//! Session storage and expiry
//!
//! - `InMemorySessionStore` - Default, a lock-guarded HashMap
//! - `spawn_sweeper` - background task removing idle sessions
//!
//! Any other [`SessionStore`] implementation (e.g. a shared external store)
//! can be injected into the orchestrator instead.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use medassist_core::{Result, Session, SessionStore};

/// In-process session store
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().get(id).cloned())
    }

    async fn set(&self, session: Session) -> Result<()> {
        self.sessions.write().insert(session.id.clone(), session);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.sessions.write().remove(id).is_some())
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        Ok(self.sessions.read().keys().cloned().collect())
    }

    async fn sweep_expired(&self, max_idle: chrono::Duration) -> Result<usize> {
        let now = Utc::now();
        // Held for the whole pass so a session cannot be re-created mid-delete
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(now, max_idle));
        Ok(before - sessions.len())
    }
}

/// Start a background task that periodically removes idle sessions.
///
/// Returns a shutdown sender; send `true` to stop the task.
pub fn spawn_sweeper(
    store: Arc<dyn SessionStore>,
    interval: Duration,
    max_idle: chrono::Duration,
) -> watch::Sender<bool> {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        let mut interval_timer = tokio::time::interval(interval);
        interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval_timer.tick() => {
                    match store.sweep_expired(max_idle).await {
                        Ok(0) => {}
                        Ok(removed) => {
                            metrics::counter!("medassist_sessions_swept_total").increment(removed as u64);
                            tracing::info!("Session cleanup: removed {} expired sessions", removed);
                        }
                        Err(e) => tracing::warn!(error = %e, "Session cleanup failed"),
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Session cleanup task shutting down");
                        break;
                    }
                }
            }
        }
    });

    shutdown_tx
}
