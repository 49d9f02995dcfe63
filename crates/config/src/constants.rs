//! Centralized constants for the booking assistant
//!
//! Policy values quoted back to patients must match what the appointment and
//! payment services enforce. Change them here and nowhere else.

/// Cancellation, refund and reschedule policy
pub mod policy {
    /// Hours after booking during which an appointment cannot be cancelled
    pub const CANCELLATION_LOCK_HOURS: u32 = 12;

    /// Cancelling more than this many hours ahead refunds in full
    pub const FULL_REFUND_MIN_HOURS: u32 = 24;

    /// Cancelling at least this many hours ahead (and at most
    /// `FULL_REFUND_MIN_HOURS`) refunds `PARTIAL_REFUND_PERCENT`
    pub const PARTIAL_REFUND_MIN_HOURS: u32 = 2;

    pub const FULL_REFUND_PERCENT: u32 = 100;
    pub const PARTIAL_REFUND_PERCENT: u32 = 50;
    pub const LATE_REFUND_PERCENT: u32 = 0;

    /// Minimum notice before the appointment time to reschedule
    pub const RESCHEDULE_MIN_NOTICE_HOURS: u32 = 2;
}

/// Session defaults
pub mod session {
    /// Turns kept in a session's rolling history
    pub const HISTORY_LIMIT: usize = 20;

    /// Idle time after which a session may be swept (seconds)
    pub const IDLE_TIMEOUT_SECS: u64 = 30 * 60;

    /// Interval between sweeps (seconds)
    pub const SWEEP_INTERVAL_SECS: u64 = 60;

    /// Turns of history handed to the external AI for free-form replies
    pub const AI_CONTEXT_TURNS: usize = 6;
}

/// Assistant reply limits
pub mod replies {
    /// Doctors listed per search reply
    pub const MAX_DOCTOR_RESULTS: usize = 5;

    /// Open slots listed before summarizing the remainder
    pub const MAX_LISTED_SLOTS: usize = 8;

    /// Length of one consultation slot (minutes)
    pub const SLOT_MINUTES: u32 = 30;
}

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Ollama endpoint
    pub const OLLAMA_DEFAULT: &str = "http://localhost:11434";

    /// OpenAI-compatible API endpoint
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";
}

/// Timeouts (in milliseconds)
pub mod timeouts {
    /// Upper bound on one external AI call
    pub const AI_REQUEST_MS: u64 = 8_000;
}
