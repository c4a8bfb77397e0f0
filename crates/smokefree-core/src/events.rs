use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every tracker mutation produces an Event.
/// The presentation layer reacts to these and polls derived queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// First-time setup recorded a quit instant.
    QuitDateSet {
        quit_instant: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    CheckedIn {
        total_check_ins: usize,
        at: DateTime<Utc>,
    },
    /// A check-in was requested while not eligible. Nothing changed.
    CheckInSkipped {
        already_checked_in_today: bool,
        next_eligible: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
    SessionReset {
        quit_instant: DateTime<Utc>,
        /// Check-ins discarded by the reset.
        cleared_check_ins: usize,
        at: DateTime<Utc>,
    },
}
