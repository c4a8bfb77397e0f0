//! Quit tracker: the session plus its injected store and clock.
//!
//! Queries read the clock and delegate to [`QuitSession`]. The three commands
//! mutate the session first and persist second; a failed write is returned
//! as a [`PersistWarning`] and never rolls the in-memory state back.
//!
//! ## Usage
//!
//! ```ignore
//! let Loaded { value: mut tracker, warnings } = QuitTracker::open(store, SystemClock);
//! if !tracker.is_configured() {
//!     tracker.set_initial_quit_date(quit_at);
//! }
//! let outcome = tracker.check_in();
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::PersistWarning;
use crate::events::Event;
use crate::health::HealthBenefit;
use crate::milestone::MilestoneProgress;
use crate::session::{ElapsedDuration, QuitSession};
use crate::storage::{load_session, save_check_ins, save_session, KvStore, Loaded};

/// Result of a tracker command.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub event: Event,
    /// Persistence problems. The command itself still took effect.
    pub warnings: Vec<PersistWarning>,
}

impl Outcome {
    fn new(event: Event, warnings: impl IntoIterator<Item = PersistWarning>) -> Self {
        Self {
            event,
            warnings: warnings.into_iter().collect(),
        }
    }

    /// Whether everything the command changed reached the store.
    pub fn is_durable(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Every derived fact at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub configured: bool,
    pub quit_instant: DateTime<Utc>,
    pub elapsed_days: u32,
    pub elapsed: ElapsedDuration,
    pub has_checked_in_today: bool,
    pub can_check_in: bool,
    pub next_eligible: Option<DateTime<Utc>>,
    pub check_in_count: usize,
    pub last_check_in: Option<DateTime<Utc>>,
    pub milestone: MilestoneProgress,
    pub health_benefits: Vec<HealthBenefit>,
    pub next_health_benefit: Option<HealthBenefit>,
    pub at: DateTime<Utc>,
}

pub struct QuitTracker<S: KvStore, C: Clock> {
    store: S,
    clock: C,
    session: QuitSession,
    configured: bool,
}

impl<S: KvStore, C: Clock> QuitTracker<S, C> {
    /// Restore the saved session from `store`.
    ///
    /// Without a saved session the tracker is unconfigured, with the quit
    /// instant at the current time and no check-ins.
    pub fn open(store: S, clock: C) -> Loaded<Self> {
        let Loaded { value, warnings } = load_session(&store);
        let configured = value.is_some();
        let session = value.unwrap_or_else(|| QuitSession::new(clock.now().with_timezone(&Utc)));

        Loaded {
            value: Self {
                store,
                clock,
                session,
                configured,
            },
            warnings,
        }
    }

    /// Wrap an existing session without reading the store.
    pub fn with_session(store: S, clock: C, session: QuitSession) -> Self {
        Self {
            store,
            clock,
            session,
            configured: true,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn into_store(self) -> S {
        self.store
    }

    /// Whether a quit instant was loaded or set up.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn quit_instant(&self) -> DateTime<Utc> {
        self.session.quit_instant()
    }

    pub fn check_ins(&self) -> &[DateTime<Utc>] {
        self.session.check_ins()
    }

    pub fn elapsed_days(&self) -> u32 {
        self.session.elapsed_days(&self.clock.now())
    }

    pub fn elapsed_duration(&self) -> ElapsedDuration {
        self.session.elapsed_duration(&self.clock.now())
    }

    pub fn has_checked_in_today(&self) -> bool {
        self.session.has_checked_in_today(&self.clock.now())
    }

    pub fn can_check_in(&self) -> bool {
        self.session.can_check_in(&self.clock.now())
    }

    pub fn next_eligible_instant(&self) -> Option<DateTime<Utc>> {
        self.session.next_eligible_instant(&self.clock.now())
    }

    pub fn streak_count(&self) -> usize {
        self.session.streak_count()
    }

    pub fn progress_to_milestone(&self) -> MilestoneProgress {
        self.session.progress_to_milestone(&self.clock.now())
    }

    pub fn unlocked_health_benefits(&self) -> Vec<HealthBenefit> {
        self.session.unlocked_health_benefits(&self.clock.now())
    }

    pub fn next_health_benefit(&self) -> Option<HealthBenefit> {
        self.session.next_health_benefit(&self.clock.now())
    }

    /// All derived facts, evaluated against a single reading of the clock.
    pub fn snapshot(&self) -> TrackerSnapshot {
        let now = self.clock.now();
        let s = &self.session;
        TrackerSnapshot {
            configured: self.configured,
            quit_instant: s.quit_instant(),
            elapsed_days: s.elapsed_days(&now),
            elapsed: s.elapsed_duration(&now),
            has_checked_in_today: s.has_checked_in_today(&now),
            can_check_in: s.can_check_in(&now),
            next_eligible: s.next_eligible_instant(&now),
            check_in_count: s.streak_count(),
            last_check_in: s.last_check_in(),
            milestone: s.progress_to_milestone(&now),
            health_benefits: s.unlocked_health_benefits(&now),
            next_health_benefit: s.next_health_benefit(&now),
            at: now.with_timezone(&Utc),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record a check-in at the current instant if eligible.
    ///
    /// An ineligible request is a no-op: nothing is written and the event is
    /// [`Event::CheckInSkipped`].
    pub fn check_in(&mut self) -> Outcome {
        let now = self.clock.now();
        let at = now.with_timezone(&Utc);

        if !self.session.record_check_in(&now) {
            let already_checked_in_today = self.session.has_checked_in_today(&now);
            let next_eligible = self.session.next_eligible_instant(&now);
            tracing::debug!(
                "check-in skipped (today: {}, next: {:?})",
                already_checked_in_today,
                next_eligible
            );
            return Outcome::new(
                Event::CheckInSkipped {
                    already_checked_in_today,
                    next_eligible,
                    at,
                },
                Vec::new(),
            );
        }

        let total_check_ins = self.session.streak_count();
        tracing::info!("checked in at {} ({} total)", at, total_check_ins);
        let warning = save_check_ins(&mut self.store, self.session.check_ins());
        Outcome::new(Event::CheckedIn { total_check_ins, at }, warning)
    }

    /// First-time setup. Check-ins in memory are kept.
    ///
    /// Both keys are written so a check-in list left behind by an unreadable
    /// earlier session cannot come back on the next load.
    pub fn set_initial_quit_date(&mut self, quit_instant: DateTime<Utc>) -> Outcome {
        let at = self.clock.now().with_timezone(&Utc);
        self.session.set_quit_instant(quit_instant);
        self.configured = true;
        tracing::info!("quit instant set to {}", quit_instant);

        let warnings = save_session(&mut self.store, &self.session);
        Outcome::new(Event::QuitDateSet { quit_instant, at }, warnings)
    }

    /// Start over from `quit_instant` with an empty check-in history.
    pub fn reset(&mut self, quit_instant: DateTime<Utc>) -> Outcome {
        let at = self.clock.now().with_timezone(&Utc);
        let cleared_check_ins = self.session.streak_count();
        self.session.restart(quit_instant);
        self.configured = true;
        tracing::info!(
            "session reset to {} ({} check-ins cleared)",
            quit_instant,
            cleared_check_ins
        );

        let warnings = save_session(&mut self.store, &self.session);
        Outcome::new(
            Event::SessionReset {
                quit_instant,
                cleared_check_ins,
                at,
            },
            warnings,
        )
    }
}
