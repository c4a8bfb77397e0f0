//! The quit session and its pure derived queries.
//!
//! Every query takes the current instant explicitly. The time zone carried by
//! `now` is the calendar used for day boundaries, so the same session can be
//! evaluated against the local calendar in production and a fixed offset in
//! tests.
//!
//! ## Check-in eligibility
//!
//! ```text
//! checked in today?         -> no
//! < 24h since quit instant? -> no
//! < 24h since last check-in -> no
//! otherwise                 -> yes
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{calendar_days_between, local_day, same_time_next_day};
use crate::health::{self, HealthBenefit};
use crate::milestone::{self, MilestoneProgress};

/// Length of the cooldown after the quit instant and after each check-in.
pub const ELIGIBILITY_WINDOW_HOURS: i64 = 24;

fn eligibility_window() -> Duration {
    Duration::hours(ELIGIBILITY_WINDOW_HOURS)
}

/// Wall-clock time since the quit instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedDuration {
    /// Not capped at 24.
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ElapsedDuration {
    fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }
}

/// Quit instant plus the ordered check-in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuitSession {
    quit_instant: DateTime<Utc>,
    check_ins: Vec<DateTime<Utc>>,
}

impl QuitSession {
    /// Fresh session with no check-ins.
    pub fn new(quit_instant: DateTime<Utc>) -> Self {
        Self {
            quit_instant,
            check_ins: Vec::new(),
        }
    }

    /// Rebuild a session from stored parts. The history is sorted oldest
    /// first whatever order it was stored in.
    pub fn from_parts(quit_instant: DateTime<Utc>, mut check_ins: Vec<DateTime<Utc>>) -> Self {
        check_ins.sort_unstable();
        Self {
            quit_instant,
            check_ins,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn quit_instant(&self) -> DateTime<Utc> {
        self.quit_instant
    }

    /// Oldest first.
    pub fn check_ins(&self) -> &[DateTime<Utc>] {
        &self.check_ins
    }

    pub fn last_check_in(&self) -> Option<DateTime<Utc>> {
        self.check_ins.last().copied()
    }

    /// Whole calendar days since the quit instant, never negative.
    pub fn elapsed_days<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> u32 {
        let quit = self.quit_instant.with_timezone(&now.timezone());
        let days = calendar_days_between(&quit, now).max(0);
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    pub fn elapsed_duration<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ElapsedDuration {
        let elapsed = now.with_timezone(&Utc) - self.quit_instant;
        ElapsedDuration::from_seconds(elapsed.num_seconds().max(0) as u64)
    }

    /// Any check-in on the same local calendar day as `now`.
    pub fn has_checked_in_today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let tz = now.timezone();
        let today = now.date_naive();
        self.check_ins.iter().any(|c| local_day(c, &tz) == today)
    }

    pub fn can_check_in<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        if self.has_checked_in_today(now) {
            return false;
        }

        let now = now.with_timezone(&Utc);
        if now - self.quit_instant < eligibility_window() {
            return false;
        }

        match self.check_ins.last() {
            Some(last) => now - *last >= eligibility_window(),
            None => true,
        }
    }

    /// Earliest instant at which a check-in will be accepted, or `None` if
    /// one is accepted right now.
    ///
    /// After a check-in today the result is never on today's calendar day,
    /// even when the rolling window would already be over.
    pub fn next_eligible_instant<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        if self.can_check_in(now) {
            return None;
        }

        if now.with_timezone(&Utc) - self.quit_instant < eligibility_window() {
            return Some(self.quit_instant + eligibility_window());
        }

        let last = self.check_ins.last()?;
        let candidate = (*last + eligibility_window()).with_timezone(&now.timezone());
        if self.has_checked_in_today(now) && candidate.date_naive() == now.date_naive() {
            return Some(same_time_next_day(&candidate).with_timezone(&Utc));
        }
        Some(candidate.with_timezone(&Utc))
    }

    /// Lifetime number of check-ins. Missed days do not reset it.
    pub fn streak_count(&self) -> usize {
        self.check_ins.len()
    }

    pub fn progress_to_milestone<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> MilestoneProgress {
        milestone::progress_for_days(self.elapsed_days(now))
    }

    pub fn unlocked_health_benefits<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<HealthBenefit> {
        health::unlocked(self.elapsed_days(now))
    }

    pub fn next_health_benefit<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<HealthBenefit> {
        health::next_locked(self.elapsed_days(now))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append `now` if eligible. Returns whether a check-in was recorded.
    pub fn record_check_in<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        if !self.can_check_in(now) {
            return false;
        }
        self.check_ins.push(now.with_timezone(&Utc));
        true
    }

    /// Move the quit instant. Check-ins are kept.
    pub fn set_quit_instant(&mut self, at: DateTime<Utc>) {
        self.quit_instant = at;
    }

    /// New quit instant, empty history.
    pub fn restart(&mut self, at: DateTime<Utc>) {
        self.quit_instant = at;
        self.check_ins.clear();
    }
}
