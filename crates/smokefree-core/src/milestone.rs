//! Milestone progress derived from elapsed calendar days.
//!
//! Below one year progress is measured against a fixed ladder of day
//! milestones. From 365 days on it switches to a year scale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Day milestones, ascending.
pub const MILESTONE_DAYS: [u32; 6] = [1, 7, 30, 90, 180, 365];

const DAYS_PER_YEAR: f64 = 365.0;

/// What the current progress bar is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum MilestoneTarget {
    Days(u32),
    Years(u32),
}

impl fmt::Display for MilestoneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MilestoneTarget::Days(1) => f.write_str("1 day"),
            MilestoneTarget::Days(n) => write!(f, "{n} days"),
            MilestoneTarget::Years(1) => f.write_str("1 year"),
            MilestoneTarget::Years(n) => write!(f, "{n} years"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MilestoneProgress {
    pub target: MilestoneTarget,
    /// 0.0 ..= 1.0
    pub progress: f64,
}

/// Progress toward the next milestone after `days` elapsed days.
///
/// On an exact year boundary (`days` a multiple of 365) the year scale
/// collapses to a zero-width interval and progress is `0.0` against that
/// same year.
pub fn progress_for_days(days: u32) -> MilestoneProgress {
    let last = MILESTONE_DAYS[MILESTONE_DAYS.len() - 1];

    if days < last {
        let target = MILESTONE_DAYS
            .iter()
            .copied()
            .find(|&m| m > days)
            .unwrap_or(last);
        return MilestoneProgress {
            target: MilestoneTarget::Days(target),
            progress: (days as f64 / target as f64).min(1.0),
        };
    }

    let years = days as f64 / DAYS_PER_YEAR;
    let lower = years.floor();
    let upper = years.ceil();
    let progress = if upper > lower {
        (years - lower) / (upper - lower)
    } else {
        0.0
    };

    MilestoneProgress {
        target: MilestoneTarget::Years(upper as u32),
        progress,
    }
}
