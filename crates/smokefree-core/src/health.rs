//! Health-benefit timeline.
//!
//! Each benefit unlocks once a given number of calendar days has elapsed
//! since the quit instant.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBenefit {
    /// Blood pressure and heart rate return to normal
    Circulation,
    /// Smell and taste start to recover
    SmellTaste,
    /// Lung function starts to improve
    LungFunction,
    /// Less shortness of breath, more energy
    Stamina,
}

/// Benefits in unlock order.
pub const TIMELINE: [(u32, HealthBenefit); 4] = [
    (1, HealthBenefit::Circulation),
    (2, HealthBenefit::SmellTaste),
    (14, HealthBenefit::LungFunction),
    (30, HealthBenefit::Stamina),
];

impl HealthBenefit {
    /// Days that must elapse before this benefit unlocks.
    pub fn threshold_days(self) -> u32 {
        TIMELINE
            .iter()
            .find(|(_, benefit)| *benefit == self)
            .map_or(0, |(days, _)| *days)
    }

    pub fn description(self) -> &'static str {
        match self {
            HealthBenefit::Circulation => "Blood pressure and heart rate return to normal",
            HealthBenefit::SmellTaste => "Sense of smell and taste begin to recover",
            HealthBenefit::LungFunction => "Lung function starts to improve",
            HealthBenefit::Stamina => "Shortness of breath eases and energy increases",
        }
    }
}

/// Benefits unlocked after `days` elapsed days, in threshold order.
pub fn unlocked(days: u32) -> Vec<HealthBenefit> {
    TIMELINE
        .iter()
        .filter(|(threshold, _)| *threshold <= days)
        .map(|(_, benefit)| *benefit)
        .collect()
}

/// First benefit still locked after `days` elapsed days.
pub fn next_locked(days: u32) -> Option<HealthBenefit> {
    TIMELINE
        .iter()
        .find(|(threshold, _)| *threshold > days)
        .map(|(_, benefit)| *benefit)
}
