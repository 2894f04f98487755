//! Achievement thresholds and one-time unlock evaluation.
//!
//! Evaluation walks a fixed table in order and returns every badge whose
//! threshold is met and which is not already unlocked. The caller appends
//! them to its [`AchievementSet`]; membership is checked first, so a badge
//! can never unlock twice.

use serde::{Deserialize, Serialize};

use crate::needs::FULL_EPSILON;

/// Scale at which the pet counts as "big".
pub const BIG_SCALE: f32 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    FirstMeal,
    Foodie,
    FirstBounce,
    Bouncy,
    PureJoy,
    BigBlob,
}

impl Achievement {
    /// Evaluation order. Simultaneous unlocks are reported in this order.
    pub const TABLE: [Achievement; 6] = [
        Achievement::FirstMeal,
        Achievement::Foodie,
        Achievement::FirstBounce,
        Achievement::Bouncy,
        Achievement::PureJoy,
        Achievement::BigBlob,
    ];

    /// Display title, also the identifier written to storage.
    pub fn title(self) -> &'static str {
        match self {
            Achievement::FirstMeal => "First Meal",
            Achievement::Foodie => "Foodie",
            Achievement::FirstBounce => "First Bounce",
            Achievement::Bouncy => "Bouncy",
            Achievement::PureJoy => "Pure Joy",
            Achievement::BigBlob => "Big Blob",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::TABLE.into_iter().find(|a| a.title() == title)
    }

    /// Whether the threshold for this badge is met.
    pub fn is_earned(self, progress: &Progress) -> bool {
        match self {
            Achievement::FirstMeal => progress.total_feedings >= 1,
            Achievement::Foodie => progress.total_feedings >= 10,
            Achievement::FirstBounce => progress.total_bounces >= 1,
            Achievement::Bouncy => progress.total_bounces >= 25,
            Achievement::PureJoy => progress.happiness >= 1.0 - FULL_EPSILON,
            Achievement::BigBlob => progress.scale >= BIG_SCALE - FULL_EPSILON,
        }
    }
}

/// Values the thresholds are compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub total_feedings: u32,
    pub total_bounces: u32,
    pub happiness: f32,
    pub scale: f32,
}

/// Unlocked badges in unlock order. Grows monotonically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementSet {
    unlocked: Vec<Achievement>,
}

impl AchievementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    /// Record an unlock. Returns false if it was already present.
    pub fn insert(&mut self, achievement: Achievement) -> bool {
        if self.contains(achievement) {
            return false;
        }
        self.unlocked.push(achievement);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = Achievement> + '_ {
        self.unlocked.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    pub fn titles(&self) -> Vec<String> {
        self.iter().map(|a| a.title().to_string()).collect()
    }
}

/// Badges newly earned by `progress`, in table order. Does not mutate `set`.
pub fn newly_earned(progress: &Progress, set: &AchievementSet) -> Vec<Achievement> {
    Achievement::TABLE
        .into_iter()
        .filter(|a| !set.contains(*a) && a.is_earned(progress))
        .collect()
}
