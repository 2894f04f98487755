//! Owned pet state - everything the engine mutates, as plain data.

use std::collections::VecDeque;

use blobpet_logic::achievements::{Achievement, AchievementSet, Progress};
use blobpet_logic::mood::{default_mouth, resolve_mood, Mood, Mouth};
use blobpet_logic::motion::{Point, Velocity};
use blobpet_logic::needs::NeedState;
use serde::{Deserialize, Serialize};

/// Short-lived behavioral modes. Each is set by an action and cleared by a
/// timer or a follow-up condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransientFlags {
    pub is_dragging: bool,
    pub is_bouncing: bool,
    pub is_shaking: bool,
    pub is_inflated: bool,
    pub is_asleep: bool,
    pub is_stretching: bool,
}

/// Monotonic lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub total_feedings: u32,
    pub total_bounces: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub position: Point,
    pub velocity: Velocity,
}

/// Achievement popup currently on screen plus any waiting their turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupQueue {
    pub showing: Option<Achievement>,
    pub waiting: VecDeque<Achievement>,
}

impl PopupQueue {
    /// Queue a popup. Returns true if it went straight on screen.
    pub fn push(&mut self, achievement: Achievement) -> bool {
        if self.showing.is_none() {
            self.showing = Some(achievement);
            true
        } else {
            self.waiting.push_back(achievement);
            false
        }
    }

    /// Hide the current popup and promote the next one, if any.
    pub fn advance(&mut self) -> Option<Achievement> {
        self.showing = self.waiting.pop_front();
        self.showing
    }
}

/// The complete simulation state of the one pet.
#[derive(Debug, Clone, PartialEq)]
pub struct PetState {
    pub needs: NeedState,
    pub flags: TransientFlags,
    pub motion: Motion,
    pub scale: f32,
    pub counters: Counters,
    pub achievements: AchievementSet,

    pub mood: Mood,
    pub mouth: Mouth,
    pub particles_visible: bool,
    pub popups: PopupQueue,

    /// Taps seen inside the current idle window.
    pub tap_count: u32,
    /// Feeds whose +growth is still waiting on the smile timer.
    pub pending_growth: u32,
}

impl Default for PetState {
    fn default() -> Self {
        let needs = NeedState::default();
        let mood = resolve_mood(&needs, false);
        Self {
            needs,
            flags: TransientFlags::default(),
            motion: Motion::default(),
            scale: 1.0,
            counters: Counters::default(),
            achievements: AchievementSet::new(),
            mood,
            mouth: default_mouth(mood),
            particles_visible: false,
            popups: PopupQueue::default(),
            tap_count: 0,
            pending_growth: 0,
        }
    }
}

impl PetState {
    pub fn progress(&self) -> Progress {
        Progress {
            total_feedings: self.counters.total_feedings,
            total_bounces: self.counters.total_bounces,
            happiness: self.needs.happiness,
            scale: self.scale,
        }
    }

    /// Recompute mood from needs and the shake flag. Returns the previous
    /// mood when it changed.
    pub fn refresh_mood(&mut self) -> Option<Mood> {
        let next = resolve_mood(&self.needs, self.flags.is_shaking);
        if next == self.mood {
            return None;
        }
        let prev = self.mood;
        self.mood = next;
        Some(prev)
    }
}
