//! Need model: three bounded scalars that drive the pet.
//!
//! Every value lives in [0.0, 1.0]. Higher is better: a hunger of 1.0 means
//! the pet is full, an energy of 1.0 means fully rested. All mutation goes
//! through [`NeedState::adjust`], which clamps, so no sequence of deltas can
//! push a need out of range.

use serde::{Deserialize, Serialize};

/// Hunger a fresh pet starts with (and the fallback for an unsaved value).
pub const DEFAULT_HUNGER: f32 = 0.5;
/// Energy a fresh pet starts with.
pub const DEFAULT_ENERGY: f32 = 0.8;
/// Happiness a fresh pet starts with.
pub const DEFAULT_HAPPINESS: f32 = 0.7;

/// Tolerance used when asking whether a need is "full".
///
/// Sums of f32 deltas like 0.7 + 0.1 + 0.1 + 0.1 land a hair below 1.0.
pub const FULL_EPSILON: f32 = 1e-4;

/// The three pet drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Need {
    Hunger,
    Energy,
    Happiness,
}

impl Need {
    pub const ALL: [Need; 3] = [Need::Hunger, Need::Energy, Need::Happiness];
}

/// Current value of every need, each in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeedState {
    pub hunger: f32,
    pub energy: f32,
    pub happiness: f32,
}

impl Default for NeedState {
    fn default() -> Self {
        Self {
            hunger: DEFAULT_HUNGER,
            energy: DEFAULT_ENERGY,
            happiness: DEFAULT_HAPPINESS,
        }
    }
}

impl NeedState {
    /// Build a state from raw values, clamping each into range.
    pub fn new(hunger: f32, energy: f32, happiness: f32) -> Self {
        Self {
            hunger: clamp_unit(hunger),
            energy: clamp_unit(energy),
            happiness: clamp_unit(happiness),
        }
    }

    pub fn get(&self, need: Need) -> f32 {
        match need {
            Need::Hunger => self.hunger,
            Need::Energy => self.energy,
            Need::Happiness => self.happiness,
        }
    }

    /// Add `delta` to a need and clamp the result. Returns the new value.
    pub fn adjust(&mut self, need: Need, delta: f32) -> f32 {
        let value = match need {
            Need::Hunger => &mut self.hunger,
            Need::Energy => &mut self.energy,
            Need::Happiness => &mut self.happiness,
        };
        *value = clamp_unit(*value + delta);
        *value
    }
}

/// Clamp into [0.0, 1.0]. NaN collapses to 0.0 so a bad delta can't poison state.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Which need a decay timer drains, and by how much per firing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayRule {
    pub need: Need,
    /// Seconds between firings.
    pub interval: f64,
    /// Amount subtracted per firing.
    pub amount: f32,
}

/// Apply one firing of a decay rule.
pub fn apply_decay(needs: &mut NeedState, rule: &DecayRule) -> f32 {
    needs.adjust(rule.need, -rule.amount)
}
