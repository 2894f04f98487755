//! Tunable pet parameters.
//!
//! Every field has a default matching the shipped behavior, and the struct
//! deserializes with `#[serde(default)]`, so a config file only needs the
//! fields it wants to change.

use serde::{Deserialize, Serialize};

use crate::motion::Viewport;
use crate::needs::{DecayRule, Need};

/// What a long press does. The two app variants disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongPressMode {
    #[default]
    Sleep,
    Inflate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    // Decay
    pub hunger_decay_interval: f64,
    pub hunger_decay_amount: f32,
    pub energy_decay_interval: f64,
    pub energy_decay_amount: f32,

    // Bounce / workout
    pub bounce_happiness: f32,
    pub bounce_duration: f64,
    pub tap_idle_window: f64,
    pub tap_burst: u32,
    pub workout_energy: f32,
    pub workout_hunger_cost: f32,
    pub workout_duration: f64,

    // Sleep
    pub sleep_restore_interval: f64,
    pub sleep_restore_step: f32,
    pub wake_energy: f32,

    // Feeding
    pub chew_delay: f64,
    pub smile_delay: f64,
    pub settle_delay: f64,
    pub feed_growth: f32,
    pub max_scale: f32,

    // Split / inflate / shake / drag
    pub split_scale: f32,
    pub split_happiness: f32,
    pub split_duration: f64,
    pub inflate_happiness: f32,
    pub inflate_duration: f64,
    pub shake_threshold: f32,
    pub shake_happiness: f32,
    pub shake_duration: f64,
    pub drag_happiness: f32,

    // Popups
    pub popup_duration: f64,

    // Motion
    pub viewport: Viewport,
    pub pet_radius: f32,
    pub fling_friction: f32,

    pub long_press: LongPressMode,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            hunger_decay_interval: 30.0,
            hunger_decay_amount: 0.1,
            energy_decay_interval: 45.0,
            energy_decay_amount: 0.05,

            bounce_happiness: 0.1,
            bounce_duration: 0.3,
            tap_idle_window: 3.0,
            tap_burst: 5,
            workout_energy: 0.2,
            workout_hunger_cost: 0.1,
            workout_duration: 0.5,

            sleep_restore_interval: 5.0,
            sleep_restore_step: 0.1,
            wake_energy: 0.8,

            chew_delay: 0.3,
            smile_delay: 1.0,
            settle_delay: 2.0,
            feed_growth: 0.05,
            max_scale: 1.5,

            split_scale: 0.7,
            split_happiness: 0.15,
            split_duration: 1.0,
            inflate_happiness: 0.1,
            inflate_duration: 2.0,
            shake_threshold: 2.0,
            shake_happiness: 0.2,
            shake_duration: 2.0,
            drag_happiness: 0.05,

            popup_duration: 2.0,

            viewport: Viewport::default(),
            pet_radius: 60.0,
            fling_friction: 0.85,

            long_press: LongPressMode::Sleep,
        }
    }
}

impl PetConfig {
    pub fn hunger_decay(&self) -> DecayRule {
        DecayRule {
            need: Need::Hunger,
            interval: self.hunger_decay_interval,
            amount: self.hunger_decay_amount,
        }
    }

    pub fn energy_decay(&self) -> DecayRule {
        DecayRule {
            need: Need::Energy,
            interval: self.energy_decay_interval,
            amount: self.energy_decay_amount,
        }
    }

    /// Check the config for values the engine cannot run with.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let intervals = [
            ("hunger_decay_interval", self.hunger_decay_interval),
            ("energy_decay_interval", self.energy_decay_interval),
            ("sleep_restore_interval", self.sleep_restore_interval),
        ];
        for (name, value) in intervals {
            if !(value > 0.0) {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        let delays = [
            ("bounce_duration", self.bounce_duration),
            ("tap_idle_window", self.tap_idle_window),
            ("workout_duration", self.workout_duration),
            ("chew_delay", self.chew_delay),
            ("smile_delay", self.smile_delay),
            ("settle_delay", self.settle_delay),
            ("split_duration", self.split_duration),
            ("inflate_duration", self.inflate_duration),
            ("shake_duration", self.shake_duration),
            ("popup_duration", self.popup_duration),
        ];
        for (name, value) in delays {
            if !(value >= 0.0) {
                return Err(format!("{name} must not be negative, got {value}"));
            }
        }
        if !(self.chew_delay <= self.smile_delay && self.smile_delay <= self.settle_delay) {
            return Err("feed delays must satisfy chew <= smile <= settle".into());
        }
        if self.tap_burst == 0 {
            return Err("tap_burst must be at least 1".into());
        }
        if !(self.max_scale > 0.0) {
            return Err(format!("max_scale must be positive, got {}", self.max_scale));
        }
        if !self.viewport.fits(self.pet_radius) {
            return Err("viewport is too small for the pet radius".into());
        }
        Ok(())
    }
}
