//! Mood resolution: a fixed priority chain over needs and the shake flag.
//!
//! Order matters and is observable:
//! 1. shaking → `Excited`
//! 2. hunger < 0.2 && energy < 0.2 && happiness < 0.3 → `Neglected`
//! 3. hunger < 0.3 → `Hungry`
//! 4. energy < 0.3 → `Sleepy`
//! 5. otherwise → `Happy`
//!
//! The chain checks happiness > 0.7 before the final fallback, but both arms
//! yield `Happy`. Keep the arm so a future threshold has a slot.

use serde::{Deserialize, Serialize};

use crate::needs::NeedState;

const NEGLECT_HUNGER: f32 = 0.2;
const NEGLECT_ENERGY: f32 = 0.2;
const NEGLECT_HAPPINESS: f32 = 0.3;
const HUNGRY_BELOW: f32 = 0.3;
const SLEEPY_BELOW: f32 = 0.3;
const VERY_HAPPY_ABOVE: f32 = 0.7;

/// Discrete emotional state shown by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Hungry,
    Sleepy,
    Excited,
    Neglected,
}

impl Mood {
    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Hungry => "hungry",
            Mood::Sleepy => "sleepy",
            Mood::Excited => "excited",
            Mood::Neglected => "neglected",
        }
    }
}

/// Resolve the mood. Pure: depends only on the arguments.
#[allow(clippy::if_same_then_else)]
pub fn resolve_mood(needs: &NeedState, is_shaking: bool) -> Mood {
    if is_shaking {
        Mood::Excited
    } else if needs.hunger < NEGLECT_HUNGER
        && needs.energy < NEGLECT_ENERGY
        && needs.happiness < NEGLECT_HAPPINESS
    {
        Mood::Neglected
    } else if needs.hunger < HUNGRY_BELOW {
        Mood::Hungry
    } else if needs.energy < SLEEPY_BELOW {
        Mood::Sleepy
    } else if needs.happiness > VERY_HAPPY_ABOVE {
        Mood::Happy
    } else {
        Mood::Happy
    }
}

/// Mouth shape drawn by the renderer.
///
/// The first five are mood defaults; the rest are owned by actions
/// (feeding, sleeping) and temporarily override the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mouth {
    Smile,
    Pout,
    Yawn,
    Grin,
    Flat,
    WideOpen,
    Chewing,
    Smiling,
    Closed,
}

/// Default mouth for a mood, so renderers stay stateless.
pub fn default_mouth(mood: Mood) -> Mouth {
    match mood {
        Mood::Happy => Mouth::Smile,
        Mood::Hungry => Mouth::Pout,
        Mood::Sleepy => Mouth::Yawn,
        Mood::Excited => Mouth::Grin,
        Mood::Neglected => Mouth::Flat,
    }
}
