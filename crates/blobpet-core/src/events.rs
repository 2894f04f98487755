//! Notifications and the read model handed to renderers.
//!
//! The engine never calls into a renderer. After each dispatch or timer it
//! queues [`EngineEvent`]s; the host drains them with
//! `PetEngine::take_events` and re-reads [`PetView`] as needed.

use blobpet_logic::achievements::Achievement;
use blobpet_logic::mood::{Mood, Mouth};
use blobpet_logic::motion::{Point, Velocity};
use blobpet_logic::needs::NeedState;
use serde::{Deserialize, Serialize};

use crate::state::{PetState, TransientFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Some renderer-visible value changed.
    StateChanged,
    MoodChanged { from: Mood, to: Mood },
    AchievementUnlocked(Achievement),
    PopupShown(Achievement),
    PopupHidden,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetView {
    pub mood: Mood,
    pub needs: NeedState,
    pub flags: TransientFlags,
    pub mouth: Mouth,
    pub position: Point,
    pub velocity: Velocity,
    pub scale: f32,
    pub particles_visible: bool,
    pub popup_visible: bool,
    pub popup_text: Option<String>,
}

impl From<&PetState> for PetView {
    fn from(state: &PetState) -> Self {
        let popup = state.popups.showing;
        Self {
            mood: state.mood,
            needs: state.needs,
            flags: state.flags,
            mouth: state.mouth,
            position: state.motion.position,
            velocity: state.motion.velocity,
            scale: state.scale,
            particles_visible: state.particles_visible,
            popup_visible: popup.is_some(),
            popup_text: popup.map(|a| a.title().to_string()),
        }
    }
}
