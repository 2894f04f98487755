//! Actions and the input events that trigger them.
//!
//! The gesture layer sends [`InputEvent`]s; [`map_input`] turns them into
//! [`Action`]s the engine dispatches. Actions can also be dispatched
//! directly.

use blobpet_logic::config::LongPressMode;
use blobpet_logic::food::FoodKind;
use blobpet_logic::motion::Point;
use serde::{Deserialize, Serialize};

/// A user- or sensor-triggered transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Feed(FoodKind),
    Bounce,
    GoToSleep,
    WakeUp,
    MiniWorkout,
    Split,
    Inflate,
    /// A device-motion sample; only acts when above the shake threshold.
    Shake { magnitude: f32 },
    StartDragging(Point),
    DragTo(Point),
    EndDragging,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Feed(_) => "feed",
            Action::Bounce => "bounce",
            Action::GoToSleep => "go_to_sleep",
            Action::WakeUp => "wake_up",
            Action::MiniWorkout => "mini_workout",
            Action::Split => "split",
            Action::Inflate => "inflate",
            Action::Shake { .. } => "shake",
            Action::StartDragging(_) => "start_dragging",
            Action::DragTo(_) => "drag_to",
            Action::EndDragging => "end_dragging",
        }
    }
}

/// Raw events from the gesture and sensor layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Tap,
    DoubleTap,
    LongPress,
    DragStart { x: f32, y: f32 },
    DragMove { x: f32, y: f32 },
    DragEnd,
    /// A food token dropped on the pet, identified by its code.
    FoodDrop { code: String },
    /// Accelerometer sample.
    Motion { x: f32, y: f32, z: f32 },
}

/// Translate an input event into the action it triggers.
pub fn map_input(event: &InputEvent, long_press: LongPressMode) -> Action {
    match event {
        InputEvent::Tap => Action::Bounce,
        InputEvent::DoubleTap => Action::Split,
        InputEvent::LongPress => match long_press {
            LongPressMode::Sleep => Action::GoToSleep,
            LongPressMode::Inflate => Action::Inflate,
        },
        InputEvent::DragStart { x, y } => Action::StartDragging(Point::new(*x, *y)),
        InputEvent::DragMove { x, y } => Action::DragTo(Point::new(*x, *y)),
        InputEvent::DragEnd => Action::EndDragging,
        InputEvent::FoodDrop { code } => Action::Feed(FoodKind::from_code(code)),
        InputEvent::Motion { x, y, z } => Action::Shake {
            magnitude: (x * x + y * y + z * z).sqrt(),
        },
    }
}

/// Why an action did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Asleep,
    NotAsleep,
    AlreadyShaking,
    BelowShakeThreshold,
    NotDragging,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Rejection::Asleep => "pet is asleep",
            Rejection::NotAsleep => "pet is already awake",
            Rejection::AlreadyShaking => "pet is already shaking",
            Rejection::BelowShakeThreshold => "motion below shake threshold",
            Rejection::NotDragging => "no drag in progress",
        };
        f.write_str(msg)
    }
}

/// Result of dispatching an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}
