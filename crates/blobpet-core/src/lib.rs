//! BlobPet Core - Pet Simulation Engine
//!
//! A single on-screen creature with three needs (hunger, energy,
//! happiness), a derived mood, timed decay, user actions and one-time
//! achievements, persisted to a flat key/value store between sessions.
//!
//! # Architecture
//!
//! - **State**: one owned [`state::PetState`], no globals
//! - **Scheduler**: token-keyed timers driven by [`engine::PetEngine::tick`]
//! - **Actions**: [`actions::Action`]s dispatched by the host or mapped from
//!   gesture [`actions::InputEvent`]s
//! - **Persistence**: [`persistence::KeyValueStore`] implementations
//!
//! Renderers read [`events::PetView`] and drain [`events::EngineEvent`]s;
//! the engine has no rendering dependency.
//!
//! # Example
//!
//! ```rust,no_run
//! use blobpet_core::prelude::*;
//!
//! let mut engine = PetEngine::init(MemoryStore::new(), PetConfig::default());
//!
//! engine.handle_input(&InputEvent::FoodDrop { code: "🍎".into() });
//!
//! loop {
//!     engine.tick(1.0 / 60.0); // 60 FPS
//!     for event in engine.take_events() {
//!         // redraw from engine.view()
//!         let _ = event;
//!     }
//! }
//! ```

pub mod actions;
pub mod config;
pub mod engine;
pub mod events;
pub mod persistence;
pub mod scheduler;
pub mod state;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::actions::{Action, InputEvent, Outcome, Rejection};
    pub use crate::config::{LongPressMode, PetConfig};
    pub use crate::engine::{PetEngine, TimerToken};
    pub use crate::events::{EngineEvent, PetView};
    pub use crate::persistence::{
        FileFormat, FileStore, KeyValueStore, MemoryStore, PersistedSnapshot,
    };
    pub use blobpet_logic::achievements::Achievement;
    pub use blobpet_logic::food::FoodKind;
    pub use blobpet_logic::mood::{Mood, Mouth};
    pub use blobpet_logic::motion::Point;
}
