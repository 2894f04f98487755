//! Pure pet simulation logic for BlobPet.
//!
//! This crate contains all pet logic that is independent of timers,
//! storage, or rendering. Functions take plain data and return results,
//! making them unit-testable and reusable by the engine, the headless
//! harness, and any renderer that wants to preview an outcome.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`achievements`] | Badge thresholds and one-time unlock evaluation |
//! | [`config`] | Tunable rates, delays, and bounds (serde, with defaults) |
//! | [`food`] | Food codes and their per-need effect table |
//! | [`mood`] | Mood priority chain and mood → mouth expression table |
//! | [`motion`] | Viewport bounds, boundary reflection, fling integration |
//! | [`needs`] | Bounded hunger/energy/happiness scalars with clamped updates |

pub mod achievements;
pub mod config;
pub mod food;
pub mod mood;
pub mod motion;
pub mod needs;
