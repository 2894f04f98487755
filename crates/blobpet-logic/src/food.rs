//! Food codes and their effects on needs.
//!
//! The renderer identifies a dropped food token by a short code (an emoji).
//! Unknown codes get the default row instead of an error.

use serde::{Deserialize, Serialize};

/// Foods the pet recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Apple,
    Cake,
    Carrot,
    Cookie,
    Banana,
    Grape,
    Unknown,
}

/// Need deltas applied by one feeding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodEffect {
    pub hunger: f32,
    pub happiness: f32,
    pub energy: f32,
}

impl FoodKind {
    pub const MENU: [FoodKind; 6] = [
        FoodKind::Apple,
        FoodKind::Cake,
        FoodKind::Carrot,
        FoodKind::Cookie,
        FoodKind::Banana,
        FoodKind::Grape,
    ];

    /// Parse a food token code. Accepts the emoji or the plain name.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "🍎" | "apple" => FoodKind::Apple,
            "🍰" | "🎂" | "cake" => FoodKind::Cake,
            "🥕" | "carrot" => FoodKind::Carrot,
            "🍪" | "cookie" => FoodKind::Cookie,
            "🍌" | "banana" => FoodKind::Banana,
            "🍇" | "grape" | "grapes" => FoodKind::Grape,
            _ => FoodKind::Unknown,
        }
    }

    /// Canonical emoji for this food.
    pub fn code(self) -> &'static str {
        match self {
            FoodKind::Apple => "🍎",
            FoodKind::Cake => "🍰",
            FoodKind::Carrot => "🥕",
            FoodKind::Cookie => "🍪",
            FoodKind::Banana => "🍌",
            FoodKind::Grape => "🍇",
            FoodKind::Unknown => "❓",
        }
    }

    pub fn effect(self) -> FoodEffect {
        let (hunger, happiness, energy) = match self {
            FoodKind::Apple => (0.3, 0.1, 0.0),
            FoodKind::Cake => (0.4, 0.3, -0.1),
            FoodKind::Carrot => (0.2, 0.1, 0.0),
            FoodKind::Cookie => (0.3, 0.2, 0.0),
            FoodKind::Banana => (0.2, 0.2, 0.0),
            FoodKind::Grape => (0.1, 0.1, 0.0),
            FoodKind::Unknown => (0.2, 0.1, 0.0),
        };
        FoodEffect {
            hunger,
            happiness,
            energy,
        }
    }
}
