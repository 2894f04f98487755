//! Integration tests for the pure logic pipeline.
//!
//! Exercises: decay rules → needs → mood → mouth, and
//! food effects → progress → achievements, without any engine.

use blobpet_logic::achievements::{newly_earned, Achievement, AchievementSet, Progress};
use blobpet_logic::config::PetConfig;
use blobpet_logic::food::FoodKind;
use blobpet_logic::mood::{default_mouth, resolve_mood, Mood, Mouth};
use blobpet_logic::needs::{apply_decay, Need, NeedState};

// ── Helpers ────────────────────────────────────────────────────────────

/// Run decay for `seconds` using the config's intervals, one firing at a time.
fn decay_for(needs: &mut NeedState, config: &PetConfig, seconds: f64) {
    for rule in [config.hunger_decay(), config.energy_decay()] {
        let firings = (seconds / rule.interval).floor() as u32;
        for _ in 0..firings {
            apply_decay(needs, &rule);
        }
    }
}

fn feed(needs: &mut NeedState, kind: FoodKind) {
    let e = kind.effect();
    needs.adjust(Need::Hunger, e.hunger);
    needs.adjust(Need::Happiness, e.happiness);
    needs.adjust(Need::Energy, e.energy);
}

// ── Mood over a neglected afternoon ────────────────────────────────────

#[test]
fn unattended_pet_goes_hungry_then_neglected() {
    let config = PetConfig::default();
    let mut needs = NeedState::default();
    assert_eq!(resolve_mood(&needs, false), Mood::Happy);

    // Two minutes: hunger 0.5 → 0.1, energy 0.8 → 0.7.
    decay_for(&mut needs, &config, 120.0);
    assert_eq!(resolve_mood(&needs, false), Mood::Hungry);
    assert_eq!(default_mouth(resolve_mood(&needs, false)), Mouth::Pout);

    // Energy and happiness eventually bottom out too.
    decay_for(&mut needs, &config, 900.0);
    needs.adjust(Need::Happiness, -1.0);
    assert_eq!(resolve_mood(&needs, false), Mood::Neglected);
    assert_eq!(resolve_mood(&needs, true), Mood::Excited);
}

#[test]
fn feeding_fixes_hunger_but_not_sleepiness() {
    let mut needs = NeedState::new(0.1, 0.2, 0.6);
    assert_eq!(resolve_mood(&needs, false), Mood::Hungry);
    feed(&mut needs, FoodKind::Cake);
    // Cake fills hunger but costs energy.
    assert!((needs.hunger - 0.5).abs() < 1e-5);
    assert!((needs.energy - 0.1).abs() < 1e-5);
    assert_eq!(resolve_mood(&needs, false), Mood::Sleepy);
}

// ── Achievements over many meals ───────────────────────────────────────

#[test]
fn ten_meals_unlock_in_order() {
    let mut needs = NeedState::default();
    let mut set = AchievementSet::new();
    let mut order = Vec::new();

    for meal in 1..=10u32 {
        feed(&mut needs, FoodKind::Grape);
        let progress = Progress {
            total_feedings: meal,
            total_bounces: 0,
            happiness: needs.happiness,
            scale: 1.0,
        };
        for a in newly_earned(&progress, &set) {
            assert!(set.insert(a));
            order.push((meal, a));
        }
    }

    assert_eq!(
        order,
        vec![
            (1, Achievement::FirstMeal),
            (3, Achievement::PureJoy),
            (10, Achievement::Foodie),
        ]
    );
    assert_eq!(set.titles(), vec!["First Meal", "Pure Joy", "Foodie"]);
}
