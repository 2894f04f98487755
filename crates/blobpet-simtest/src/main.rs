//! BlobPet Headless Simulation Harness
//!
//! Drives the pet engine through scripted scenarios and a seeded random
//! session. Runs entirely in-process with an in-memory store.
//!
//! Usage:
//!   cargo run -p blobpet-simtest
//!   cargo run -p blobpet-simtest -- --verbose
//!   cargo run -p blobpet-simtest -- --seed 7 --dump

use blobpet_core::config::load_config;
use blobpet_core::prelude::*;
use blobpet_logic::mood::resolve_mood;
use blobpet_logic::needs::NeedState;
use rand::{rngs::StdRng, Rng, SeedableRng};

// ── Reference config (same JSON shipped with the app) ──────────────────
const CONFIG_JSON: &str = include_str!("../../../data/pet_config.json");

const RANDOM_STEPS: usize = 20_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Args {
    verbose: bool,
    dump: bool,
    seed: u64,
}

fn parse_args() -> Args {
    let argv: Vec<String> = std::env::args().collect();
    let seed = argv
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| argv.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    Args {
        verbose: argv.iter().any(|a| a == "--verbose"),
        dump: argv.iter().any(|a| a == "--dump"),
        seed,
    }
}

fn main() {
    let args = parse_args();
    println!("=== BlobPet Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Shipped config
    results.extend(validate_config(args.verbose));

    // 2. Mood priority chain
    results.extend(validate_mood_chain(args.verbose));

    // 3. Feeding
    results.extend(validate_feeding(args.verbose));

    // 4. Bounce bursts
    results.extend(validate_bounce_burst(args.verbose));

    // 5. Sleep cycle
    results.extend(validate_sleep_cycle(args.verbose));

    // 6. Persistence
    results.extend(validate_persistence(args.verbose));

    // 7. Random session
    results.extend(validate_random_session(args.seed, args.dump, args.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn fresh_engine() -> PetEngine<MemoryStore> {
    PetEngine::init(MemoryStore::new(), PetConfig::default())
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── 1. Config ──────────────────────────────────────────────────────────

fn validate_config(verbose: bool) -> Vec<TestResult> {
    println!("--- Config ---");
    let mut results = Vec::new();

    match load_config(CONFIG_JSON.as_bytes()) {
        Ok(config) => {
            let matches = config == PetConfig::default();
            results.push(TestResult {
                name: "config_parses".into(),
                passed: true,
                detail: "data/pet_config.json loads and validates".into(),
            });
            results.push(TestResult {
                name: "config_matches_defaults".into(),
                passed: matches,
                detail: if matches {
                    "shipped config equals built-in defaults".into()
                } else {
                    format!("shipped config differs: {:?}", config)
                },
            });
        }
        Err(e) => results.push(TestResult {
            name: "config_parses".into(),
            passed: false,
            detail: format!("{}", e),
        }),
    }

    if verbose {
        println!("  {} config checks", results.len());
    }
    results
}

// ── 2. Mood ────────────────────────────────────────────────────────────

fn validate_mood_chain(verbose: bool) -> Vec<TestResult> {
    println!("--- Mood Chain ---");
    let cases = [
        ("mood_default_happy", NeedState::default(), false, Mood::Happy),
        ("mood_hungry_before_sleepy", NeedState::new(0.15, 0.5, 0.5), false, Mood::Hungry),
        ("mood_neglected_before_hungry", NeedState::new(0.1, 0.1, 0.2), false, Mood::Neglected),
        ("mood_sleepy", NeedState::new(0.6, 0.2, 0.5), false, Mood::Sleepy),
        ("mood_shaking_excited", NeedState::new(0.0, 0.0, 0.0), true, Mood::Excited),
    ];

    let results: Vec<TestResult> = cases
        .into_iter()
        .map(|(name, needs, shaking, expected)| {
            let got = resolve_mood(&needs, shaking);
            TestResult {
                name: name.into(),
                passed: got == expected,
                detail: format!("{:?} shaking={} → {}", needs, shaking, got.label()),
            }
        })
        .collect();

    if verbose {
        println!("  {} mood cases", results.len());
    }
    results
}

// ── 3. Feeding ─────────────────────────────────────────────────────────

fn validate_feeding(verbose: bool) -> Vec<TestResult> {
    println!("--- Feeding ---");
    let mut results = Vec::new();

    let mut engine = fresh_engine();
    engine.handle_input(&InputEvent::FoodDrop { code: "🍎".into() });
    let s = engine.state();
    results.push(TestResult {
        name: "feed_apple_needs".into(),
        passed: close(s.needs.hunger, 0.8)
            && close(s.needs.happiness, 0.8)
            && close(s.needs.energy, 0.8),
        detail: format!(
            "hunger={:.2} happiness={:.2} energy={:.2}",
            s.needs.hunger, s.needs.happiness, s.needs.energy
        ),
    });
    results.push(TestResult {
        name: "feed_apple_first_meal".into(),
        passed: s.counters.total_feedings == 1
            && s.achievements.contains(Achievement::FirstMeal),
        detail: format!(
            "feedings={} badges={:?}",
            s.counters.total_feedings,
            s.achievements.titles()
        ),
    });

    let mut mouths = vec![engine.view().mouth];
    for _ in 0..3 {
        engine.tick(0.7);
        mouths.push(engine.view().mouth);
    }
    let expected = [Mouth::WideOpen, Mouth::Chewing, Mouth::Smiling, Mouth::Smile];
    results.push(TestResult {
        name: "feed_mouth_sequence".into(),
        passed: mouths == expected,
        detail: format!("{:?}", mouths),
    });

    let mut engine = fresh_engine();
    engine.handle_input(&InputEvent::FoodDrop { code: "🌮".into() });
    results.push(TestResult {
        name: "feed_unknown_food_default_row".into(),
        passed: close(engine.state().needs.hunger, 0.7)
            && close(engine.state().needs.happiness, 0.8),
        detail: "unknown code → +0.2 hunger / +0.1 happiness".into(),
    });

    if verbose {
        println!("  {} feeding checks", results.len());
    }
    results
}

// ── 4. Bounce bursts ───────────────────────────────────────────────────

fn validate_bounce_burst(verbose: bool) -> Vec<TestResult> {
    println!("--- Bounce Bursts ---");
    let mut results = Vec::new();

    let mut engine = fresh_engine();
    let mut workouts = 0;
    for _ in 0..5 {
        let energy = engine.state().needs.energy;
        engine.handle_input(&InputEvent::Tap);
        if engine.state().needs.energy > energy {
            workouts += 1;
        }
        engine.tick(0.4);
    }
    results.push(TestResult {
        name: "burst_triggers_one_workout".into(),
        passed: workouts == 1 && engine.state().tap_count == 0,
        detail: format!("workouts={} tap_count={}", workouts, engine.state().tap_count),
    });

    engine.tick(3.0);
    engine.handle_input(&InputEvent::Tap);
    results.push(TestResult {
        name: "burst_counter_restarts_after_idle".into(),
        passed: engine.state().tap_count == 1,
        detail: format!("tap_count={} after idle", engine.state().tap_count),
    });

    let mut engine = fresh_engine();
    for _ in 0..25 {
        engine.handle_input(&InputEvent::Tap);
        engine.tick(3.0);
    }
    results.push(TestResult {
        name: "bouncy_after_25".into(),
        passed: engine.state().achievements.contains(Achievement::Bouncy),
        detail: format!("bounces={}", engine.state().counters.total_bounces),
    });

    if verbose {
        println!("  {} bounce checks", results.len());
    }
    results
}

// ── 5. Sleep ───────────────────────────────────────────────────────────

fn validate_sleep_cycle(verbose: bool) -> Vec<TestResult> {
    println!("--- Sleep Cycle ---");
    let mut results = Vec::new();

    let mut store = MemoryStore::new();
    let tired = PersistedSnapshot {
        energy: 0.25,
        ..PersistedSnapshot::default()
    };
    if let Err(e) = tired.write(&mut store) {
        results.push(TestResult {
            name: "sleep_setup".into(),
            passed: false,
            detail: format!("{}", e),
        });
        return results;
    }

    let mut engine = PetEngine::init(store, PetConfig::default());
    results.push(TestResult {
        name: "sleep_tired_pet_is_sleepy".into(),
        passed: engine.state().mood == Mood::Sleepy,
        detail: format!("mood={}", engine.state().mood.label()),
    });

    engine.handle_input(&InputEvent::LongPress);
    let asleep = engine.state().flags.is_asleep;
    let rejected = !engine.dispatch(Action::Feed(FoodKind::Cookie)).is_applied();
    results.push(TestResult {
        name: "sleep_blocks_feeding".into(),
        passed: asleep && rejected,
        detail: format!("asleep={} feed_rejected={}", asleep, rejected),
    });

    let mut seconds = 0;
    while engine.state().flags.is_asleep && seconds < 120 {
        engine.tick(1.0);
        seconds += 1;
    }
    results.push(TestResult {
        name: "sleep_wakes_when_rested".into(),
        passed: !engine.state().flags.is_asleep && engine.state().needs.energy >= 0.8,
        detail: format!(
            "woke after {}s at energy {:.2}",
            seconds,
            engine.state().needs.energy
        ),
    });

    let before = engine.state().clone();
    let outcome = engine.dispatch(Action::WakeUp);
    results.push(TestResult {
        name: "wake_when_awake_noop".into(),
        passed: !outcome.is_applied() && engine.state() == &before,
        detail: format!("{:?}", outcome),
    });

    if verbose {
        println!("  {} sleep checks", results.len());
    }
    results
}

// ── 6. Persistence ─────────────────────────────────────────────────────

fn validate_persistence(verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let mut engine = fresh_engine();
    engine.dispatch(Action::Feed(FoodKind::Banana));
    engine.dispatch(Action::Bounce);
    engine.tick(2.5);
    let saved = engine.snapshot();
    let store = engine.into_store();

    let reloaded = PetEngine::init(store, PetConfig::default());
    results.push(TestResult {
        name: "persist_round_trip".into(),
        passed: reloaded.snapshot() == saved,
        detail: format!(
            "feedings={} bounces={} badges={}",
            saved.total_feedings,
            saved.total_bounces,
            saved.achievements.len()
        ),
    });

    match serde_json::to_string(&saved) {
        Ok(json) => {
            let back: Result<PersistedSnapshot, _> = serde_json::from_str(&json);
            results.push(TestResult {
                name: "persist_snapshot_json".into(),
                passed: back.as_ref().map(|b| b == &saved).unwrap_or(false),
                detail: format!("{} bytes", json.len()),
            });
        }
        Err(e) => results.push(TestResult {
            name: "persist_snapshot_json".into(),
            passed: false,
            detail: format!("{}", e),
        }),
    }

    if verbose {
        println!("  {} persistence checks", results.len());
    }
    results
}

// ── 7. Random session ──────────────────────────────────────────────────

fn random_event(rng: &mut StdRng) -> InputEvent {
    match rng.gen_range(0..8) {
        0 => InputEvent::Tap,
        1 => InputEvent::DoubleTap,
        2 => InputEvent::LongPress,
        3 => InputEvent::DragStart {
            x: rng.gen_range(0.0..390.0),
            y: rng.gen_range(0.0..844.0),
        },
        4 => InputEvent::DragMove {
            x: rng.gen_range(-200.0..600.0),
            y: rng.gen_range(-200.0..1000.0),
        },
        5 => InputEvent::DragEnd,
        6 => {
            let kind = FoodKind::MENU[rng.gen_range(0..FoodKind::MENU.len())];
            InputEvent::FoodDrop {
                code: kind.code().to_string(),
            }
        }
        _ => InputEvent::Motion {
            x: rng.gen_range(-2.0..2.0),
            y: rng.gen_range(-2.0..2.0),
            z: rng.gen_range(-2.0..2.0),
        },
    }
}

fn validate_random_session(seed: u64, dump: bool, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Session (seed {}) ---", seed);
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut engine = fresh_engine();

    let mut out_of_range = 0;
    let mut counter_regressions = 0;
    let mut applied = 0;
    let mut last_feedings = 0;
    let mut last_bounces = 0;

    for _ in 0..RANDOM_STEPS {
        if engine.handle_input(&random_event(&mut rng)).is_applied() {
            applied += 1;
        }
        engine.tick(rng.gen_range(0.0..2.0));

        let s = engine.state();
        if [s.needs.hunger, s.needs.energy, s.needs.happiness]
            .iter()
            .any(|v| !(0.0..=1.0).contains(v))
        {
            out_of_range += 1;
        }
        if s.counters.total_feedings < last_feedings || s.counters.total_bounces < last_bounces {
            counter_regressions += 1;
        }
        last_feedings = s.counters.total_feedings;
        last_bounces = s.counters.total_bounces;
    }
    engine.take_events();

    results.push(TestResult {
        name: "random_needs_in_range".into(),
        passed: out_of_range == 0,
        detail: format!("{} out-of-range steps in {}", out_of_range, RANDOM_STEPS),
    });
    results.push(TestResult {
        name: "random_counters_monotonic".into(),
        passed: counter_regressions == 0,
        detail: format!("{} regressions, {} actions applied", counter_regressions, applied),
    });

    let view = engine.view();
    let in_bounds = view.flags.is_dragging
        || engine
            .config()
            .viewport
            .contains(view.position, engine.config().pet_radius);
    results.push(TestResult {
        name: "random_position_in_viewport".into(),
        passed: in_bounds,
        detail: format!("({:.1}, {:.1})", view.position.x, view.position.y),
    });

    if dump {
        match serde_json::to_string_pretty(&engine.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("  snapshot dump failed: {}", e),
        }
    }
    if verbose {
        println!(
            "  t={:.0}s mood={} badges={:?}",
            engine.now(),
            view.mood.label(),
            engine.snapshot().achievements
        );
    }
    results
}
