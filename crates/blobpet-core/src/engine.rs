//! Pet engine - main entry point for running the simulation
//!
//! Lifecycle: [`PetEngine::init`] loads the snapshot and arms the decay
//! timers, [`PetEngine::tick`] advances time and fires due timers,
//! [`PetEngine::dispatch`] applies an action, [`PetEngine::snapshot`] and
//! [`PetEngine::view`] read state back out. Everything runs on the caller's
//! thread; timers fire inside `tick`, in due order, one at a time.

use blobpet_logic::achievements::{newly_earned, Achievement};
use blobpet_logic::config::PetConfig;
use blobpet_logic::food::FoodKind;
use blobpet_logic::mood::{default_mouth, Mouth};
use blobpet_logic::motion::{fling_step, reflect_into_bounds, Point, Velocity};
use blobpet_logic::needs::{apply_decay, Need, NeedState};

use crate::actions::{map_input, Action, InputEvent, Outcome, Rejection};
use crate::events::{EngineEvent, PetView};
use crate::persistence::{KeyValueStore, PersistedSnapshot};
use crate::scheduler::Scheduler;
use crate::state::{Counters, PetState};

/// Shortest gap assumed between two drag samples, in seconds.
const MIN_DRAG_SAMPLE: f64 = 1.0 / 60.0;

/// Logical transitions that own a timer. At most one timer per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerToken {
    HungerDecay,
    EnergyDecay,
    /// Resets the tap counter after an idle window.
    TapIdle,
    /// Clears `is_bouncing` after a bounce or a workout.
    BounceSettle,
    SleepRestore,
    FeedChew,
    FeedSmile,
    FeedSettle,
    SplitRestore,
    InflateEnd,
    ShakeEnd,
    PopupDismiss,
}

/// Main simulation engine
pub struct PetEngine<S: KeyValueStore> {
    state: PetState,
    config: PetConfig,
    scheduler: Scheduler<TimerToken>,
    store: S,
    events: Vec<EngineEvent>,
    /// Scheduler time of the last drag sample.
    drag_sampled_at: f64,
}

impl<S: KeyValueStore> PetEngine<S> {
    /// Load state from `store` and start the decay timers.
    ///
    /// A config that fails [`PetConfig::validate`] is replaced by the
    /// defaults.
    pub fn init(store: S, config: PetConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(problem) => {
                log::warn!("Invalid pet config ({}); using defaults", problem);
                PetConfig::default()
            }
        };
        let snapshot = PersistedSnapshot::load(&store);
        let mut state = PetState {
            needs: NeedState::new(snapshot.hunger, snapshot.energy, snapshot.happiness),
            scale: snapshot.scale,
            counters: Counters {
                total_feedings: snapshot.total_feedings,
                total_bounces: snapshot.total_bounces,
            },
            achievements: snapshot.achievement_set(),
            ..PetState::default()
        };
        state.motion.position = config.viewport.center();
        state.refresh_mood();
        state.mouth = default_mouth(state.mood);

        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(TimerToken::HungerDecay, config.hunger_decay_interval);
        scheduler.schedule_repeating(TimerToken::EnergyDecay, config.energy_decay_interval);

        log::info!(
            "Pet loaded: hunger={:.2} energy={:.2} happiness={:.2} mood={}",
            state.needs.hunger,
            state.needs.energy,
            state.needs.happiness,
            state.mood.label()
        );

        Self {
            state,
            config,
            scheduler,
            store,
            events: vec![EngineEvent::StateChanged],
            drag_sampled_at: 0.0,
        }
    }

    /// Advance the simulation by `delta_seconds`, firing every timer that
    /// comes due, then step any free-flying motion.
    pub fn tick(&mut self, delta_seconds: f32) {
        let until = self.scheduler.now() + delta_seconds.max(0.0) as f64;
        while let Some(token) = self.scheduler.pop_due(until) {
            log::debug!("Timer {:?} fired at t={:.2}", token, self.scheduler.now());
            self.on_timer(token);
        }
        self.scheduler.advance_to(until);

        if !self.state.flags.is_dragging && self.state.motion.velocity != Velocity::default() {
            let (pos, vel) = fling_step(
                self.state.motion.position,
                self.state.motion.velocity,
                delta_seconds,
                self.config.fling_friction,
                &self.config.viewport,
                self.config.pet_radius,
            );
            self.state.motion.position = pos;
            self.state.motion.velocity = vel;
            self.events.push(EngineEvent::StateChanged);
        }
    }

    /// Apply an action.
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        log::debug!("Dispatch {}", action.name());
        let outcome = match action {
            Action::Feed(kind) => self.feed(kind),
            Action::Bounce => self.bounce(),
            Action::GoToSleep => self.go_to_sleep(),
            Action::WakeUp => self.wake_up(),
            Action::MiniWorkout => self.mini_workout(),
            Action::Split => self.split(),
            Action::Inflate => self.inflate(),
            Action::Shake { magnitude } => self.shake(magnitude),
            Action::StartDragging(point) => self.start_dragging(point),
            Action::DragTo(point) => self.drag_to(point),
            Action::EndDragging => self.end_dragging(),
        };
        if let Outcome::Rejected(reason) = outcome {
            log::debug!("{} rejected: {}", action.name(), reason);
        }
        outcome
    }

    /// Map a gesture/sensor event to its action and dispatch it.
    pub fn handle_input(&mut self, event: &InputEvent) -> Outcome {
        let action = map_input(event, self.config.long_press);
        self.dispatch(action)
    }

    /// The persisted subset of the current state.
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot::from_state(&self.state)
    }

    pub fn view(&self) -> PetView {
        PetView::from(&self.state)
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn config(&self) -> &PetConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tear down the engine and hand back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Simulation seconds since init.
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn is_timer_pending(&self, token: TimerToken) -> bool {
        self.scheduler.is_pending(token)
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Actions ─────────────────────────────────────────────────────────

    fn feed(&mut self, kind: FoodKind) -> Outcome {
        if self.state.flags.is_asleep {
            return Outcome::Rejected(Rejection::Asleep);
        }
        let effect = kind.effect();
        self.state.needs.adjust(Need::Hunger, effect.hunger);
        self.state.needs.adjust(Need::Happiness, effect.happiness);
        self.state.needs.adjust(Need::Energy, effect.energy);
        self.state.mouth = Mouth::WideOpen;
        self.state.counters.total_feedings = self.state.counters.total_feedings.saturating_add(1);
        self.state.pending_growth += 1;

        self.scheduler.schedule_once(TimerToken::FeedChew, self.config.chew_delay);
        self.scheduler.schedule_once(TimerToken::FeedSmile, self.config.smile_delay);
        self.scheduler.schedule_once(TimerToken::FeedSettle, self.config.settle_delay);

        self.settle(true);
        Outcome::Applied
    }

    fn bounce(&mut self) -> Outcome {
        if self.state.flags.is_asleep {
            return self.wake_up();
        }

        self.state.tap_count += 1;
        if self.state.tap_count >= self.config.tap_burst {
            self.state.tap_count = 0;
            self.scheduler.cancel(TimerToken::TapIdle);
            return self.mini_workout();
        }
        self.scheduler.schedule_once(TimerToken::TapIdle, self.config.tap_idle_window);

        self.state.flags.is_bouncing = true;
        self.scheduler.schedule_once(TimerToken::BounceSettle, self.config.bounce_duration);
        self.state.needs.adjust(Need::Happiness, self.config.bounce_happiness);
        self.state.counters.total_bounces = self.state.counters.total_bounces.saturating_add(1);

        self.settle(true);
        Outcome::Applied
    }

    fn mini_workout(&mut self) -> Outcome {
        if self.state.flags.is_asleep {
            return Outcome::Rejected(Rejection::Asleep);
        }
        self.state.needs.adjust(Need::Energy, self.config.workout_energy);
        self.state.needs.adjust(Need::Hunger, -self.config.workout_hunger_cost);
        self.state.flags.is_bouncing = true;
        self.scheduler.schedule_once(TimerToken::BounceSettle, self.config.workout_duration);
        log::info!("Mini workout! energy={:.2}", self.state.needs.energy);

        self.settle(true);
        Outcome::Applied
    }

    fn go_to_sleep(&mut self) -> Outcome {
        self.state.flags.is_asleep = true;
        self.state.mouth = Mouth::Closed;
        self.scheduler
            .schedule_repeating(TimerToken::SleepRestore, self.config.sleep_restore_interval);
        log::info!("Pet fell asleep (energy={:.2})", self.state.needs.energy);

        self.settle(true);
        Outcome::Applied
    }

    fn wake_up(&mut self) -> Outcome {
        if !self.state.flags.is_asleep {
            return Outcome::Rejected(Rejection::NotAsleep);
        }
        self.state.flags.is_asleep = false;
        self.scheduler.cancel(TimerToken::SleepRestore);
        if self.mouth_follows_mood() {
            self.state.mouth = default_mouth(self.state.mood);
        }
        log::info!("Pet woke up (energy={:.2})", self.state.needs.energy);

        self.settle(true);
        Outcome::Applied
    }

    fn split(&mut self) -> Outcome {
        self.state.scale = self.config.split_scale;
        self.state.needs.adjust(Need::Happiness, self.config.split_happiness);
        self.scheduler.schedule_once(TimerToken::SplitRestore, self.config.split_duration);

        self.settle(true);
        Outcome::Applied
    }

    fn inflate(&mut self) -> Outcome {
        self.state.flags.is_inflated = true;
        self.state.needs.adjust(Need::Happiness, self.config.inflate_happiness);
        self.scheduler.schedule_once(TimerToken::InflateEnd, self.config.inflate_duration);

        self.settle(true);
        Outcome::Applied
    }

    fn shake(&mut self, magnitude: f32) -> Outcome {
        if !(magnitude > self.config.shake_threshold) {
            return Outcome::Rejected(Rejection::BelowShakeThreshold);
        }
        if self.state.flags.is_shaking {
            return Outcome::Rejected(Rejection::AlreadyShaking);
        }
        self.state.flags.is_shaking = true;
        self.state.needs.adjust(Need::Happiness, self.config.shake_happiness);
        self.scheduler.schedule_once(TimerToken::ShakeEnd, self.config.shake_duration);

        self.settle(true);
        Outcome::Applied
    }

    fn start_dragging(&mut self, point: Point) -> Outcome {
        if self.state.flags.is_asleep {
            return Outcome::Rejected(Rejection::Asleep);
        }
        self.state.flags.is_dragging = true;
        self.state.flags.is_stretching = true;
        self.state.motion.position = point;
        self.state.motion.velocity = Velocity::default();
        self.drag_sampled_at = self.scheduler.now();
        self.state.needs.adjust(Need::Happiness, self.config.drag_happiness);

        self.settle(true);
        Outcome::Applied
    }

    fn drag_to(&mut self, point: Point) -> Outcome {
        if !self.state.flags.is_dragging {
            return Outcome::Rejected(Rejection::NotDragging);
        }
        let now = self.scheduler.now();
        let dt = (now - self.drag_sampled_at).max(MIN_DRAG_SAMPLE) as f32;
        let last = self.state.motion.position;
        self.state.motion.velocity =
            Velocity::new((point.x - last.x) / dt, (point.y - last.y) / dt);
        self.state.motion.position = point;
        self.drag_sampled_at = now;

        self.settle(false);
        Outcome::Applied
    }

    fn end_dragging(&mut self) -> Outcome {
        self.state.flags.is_dragging = false;
        self.state.flags.is_stretching = false;
        let (pos, vel, hits) = reflect_into_bounds(
            self.state.motion.position,
            self.state.motion.velocity,
            &self.config.viewport,
            self.config.pet_radius,
        );
        if hits.any() {
            log::debug!("Drag released out of bounds: {:?}", hits);
        }
        self.state.motion.position = pos;
        self.state.motion.velocity = vel;

        self.settle(false);
        Outcome::Applied
    }

    // ── Timers ──────────────────────────────────────────────────────────

    fn on_timer(&mut self, token: TimerToken) {
        match token {
            TimerToken::HungerDecay => {
                apply_decay(&mut self.state.needs, &self.config.hunger_decay());
                self.settle(true);
            }
            TimerToken::EnergyDecay => {
                apply_decay(&mut self.state.needs, &self.config.energy_decay());
                self.settle(true);
            }
            TimerToken::TapIdle => {
                self.state.tap_count = 0;
            }
            TimerToken::BounceSettle => {
                self.state.flags.is_bouncing = false;
                self.settle(false);
            }
            TimerToken::SleepRestore => {
                let energy = self
                    .state
                    .needs
                    .adjust(Need::Energy, self.config.sleep_restore_step);
                if energy >= self.config.wake_energy {
                    // wake_up settles and persists.
                    self.wake_up();
                } else {
                    self.settle(true);
                }
            }
            TimerToken::FeedChew => {
                self.set_action_mouth(Mouth::Chewing);
                self.settle(false);
            }
            TimerToken::FeedSmile => {
                self.set_action_mouth(Mouth::Smiling);
                let growth = self.config.feed_growth * self.state.pending_growth as f32;
                self.state.scale = (self.state.scale + growth).min(self.config.max_scale);
                self.state.pending_growth = 0;
                self.state.particles_visible = true;
                self.settle(true);
            }
            TimerToken::FeedSettle => {
                self.state.particles_visible = false;
                // Not pending any more, so the mouth is back on the mood.
                if self.mouth_follows_mood() {
                    self.state.mouth = default_mouth(self.state.mood);
                }
                self.settle(false);
            }
            TimerToken::SplitRestore => {
                self.state.scale = 1.0;
                self.settle(true);
            }
            TimerToken::InflateEnd => {
                self.state.flags.is_inflated = false;
                self.settle(false);
            }
            TimerToken::ShakeEnd => {
                self.state.flags.is_shaking = false;
                self.settle(false);
            }
            TimerToken::PopupDismiss => {
                self.events.push(EngineEvent::PopupHidden);
                if let Some(next) = self.state.popups.advance() {
                    self.show_popup(next);
                }
                self.events.push(EngineEvent::StateChanged);
            }
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    /// The mouth tracks the mood unless sleep or a feeding owns it.
    fn mouth_follows_mood(&self) -> bool {
        !self.state.flags.is_asleep && !self.scheduler.is_pending(TimerToken::FeedSettle)
    }

    fn set_action_mouth(&mut self, mouth: Mouth) {
        if !self.state.flags.is_asleep {
            self.state.mouth = mouth;
        }
    }

    /// Common tail of every transition: recompute mood, check achievements,
    /// persist if asked (or if something unlocked), notify.
    fn settle(&mut self, persist: bool) {
        if let Some(from) = self.state.refresh_mood() {
            let to = self.state.mood;
            log::debug!("Mood {} -> {}", from.label(), to.label());
            if self.mouth_follows_mood() {
                self.state.mouth = default_mouth(to);
            }
            self.events.push(EngineEvent::MoodChanged { from, to });
        }

        let unlocked = self.check_achievements();
        if persist || unlocked {
            self.persist();
        }
        self.events.push(EngineEvent::StateChanged);
    }

    /// Unlock every newly earned badge. Returns whether any unlocked.
    fn check_achievements(&mut self) -> bool {
        let earned = newly_earned(&self.state.progress(), &self.state.achievements);
        for achievement in &earned {
            if !self.state.achievements.insert(*achievement) {
                continue;
            }
            log::info!("Achievement unlocked: {}", achievement.title());
            self.events.push(EngineEvent::AchievementUnlocked(*achievement));
            if self.state.popups.push(*achievement) {
                self.show_popup(*achievement);
            }
        }
        !earned.is_empty()
    }

    fn show_popup(&mut self, achievement: Achievement) {
        self.events.push(EngineEvent::PopupShown(achievement));
        self.scheduler.schedule_once(TimerToken::PopupDismiss, self.config.popup_duration);
    }

    /// Write the snapshot. Failures are logged and otherwise ignored; the
    /// in-memory state stays authoritative.
    fn persist(&mut self) {
        if let Err(e) = self.snapshot().write(&mut self.store) {
            log::warn!("Failed to persist pet state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, PersistError, StoredValue};
    use blobpet_logic::mood::Mood;

    fn engine() -> PetEngine<MemoryStore> {
        PetEngine::init(MemoryStore::new(), PetConfig::default())
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_engine_creation() {
        let e = engine();
        assert_eq!(e.state().mood, Mood::Happy);
        assert_eq!(e.now(), 0.0);
        assert!(e.is_timer_pending(TimerToken::HungerDecay));
        assert!(e.is_timer_pending(TimerToken::EnergyDecay));
        assert_eq!(e.state().motion.position, PetConfig::default().viewport.center());
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = PetConfig {
            hunger_decay_interval: 0.0,
            ..PetConfig::default()
        };
        let mut e = PetEngine::init(MemoryStore::new(), config);
        assert_eq!(e.config(), &PetConfig::default());
        e.tick(30.0);
        assert!(approx(e.state().needs.hunger, 0.4));
    }

    #[test]
    fn test_hunger_decays_every_30_seconds() {
        let mut e = engine();
        e.tick(29.0);
        assert!(approx(e.state().needs.hunger, 0.5));
        e.tick(1.0);
        assert!(approx(e.state().needs.hunger, 0.4));
        e.tick(30.0);
        assert!(approx(e.state().needs.hunger, 0.3));
    }

    #[test]
    fn test_energy_decays_every_45_seconds() {
        let mut e = engine();
        e.tick(44.0);
        assert!(approx(e.state().needs.energy, 0.8));
        e.tick(1.0);
        assert!(approx(e.state().needs.energy, 0.75));
    }

    #[test]
    fn test_decay_persists() {
        let mut e = engine();
        e.tick(30.0);
        assert_eq!(
            e.store().get(crate::persistence::KEY_HUNGER),
            Some(&StoredValue::Float(e.state().needs.hunger as f64))
        );
    }

    #[test]
    fn test_feed_apple() {
        let mut e = engine();
        assert!(e.dispatch(Action::Feed(FoodKind::Apple)).is_applied());
        let s = e.state();
        assert!(approx(s.needs.hunger, 0.8));
        assert!(approx(s.needs.happiness, 0.8));
        assert!(approx(s.needs.energy, 0.8));
        assert_eq!(s.counters.total_feedings, 1);
        assert!(s.achievements.contains(Achievement::FirstMeal));
        assert_eq!(s.mouth, Mouth::WideOpen);
    }

    #[test]
    fn test_feed_mouth_sequence_and_growth() {
        let mut e = engine();
        e.dispatch(Action::Feed(FoodKind::Carrot));
        e.tick(0.3);
        assert_eq!(e.state().mouth, Mouth::Chewing);
        e.tick(0.7);
        assert_eq!(e.state().mouth, Mouth::Smiling);
        assert!(approx(e.state().scale, 1.05));
        assert!(e.state().particles_visible);
        e.tick(1.0);
        assert_eq!(e.state().mouth, Mouth::Smile);
        assert!(!e.state().particles_visible);
    }

    #[test]
    fn test_rapid_feeds_keep_every_growth() {
        let mut e = engine();
        e.dispatch(Action::Feed(FoodKind::Grape));
        e.tick(0.5);
        e.dispatch(Action::Feed(FoodKind::Grape));
        e.tick(0.9);
        // First smile was superseded by the second feed.
        assert!(approx(e.state().scale, 1.0));
        e.tick(0.2);
        assert!(approx(e.state().scale, 1.1));
    }

    #[test]
    fn test_scale_caps_at_max() {
        let mut e = engine();
        for _ in 0..20 {
            e.dispatch(Action::Feed(FoodKind::Grape));
            e.tick(2.0);
        }
        assert!(approx(e.state().scale, 1.5));
        assert!(e.state().achievements.contains(Achievement::BigBlob));
    }

    #[test]
    fn test_feed_rejected_while_asleep() {
        let mut e = engine();
        e.dispatch(Action::GoToSleep);
        assert_eq!(
            e.dispatch(Action::Feed(FoodKind::Apple)),
            Outcome::Rejected(Rejection::Asleep)
        );
        assert_eq!(e.state().counters.total_feedings, 0);
    }

    #[test]
    fn test_bounce() {
        let mut e = engine();
        e.dispatch(Action::Bounce);
        assert!(e.state().flags.is_bouncing);
        assert!(approx(e.state().needs.happiness, 0.8));
        assert_eq!(e.state().counters.total_bounces, 1);
        assert!(e.state().achievements.contains(Achievement::FirstBounce));
        e.tick(0.3);
        assert!(!e.state().flags.is_bouncing);
    }

    #[test]
    fn test_five_quick_bounces_trigger_one_workout() {
        let mut e = engine();
        for _ in 0..4 {
            e.dispatch(Action::Bounce);
            e.tick(0.5);
        }
        assert_eq!(e.state().tap_count, 4);
        let energy_before = e.state().needs.energy;
        let hunger_before = e.state().needs.hunger;
        e.dispatch(Action::Bounce);
        assert_eq!(e.state().tap_count, 0);
        assert!(approx(e.state().needs.energy, (energy_before + 0.2).min(1.0)));
        assert!(approx(e.state().needs.hunger, hunger_before - 0.1));
        // The burst-ending tap is the workout, not a bounce.
        assert_eq!(e.state().counters.total_bounces, 4);
        assert!(!e.is_timer_pending(TimerToken::TapIdle));
        assert!(e.state().flags.is_bouncing);
        e.tick(0.5);
        assert!(!e.state().flags.is_bouncing);
    }

    #[test]
    fn test_tap_count_resets_after_idle() {
        let mut e = engine();
        for _ in 0..4 {
            e.dispatch(Action::Bounce);
        }
        e.tick(3.0);
        assert_eq!(e.state().tap_count, 0);
        e.dispatch(Action::Bounce);
        assert_eq!(e.state().tap_count, 1);
        assert_eq!(e.state().counters.total_bounces, 5);
    }

    #[test]
    fn test_each_tap_rearms_idle_window() {
        let mut e = engine();
        e.dispatch(Action::Bounce);
        e.tick(2.5);
        e.dispatch(Action::Bounce);
        e.tick(1.5);
        // Idle window runs from the second tap, so nothing has reset yet.
        assert_eq!(e.state().tap_count, 2);
        e.tick(2.0);
        assert_eq!(e.state().tap_count, 0);
    }

    #[test]
    fn test_bounce_after_workout_and_idle_starts_fresh_count() {
        let mut e = engine();
        for _ in 0..5 {
            e.dispatch(Action::Bounce);
            e.tick(0.4);
        }
        assert_eq!(e.state().tap_count, 0);
        assert_eq!(e.state().counters.total_bounces, 4);
        e.tick(3.0);
        let happiness = e.state().needs.happiness;
        assert!(e.dispatch(Action::Bounce).is_applied());
        assert_eq!(e.state().tap_count, 1);
        assert_eq!(e.state().counters.total_bounces, 5);
        assert!(e.state().flags.is_bouncing);
        assert!(e.state().needs.happiness >= happiness);
    }

    #[test]
    fn test_bounce_wakes_sleeping_pet() {
        let mut e = engine();
        e.dispatch(Action::GoToSleep);
        assert!(e.dispatch(Action::Bounce).is_applied());
        assert!(!e.state().flags.is_asleep);
        assert_eq!(e.state().counters.total_bounces, 0);
        assert_eq!(e.state().tap_count, 0);
    }

    #[test]
    fn test_sleep_restores_energy_then_wakes() {
        let mut store = MemoryStore::new();
        PersistedSnapshot {
            energy: 0.45,
            ..PersistedSnapshot::default()
        }
        .write(&mut store)
        .unwrap();
        let mut e = PetEngine::init(store, PetConfig::default());
        e.dispatch(Action::GoToSleep);
        assert_eq!(e.state().mouth, Mouth::Closed);
        e.tick(5.0);
        assert!(approx(e.state().needs.energy, 0.55));
        assert!(e.state().flags.is_asleep);
        // 10s: 0.65, 15s: 0.75, 20s: 0.85 -> wakes. Energy decay at 45s is not reached.
        e.tick(15.0);
        assert!(!e.state().flags.is_asleep);
        assert!(!e.is_timer_pending(TimerToken::SleepRestore));
        assert_eq!(e.state().mouth, Mouth::Smile);
        let energy = e.state().needs.energy;
        e.tick(5.0);
        assert!(approx(e.state().needs.energy, energy));
    }

    #[test]
    fn test_wake_up_when_awake_is_noop() {
        let mut e = engine();
        let before = e.state().clone();
        assert_eq!(e.dispatch(Action::WakeUp), Outcome::Rejected(Rejection::NotAsleep));
        assert_eq!(e.state(), &before);
    }

    #[test]
    fn test_sleep_twice_keeps_single_timer() {
        let mut e = engine();
        e.dispatch(Action::GoToSleep);
        e.tick(3.0);
        e.dispatch(Action::GoToSleep);
        e.tick(3.0);
        // Restarted at t=3, so the first restore is at t=8.
        assert!(approx(e.state().needs.energy, 0.8));
        e.tick(2.0);
        assert!(approx(e.state().needs.energy, 0.9));
    }

    #[test]
    fn test_split_and_restore() {
        let mut e = engine();
        e.dispatch(Action::Split);
        assert!(approx(e.state().scale, 0.7));
        assert!(approx(e.state().needs.happiness, 0.85));
        e.tick(1.0);
        assert!(approx(e.state().scale, 1.0));
    }

    #[test]
    fn test_inflate() {
        let mut e = engine();
        e.dispatch(Action::Inflate);
        assert!(e.state().flags.is_inflated);
        e.tick(1.9);
        assert!(e.state().flags.is_inflated);
        e.tick(0.2);
        assert!(!e.state().flags.is_inflated);
    }

    #[test]
    fn test_shake() {
        let mut e = engine();
        assert_eq!(
            e.dispatch(Action::Shake { magnitude: 1.5 }),
            Outcome::Rejected(Rejection::BelowShakeThreshold)
        );
        assert!(e.dispatch(Action::Shake { magnitude: 2.5 }).is_applied());
        assert_eq!(e.state().mood, Mood::Excited);
        assert_eq!(e.state().mouth, Mouth::Grin);
        assert!(approx(e.state().needs.happiness, 0.9));
        assert_eq!(
            e.dispatch(Action::Shake { magnitude: 3.0 }),
            Outcome::Rejected(Rejection::AlreadyShaking)
        );
        e.tick(2.0);
        assert!(!e.state().flags.is_shaking);
        assert_eq!(e.state().mood, Mood::Happy);
    }

    #[test]
    fn test_drag_and_release_out_of_bounds() {
        let mut e = engine();
        let radius = e.config().pet_radius;
        let max_x = e.config().viewport.max_x;
        e.dispatch(Action::StartDragging(Point::new(200.0, 400.0)));
        assert!(e.state().flags.is_dragging && e.state().flags.is_stretching);
        e.tick(0.1);
        e.dispatch(Action::DragTo(Point::new(380.0, 400.0)));
        // 180 points over 0.1s.
        assert!((e.state().motion.velocity.dx - 1800.0).abs() < 0.1);
        assert_eq!(e.state().motion.velocity.dy, 0.0);
        e.dispatch(Action::EndDragging);
        assert!(!e.state().flags.is_dragging && !e.state().flags.is_stretching);
        assert_eq!(e.state().motion.position.x, max_x - radius);
        assert!(e.state().motion.velocity.dx < 0.0);
    }

    #[test]
    fn test_drag_velocity_ignores_sample_rate() {
        let mut coarse = engine();
        coarse.dispatch(Action::StartDragging(Point::new(100.0, 400.0)));
        coarse.tick(0.2);
        coarse.dispatch(Action::DragTo(Point::new(140.0, 400.0)));

        let mut fine = engine();
        fine.dispatch(Action::StartDragging(Point::new(100.0, 400.0)));
        for i in 1..=4 {
            fine.tick(0.05);
            fine.dispatch(Action::DragTo(Point::new(100.0 + 10.0 * i as f32, 400.0)));
        }

        let a = coarse.state().motion.velocity.dx;
        let b = fine.state().motion.velocity.dx;
        assert!((a - 200.0).abs() < 0.1);
        assert!((a - b).abs() < 0.1);
    }

    #[test]
    fn test_drag_rejected_while_asleep() {
        let mut e = engine();
        e.dispatch(Action::GoToSleep);
        assert_eq!(
            e.dispatch(Action::StartDragging(Point::new(10.0, 10.0))),
            Outcome::Rejected(Rejection::Asleep)
        );
        assert_eq!(
            e.dispatch(Action::DragTo(Point::new(10.0, 10.0))),
            Outcome::Rejected(Rejection::NotDragging)
        );
    }

    #[test]
    fn test_fling_after_release_stays_in_bounds() {
        let mut e = engine();
        let view = e.config().viewport;
        let radius = e.config().pet_radius;
        e.dispatch(Action::StartDragging(Point::new(200.0, 400.0)));
        e.dispatch(Action::DragTo(Point::new(260.0, 300.0)));
        e.dispatch(Action::EndDragging);
        for _ in 0..600 {
            e.tick(1.0 / 60.0);
            assert!(view.contains(e.state().motion.position, radius));
        }
        assert_eq!(e.state().motion.velocity, Velocity::default());
    }

    #[test]
    fn test_popups_queue_for_simultaneous_unlocks() {
        let mut store = MemoryStore::new();
        PersistedSnapshot {
            total_feedings: 9,
            ..PersistedSnapshot::default()
        }
        .write(&mut store)
        .unwrap();
        let mut e = PetEngine::init(store, PetConfig::default());
        e.take_events();
        e.dispatch(Action::Feed(FoodKind::Apple));
        let events = e.take_events();
        assert!(events.contains(&EngineEvent::AchievementUnlocked(Achievement::FirstMeal)));
        assert!(events.contains(&EngineEvent::AchievementUnlocked(Achievement::Foodie)));
        assert_eq!(e.view().popup_text.as_deref(), Some("First Meal"));
        e.tick(2.0);
        assert_eq!(e.view().popup_text.as_deref(), Some("Foodie"));
        e.tick(2.0);
        assert!(!e.view().popup_visible);
    }

    #[test]
    fn test_achievements_unlock_once() {
        let mut e = engine();
        e.dispatch(Action::Feed(FoodKind::Apple));
        e.take_events();
        e.dispatch(Action::Feed(FoodKind::Apple));
        let events = e.take_events();
        assert!(!events
            .iter()
            .any(|ev| matches!(ev, EngineEvent::AchievementUnlocked(_))));
        assert_eq!(e.state().achievements.len(), 1);
    }

    #[test]
    fn test_pure_joy() {
        let mut e = engine();
        for _ in 0..3 {
            e.dispatch(Action::Inflate);
        }
        assert!(e.state().achievements.contains(Achievement::PureJoy));
    }

    #[test]
    fn test_mood_change_event_and_mouth() {
        let mut e = engine();
        e.take_events();
        // 0.5 -> 0.2 hunger after three decays.
        e.tick(90.0);
        let events = e.take_events();
        assert!(events.contains(&EngineEvent::MoodChanged {
            from: Mood::Happy,
            to: Mood::Hungry
        }));
        assert_eq!(e.state().mouth, Mouth::Pout);
    }

    #[test]
    fn test_handle_input_uses_long_press_variant() {
        let config = PetConfig {
            long_press: blobpet_logic::config::LongPressMode::Inflate,
            ..PetConfig::default()
        };
        let mut e = PetEngine::init(MemoryStore::new(), config);
        e.handle_input(&InputEvent::LongPress);
        assert!(e.state().flags.is_inflated);
        assert!(!e.state().flags.is_asleep);
    }

    struct BrokenStore(MemoryStore);

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> Option<&StoredValue> {
            self.0.get(key)
        }
        fn set(&mut self, key: &str, value: StoredValue) {
            self.0.set(key, value);
        }
        fn flush(&mut self) -> Result<(), PersistError> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
    }

    #[test]
    fn test_failed_writes_do_not_disturb_state() {
        let mut e = PetEngine::init(BrokenStore(MemoryStore::new()), PetConfig::default());
        assert!(e.dispatch(Action::Feed(FoodKind::Cake)).is_applied());
        assert!(approx(e.state().needs.hunger, 0.9));
        assert_eq!(e.state().counters.total_feedings, 1);
    }
}
