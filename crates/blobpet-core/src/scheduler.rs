//! Timer scheduler - one-shot and repeating timers keyed by logical token.
//!
//! Tokens name a transition ("sleep-restore", "tap-idle"), not a callback.
//! At most one timer per token is live: scheduling a token that is already
//! pending replaces the old timer. The engine drains due timers one at a
//! time with [`Scheduler::pop_due`], so anything a fired timer schedules or
//! cancels is seen by the rest of the same tick.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Timer {
    due: f64,
    interval: Option<f64>,
    /// Scheduling order, breaks ties between timers due at the same instant.
    seq: u64,
}

/// Deterministic timer wheel over simulation seconds.
#[derive(Debug, Clone)]
pub struct Scheduler<K: Ord + Copy> {
    now: f64,
    next_seq: u64,
    timers: BTreeMap<K, Timer>,
}

impl<K: Ord + Copy> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Copy> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            timers: BTreeMap::new(),
        }
    }

    /// Current scheduler time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Fire `token` once, `delay` seconds from now. Replaces any live timer.
    pub fn schedule_once(&mut self, token: K, delay: f64) {
        self.insert(token, delay.max(0.0), None);
    }

    /// Fire `token` every `interval` seconds, first firing one interval from now.
    pub fn schedule_repeating(&mut self, token: K, interval: f64) {
        let interval = interval.max(f64::EPSILON);
        self.insert(token, interval, Some(interval));
    }

    /// Cancel a live timer. Returns whether one was pending.
    pub fn cancel(&mut self, token: K) -> bool {
        self.timers.remove(&token).is_some()
    }

    pub fn is_pending(&self, token: K) -> bool {
        self.timers.contains_key(&token)
    }

    /// Seconds until `token` fires, if pending.
    pub fn remaining(&self, token: K) -> Option<f64> {
        self.timers.get(&token).map(|t| (t.due - self.now).max(0.0))
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time. Repeating timers are re-armed before returning.
    ///
    /// Returns `None` once nothing is due; the caller then calls
    /// [`Scheduler::advance_to`] to settle the clock at `until`.
    pub fn pop_due(&mut self, until: f64) -> Option<K> {
        let (token, timer) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= until)
            .min_by(|a, b| {
                a.1.due
                    .partial_cmp(&b.1.due)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.1.seq.cmp(&b.1.seq))
            })
            .map(|(k, t)| (*k, *t))?;

        self.now = self.now.max(timer.due);
        match timer.interval {
            Some(interval) => {
                let seq = self.bump_seq();
                self.timers.insert(
                    token,
                    Timer {
                        due: timer.due + interval,
                        interval: Some(interval),
                        seq,
                    },
                );
            }
            None => {
                self.timers.remove(&token);
            }
        }
        Some(token)
    }

    /// Move the clock forward without firing anything.
    pub fn advance_to(&mut self, until: f64) {
        self.now = self.now.max(until);
    }

    fn insert(&mut self, token: K, delay: f64, interval: Option<f64>) {
        let seq = self.bump_seq();
        self.timers.insert(
            token,
            Timer {
                due: self.now + delay,
                interval,
                seq,
            },
        );
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum T {
        A,
        B,
        Tick,
    }

    fn drain(s: &mut Scheduler<T>, until: f64) -> Vec<(T, f64)> {
        let mut out = Vec::new();
        while let Some(t) = s.pop_due(until) {
            out.push((t, s.now()));
        }
        s.advance_to(until);
        out
    }

    #[test]
    fn test_once_fires_once() {
        let mut s = Scheduler::new();
        s.schedule_once(T::A, 1.0);
        assert!(drain(&mut s, 0.5).is_empty());
        assert_eq!(drain(&mut s, 1.0), vec![(T::A, 1.0)]);
        assert!(drain(&mut s, 10.0).is_empty());
        assert!(!s.is_pending(T::A));
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule_once(T::B, 2.0);
        s.schedule_once(T::A, 1.0);
        let fired: Vec<T> = drain(&mut s, 5.0).into_iter().map(|(t, _)| t).collect();
        assert_eq!(fired, vec![T::A, T::B]);
    }

    #[test]
    fn test_ties_break_by_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule_once(T::B, 1.0);
        s.schedule_once(T::A, 1.0);
        let fired: Vec<T> = drain(&mut s, 1.0).into_iter().map(|(t, _)| t).collect();
        assert_eq!(fired, vec![T::B, T::A]);
    }

    #[test]
    fn test_repeating_catches_up_within_one_advance() {
        let mut s = Scheduler::new();
        s.schedule_repeating(T::Tick, 5.0);
        let fired = drain(&mut s, 16.0);
        assert_eq!(fired, vec![(T::Tick, 5.0), (T::Tick, 10.0), (T::Tick, 15.0)]);
        assert_eq!(s.remaining(T::Tick), Some(4.0));
    }

    #[test]
    fn test_reschedule_replaces_live_timer() {
        let mut s = Scheduler::new();
        s.schedule_once(T::A, 3.0);
        s.advance_to(2.0);
        s.schedule_once(T::A, 3.0);
        assert_eq!(s.pending_count(), 1);
        assert!(drain(&mut s, 4.0).is_empty());
        assert_eq!(drain(&mut s, 5.0), vec![(T::A, 5.0)]);
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        s.schedule_repeating(T::Tick, 1.0);
        assert!(s.cancel(T::Tick));
        assert!(!s.cancel(T::Tick));
        assert!(drain(&mut s, 10.0).is_empty());
    }

    #[test]
    fn test_cancel_between_pops_is_honoured() {
        let mut s = Scheduler::new();
        s.schedule_once(T::A, 1.0);
        s.schedule_once(T::B, 2.0);
        assert_eq!(s.pop_due(3.0), Some(T::A));
        s.cancel(T::B);
        assert_eq!(s.pop_due(3.0), None);
    }

    #[test]
    fn test_schedule_relative_to_fire_time() {
        let mut s = Scheduler::new();
        s.schedule_once(T::A, 1.0);
        assert_eq!(s.pop_due(10.0), Some(T::A));
        // A follow-up scheduled from inside the callback is relative to 1.0, not 10.0.
        s.schedule_once(T::B, 2.0);
        assert_eq!(s.pop_due(10.0), Some(T::B));
        assert_eq!(s.now(), 3.0);
    }
}
