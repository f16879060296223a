//! Timer scheduling for the state machine.
//!
//! The machine never owns a real clock. It asks a [`Scheduler`] to deliver a
//! [`Timer`] later, and the driver feeds delivered timers back through
//! `GameStateMachine::fire`. [`TimerQueue`] is a virtual clock: the browser
//! advances it from frame timestamps, tests advance it by hand.

use super::state::CardId;

/// Something the machine asked to be woken up for. Every timer carries the
/// generation of the round that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    Countdown { round: u64 },
    MismatchReveal { round: u64, first: CardId, second: CardId },
    VictoryGrace { round: u64 },
}

impl Timer {
    pub fn round(&self) -> u64 {
        match *self {
            Timer::Countdown { round }
            | Timer::MismatchReveal { round, .. }
            | Timer::VictoryGrace { round } => round,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

pub trait Scheduler {
    /// Deliver `timer` once, `delay_ms` from now.
    fn schedule_once(&mut self, delay_ms: u64, timer: Timer) -> TimerHandle;
    /// Deliver `timer` every `interval_ms` until cancelled.
    fn schedule_repeating(&mut self, interval_ms: u64, timer: Timer) -> TimerHandle;
    /// Returns false if the handle was unknown or already spent.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

#[derive(Clone, Debug)]
struct Entry {
    handle: TimerHandle,
    due_ms: u64,
    interval_ms: Option<u64>,
    timer: Timer,
}

/// Deterministic scheduler driven by explicit time advances.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_handle: u64,
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Pop the earliest timer due at or before `until_ms` and move the clock
    /// to its due time. Ties fire in scheduling order. Repeating timers are
    /// re-armed for their next interval.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Timer> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.handle.0))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[idx];
        self.now_ms = self.now_ms.max(entry.due_ms);
        let timer = entry.timer;
        match entry.interval_ms {
            Some(interval) => entry.due_ms += interval,
            None => {
                self.entries.remove(idx);
            }
        }
        Some(timer)
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn push(&mut self, delay_ms: u64, interval_ms: Option<u64>, timer: Timer) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            due_ms: self.now_ms + delay_ms,
            interval_ms,
            timer,
        });
        handle
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&mut self, delay_ms: u64, timer: Timer) -> TimerHandle {
        self.push(delay_ms, None, timer)
    }

    fn schedule_repeating(&mut self, interval_ms: u64, timer: Timer) -> TimerHandle {
        // A zero interval would re-fire forever within a single advance.
        let interval = interval_ms.max(1);
        self.push(interval, Some(interval), timer)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Timer = Timer::Countdown { round: 1 };
    const GRACE: Timer = Timer::VictoryGrace { round: 1 };

    fn drain(q: &mut TimerQueue, until: u64) -> Vec<(u64, Timer)> {
        let mut fired = Vec::new();
        while let Some(t) = q.pop_due(until) {
            fired.push((q.now_ms(), t));
        }
        q.set_now(until);
        fired
    }

    #[test]
    fn once_fires_at_delay_then_is_gone() {
        let mut q = TimerQueue::new();
        q.schedule_once(1000, GRACE);
        assert!(drain(&mut q, 999).is_empty());
        assert_eq!(drain(&mut q, 1000), vec![(1000, GRACE)]);
        assert_eq!(q.pending(), 0);
        assert!(drain(&mut q, 5000).is_empty());
    }

    #[test]
    fn repeating_fires_every_interval() {
        let mut q = TimerQueue::new();
        q.schedule_repeating(1000, TICK);
        let fired = drain(&mut q, 3500);
        assert_eq!(fired, vec![(1000, TICK), (2000, TICK), (3000, TICK)]);
        assert_eq!(q.pending(), 1);
    }

    #[test]
    fn cancel_stops_repeating() {
        let mut q = TimerQueue::new();
        let h = q.schedule_repeating(1000, TICK);
        drain(&mut q, 1000);
        assert!(q.cancel(h));
        assert!(!q.is_scheduled(h));
        assert!(drain(&mut q, 10_000).is_empty());
        assert!(!q.cancel(h));
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule_repeating(1000, TICK);
        q.schedule_once(1000, GRACE);
        assert_eq!(drain(&mut q, 1000), vec![(1000, TICK), (1000, GRACE)]);
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut q = TimerQueue::new();
        drain(&mut q, 2500);
        q.schedule_once(1000, GRACE);
        assert!(drain(&mut q, 3499).is_empty());
        assert_eq!(drain(&mut q, 3500), vec![(3500, GRACE)]);
    }

    #[test]
    fn zero_interval_does_not_spin() {
        let mut q = TimerQueue::new();
        q.schedule_repeating(0, TICK);
        assert_eq!(drain(&mut q, 3).len(), 3);
    }

    #[test]
    fn clock_never_goes_backwards() {
        let mut q = TimerQueue::new();
        q.set_now(500);
        q.set_now(100);
        assert_eq!(q.now_ms(), 500);
    }

    #[test]
    fn timer_round_accessor() {
        let t = Timer::MismatchReveal {
            round: 7,
            first: CardId(0),
            second: CardId(2),
        };
        assert_eq!(t.round(), 7);
        assert_eq!(TICK.round(), 1);
    }
}
