//! Cooperative timers on a virtual clock.
//!
//! The clock only moves when the owner advances it with the frame delta, so
//! timeouts and intervals fire on the game thread in a fully deterministic
//! order: by due time, then by the order they were scheduled.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Timer<E> {
    id: TimerId,
    due: Duration,
    /// Set for intervals.
    period: Option<Duration>,
    event: E,
}

/// A timer that came due.  Intervals have already been re-armed by the time
/// the owner sees this, so the handler may `cancel` them.
#[derive(Clone, Debug, PartialEq)]
pub struct Fired<E> {
    pub id: TimerId,
    pub event: E,
    /// Virtual time the timer was due at.
    pub at: Duration,
}

#[derive(Clone, Debug)]
pub struct Scheduler<E> {
    now: Duration,
    next_id: u64,
    pending: Vec<Timer<E>>,
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Scheduler {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    /// Fire `event` once, `delay` from now.
    pub fn after(&mut self, delay: Duration, event: E) -> TimerId {
        self.push(delay, None, event)
    }

    /// Fire `event` every `period`, first one `period` from now.
    pub fn every(&mut self, period: Duration, event: E) -> TimerId {
        self.push(period, Some(period), event)
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time.  Call repeatedly, handling each, then `settle(until)`.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<E>> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        let timer = self.pending.swap_remove(index);
        self.now = self.now.max(timer.due);

        if let Some(period) = timer.period {
            self.pending.push(Timer {
                id: timer.id,
                due: timer.due + period,
                period: Some(period),
                event: timer.event.clone(),
            });
        }

        Some(Fired {
            id: timer.id,
            event: timer.event,
            at: timer.due,
        })
    }

    /// Move the clock forward to `until` once no more timers are due.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer {
            id,
            due: self.now + delay,
            period,
            event,
        });
        id
    }
}
