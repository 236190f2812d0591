#![forbid(unsafe_code)]

//! Deterministic timer scheduler.
//!
//! Every delayed action on the page (counter ticks, typing steps, banner
//! dismissal, the mailto hand-off, ripple cleanup) is one entry in a single
//! [`Scheduler`]. Time never advances on its own: the host reports the
//! current monotonic time and drains due tasks with [`Scheduler::pop_due`].
//!
//! # Invariants
//!
//! 1. Tasks pop in deadline order; equal deadlines pop in scheduling order.
//! 2. A cancelled task never pops.
//! 3. A task scheduled while draining pops in the same drain if it is
//!    already due.

use core::cmp::Reverse;
use core::time::Duration;
use std::collections::{BinaryHeap, HashMap};

/// Handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One-shot task queue keyed by deadline.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BinaryHeap<Reverse<(Duration, TimerId)>>,
    tasks: HashMap<TimerId, T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BinaryHeap::new(),
            tasks: HashMap::new(),
        }
    }

    /// Latest time reported by the host.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Move the scheduler clock forward. Earlier times are ignored.
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Schedule `task` at an absolute deadline.
    pub fn schedule_at(&mut self, deadline: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push(Reverse((deadline, id)));
        self.tasks.insert(id, task);
        id
    }

    /// Schedule `task` `delay` after the current time.
    pub fn schedule_after(&mut self, delay: Duration, task: T) -> TimerId {
        self.schedule_at(self.now.saturating_add(delay), task)
    }

    /// Cancel a pending task. Returns it if it had not run yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.tasks.remove(&id)
    }

    /// Pop the earliest task due at or before `now`, with its deadline.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        self.set_now(now);
        while let Some(&Reverse((deadline, id))) = self.queue.peek() {
            if deadline > now {
                return None;
            }
            self.queue.pop();
            if let Some(task) = self.tasks.remove(&id) {
                return Some((deadline, task));
            }
        }
        None
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&mut self) -> Option<Duration> {
        while let Some(&Reverse((deadline, id))) = self.queue.peek() {
            if self.tasks.contains_key(&id) {
                return Some(deadline);
            }
            self.queue.pop();
        }
        None
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drain(s: &mut Scheduler<&'static str>, now: Duration) -> Vec<&'static str> {
        let mut out = Vec::new();
        while let Some((_, task)) = s.pop_due(now) {
            out.push(task);
        }
        out
    }

    #[test]
    fn pops_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule_at(ms(30), "c");
        s.schedule_at(ms(10), "a");
        s.schedule_at(ms(20), "b");
        assert_eq!(drain(&mut s, ms(25)), vec!["a", "b"]);
        assert_eq!(s.next_deadline(), Some(ms(30)));
        assert_eq!(drain(&mut s, ms(30)), vec!["c"]);
        assert!(s.is_empty());
    }

    #[test]
    fn equal_deadlines_keep_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule_at(ms(5), "first");
        s.schedule_at(ms(5), "second");
        assert_eq!(drain(&mut s, ms(5)), vec!["first", "second"]);
    }

    #[test]
    fn cancelled_tasks_never_pop() {
        let mut s = Scheduler::new();
        let id = s.schedule_at(ms(5), "gone");
        s.schedule_at(ms(6), "kept");
        assert_eq!(s.cancel(id), Some("gone"));
        assert_eq!(s.cancel(id), None);
        assert_eq!(s.next_deadline(), Some(ms(6)));
        assert_eq!(drain(&mut s, ms(10)), vec!["kept"]);
    }

    #[test]
    fn schedule_after_uses_reported_now() {
        let mut s = Scheduler::new();
        assert_eq!(s.pop_due(ms(100)), None);
        s.schedule_after(ms(16), "tick");
        assert_eq!(s.next_deadline(), Some(ms(116)));
    }

    #[test]
    fn clock_never_goes_backwards() {
        let mut s: Scheduler<()> = Scheduler::new();
        s.set_now(ms(50));
        s.set_now(ms(10));
        assert_eq!(s.now(), ms(50));
    }

    #[test]
    fn tasks_scheduled_while_draining_can_pop() {
        let mut s = Scheduler::new();
        s.schedule_at(ms(0), 0u32);
        let mut seen = Vec::new();
        while let Some((at, n)) = s.pop_due(ms(40)) {
            seen.push(n);
            if n < 10 {
                s.schedule_at(at + ms(16), n + 1);
            }
        }
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(s.next_deadline(), Some(ms(48)));
    }

    #[test]
    fn clear_drops_everything() {
        let mut s = Scheduler::new();
        s.schedule_at(ms(1), "x");
        s.clear();
        assert_eq!(s.len(), 0);
        assert_eq!(s.next_deadline(), None);
    }
}
