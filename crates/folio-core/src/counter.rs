#![forbid(unsafe_code)]

//! Statistic counter animation.
//!
//! A [`CounterAnimation`] counts a displayed integer from 0 up to a target
//! with a fixed increment per tick. It is a plain state machine: the caller
//! (normally the page scheduler) asks for [`CounterAnimation::next_deadline`]
//! and calls [`CounterAnimation::step`] when that time arrives.
//!
//! # Invariants
//!
//! 1. The displayed value never decreases.
//! 2. The displayed value never exceeds the target.
//! 3. The last frame shows exactly the target; no overshoot.
//! 4. `step()` on an idle or finished animation is a no-op.
//!
//! # Failure Modes
//!
//! - Zero tick: clamped to 1ms.
//! - Duration shorter than one tick: the counter completes on its first step.

use core::time::Duration;

/// Targets at or above this value display a trailing `+`.
pub const PLUS_SUFFIX_MIN: u64 = 10;

/// Duration and tick interval of a counter animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterTiming {
    duration: Duration,
    tick: Duration,
}

impl CounterTiming {
    #[must_use]
    pub fn new(duration: Duration, tick: Duration) -> Self {
        Self {
            duration,
            tick: if tick.is_zero() {
                Duration::from_millis(1)
            } else {
                tick
            },
        }
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn tick(&self) -> Duration {
        self.tick
    }

    /// Number of ticks the duration is divided into (at least 1).
    #[must_use]
    pub fn steps(&self) -> f64 {
        (self.duration.as_secs_f64() / self.tick.as_secs_f64()).max(1.0)
    }
}

impl Default for CounterTiming {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000), Duration::from_millis(16))
    }
}

/// Lifecycle of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPhase {
    /// Created but not started.
    Idle,
    /// Counting; a step is due at `next_deadline`.
    Running,
    /// Pinned at the target.
    Finished,
}

/// One rendered step of a counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterFrame {
    pub value: u64,
    pub text: String,
    pub finished: bool,
}

/// Linear 0 → target count-up.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: u64,
    increment: f64,
    current: f64,
    tick: Duration,
    phase: CounterPhase,
    next_deadline: Option<Duration>,
}

impl CounterAnimation {
    #[must_use]
    pub fn new(target: u64, timing: CounterTiming) -> Self {
        Self {
            target,
            increment: target as f64 / timing.steps(),
            current: 0.0,
            tick: timing.tick(),
            phase: CounterPhase::Idle,
            next_deadline: None,
        }
    }

    /// Start counting; the first step is due one tick after `now`.
    pub fn start(&mut self, now: Duration) {
        if self.phase != CounterPhase::Idle {
            return;
        }
        self.phase = CounterPhase::Running;
        self.next_deadline = Some(now.saturating_add(self.tick));
    }

    /// Advance one tick at time `now`.
    ///
    /// Returns `None` unless the animation is running.
    pub fn step(&mut self, now: Duration) -> Option<CounterFrame> {
        if self.phase != CounterPhase::Running {
            return None;
        }
        self.current += self.increment;
        if self.current >= self.target as f64 {
            self.current = self.target as f64;
            self.phase = CounterPhase::Finished;
            self.next_deadline = None;
        } else {
            self.next_deadline = Some(now.saturating_add(self.tick));
        }
        Some(self.frame())
    }

    /// Run steps for every deadline at or before `now`.
    ///
    /// Returns the latest frame produced, if any.
    pub fn advance_to(&mut self, now: Duration) -> Option<CounterFrame> {
        let mut last = None;
        while let Some(deadline) = self.next_deadline.filter(|d| *d <= now) {
            last = self.step(deadline);
        }
        last
    }

    #[must_use]
    pub fn frame(&self) -> CounterFrame {
        let value = self.value();
        CounterFrame {
            value,
            text: format_counter(value, self.target),
            finished: self.phase == CounterPhase::Finished,
        }
    }

    /// Displayed integer (floor of the running value).
    #[must_use]
    pub fn value(&self) -> u64 {
        (self.current.floor() as u64).min(self.target)
    }

    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }

    #[must_use]
    pub const fn phase(&self) -> CounterPhase {
        self.phase
    }

    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        self.next_deadline
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == CounterPhase::Finished
    }
}

/// Counter text: the value, plus `+` when the target is at least 10.
#[must_use]
pub fn format_counter(value: u64, target: u64) -> String {
    if target >= PLUS_SUFFIX_MIN {
        format!("{value}+")
    } else {
        value.to_string()
    }
}
