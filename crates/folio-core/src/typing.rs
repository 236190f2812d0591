#![forbid(unsafe_code)]

//! Typing-text effect.
//!
//! Cycles through a list of phrases, typing each one character by character,
//! holding it, deleting it, pausing, and moving on to the next phrase. The
//! loop never ends on its own; the owner stops stepping it on teardown.
//!
//! # Invariants
//!
//! 1. The rendered text is always a prefix of the current phrase.
//! 2. Each step changes the prefix length by exactly one character.
//! 3. The delay after a step is `hold` when the phrase just completed, `gap`
//!    when it was just fully deleted, and the type/delete delay otherwise.

use core::time::Duration;

/// Per-step delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingTiming {
    pub type_delay: Duration,
    pub delete_delay: Duration,
    pub hold_delay: Duration,
    pub gap_delay: Duration,
}

impl Default for TypingTiming {
    fn default() -> Self {
        Self {
            type_delay: Duration::from_millis(100),
            delete_delay: Duration::from_millis(50),
            hold_delay: Duration::from_millis(2000),
            gap_delay: Duration::from_millis(500),
        }
    }
}

/// Direction of the typing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    Typing,
    Deleting,
}

/// Output of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingFrame {
    pub text: String,
    /// Delay until the next step.
    pub delay: Duration,
}

/// Typing loop state machine.
#[derive(Debug, Clone)]
pub struct TypingEffect {
    phrases: Vec<Vec<char>>,
    timing: TypingTiming,
    phrase_index: usize,
    char_index: usize,
    phase: TypingPhase,
    next_deadline: Option<Duration>,
}

impl TypingEffect {
    /// Build an effect; `None` if there is no non-empty phrase.
    #[must_use]
    pub fn new<I, S>(phrases: I, timing: TypingTiming) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases: Vec<Vec<char>> = phrases
            .into_iter()
            .map(|p| p.as_ref().chars().collect::<Vec<_>>())
            .filter(|p| !p.is_empty())
            .collect();
        if phrases.is_empty() {
            return None;
        }
        Some(Self {
            phrases,
            timing,
            phrase_index: 0,
            char_index: 0,
            phase: TypingPhase::Typing,
            next_deadline: None,
        })
    }

    /// Schedule the first step immediately at `now`.
    pub fn start(&mut self, now: Duration) {
        if self.next_deadline.is_none() {
            self.next_deadline = Some(now);
        }
    }

    /// Perform one step at time `now`.
    pub fn step(&mut self, now: Duration) -> TypingFrame {
        let len = self.phrases[self.phrase_index].len();
        let mut delay = match self.phase {
            TypingPhase::Deleting => {
                self.char_index = self.char_index.saturating_sub(1);
                self.timing.delete_delay
            }
            TypingPhase::Typing => {
                self.char_index = (self.char_index + 1).min(len);
                self.timing.type_delay
            }
        };
        let text = self.text();

        match self.phase {
            TypingPhase::Typing if self.char_index == len => {
                self.phase = TypingPhase::Deleting;
                delay = self.timing.hold_delay;
            }
            TypingPhase::Deleting if self.char_index == 0 => {
                self.phase = TypingPhase::Typing;
                self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
                delay = self.timing.gap_delay;
            }
            _ => {}
        }

        self.next_deadline = Some(now.saturating_add(delay));
        TypingFrame { text, delay }
    }

    /// Currently rendered prefix.
    #[must_use]
    pub fn text(&self) -> String {
        let phrase = &self.phrases[self.phrase_index];
        phrase[..self.char_index.min(phrase.len())].iter().collect()
    }

    #[must_use]
    pub const fn phase(&self) -> TypingPhase {
        self.phase
    }

    #[must_use]
    pub const fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        self.next_deadline
    }

    /// Stop the loop; no further deadline is reported.
    pub fn stop(&mut self) {
        self.next_deadline = None;
    }
}
