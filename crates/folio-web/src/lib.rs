#![forbid(unsafe_code)]

//! `folio-web` drives the portfolio page's behaviour from host events.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes scroll, resize,
//!   click, submit, and intersection events into a [`PageController`].
//! - **Deterministic time**: the host advances a monotonic clock explicitly;
//!   every delayed action lives in one scheduler.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The DOM itself sits behind [`PageHost`]. `folio-wasm` implements it with
//! `web-sys`; [`MemoryHost`] implements it in memory for tests and native
//! embedders.

pub mod host;
pub mod memory_host;
pub mod page;

use core::time::Duration;

pub use host::{Hook, PageHost};
pub use memory_host::{MemoryElement, MemoryHost};
pub use page::{ClickResponse, PageController, PageTask};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Earlier times are ignored.
    pub fn set(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}
