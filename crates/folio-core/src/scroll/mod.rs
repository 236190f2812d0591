#![forbid(unsafe_code)]

//! Scroll-state aggregation.
//!
//! Every behaviour that depends on scroll position or viewport intersection
//! is derived here so the results stay mutually consistent:
//!
//! - [`active_section`]: which navigation section is active,
//! - [`progress`]: the scroll-progress percentage,
//! - [`back_to_top`]: visibility of the back-to-top control,
//! - one-shot reveal / skill-bar / counter activation via
//!   [`crate::trigger::OneShotSet`].
//!
//! # Design
//!
//! The aggregator owns no layout. Each scroll tick the caller passes fresh
//! [`ScrollMetrics`] and section descriptors read from live layout, and gets
//! back a [`ScrollUpdate`]. Intersection samples go through
//! [`ScrollStateAggregator::on_intersection`].

pub mod active_section;
pub mod back_to_top;
pub mod progress;

pub use active_section::{ActiveSectionTracker, SectionDescriptor, select_active_section};
pub use back_to_top::{BackToTop, back_to_top_visible};
pub use progress::{progress_width, scroll_progress};

use crate::config::PageConfig;
use crate::geometry::ElementId;
use crate::trigger::{Activation, IntersectionSample, OneShotSet, TriggerKind};

/// Viewport position and document extent for one scroll tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Vertical scroll offset.
    pub scroll_y: f64,
    /// Viewport height.
    pub viewport_height: f64,
    /// Full document height.
    pub document_height: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(scroll_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_height,
            document_height,
        }
    }

    /// Document height minus viewport height; may be zero or negative.
    #[must_use]
    pub fn scrollable_height(&self) -> f64 {
        self.document_height - self.viewport_height
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        scroll_progress(self.scroll_y, self.document_height, self.viewport_height)
    }
}

/// Everything derived from one scroll tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollUpdate {
    pub active_section: Option<String>,
    pub active_changed: bool,
    pub progress_percent: f64,
    pub back_to_top_visible: bool,
    pub back_to_top_changed: bool,
}

/// Derives scroll-driven page state and one-shot activations.
#[derive(Debug, Clone)]
pub struct ScrollStateAggregator {
    active: ActiveSectionTracker,
    back_to_top: BackToTop,
    reveal: OneShotSet,
    skill_bars: OneShotSet,
    counters: OneShotSet,
    ticks: u64,
}

impl ScrollStateAggregator {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            active: ActiveSectionTracker::new(config.scroll.active_header_offset_px),
            back_to_top: BackToTop::new(config.scroll.back_to_top_threshold_px),
            reveal: OneShotSet::new(
                TriggerKind::Reveal,
                config.triggers.threshold(TriggerKind::Reveal),
            ),
            skill_bars: OneShotSet::new(
                TriggerKind::SkillBar,
                config.triggers.threshold(TriggerKind::SkillBar),
            ),
            counters: OneShotSet::new(
                TriggerKind::Counter,
                config.triggers.threshold(TriggerKind::Counter),
            ),
            ticks: 0,
        }
    }

    /// Derive state for one scroll tick.
    ///
    /// `sections` must be in document order.
    pub fn on_scroll(
        &mut self,
        metrics: &ScrollMetrics,
        sections: &[SectionDescriptor],
    ) -> ScrollUpdate {
        self.ticks = self.ticks.saturating_add(1);
        let active_changed = self.active.update(sections, metrics.scroll_y);
        let back_to_top_changed = self.back_to_top.update(metrics.scroll_y);
        ScrollUpdate {
            active_section: self.active.current().map(str::to_owned),
            active_changed,
            progress_percent: metrics.progress_percent(),
            back_to_top_visible: self.back_to_top.is_visible(),
            back_to_top_changed,
        }
    }

    /// Register an element with the trigger set for `kind`.
    pub fn register(&mut self, kind: TriggerKind, element: ElementId) {
        self.triggers_mut(kind).register(element);
    }

    /// Offer an intersection sample for an element of `kind`.
    pub fn on_intersection(
        &mut self,
        kind: TriggerKind,
        sample: &IntersectionSample,
    ) -> Option<Activation> {
        self.triggers_mut(kind).offer(sample)
    }

    /// Fire every pending element of `kind` without an intersection signal.
    pub fn fire_all(&mut self, kind: TriggerKind) -> Vec<Activation> {
        self.triggers_mut(kind).fire_all()
    }

    #[must_use]
    pub fn triggers(&self, kind: TriggerKind) -> &OneShotSet {
        match kind {
            TriggerKind::Reveal => &self.reveal,
            TriggerKind::SkillBar => &self.skill_bars,
            TriggerKind::Counter => &self.counters,
        }
    }

    fn triggers_mut(&mut self, kind: TriggerKind) -> &mut OneShotSet {
        match kind {
            TriggerKind::Reveal => &mut self.reveal,
            TriggerKind::SkillBar => &mut self.skill_bars,
            TriggerKind::Counter => &mut self.counters,
        }
    }

    #[must_use]
    pub fn active_section(&self) -> Option<&str> {
        self.active.current()
    }

    #[must_use]
    pub const fn back_to_top_visible(&self) -> bool {
        self.back_to_top.is_visible()
    }

    /// Scroll ticks processed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}
