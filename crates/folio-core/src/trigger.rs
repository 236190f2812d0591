#![forbid(unsafe_code)]

//! One-shot intersection triggers.
//!
//! Reveal blocks, skill bars, and statistic counters all share the same
//! activation rule: the first qualifying intersection sample fires the
//! element, and nothing ever un-fires it.
//!
//! # Invariants
//!
//! 1. The fired set only grows; an element fires at most once per page life.
//! 2. A sample qualifies iff it reports intersection and its visible ratio
//!    reaches the threshold (within [`RATIO_TOLERANCE`]).
//! 3. Samples for elements that were never registered are ignored.

use std::collections::BTreeSet;

use crate::geometry::ElementId;

/// Slack absorbed when comparing a reported ratio against the threshold.
///
/// Browsers report ratios such as `0.19999` for an element sitting exactly at
/// a 20% threshold.
pub const RATIO_TOLERANCE: f64 = 1e-3;

/// Which behaviour an element participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TriggerKind {
    /// `.reveal` blocks gaining the `visible` class.
    Reveal,
    /// `.skill-progress` bars filled to their `data-percent`.
    SkillBar,
    /// `.stat-number` counters animated to their `data-target`.
    Counter,
}

impl TriggerKind {
    /// All kinds, in wiring order.
    pub const ALL: [Self; 3] = [Self::Reveal, Self::SkillBar, Self::Counter];

    /// Stable label for logs and host bindings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reveal => "reveal",
            Self::SkillBar => "skill_bar",
            Self::Counter => "counter",
        }
    }
}

/// One intersection observation delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionSample {
    pub element: ElementId,
    /// Visible fraction of the element's area, 0.0–1.0.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionSample {
    #[must_use]
    pub const fn new(element: ElementId, ratio: f64, is_intersecting: bool) -> Self {
        Self {
            element,
            ratio,
            is_intersecting,
        }
    }

    /// Whether this sample meets `threshold`.
    #[must_use]
    pub fn qualifies(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio + RATIO_TOLERANCE >= threshold
    }
}

/// Result of a sample firing an element for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub kind: TriggerKind,
    pub element: ElementId,
}

/// The one-shot trigger state for one [`TriggerKind`].
#[derive(Debug, Clone)]
pub struct OneShotSet {
    kind: TriggerKind,
    threshold: f64,
    registered: BTreeSet<ElementId>,
    fired: BTreeSet<ElementId>,
}

impl OneShotSet {
    #[must_use]
    pub fn new(kind: TriggerKind, threshold: f64) -> Self {
        Self {
            kind,
            threshold,
            registered: BTreeSet::new(),
            fired: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TriggerKind {
        self.kind
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Start tracking an element.
    pub fn register(&mut self, element: ElementId) {
        self.registered.insert(element);
    }

    /// Offer a sample; returns the activation if this is the element's first
    /// qualifying one.
    pub fn offer(&mut self, sample: &IntersectionSample) -> Option<Activation> {
        if !self.registered.contains(&sample.element) || !sample.qualifies(self.threshold) {
            return None;
        }
        self.fire(sample.element)
    }

    /// Fire every registered element that has not fired yet.
    ///
    /// Used when the host cannot observe intersections at all, so content is
    /// never left permanently hidden.
    pub fn fire_all(&mut self) -> Vec<Activation> {
        let pending: Vec<ElementId> = self.pending().collect();
        pending.into_iter().filter_map(|el| self.fire(el)).collect()
    }

    fn fire(&mut self, element: ElementId) -> Option<Activation> {
        if !self.fired.insert(element) {
            return None;
        }
        tracing::trace!(kind = self.kind.label(), %element, "one-shot trigger fired");
        Some(Activation {
            kind: self.kind,
            element,
        })
    }

    #[must_use]
    pub fn is_fired(&self, element: ElementId) -> bool {
        self.fired.contains(&element)
    }

    /// Registered elements that have not fired, in handle order.
    pub fn pending(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.registered.difference(&self.fired).copied()
    }

    #[must_use]
    pub fn registered_len(&self) -> usize {
        self.registered.len()
    }

    #[must_use]
    pub fn fired_len(&self) -> usize {
        self.fired.len()
    }
}
