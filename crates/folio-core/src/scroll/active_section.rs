#![forbid(unsafe_code)]

//! Active-section selection for navigation highlighting.
//!
//! # Invariants
//!
//! 1. The selected section is the **last** one in document order whose top,
//!    minus the header compensation, is at or before the scroll offset.
//! 2. Scrolling past a section's start keeps it active until the next
//!    section's start is reached.
//! 3. No qualifying section selects nothing.

/// One content section as read from live layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDescriptor {
    /// Section identifier (`id` attribute, without `#`).
    pub id: String,
    /// Top edge in document coordinates.
    pub top: f64,
    /// Rendered height.
    pub height: f64,
}

impl SectionDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// The `href` a navigation link uses to point at this section.
    #[must_use]
    pub fn anchor(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Select the active section for `scroll_y`.
///
/// Sections are taken in the given (document) order; last match wins.
#[must_use]
pub fn select_active_section(
    sections: &[SectionDescriptor],
    scroll_y: f64,
    header_offset: f64,
) -> Option<&SectionDescriptor> {
    sections
        .iter()
        .rev()
        .find(|section| section.top - header_offset <= scroll_y)
}

/// Tracks which section is active across scroll ticks.
#[derive(Debug, Clone, Default)]
pub struct ActiveSectionTracker {
    header_offset: f64,
    current: Option<String>,
}

impl ActiveSectionTracker {
    #[must_use]
    pub fn new(header_offset: f64) -> Self {
        Self {
            header_offset,
            current: None,
        }
    }

    /// Recompute the active section. Returns `true` if it changed.
    pub fn update(&mut self, sections: &[SectionDescriptor], scroll_y: f64) -> bool {
        let next = select_active_section(sections, scroll_y, self.header_offset)
            .map(|section| section.id.clone());
        if next == self.current {
            return false;
        }
        tracing::trace!(from = ?self.current, to = ?next, "active section changed");
        self.current = next;
        true
    }

    /// Currently active section id.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    pub const fn header_offset(&self) -> f64 {
        self.header_offset
    }
}
