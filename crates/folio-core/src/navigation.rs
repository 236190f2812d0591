#![forbid(unsafe_code)]

//! Smooth-scroll navigation and the mobile sidebar.

/// Class toggled on the sidebar toggle button and the nav panel.
pub const SIDEBAR_OPEN_CLASS: &str = "is-open";

/// Class marking the navigation link of the active section.
pub const ACTIVE_LINK_CLASS: &str = "active";

/// How the host should scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Native smooth scrolling.
    Smooth,
    /// Instant jump.
    Auto,
}

impl ScrollBehavior {
    /// Smooth unless the visitor prefers reduced motion.
    #[must_use]
    pub const fn for_motion_preference(prefers_reduced_motion: bool) -> Self {
        if prefers_reduced_motion {
            Self::Auto
        } else {
            Self::Smooth
        }
    }

    /// CSSOM `ScrollBehavior` keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Auto => "auto",
        }
    }
}

/// A scroll request for the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    /// Scroll so an element whose document top is `target_top` sits just
    /// below a header of `header_offset` pixels.
    #[must_use]
    pub fn to_anchor(target_top: f64, header_offset: f64, prefers_reduced_motion: bool) -> Self {
        Self {
            top: (target_top - header_offset).max(0.0),
            behavior: ScrollBehavior::for_motion_preference(prefers_reduced_motion),
        }
    }

    #[must_use]
    pub const fn to_top(prefers_reduced_motion: bool) -> Self {
        Self {
            top: 0.0,
            behavior: ScrollBehavior::for_motion_preference(prefers_reduced_motion),
        }
    }
}

/// Fragment selector (`#id`) of an in-page link, if it is one.
///
/// A bare `#` or an external URL yields `None`.
#[must_use]
pub fn anchor_selector(href: &str) -> Option<&str> {
    let href = href.trim();
    (href.len() > 1 && href.starts_with('#')).then_some(href)
}

/// Open/closed state of the mobile sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SidebarState {
    open: bool,
}

impl SidebarState {
    /// Flip the state; returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Close; returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        std::mem::take(&mut self.open)
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }
}
