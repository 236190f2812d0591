#![forbid(unsafe_code)]

//! Host capability boundary.
//!
//! [`PageHost`] is everything the page controller needs from a document:
//! element lookup by [`Hook`], layout reads, environment reads, visual
//! writes, and intersection subscriptions. Elements are opaque
//! [`ElementId`] handles issued by the host.
//!
//! # Invariants
//!
//! 1. A host returns the same [`ElementId`] for the same element on every
//!    query.
//! 2. `query_all` and `query_within` return elements in document order.
//! 3. Writes to a removed or unknown element are silently ignored.

use folio_core::footer::WallClock;
use folio_core::navigation::ScrollRequest;
use folio_core::ripple::RippleGeometry;
use folio_core::{ElementId, Rect, ScrollMetrics, TriggerKind};

/// Named element hooks the page behaviours attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hook {
    NavLink,
    ScrollButton,
    SidebarToggle,
    Nav,
    Section,
    Reveal,
    SkillBar,
    StatCounter,
    ProgressBar,
    BackToTop,
    ContactForm,
    FormMessage,
    Year,
    Carousel,
    CarouselSlide,
    ProjectCard,
    CarouselPrev,
    CarouselNext,
    TypingText,
    RippleButton,
    ResumeButton,
}

impl Hook {
    pub const ALL: [Self; 21] = [
        Self::NavLink,
        Self::ScrollButton,
        Self::SidebarToggle,
        Self::Nav,
        Self::Section,
        Self::Reveal,
        Self::SkillBar,
        Self::StatCounter,
        Self::ProgressBar,
        Self::BackToTop,
        Self::ContactForm,
        Self::FormMessage,
        Self::Year,
        Self::Carousel,
        Self::CarouselSlide,
        Self::ProjectCard,
        Self::CarouselPrev,
        Self::CarouselNext,
        Self::TypingText,
        Self::RippleButton,
        Self::ResumeButton,
    ];

    /// CSS selector matching the hook in the page markup.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::NavLink => ".nav-link",
            Self::ScrollButton => "[data-scroll-target]",
            Self::SidebarToggle => ".sidebar-toggle",
            Self::Nav => ".nav",
            Self::Section => "section[id]",
            Self::Reveal => ".reveal",
            Self::SkillBar => ".skill-progress",
            Self::StatCounter => ".stat-number",
            Self::ProgressBar => "#scroll-progress",
            Self::BackToTop => "#back-to-top",
            Self::ContactForm => "#contact-form",
            Self::FormMessage => "#form-message",
            Self::Year => "#year",
            Self::Carousel => "[data-carousel]",
            Self::CarouselSlide => ".project-slide",
            Self::ProjectCard => ".project-card",
            Self::CarouselPrev => "[data-carousel-prev]",
            Self::CarouselNext => "[data-carousel-next]",
            Self::TypingText => "#typing-text",
            Self::RippleButton => ".btn.ripple",
            Self::ResumeButton => "#resume-btn",
        }
    }

    /// Hook whose elements feed a one-shot trigger kind.
    #[must_use]
    pub const fn for_trigger(kind: TriggerKind) -> Self {
        match kind {
            TriggerKind::Reveal => Self::Reveal,
            TriggerKind::SkillBar => Self::SkillBar,
            TriggerKind::Counter => Self::StatCounter,
        }
    }
}

/// Document capabilities used by [`crate::PageController`].
pub trait PageHost {
    // --- queries ---

    /// Every element matching `hook`, in document order.
    fn query_all(&mut self, hook: Hook) -> Vec<ElementId>;

    /// First element matching `hook`.
    fn query(&mut self, hook: Hook) -> Option<ElementId> {
        self.query_all(hook).into_iter().next()
    }

    /// Descendants of `root` matching `hook`, in document order.
    fn query_within(&mut self, root: ElementId, hook: Hook) -> Vec<ElementId>;

    /// `element` itself or its nearest ancestor matching `hook`.
    fn closest(&mut self, element: ElementId, hook: Hook) -> Option<ElementId>;

    /// First element matching an arbitrary selector such as `#about`.
    fn query_selector(&mut self, selector: &str) -> Option<ElementId>;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Current value of the named control inside a form.
    fn field_value(&self, form: ElementId, name: &str) -> Option<String>;

    // --- layout and environment ---

    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Border box in viewport coordinates.
    fn element_rect(&self, element: ElementId) -> Option<Rect>;

    fn prefers_reduced_motion(&self) -> bool;

    /// Whether [`PageHost::observe`] can deliver intersection samples.
    fn supports_intersection_observer(&self) -> bool;

    fn wall_clock(&self) -> WallClock;

    // --- writes ---

    fn set_class(&mut self, element: ElementId, class: &str, on: bool);

    /// Replace the whole class attribute.
    fn set_class_name(&mut self, element: ElementId, class_name: &str);

    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    fn set_text(&mut self, element: ElementId, text: &str);

    fn set_inner_html(&mut self, element: ElementId, html: &str);

    fn scroll_to(&mut self, request: ScrollRequest);

    fn navigate(&mut self, url: &str);

    /// Append a ripple span to `parent`; returns its handle.
    fn spawn_ripple(&mut self, parent: ElementId, geometry: &RippleGeometry)
    -> Option<ElementId>;

    fn remove_element(&mut self, element: ElementId);

    // --- intersection ---

    /// Start delivering intersection samples for `element` at `threshold`.
    fn observe(&mut self, kind: TriggerKind, element: ElementId, threshold: f64);

    fn unobserve(&mut self, kind: TriggerKind, element: ElementId);
}
