#![forbid(unsafe_code)]

//! In-memory [`PageHost`].
//!
//! A flat element table with parent links, enough to model the portfolio
//! markup without a browser. Every write is recorded so tests can assert on
//! the resulting document state, the scroll requests issued, and the
//! navigations attempted.

use std::collections::BTreeMap;

use folio_core::footer::WallClock;
use folio_core::navigation::ScrollRequest;
use folio_core::ripple::{RIPPLE_CLASS, RippleGeometry};
use folio_core::{ElementId, Rect, ScrollMetrics, TriggerKind};

use crate::host::{Hook, PageHost};

/// One element in a [`MemoryHost`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryElement {
    hooks: Vec<Hook>,
    parent: Option<ElementId>,
    attributes: BTreeMap<String, String>,
    fields: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    inner_html: String,
    rect: Rect,
    removed: bool,
}

impl MemoryElement {
    /// Element matching the given hooks.
    #[must_use]
    pub fn new(hooks: impl IntoIterator<Item = Hook>) -> Self {
        Self {
            hooks: hooks.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Shorthand for the `id` attribute.
    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    #[must_use]
    pub fn with_parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Form control value, for form elements.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    /// Viewport-relative border box.
    #[must_use]
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    fn add_class(&mut self, class: &str) {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
    }

    #[must_use]
    pub fn has_hook(&self, hook: Hook) -> bool {
        self.hooks.contains(&hook)
    }

    #[must_use]
    pub const fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Class attribute, in insertion order.
    #[must_use]
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    #[must_use]
    pub const fn is_removed(&self) -> bool {
        self.removed
    }
}

/// In-memory document.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    elements: Vec<MemoryElement>,
    metrics: ScrollMetrics,
    reduced_motion: bool,
    intersection_observer: bool,
    wall_clock: WallClock,
    scroll_requests: Vec<ScrollRequest>,
    navigations: Vec<String>,
    observed: Vec<(TriggerKind, ElementId, f64)>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Empty document: 1000px viewport, no scrolling, intersection
    /// observation available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            metrics: ScrollMetrics::new(0.0, 1000.0, 1000.0),
            reduced_motion: false,
            intersection_observer: true,
            wall_clock: WallClock::default(),
            scroll_requests: Vec::new(),
            navigations: Vec::new(),
            observed: Vec::new(),
        }
    }

    /// Append an element in document order.
    pub fn insert(&mut self, element: MemoryElement) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&MemoryElement> {
        self.elements.get(id.get() as usize)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut MemoryElement> {
        self.elements
            .get_mut(id.get() as usize)
            .filter(|el| !el.removed)
    }

    fn live(&self) -> impl Iterator<Item = (ElementId, &MemoryElement)> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| !el.removed)
            .map(|(i, el)| (ElementId(i as u32), el))
    }

    fn is_descendant(&self, mut id: ElementId, ancestor: ElementId) -> bool {
        while let Some(parent) = self.element(id).and_then(MemoryElement::parent) {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }

    // --- test controls ---

    pub fn set_metrics(&mut self, metrics: ScrollMetrics) {
        self.metrics = metrics;
    }

    /// Scroll the viewport. Element rects are viewport-relative, so every
    /// rect shifts by the scroll delta.
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        let dy = self.metrics.scroll_y - scroll_y;
        for el in &mut self.elements {
            el.rect = el.rect.offset_y(dy);
        }
        self.metrics.scroll_y = scroll_y;
    }

    /// Move an element to a new viewport-relative box.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(el) = self.element_mut(id) {
            el.rect = rect;
        }
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn set_intersection_observer(&mut self, available: bool) {
        self.intersection_observer = available;
    }

    pub fn set_wall_clock(&mut self, clock: WallClock) {
        self.wall_clock = clock;
    }

    pub fn set_field(&mut self, form: ElementId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(form) {
            el.fields.insert(name.to_string(), value.to_string());
        }
    }

    // --- recorded effects ---

    #[must_use]
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    #[must_use]
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// Threshold `element` is observed at for `kind`, if observed.
    #[must_use]
    pub fn observed_threshold(&self, kind: TriggerKind, element: ElementId) -> Option<f64> {
        self.observed
            .iter()
            .find(|(k, el, _)| *k == kind && *el == element)
            .map(|(_, _, threshold)| *threshold)
    }

    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    #[must_use]
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    #[must_use]
    pub fn class_name(&self, id: ElementId) -> String {
        self.element(id)
            .map(MemoryElement::class_name)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.style(property))
    }

    #[must_use]
    pub fn text(&self, id: ElementId) -> &str {
        self.element(id).map_or("", MemoryElement::text)
    }

    #[must_use]
    pub fn inner_html(&self, id: ElementId) -> &str {
        self.element(id).map_or("", MemoryElement::inner_html)
    }

    /// Live children of `parent`.
    #[must_use]
    pub fn children(&self, parent: ElementId) -> Vec<ElementId> {
        self.live()
            .filter(|(_, el)| el.parent == Some(parent))
            .map(|(id, _)| id)
            .collect()
    }
}

impl PageHost for MemoryHost {
    fn query_all(&mut self, hook: Hook) -> Vec<ElementId> {
        self.live()
            .filter(|(_, el)| el.has_hook(hook))
            .map(|(id, _)| id)
            .collect()
    }

    fn query_within(&mut self, root: ElementId, hook: Hook) -> Vec<ElementId> {
        self.live()
            .filter(|(id, el)| el.has_hook(hook) && self.is_descendant(*id, root))
            .map(|(id, _)| id)
            .collect()
    }

    fn closest(&mut self, element: ElementId, hook: Hook) -> Option<ElementId> {
        let mut cursor = Some(element);
        while let Some(id) = cursor {
            let el = self.element(id)?;
            if !el.removed && el.has_hook(hook) {
                return Some(id);
            }
            cursor = el.parent;
        }
        None
    }

    /// Supports `#id` and the hook selectors.
    fn query_selector(&mut self, selector: &str) -> Option<ElementId> {
        let selector = selector.trim();
        if let Some(hook) = Hook::ALL.into_iter().find(|h| h.selector() == selector) {
            return self.query(hook);
        }
        let id = selector.strip_prefix('#')?;
        self.live()
            .find(|(_, el)| el.attributes.get("id").is_some_and(|v| v == id))
            .map(|(id, _)| id)
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.attributes.get(name).cloned()
    }

    fn field_value(&self, form: ElementId, name: &str) -> Option<String> {
        self.element(form)?.fields.get(name).cloned()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn element_rect(&self, element: ElementId) -> Option<Rect> {
        self.element(element)
            .filter(|el| !el.removed)
            .map(MemoryElement::rect)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn supports_intersection_observer(&self) -> bool {
        self.intersection_observer
    }

    fn wall_clock(&self) -> WallClock {
        self.wall_clock
    }

    fn set_class(&mut self, element: ElementId, class: &str, on: bool) {
        if let Some(el) = self.element_mut(element) {
            if on {
                el.add_class(class);
            } else {
                el.classes.retain(|c| c != class);
            }
        }
    }

    fn set_class_name(&mut self, element: ElementId, class_name: &str) {
        if let Some(el) = self.element_mut(element) {
            el.classes.clear();
            for class in class_name.split_whitespace() {
                el.add_class(class);
            }
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(el) = self.element_mut(element) {
            el.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(el) = self.element_mut(element) {
            el.text = text.to_string();
        }
    }

    fn set_inner_html(&mut self, element: ElementId, html: &str) {
        if let Some(el) = self.element_mut(element) {
            el.inner_html = html.to_string();
        }
    }

    fn scroll_to(&mut self, request: ScrollRequest) {
        self.scroll_requests.push(request);
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }

    fn spawn_ripple(
        &mut self,
        parent: ElementId,
        geometry: &RippleGeometry,
    ) -> Option<ElementId> {
        self.element_mut(parent)?;
        let mut ripple = MemoryElement::default()
            .with_parent(parent)
            .with_class(RIPPLE_CLASS);
        for (property, value) in geometry.style() {
            ripple.styles.insert(property.to_string(), value);
        }
        Some(self.insert(ripple))
    }

    fn remove_element(&mut self, element: ElementId) {
        if let Some(el) = self.element_mut(element) {
            el.removed = true;
        }
    }

    fn observe(&mut self, kind: TriggerKind, element: ElementId, threshold: f64) {
        self.unobserve(kind, element);
        self.observed.push((kind, element, threshold));
    }

    fn unobserve(&mut self, kind: TriggerKind, element: ElementId) {
        self.observed.retain(|(k, el, _)| !(*k == kind && *el == element));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn queries_follow_document_order_and_nesting() {
        let mut host = MemoryHost::new();
        let card = host.insert(MemoryElement::new([Hook::ProjectCard]));
        let carousel = host.insert(MemoryElement::new([Hook::Carousel]).with_parent(card));
        let a = host.insert(MemoryElement::new([Hook::CarouselSlide]).with_parent(carousel));
        let stray = host.insert(MemoryElement::new([Hook::CarouselSlide]));
        let b = host.insert(MemoryElement::new([Hook::CarouselSlide]).with_parent(carousel));

        assert_eq!(host.query_all(Hook::CarouselSlide), vec![a, stray, b]);
        assert_eq!(host.query_within(carousel, Hook::CarouselSlide), vec![a, b]);
        assert_eq!(host.closest(a, Hook::ProjectCard), Some(card));
        assert_eq!(host.closest(stray, Hook::ProjectCard), None);
    }

    #[test]
    fn query_selector_by_id_and_hook() {
        let mut host = MemoryHost::new();
        let about = host.insert(MemoryElement::new([Hook::Section]).with_id("about"));
        let year = host.insert(MemoryElement::new([Hook::Year]));
        assert_eq!(host.query_selector("#about"), Some(about));
        assert_eq!(host.query_selector("#year"), Some(year));
        assert_eq!(host.query_selector("#missing"), None);
        assert_eq!(host.query_selector(".unknown"), None);
    }

    #[test]
    fn class_writes_keep_order() {
        let mut host = MemoryHost::new();
        let el = host.insert(MemoryElement::new([Hook::FormMessage]));
        host.set_class_name(el, "form-message error show");
        host.set_class(el, "show", false);
        assert_eq!(host.class_name(el), "form-message error");
        host.set_class(el, "show", true);
        host.set_class(el, "show", true);
        assert_eq!(host.class_name(el), "form-message error show");
    }

    #[test]
    fn scrolling_shifts_rects() {
        let mut host = MemoryHost::new();
        host.set_metrics(ScrollMetrics::new(0.0, 800.0, 3000.0));
        let el = host.insert(
            MemoryElement::new([Hook::Section]).with_rect(Rect::new(0.0, 900.0, 100.0, 50.0)),
        );
        host.set_scroll_y(400.0);
        assert_eq!(host.element_rect(el).map(|r| r.top()), Some(500.0));
        assert_eq!(host.scroll_metrics().scroll_y, 400.0);
    }

    #[test]
    fn removed_elements_vanish() {
        let mut host = MemoryHost::new();
        let button = host.insert(MemoryElement::new([Hook::RippleButton]));
        let geometry = RippleGeometry {
            size: 10.0,
            left: 1.0,
            top: 2.0,
        };
        let ripple = host.spawn_ripple(button, &geometry).unwrap();
        assert_eq!(host.children(button), vec![ripple]);
        assert_eq!(host.style(ripple, "width"), Some("10px"));
        assert!(host.has_class(ripple, RIPPLE_CLASS));
        host.remove_element(ripple);
        assert!(host.children(button).is_empty());
        assert_eq!(host.element_rect(ripple), None);
    }

    #[test]
    fn observe_replaces_previous_threshold() {
        let mut host = MemoryHost::new();
        let el = host.insert(MemoryElement::new([Hook::Reveal]));
        host.observe(TriggerKind::Reveal, el, 0.1);
        host.observe(TriggerKind::Reveal, el, 0.2);
        assert_eq!(host.observed_count(), 1);
        assert_eq!(host.observed_threshold(TriggerKind::Reveal, el), Some(0.2));
        host.unobserve(TriggerKind::Reveal, el);
        assert_eq!(host.observed_threshold(TriggerKind::Reveal, el), None);
    }
}
