#![forbid(unsafe_code)]

//! [`PageHost`] over the live document via `web-sys`.
//!
//! Elements are interned into a registry the first time a query returns
//! them, so the same DOM node always maps to the same [`ElementId`].
//! Removed elements release their slot. Write failures reported by the
//! browser are swallowed; a page behaviour never aborts because one style
//! write was rejected.
//!
//! Only compiled on `wasm32` targets.

use std::collections::HashMap;

use js_sys::{Date, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement, IntersectionObserver,
    NodeList, ScrollToOptions, Window,
};

use folio_core::footer::WallClock;
use folio_core::navigation::{ScrollBehavior, ScrollRequest};
use folio_core::ripple::{RIPPLE_CLASS, RippleGeometry};
use folio_core::{ElementId, Rect, ScrollMetrics, TriggerKind};
use folio_web::{Hook, PageHost};

use super::registry::Registry;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub struct DomHost {
    window: Window,
    document: Document,
    elements: Registry<Element>,
    observers: HashMap<TriggerKind, IntersectionObserver>,
}

impl DomHost {
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            elements: Registry::new(),
            observers: HashMap::new(),
        }
    }

    /// Handle for `element`, registering it on first sight.
    pub fn intern(&mut self, element: &Element) -> ElementId {
        self.elements
            .intern_by(element.clone(), |known, candidate| Object::is(known, candidate))
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Route `kind` observations through `observer`.
    pub fn install_observer(&mut self, kind: TriggerKind, observer: IntersectionObserver) {
        if let Some(previous) = self.observers.insert(kind, observer) {
            previous.disconnect();
        }
    }

    pub fn disconnect_observers(&mut self) {
        for (_, observer) in self.observers.drain() {
            observer.disconnect();
        }
    }

    fn intern_list(&mut self, list: Option<NodeList>) -> Vec<ElementId> {
        let Some(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(&element))
            .collect()
    }

    fn html_element(&self, id: ElementId) -> Option<&HtmlElement> {
        self.element(id)?.dyn_ref::<HtmlElement>()
    }
}

impl PageHost for DomHost {
    // --- queries ---

    fn query_all(&mut self, hook: Hook) -> Vec<ElementId> {
        let list = self.document.query_selector_all(hook.selector()).ok();
        self.intern_list(list)
    }

    fn query_within(&mut self, root: ElementId, hook: Hook) -> Vec<ElementId> {
        let list = self
            .element(root)
            .and_then(|root| root.query_selector_all(hook.selector()).ok());
        self.intern_list(list)
    }

    fn closest(&mut self, element: ElementId, hook: Hook) -> Option<ElementId> {
        let found = self.element(element)?.closest(hook.selector()).ok()??;
        Some(self.intern(&found))
    }

    fn query_selector(&mut self, selector: &str) -> Option<ElementId> {
        // Malformed selectors throw; treat them as no match.
        let found = self.document.query_selector(selector).ok()??;
        Some(self.intern(&found))
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn field_value(&self, form: ElementId, name: &str) -> Option<String> {
        let control = self
            .element(form)?
            .query_selector(&format!("[name=\"{name}\"]"))
            .ok()??;
        if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        control
            .dyn_ref::<HtmlTextAreaElement>()
            .map(HtmlTextAreaElement::value)
    }

    // --- layout and environment ---

    fn scroll_metrics(&self) -> ScrollMetrics {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        let document_height = self
            .document
            .document_element()
            .map_or(0.0, |root| f64::from(root.scroll_height()));
        ScrollMetrics::new(scroll_y, viewport_height, document_height)
    }

    fn element_rect(&self, element: ElementId) -> Option<Rect> {
        let rect = self.element(element)?.get_bounding_client_rect();
        Some(Rect::new(rect.x(), rect.y(), rect.width(), rect.height()))
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn supports_intersection_observer(&self) -> bool {
        Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }

    fn wall_clock(&self) -> WallClock {
        let now = Date::new_0();
        WallClock {
            unix_ms: now.get_time() as i64,
            // getTimezoneOffset is minutes west of UTC.
            utc_offset_minutes: -(now.get_timezone_offset() as i32),
        }
    }

    // --- writes ---

    fn set_class(&mut self, element: ElementId, class: &str, on: bool) {
        if let Some(el) = self.element(element) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_class_name(&mut self, element: ElementId, class_name: &str) {
        if let Some(el) = self.element(element) {
            el.set_class_name(class_name);
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(el) = self.html_element(element) {
            let _ = el.style().set_property(property, value);
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(el) = self.element(element) {
            el.set_text_content(Some(text));
        }
    }

    fn set_inner_html(&mut self, element: ElementId, html: &str) {
        if let Some(el) = self.element(element) {
            el.set_inner_html(html);
        }
    }

    fn scroll_to(&mut self, request: ScrollRequest) {
        let options = ScrollToOptions::new();
        options.set_top(request.top);
        options.set_behavior(match request.behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn navigate(&mut self, url: &str) {
        let _ = self.window.location().set_href(url);
    }

    fn spawn_ripple(
        &mut self,
        parent: ElementId,
        geometry: &RippleGeometry,
    ) -> Option<ElementId> {
        let parent = self.element(parent)?.clone();
        let span = self
            .document
            .create_element("span")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        span.set_class_name(RIPPLE_CLASS);
        let style = span.style();
        for (property, value) in geometry.style() {
            let _ = style.set_property(property, &value);
        }
        parent.append_child(&span).ok()?;
        Some(self.elements.insert(span.into()))
    }

    fn remove_element(&mut self, element: ElementId) {
        if let Some(el) = self.elements.release(element) {
            el.remove();
        }
    }

    // --- intersection ---

    fn observe(&mut self, kind: TriggerKind, element: ElementId, _threshold: f64) {
        // The threshold is baked into the observer when it is installed.
        if let (Some(observer), Some(el)) = (self.observers.get(&kind), self.element(element)) {
            observer.observe(el);
        }
    }

    fn unobserve(&mut self, kind: TriggerKind, element: ElementId) {
        if let (Some(observer), Some(el)) = (self.observers.get(&kind), self.element(element)) {
            observer.unobserve(el);
        }
    }
}
