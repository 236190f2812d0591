#![forbid(unsafe_code)]

//! Host-driven page controller.
//!
//! [`PageController`] wires every page behaviour to host events:
//!
//! | Host event        | Entry point                        |
//! |-------------------|------------------------------------|
//! | document ready    | [`PageController::init`]           |
//! | `scroll`          | [`PageController::on_scroll`]      |
//! | `resize`          | [`PageController::on_resize`]      |
//! | intersection      | [`PageController::on_intersection`]|
//! | `click`           | [`PageController::on_click`]       |
//! | `submit`          | [`PageController::on_submit`]      |
//! | timer             | [`PageController::advance`]        |
//! | unload            | [`PageController::shutdown`]       |
//!
//! # Invariants
//!
//! 1. Every delayed action is a [`PageTask`] in one scheduler; the host arms
//!    a single timer for [`PageController::next_deadline`].
//! 2. Scroll-derived state (active link, progress width, back-to-top) is
//!    recomputed from live layout on every scroll tick.
//! 3. Reveal, skill-bar, and counter activations fire at most once per
//!    element, and the element is unobserved when it fires.
//!
//! # Failure Modes
//!
//! - Missing hooks: the behaviour that needs them is not wired.
//! - No intersection observation: every trigger fires during `init`.
//! - Stale banner timers: ignored through the banner generation.

use core::time::Duration;
use std::collections::BTreeMap;

use folio_core::carousel::{ACTIVE_SLIDE_CLASS, Carousel, SlideChange};
use folio_core::contact::{BANNER_BASE_CLASS, Banner, BannerKind, ContactSubmission};
use folio_core::counter::CounterAnimation;
use folio_core::navigation::{
    ACTIVE_LINK_CLASS, SIDEBAR_OPEN_CLASS, ScrollRequest, SidebarState, anchor_selector,
};
use folio_core::numeric::parse_leading_uint;
use folio_core::ripple::RippleGeometry;
use folio_core::scheduler::Scheduler;
use folio_core::scroll::progress_width;
use folio_core::skill_bar::skill_width;
use folio_core::typing::TypingEffect;
use folio_core::{
    Activation, ElementId, IntersectionSample, PageConfig, ScrollStateAggregator, ScrollUpdate,
    SectionDescriptor, TriggerKind,
};
use tracing::{debug, info, trace};

use crate::host::{Hook, PageHost};

/// Class added to revealed blocks and the visible back-to-top control.
const VISIBLE_CLASS: &str = "visible";
/// Class added to a counter once it starts.
const COUNTED_CLASS: &str = "counted";
/// Banner text while the mail client opens.
const SENDING_TEXT: &str = "Opening your email client...";

/// A delayed action owned by the controller's scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTask {
    /// Next tick of the counter on this element.
    CounterTick(ElementId),
    /// Next typing-effect step.
    TypingStep,
    /// Start fading the banner of this generation.
    BannerHide(u64),
    /// Clear the banner of this generation.
    BannerClear(u64),
    /// Hand a `mailto:` URI to the host.
    Navigate(String),
    /// Remove a finished ripple.
    RemoveRipple(ElementId),
}

/// What a click on a wired element does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickAction {
    NavLink,
    ScrollButton,
    SidebarToggle,
    CarouselPrev(usize),
    CarouselNext(usize),
    BackToTop,
    Ripple,
    Resume,
}

/// How the host should treat the DOM event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickResponse {
    /// The element has at least one behaviour wired.
    pub handled: bool,
    /// The host must call `preventDefault()`.
    pub prevent_default: bool,
}

#[derive(Debug)]
struct Sidebar {
    toggle: ElementId,
    nav: ElementId,
    state: SidebarState,
}

#[derive(Debug)]
struct ContactForm {
    form: ElementId,
    message: ElementId,
    banner: Banner,
}

#[derive(Debug)]
struct Typing {
    element: ElementId,
    effect: TypingEffect,
    /// A step later than this resumes from the current time instead of
    /// replaying every missed step.
    resync_after: Duration,
}

/// Page behaviours bound to one [`PageHost`].
#[derive(Debug)]
pub struct PageController<H> {
    host: H,
    config: PageConfig,
    scheduler: Scheduler<PageTask>,
    aggregator: ScrollStateAggregator,
    observing: bool,
    nav_links: Vec<ElementId>,
    sections: Vec<ElementId>,
    progress_bar: Option<ElementId>,
    back_to_top: Option<ElementId>,
    sidebar: Option<Sidebar>,
    carousels: Vec<Carousel>,
    click_actions: BTreeMap<ElementId, Vec<ClickAction>>,
    counters: BTreeMap<ElementId, CounterAnimation>,
    typing: Option<Typing>,
    contact: Option<ContactForm>,
}

impl<H: PageHost> PageController<H> {
    #[must_use]
    pub fn new(host: H, config: PageConfig) -> Self {
        let aggregator = ScrollStateAggregator::new(&config);
        Self {
            host,
            config,
            scheduler: Scheduler::new(),
            aggregator,
            observing: false,
            nav_links: Vec::new(),
            sections: Vec::new(),
            progress_bar: None,
            back_to_top: None,
            sidebar: None,
            carousels: Vec::new(),
            click_actions: BTreeMap::new(),
            counters: BTreeMap::new(),
            typing: None,
            contact: None,
        }
    }

    /// Wire every behaviour whose hooks are present, then apply the initial
    /// scroll state and run anything due at `now`.
    pub fn init(&mut self, now: Duration) {
        self.scheduler.set_now(now);
        self.init_navigation();
        self.init_sidebar();
        self.init_triggers();
        self.init_contact_form();
        self.init_year();
        self.init_carousels();
        self.init_typing(now);
        self.init_buttons();
        self.on_scroll();
        self.advance(now);
        debug!(
            sections = self.sections.len(),
            nav_links = self.nav_links.len(),
            carousels = self.carousels.len(),
            click_targets = self.click_actions.len(),
            observing = self.observing,
            "page initialized"
        );
    }

    fn wire(&mut self, element: ElementId, action: ClickAction) {
        self.click_actions.entry(element).or_default().push(action);
    }

    fn init_navigation(&mut self) {
        self.nav_links = self.host.query_all(Hook::NavLink);
        self.sections = self.host.query_all(Hook::Section);
        for link in self.nav_links.clone() {
            self.wire(link, ClickAction::NavLink);
        }
        for button in self.host.query_all(Hook::ScrollButton) {
            self.wire(button, ClickAction::ScrollButton);
        }
    }

    fn init_sidebar(&mut self) {
        let toggle = self.host.query(Hook::SidebarToggle);
        let nav = self.host.query(Hook::Nav);
        let (Some(toggle), Some(nav)) = (toggle, nav) else {
            return;
        };
        self.sidebar = Some(Sidebar {
            toggle,
            nav,
            state: SidebarState::default(),
        });
        self.wire(toggle, ClickAction::SidebarToggle);
    }

    fn init_triggers(&mut self) {
        self.observing = self.host.supports_intersection_observer();
        for kind in TriggerKind::ALL {
            let elements = self.host.query_all(Hook::for_trigger(kind));
            let threshold = self.config.triggers.threshold(kind);
            for &element in &elements {
                self.aggregator.register(kind, element);
                if self.observing {
                    self.host.observe(kind, element, threshold);
                }
            }
            if !self.observing && !elements.is_empty() {
                debug!(
                    kind = kind.label(),
                    count = elements.len(),
                    "no intersection observer, firing all"
                );
                for activation in self.aggregator.fire_all(kind) {
                    self.apply_activation(activation);
                }
            }
        }
    }

    fn init_contact_form(&mut self) {
        let form = self.host.query(Hook::ContactForm);
        let message = self.host.query(Hook::FormMessage);
        let (Some(form), Some(message)) = (form, message) else {
            return;
        };
        self.contact = Some(ContactForm {
            form,
            message,
            banner: Banner::new(),
        });
    }

    fn init_year(&mut self) {
        let Some(element) = self.host.query(Hook::Year) else {
            return;
        };
        if let Some(year) = self.host.wall_clock().local_year() {
            self.host.set_text(element, &year.to_string());
        }
    }

    fn init_carousels(&mut self) {
        for root in self.host.query_all(Hook::Carousel) {
            let slides = self.host.query_within(root, Hook::CarouselSlide);
            let Some(carousel) = Carousel::new(slides) else {
                continue;
            };
            for (slide, active) in carousel.initial_states() {
                self.host.set_class(slide, ACTIVE_SLIDE_CLASS, active);
            }
            let index = self.carousels.len();
            self.carousels.push(carousel);

            let Some(card) = self.host.closest(root, Hook::ProjectCard) else {
                continue;
            };
            if let Some(&prev) = self.host.query_within(card, Hook::CarouselPrev).first() {
                self.wire(prev, ClickAction::CarouselPrev(index));
            }
            if let Some(&next) = self.host.query_within(card, Hook::CarouselNext).first() {
                self.wire(next, ClickAction::CarouselNext(index));
            }
        }
    }

    fn init_typing(&mut self, now: Duration) {
        let Some(element) = self.host.query(Hook::TypingText) else {
            return;
        };
        let policy = &self.config.typing;
        let timing = policy.timing();
        let Some(mut effect) = TypingEffect::new(&policy.phrases, timing) else {
            debug!("typing effect has no phrases");
            return;
        };
        effect.start(now);
        self.scheduler.schedule_at(now, PageTask::TypingStep);
        self.typing = Some(Typing {
            element,
            effect,
            resync_after: timing.hold_delay.saturating_add(timing.gap_delay),
        });
    }

    fn init_buttons(&mut self) {
        self.progress_bar = self.host.query(Hook::ProgressBar);
        self.back_to_top = self.host.query(Hook::BackToTop);
        if let Some(button) = self.back_to_top {
            self.wire(button, ClickAction::BackToTop);
        }
        for button in self.host.query_all(Hook::RippleButton) {
            self.wire(button, ClickAction::Ripple);
        }
        if let Some(button) = self.host.query(Hook::ResumeButton) {
            self.wire(button, ClickAction::Resume);
        }
    }

    // --- scroll ---

    /// Section descriptors in document coordinates, from live layout.
    fn section_descriptors(&self, scroll_y: f64) -> Vec<SectionDescriptor> {
        self.sections
            .iter()
            .filter_map(|&section| {
                let id = self.host.attribute(section, "id")?;
                let rect = self.host.element_rect(section)?;
                Some(SectionDescriptor::new(id, rect.top() + scroll_y, rect.height))
            })
            .collect()
    }

    /// Recompute every scroll-derived behaviour from the host's current
    /// layout and write the results.
    pub fn on_scroll(&mut self) -> ScrollUpdate {
        let metrics = self.host.scroll_metrics();
        let sections = self.section_descriptors(metrics.scroll_y);
        let update = self.aggregator.on_scroll(&metrics, &sections);

        if !self.nav_links.is_empty() && !sections.is_empty() {
            let anchor = update.active_section.as_ref().map(|id| format!("#{id}"));
            let mut claimed = false;
            for &link in &self.nav_links {
                let matches = !claimed
                    && anchor.is_some()
                    && self.host.attribute(link, "href").as_deref() == anchor.as_deref();
                claimed |= matches;
                self.host.set_class(link, ACTIVE_LINK_CLASS, matches);
            }
        }
        if let Some(bar) = self.progress_bar {
            self.host
                .set_style(bar, "width", &progress_width(update.progress_percent));
        }
        if let Some(button) = self.back_to_top {
            self.host
                .set_class(button, VISIBLE_CLASS, update.back_to_top_visible);
        }
        if update.active_changed {
            debug!(section = ?update.active_section, "active section");
        }
        trace!(
            scroll_y = metrics.scroll_y,
            progress = update.progress_percent,
            back_to_top = update.back_to_top_visible,
            "scroll tick"
        );
        update
    }

    /// Layout changed; section offsets are re-read on the next tick, so a
    /// resize is just another scroll tick.
    pub fn on_resize(&mut self) -> ScrollUpdate {
        self.on_scroll()
    }

    // --- intersection ---

    /// Feed intersection samples for elements of `kind`. Returns the number
    /// of elements activated.
    pub fn on_intersection(&mut self, kind: TriggerKind, samples: &[IntersectionSample]) -> usize {
        let mut fired = 0;
        for sample in samples {
            if let Some(activation) = self.aggregator.on_intersection(kind, sample) {
                self.apply_activation(activation);
                fired += 1;
            }
        }
        fired
    }

    fn apply_activation(&mut self, activation: Activation) {
        let Activation { kind, element } = activation;
        if self.observing {
            self.host.unobserve(kind, element);
        }
        match kind {
            TriggerKind::Reveal => self.host.set_class(element, VISIBLE_CLASS, true),
            TriggerKind::SkillBar => {
                let raw = self.host.attribute(element, "data-percent");
                self.host
                    .set_style(element, "width", &skill_width(raw.as_deref()));
            }
            TriggerKind::Counter => self.start_counter(element),
        }
    }

    fn start_counter(&mut self, element: ElementId) {
        let raw = self.host.attribute(element, "data-target");
        let target = parse_leading_uint(raw.as_deref());
        self.host.set_class(element, COUNTED_CLASS, true);
        let mut counter = CounterAnimation::new(target, self.config.counter.timing());
        counter.start(self.scheduler.now());
        if let Some(deadline) = counter.next_deadline() {
            self.scheduler
                .schedule_at(deadline, PageTask::CounterTick(element));
        }
        debug!(%element, count_to = target, "counter started");
        self.counters.insert(element, counter);
    }

    // --- clicks ---

    /// Elements with click behaviour; the host listens on each of them.
    #[must_use]
    pub fn click_targets(&self) -> Vec<ElementId> {
        self.click_actions.keys().copied().collect()
    }

    /// Dispatch a click on `element` at viewport point (`client_x`, `client_y`).
    pub fn on_click(&mut self, element: ElementId, client_x: f64, client_y: f64) -> ClickResponse {
        let Some(actions) = self.click_actions.get(&element).cloned() else {
            return ClickResponse::default();
        };
        let mut response = ClickResponse {
            handled: true,
            prevent_default: false,
        };
        for action in actions {
            match action {
                ClickAction::NavLink => {
                    response.prevent_default = true;
                    let href = self.host.attribute(element, "href").unwrap_or_default();
                    if let Some(selector) = anchor_selector(&href) {
                        self.scroll_to_selector(selector);
                        self.close_sidebar();
                    }
                }
                ClickAction::ScrollButton => {
                    if let Some(target) = self.host.attribute(element, "data-scroll-target") {
                        self.scroll_to_selector(&target);
                    }
                }
                ClickAction::SidebarToggle => self.toggle_sidebar(),
                ClickAction::CarouselPrev(index) => {
                    let change = self.carousels.get_mut(index).map(Carousel::prev);
                    self.apply_slide_change(change);
                }
                ClickAction::CarouselNext(index) => {
                    let change = self.carousels.get_mut(index).map(Carousel::next);
                    self.apply_slide_change(change);
                }
                ClickAction::BackToTop => {
                    let reduced = self.host.prefers_reduced_motion();
                    self.host.scroll_to(ScrollRequest::to_top(reduced));
                }
                ClickAction::Ripple => self.spawn_ripple(element, client_x, client_y),
                ClickAction::Resume => {
                    let href = self.host.attribute(element, "href");
                    info!(href = ?href, "resume download initiated");
                }
            }
        }
        response
    }

    fn scroll_to_selector(&mut self, selector: &str) {
        let Some(target) = self.host.query_selector(selector) else {
            debug!(selector, "scroll target not found");
            return;
        };
        let Some(rect) = self.host.element_rect(target) else {
            return;
        };
        let scroll_y = self.host.scroll_metrics().scroll_y;
        let request = ScrollRequest::to_anchor(
            rect.top() + scroll_y,
            self.config.scroll.scroll_header_offset_px,
            self.host.prefers_reduced_motion(),
        );
        self.host.scroll_to(request);
    }

    fn toggle_sidebar(&mut self) {
        let Some(sidebar) = self.sidebar.as_mut() else {
            return;
        };
        let open = sidebar.state.toggle();
        let (toggle, nav) = (sidebar.toggle, sidebar.nav);
        self.host.set_class(toggle, SIDEBAR_OPEN_CLASS, open);
        self.host.set_class(nav, SIDEBAR_OPEN_CLASS, open);
    }

    fn close_sidebar(&mut self) {
        let Some(sidebar) = self.sidebar.as_mut() else {
            return;
        };
        sidebar.state.close();
        let (toggle, nav) = (sidebar.toggle, sidebar.nav);
        self.host.set_class(toggle, SIDEBAR_OPEN_CLASS, false);
        self.host.set_class(nav, SIDEBAR_OPEN_CLASS, false);
    }

    fn apply_slide_change(&mut self, change: Option<SlideChange>) {
        if let Some(SlideChange { deactivate, activate }) = change {
            self.host.set_class(deactivate, ACTIVE_SLIDE_CLASS, false);
            self.host.set_class(activate, ACTIVE_SLIDE_CLASS, true);
        }
    }

    fn spawn_ripple(&mut self, button: ElementId, client_x: f64, client_y: f64) {
        let Some(rect) = self.host.element_rect(button) else {
            return;
        };
        let geometry = RippleGeometry::from_click(rect, client_x, client_y);
        if let Some(ripple) = self.host.spawn_ripple(button, &geometry) {
            self.scheduler
                .schedule_after(self.config.ripple.lifetime(), PageTask::RemoveRipple(ripple));
        }
    }

    // --- contact form ---

    /// Handle a submit of `form`. The default submission is always
    /// prevented for the contact form.
    pub fn on_submit(&mut self, form: ElementId) -> ClickResponse {
        let Some(contact) = self.contact.as_ref().filter(|c| c.form == form) else {
            return ClickResponse::default();
        };
        let form = contact.form;
        let field = |name: &str| self.host.field_value(form, name).unwrap_or_default();
        let submission = ContactSubmission::new(
            &field("name"),
            &field("email"),
            &field("subject"),
            &field("message"),
        );
        match submission.validate() {
            Err(err) => {
                debug!(error = %err, "contact form rejected");
                self.show_banner(BannerKind::Error, err.to_string());
            }
            Ok(()) => {
                let policy = &self.config.contact;
                let uri = submission.mailto_uri(&policy.recipient, &policy.default_subject);
                let delay = policy.navigate_delay();
                self.show_banner(BannerKind::Success, SENDING_TEXT.to_string());
                self.scheduler.schedule_after(delay, PageTask::Navigate(uri));
                info!("contact form accepted, opening mail client");
            }
        }
        ClickResponse {
            handled: true,
            prevent_default: true,
        }
    }

    fn show_banner(&mut self, kind: BannerKind, text: String) {
        let Some(contact) = self.contact.as_mut() else {
            return;
        };
        let generation = contact.banner.show(kind, text);
        let message = contact.message;
        let class_name = contact.banner.class_name();
        let html = contact.banner.inner_html();
        self.host.set_class_name(message, &class_name);
        self.host.set_inner_html(message, &html);
        self.scheduler.schedule_after(
            self.config.contact.banner_visible(),
            PageTask::BannerHide(generation),
        );
    }

    // --- time ---

    /// Run every task due at or before `now`, in deadline order. Returns the
    /// number of tasks run.
    pub fn advance(&mut self, now: Duration) -> usize {
        let mut ran = 0;
        while let Some((deadline, task)) = self.scheduler.pop_due(now) {
            self.run_task(now, deadline, task);
            ran += 1;
        }
        ran
    }

    fn run_task(&mut self, now: Duration, deadline: Duration, task: PageTask) {
        match task {
            PageTask::CounterTick(element) => {
                let Some(counter) = self.counters.get_mut(&element) else {
                    return;
                };
                let Some(frame) = counter.step(deadline) else {
                    return;
                };
                let next = counter.next_deadline();
                self.host.set_text(element, &frame.text);
                match next {
                    Some(next) => {
                        self.scheduler
                            .schedule_at(next, PageTask::CounterTick(element));
                    }
                    None => {
                        debug!(%element, value = frame.value, "counter finished");
                        self.counters.remove(&element);
                    }
                }
            }
            PageTask::TypingStep => {
                let Some(typing) = self.typing.as_mut() else {
                    return;
                };
                // Throttled hosts (background tabs) can fall far behind.
                let late = now.saturating_sub(deadline);
                let at = if late > typing.resync_after {
                    trace!(late_ms = late.as_millis() as u64, "typing resynced");
                    now
                } else {
                    deadline
                };
                let frame = typing.effect.step(at);
                let element = typing.element;
                let next = typing.effect.next_deadline();
                self.host.set_text(element, &frame.text);
                if let Some(next) = next {
                    self.scheduler.schedule_at(next, PageTask::TypingStep);
                }
            }
            PageTask::BannerHide(generation) => {
                let Some(contact) = self.contact.as_mut() else {
                    return;
                };
                if contact.banner.hide(generation) {
                    let message = contact.message;
                    self.host.set_class(message, "show", false);
                    self.scheduler.schedule_at(
                        deadline.saturating_add(self.config.contact.banner_fade()),
                        PageTask::BannerClear(generation),
                    );
                } else {
                    trace!(generation, "stale banner hide");
                }
            }
            PageTask::BannerClear(generation) => {
                let Some(contact) = self.contact.as_mut() else {
                    return;
                };
                if contact.banner.clear(generation) {
                    let message = contact.message;
                    self.host.set_class_name(message, BANNER_BASE_CLASS);
                    self.host.set_inner_html(message, "");
                }
            }
            PageTask::Navigate(url) => {
                debug!(len = url.len(), "navigating");
                self.host.navigate(&url);
            }
            PageTask::RemoveRipple(ripple) => self.host.remove_element(ripple),
        }
    }

    /// Earliest pending task deadline, for the host's single timer.
    #[must_use]
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Latest time seen by the scheduler.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Stop every timer and intersection subscription.
    pub fn shutdown(&mut self) {
        let pending = self.scheduler.len();
        self.scheduler.clear();
        self.counters.clear();
        if let Some(typing) = self.typing.as_mut() {
            typing.effect.stop();
        }
        if self.observing {
            for kind in TriggerKind::ALL {
                let elements: Vec<ElementId> = self.aggregator.triggers(kind).pending().collect();
                for element in elements {
                    self.host.unobserve(kind, element);
                }
            }
        }
        debug!(pending, "page shut down");
    }

    // --- accessors ---

    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub const fn aggregator(&self) -> &ScrollStateAggregator {
        &self.aggregator
    }

    #[must_use]
    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar.as_ref().is_some_and(|s| s.state.is_open())
    }

    /// Pending scheduler tasks.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }
}
