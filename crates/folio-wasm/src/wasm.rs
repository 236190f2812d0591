#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for [`PortfolioPage`].
//!
//! This module wraps [`super::runner_core::RunnerCore`] around a
//! [`DomHost`] and owns every browser callback the page needs.
//! Only compiled on `wasm32` targets.
//!
//! # Invariants
//!
//! 1. At most one browser timeout is armed at a time; it targets the
//!    scheduler's earliest deadline.
//! 2. Callbacks hold a `Weak` handle, so a dropped page never runs again.
//! 3. Every callback advances the clock to wall time before dispatching.
//!
//! # Failure Modes
//!
//! - Re-entrant dispatch (a callback fired while another holds the core) is
//!   dropped rather than panicking.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Event, EventTarget, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MouseEvent, Window,
};
use web_time::Instant;

use folio_core::{IntersectionSample, TriggerKind};
use folio_web::{Hook, PageHost};

use super::dom_host::DomHost;
use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

type EventCallback = Closure<dyn FnMut(Event)>;
type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: EventCallback,
}

struct Shared {
    core: RefCell<RunnerCore<DomHost>>,
    window: Window,
    origin: Instant,
    timer: Cell<Option<i32>>,
    timer_callback: RefCell<Option<Closure<dyn FnMut()>>>,
    listeners: RefCell<Vec<Listener>>,
    observer_callbacks: RefCell<Vec<ObserverCallback>>,
}

impl Shared {
    fn elapsed_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn clear_timer(&self) {
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    /// Point the single browser timeout at the next scheduler deadline.
    fn rearm(&self) {
        self.clear_timer();
        let Some(wait_ms) = self
            .core
            .try_borrow_mut()
            .ok()
            .and_then(|mut core| core.next_timeout_ms())
        else {
            return;
        };
        let callback = self.timer_callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        let timeout = wait_ms.ceil().clamp(0.0, f64::from(i32::MAX)) as i32;
        if let Ok(handle) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout,
            )
        {
            self.timer.set(Some(handle));
        }
    }

    fn listen(&self, target: EventTarget, event: &'static str, callback: EventCallback) {
        if target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .is_ok()
        {
            self.listeners.borrow_mut().push(Listener {
                target,
                event,
                callback,
            });
        }
    }

    fn detach(&self) {
        self.clear_timer();
        for listener in self.listeners.borrow_mut().drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        if let Ok(mut core) = self.core.try_borrow_mut() {
            core.shutdown();
            core.host_mut().disconnect_observers();
        }
        self.observer_callbacks.borrow_mut().clear();
        self.timer_callback.borrow_mut().take();
    }
}

/// Sync the clock, run `f` against the core, then re-arm the timeout.
fn dispatch<R>(
    weak: &Weak<Shared>,
    f: impl FnOnce(&mut RunnerCore<DomHost>) -> R,
) -> Option<R> {
    let shared = weak.upgrade()?;
    let result = {
        let Ok(mut core) = shared.core.try_borrow_mut() else {
            return None;
        };
        core.set_time_ms(shared.elapsed_ms());
        f(&mut *core)
    };
    shared.rearm();
    Some(result)
}

fn observer_for(
    kind: TriggerKind,
    threshold: f64,
    weak: Weak<Shared>,
) -> Result<(IntersectionObserver, ObserverCallback), JsValue> {
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            dispatch(&weak, |core| {
                let host = core.host_mut();
                let samples: Vec<IntersectionSample> = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| {
                        IntersectionSample::new(
                            host.intern(&entry.target()),
                            entry.intersection_ratio(),
                            entry.is_intersecting(),
                        )
                    })
                    .collect();
                core.on_intersection(kind, &samples);
            });
        },
    );
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    Ok((observer, callback))
}

fn click_callback(weak: Weak<Shared>, element: folio_core::ElementId) -> EventCallback {
    Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let (x, y) = event
            .dyn_ref::<MouseEvent>()
            .map_or((0.0, 0.0), |m| (f64::from(m.client_x()), f64::from(m.client_y())));
        let response = dispatch(&weak, |core| core.on_click(element, x, y));
        if response.is_some_and(|r| r.prevent_default) {
            event.prevent_default();
        }
    })
}

fn submit_callback(weak: Weak<Shared>, form: folio_core::ElementId) -> EventCallback {
    Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let response = dispatch(&weak, |core| core.on_submit(form));
        if response.is_some_and(|r| r.prevent_default) {
            event.prevent_default();
        }
    })
}

/// Portfolio page behaviours bound to the current document.
#[wasm_bindgen]
pub struct PortfolioPage {
    shared: Rc<Shared>,
    mounted: bool,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl PortfolioPage {
    /// Create a page runner. `config_json` overrides the defaults; malformed
    /// or invalid config is reported by `configProblems()` and ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PortfolioPage, JsValue> {
        install_panic_hook();
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let core = RunnerCore::new(DomHost::new(window.clone(), document), config_json.as_deref());
        Ok(Self {
            shared: Rc::new(Shared {
                core: RefCell::new(core),
                window,
                origin: Instant::now(),
                timer: Cell::new(None),
                timer_callback: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                observer_callbacks: RefCell::new(Vec::new()),
            }),
            mounted: false,
        })
    }

    /// Wire every behaviour to the document and start the timer loop.
    ///
    /// Calling it again, including after `destroy()`, does nothing.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.mounted {
            return Ok(());
        }
        let shared = &self.shared;
        let weak = Rc::downgrade(shared);

        {
            let mut core = shared.core.borrow_mut();
            if core.host_mut().supports_intersection_observer() {
                for kind in TriggerKind::ALL {
                    let threshold = core.config().triggers.threshold(kind);
                    let (observer, callback) = observer_for(kind, threshold, weak.clone())?;
                    core.host_mut().install_observer(kind, observer);
                    shared.observer_callbacks.borrow_mut().push(callback);
                }
            }
            core.set_time_ms(shared.elapsed_ms());
            core.init();
        }

        let timer_weak = weak.clone();
        *shared.timer_callback.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
            dispatch(&timer_weak, |_| ());
        }));

        let (targets, forms) = {
            let mut core = shared.core.borrow_mut();
            let click_ids = core.click_targets();
            let form_ids = core.host_mut().query_all(Hook::ContactForm);
            let host = core.host_mut();
            let resolve = |ids: Vec<folio_core::ElementId>| -> Vec<_> {
                ids.into_iter()
                    .filter_map(|id| host.element(id).map(|el| (id, el.clone())))
                    .collect()
            };
            (resolve(click_ids), resolve(form_ids))
        };
        for (id, element) in targets {
            shared.listen(element.into(), "click", click_callback(weak.clone(), id));
        }
        for (id, element) in forms {
            shared.listen(element.into(), "submit", submit_callback(weak.clone(), id));
        }

        let scroll_weak = weak.clone();
        shared.listen(
            shared.window.clone().into(),
            "scroll",
            Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                dispatch(&scroll_weak, |core| core.on_scroll());
            }),
        );
        let resize_weak = weak;
        shared.listen(
            shared.window.clone().into(),
            "resize",
            Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                dispatch(&resize_weak, |core| core.on_resize());
            }),
        );

        shared.rearm();
        self.mounted = true;
        Ok(())
    }

    /// Detach listeners and observers and cancel every pending timer.
    pub fn destroy(&mut self) {
        self.shared.detach();
    }

    /// Advance the clock by `dt_ms` (host-driven mode). Returns tasks run.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) -> usize {
        let ran = self
            .shared
            .core
            .try_borrow_mut()
            .map_or(0, |mut core| core.advance_time_ms(dt_ms));
        self.shared.rearm();
        ran
    }

    /// Move the clock to `ts_ms` since construction (host-driven mode).
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ts_ms: f64) -> usize {
        let ran = self
            .shared
            .core
            .try_borrow_mut()
            .map_or(0, |mut core| core.set_time_ms(ts_ms));
        self.shared.rearm();
        ran
    }

    /// Milliseconds until the next scheduled task, or `undefined` when idle.
    #[wasm_bindgen(js_name = nextTimeout)]
    pub fn next_timeout(&self) -> Option<f64> {
        self.shared
            .core
            .try_borrow_mut()
            .ok()
            .and_then(|mut core| core.next_timeout_ms())
    }

    /// JSON snapshot of the derived page state.
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> String {
        self.shared
            .core
            .try_borrow()
            .map_or_else(|_| String::from("{}"), |core| core.state_json())
    }

    /// Problems found in the constructor's config, as an array of strings.
    #[wasm_bindgen(js_name = configProblems)]
    pub fn config_problems(&self) -> Array {
        let out = Array::new();
        if let Ok(core) = self.shared.core.try_borrow() {
            for problem in core.config_problems() {
                out.push(&JsValue::from_str(problem));
            }
        }
        out
    }
}

impl Drop for PortfolioPage {
    fn drop(&mut self) {
        if self.mounted {
            self.shared.detach();
        }
    }
}
