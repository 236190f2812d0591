#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping [`PageController`].
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.

use core::time::Duration;

use folio_core::error::ConfigError;
use folio_core::{ElementId, IntersectionSample, PageConfig, TriggerKind};
use folio_web::{ClickResponse, DeterministicClock, PageController, PageHost};

/// Page controller plus the deterministic clock the host drives.
pub struct RunnerCore<H> {
    page: PageController<H>,
    clock: DeterministicClock,
    /// Problems found while loading the host-provided config.
    config_problems: Vec<String>,
}

/// Decode `json`, falling back to defaults when it is malformed or invalid.
fn load_config(json: Option<&str>) -> (PageConfig, Vec<String>) {
    let Some(json) = json.filter(|s| !s.trim().is_empty()) else {
        return (PageConfig::default(), Vec::new());
    };
    match PageConfig::from_json_str(json) {
        Ok(config) => (config, Vec::new()),
        Err(err) => {
            let problems = match err {
                ConfigError::Invalid { problems } => problems,
                other => vec![other.to_string()],
            };
            tracing::warn!(
                problems = ?problems,
                "page config rejected; using defaults"
            );
            (PageConfig::default(), problems)
        }
    }
}

fn duration_to_ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

fn duration_from_ms(ms: f64) -> Duration {
    let nanos = (ms * 1_000_000.0).round().min(u64::MAX as f64);
    Duration::from_nanos(nanos as u64)
}

impl<H: PageHost> RunnerCore<H> {
    pub fn new(host: H, config_json: Option<&str>) -> Self {
        let (config, config_problems) = load_config(config_json);
        Self {
            page: PageController::new(host, config),
            clock: DeterministicClock::new(),
            config_problems,
        }
    }

    /// Wire every behaviour at the current clock time.
    pub fn init(&mut self) {
        self.page.init(self.clock.now());
    }

    // --- time ---

    /// Advance the clock by `dt_ms` and run every task that fell due.
    pub fn advance_time_ms(&mut self, dt_ms: f64) -> usize {
        // Host timers can report NaN or negative deltas; ignore them.
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return 0;
        }
        self.clock.advance(duration_from_ms(dt_ms));
        self.page.advance(self.clock.now())
    }

    /// Move the clock to an absolute time since mount. Never goes backwards.
    pub fn set_time_ms(&mut self, ts_ms: f64) -> usize {
        if !ts_ms.is_finite() || ts_ms <= 0.0 {
            return 0;
        }
        self.clock.set(duration_from_ms(ts_ms));
        self.page.advance(self.clock.now())
    }

    pub fn now_ms(&self) -> f64 {
        duration_to_ms(self.clock.now())
    }

    /// Milliseconds until the next scheduled task, or `None` when idle.
    pub fn next_timeout_ms(&mut self) -> Option<f64> {
        let deadline = self.page.next_deadline()?;
        let wait = deadline.saturating_sub(self.clock.now());
        Some(duration_to_ms(wait))
    }

    // --- events ---

    pub fn on_scroll(&mut self) {
        self.page.on_scroll();
    }

    pub fn on_resize(&mut self) {
        self.page.on_resize();
    }

    pub fn on_click(&mut self, element: ElementId, client_x: f64, client_y: f64) -> ClickResponse {
        self.page.on_click(element, client_x, client_y)
    }

    pub fn on_submit(&mut self, form: ElementId) -> ClickResponse {
        self.page.on_submit(form)
    }

    pub fn on_intersection(&mut self, kind: TriggerKind, samples: &[IntersectionSample]) -> usize {
        self.page.on_intersection(kind, samples)
    }

    // --- queries ---

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub fn click_targets(&self) -> Vec<ElementId> {
        self.page.click_targets()
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub fn config(&self) -> &PageConfig {
        self.page.config()
    }

    pub fn config_problems(&self) -> &[String] {
        &self.config_problems
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub fn host_mut(&mut self) -> &mut H {
        self.page.host_mut()
    }

    #[cfg(test)]
    pub fn host(&self) -> &H {
        self.page.host()
    }

    /// Snapshot of the derived page state for host-side diagnostics.
    pub fn state_json(&self) -> String {
        let aggregator = self.page.aggregator();
        let triggers: serde_json::Map<String, serde_json::Value> = TriggerKind::ALL
            .iter()
            .map(|&kind| {
                let set = aggregator.triggers(kind);
                (
                    kind.label().to_string(),
                    serde_json::json!({
                        "registered": set.registered_len(),
                        "fired": set.fired_len(),
                    }),
                )
            })
            .collect();
        serde_json::json!({
            "now_ms": self.now_ms(),
            "active_section": aggregator.active_section(),
            "back_to_top_visible": aggregator.back_to_top_visible(),
            "sidebar_open": self.page.is_sidebar_open(),
            "scroll_ticks": aggregator.ticks(),
            "pending_tasks": self.page.pending_tasks(),
            "triggers": triggers,
            "config_problems": self.config_problems,
        })
        .to_string()
    }

    /// Cancel every timer and intersection subscription.
    pub fn shutdown(&mut self) {
        self.page.shutdown();
    }
}
