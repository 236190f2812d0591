#![forbid(unsafe_code)]

//! Browser runner for the portfolio page behaviours.
//!
//! This crate provides [`PortfolioPage`], a `wasm-bindgen`-exported struct
//! that binds a [`folio_web::PageController`] to the live document through a
//! `web-sys` host. It attaches scroll, resize, click and submit listeners,
//! one `IntersectionObserver` per trigger kind, and keeps a single browser
//! timeout armed for the scheduler's next deadline.
//!
//! Hosts that want to drive time themselves can skip `mount()` and call
//! `setTime`/`advanceTime` directly.

#[cfg(target_arch = "wasm32")]
mod dom_host;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PortfolioPage;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;

#[cfg(any(target_arch = "wasm32", test))]
mod registry;

#[cfg(test)]
mod tests {
    use crate::runner_core::RunnerCore;
    use folio_core::{IntersectionSample, TriggerKind};
    use folio_web::{Hook, MemoryElement, MemoryHost};
    use pretty_assertions::assert_eq;

    fn counter_page() -> (MemoryHost, folio_core::ElementId) {
        let mut host = MemoryHost::new();
        let stat = host.insert(MemoryElement::new([Hook::StatCounter]).with_attr("data-target", "40"));
        (host, stat)
    }

    fn state(core: &RunnerCore<MemoryHost>) -> serde_json::Value {
        serde_json::from_str(&core.state_json()).expect("state json should parse")
    }

    #[test]
    fn missing_config_uses_defaults() {
        let mut core = RunnerCore::new(MemoryHost::new(), None);
        core.init();
        assert!(core.config_problems().is_empty());

        let blank = RunnerCore::new(MemoryHost::new(), Some("   "));
        assert!(blank.config_problems().is_empty());
    }

    #[test]
    fn malformed_config_falls_back_with_one_problem() {
        let core = RunnerCore::new(MemoryHost::new(), Some("{ not json"));
        assert_eq!(core.config_problems().len(), 1);
        assert!(core.config_problems()[0].starts_with("JSON error"));
    }

    #[test]
    fn invalid_config_reports_every_problem() {
        let json = r#"{"triggers": {"reveal_threshold": 1.5}, "counter": {"tick_ms": 0}}"#;
        let core = RunnerCore::new(MemoryHost::new(), Some(json));
        let problems = core.config_problems();
        assert!(problems.iter().any(|p| p.contains("triggers.reveal_threshold")));
        assert!(problems.iter().any(|p| p.contains("counter.tick_ms")));
    }

    #[test]
    fn valid_config_is_applied() {
        let json = r#"{"contact": {"recipient": "me@example.org"}}"#;
        let mut host = MemoryHost::new();
        let form = host.insert(MemoryElement::new([Hook::ContactForm]));
        host.insert(MemoryElement::new([Hook::FormMessage]));
        host.set_field(form, "name", "Ada");
        host.set_field(form, "email", "ada@example.com");
        host.set_field(form, "subject", "Hi");
        host.set_field(form, "message", "Hello");

        let mut core = RunnerCore::new(host, Some(json));
        core.init();
        assert!(core.on_submit(form).prevent_default);
        core.advance_time_ms(500.0);

        let navigations = core.host().navigations();
        assert_eq!(navigations.len(), 1);
        assert!(navigations[0].starts_with("mailto:me%40example.org?"));
    }

    #[test]
    fn noisy_time_input_is_ignored() {
        let mut core = RunnerCore::new(MemoryHost::new(), None);
        core.init();
        core.advance_time_ms(250.0);

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -5.0, 0.0] {
            assert_eq!(core.advance_time_ms(bad), 0);
            assert_eq!(core.set_time_ms(bad), 0);
        }
        assert_eq!(core.now_ms(), 250.0);

        // Absolute time never moves backwards.
        core.set_time_ms(100.0);
        assert_eq!(core.now_ms(), 250.0);
        core.set_time_ms(400.0);
        assert_eq!(core.now_ms(), 400.0);
    }

    #[test]
    fn next_timeout_tracks_counter_ticks() {
        let (host, stat) = counter_page();
        let mut core = RunnerCore::new(host, None);
        core.init();
        assert_eq!(core.next_timeout_ms(), None);

        core.on_intersection(
            TriggerKind::Counter,
            &[IntersectionSample::new(stat, 0.8, true)],
        );
        assert_eq!(core.next_timeout_ms(), Some(16.0));

        core.advance_time_ms(10.0);
        assert_eq!(core.next_timeout_ms(), Some(6.0));
        core.advance_time_ms(6.0);
        assert_eq!(core.next_timeout_ms(), Some(16.0));

        core.advance_time_ms(5_000.0);
        assert_eq!(core.next_timeout_ms(), None);
        assert_eq!(core.host().text(stat), "40+");
    }

    #[test]
    fn state_json_reports_derived_state() {
        let (host, stat) = counter_page();
        let mut core = RunnerCore::new(host, None);
        core.init();
        core.on_intersection(
            TriggerKind::Counter,
            &[IntersectionSample::new(stat, 1.0, true)],
        );

        let value = state(&core);
        assert_eq!(value["active_section"], serde_json::Value::Null);
        assert_eq!(value["back_to_top_visible"], false);
        assert_eq!(value["triggers"]["counter"]["registered"], 1);
        assert_eq!(value["triggers"]["counter"]["fired"], 1);
        assert_eq!(value["triggers"]["reveal"]["fired"], 0);
        assert_eq!(value["config_problems"], serde_json::json!([]));
    }

    #[test]
    fn shutdown_leaves_nothing_scheduled() {
        let (host, stat) = counter_page();
        let mut core = RunnerCore::new(host, None);
        core.init();
        core.on_intersection(
            TriggerKind::Counter,
            &[IntersectionSample::new(stat, 1.0, true)],
        );
        core.shutdown();
        assert_eq!(core.next_timeout_ms(), None);
        assert_eq!(state(&core)["pending_tasks"], 0);
    }
}
