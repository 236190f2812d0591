//! Property-based invariant tests for scroll-derived page state.
//!
//! 1. Active section is the greatest offset at or before scroll + header
//! 2. Progress is clamped to [0, 100] and 0 for unscrollable documents
//! 3. Back-to-top is visible iff strictly past the threshold
//! 4. Counters never decrease, never overshoot, and end at the target
//! 5. One-shot triggers are idempotent
//! 6. Carousel keeps exactly one active slide under any move sequence

use core::time::Duration;

use folio_core::carousel::Carousel;
use folio_core::counter::{CounterAnimation, CounterTiming, format_counter};
use folio_core::scroll::{back_to_top_visible, scroll_progress, select_active_section};
use folio_core::trigger::{OneShotSet, TriggerKind};
use folio_core::{ElementId, IntersectionSample, SectionDescriptor};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// Sections with strictly increasing tops, as laid out in a document.
fn sections_strategy() -> impl Strategy<Value = Vec<SectionDescriptor>> {
    prop::collection::vec(1.0f64..2000.0, 0..12).prop_map(|heights| {
        let mut top = 0.0;
        heights
            .into_iter()
            .enumerate()
            .map(|(i, height)| {
                let section = SectionDescriptor::new(format!("s{i}"), top, height);
                top += height;
                section
            })
            .collect()
    })
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Active section
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn active_section_is_greatest_qualifying_offset(
        sections in sections_strategy(),
        scroll_y in 0.0f64..30_000.0,
        header in 0.0f64..200.0,
    ) {
        let expected = sections
            .iter()
            .filter(|s| s.top <= scroll_y + header)
            .max_by(|a, b| a.top.total_cmp(&b.top))
            .map(|s| s.id.clone());
        let got = select_active_section(&sections, scroll_y, header).map(|s| s.id.clone());
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn first_section_active_at_top(sections in sections_strategy(), header in 0.0f64..200.0) {
        prop_assume!(!sections.is_empty());
        let got = select_active_section(&sections, 0.0, header).map(|s| s.top);
        // The first section starts at 0, so something is always active; it
        // is the first one unless the header reaches into the next section.
        prop_assert!(got.is_some());
        prop_assert!(got.unwrap() <= header);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Progress
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn progress_is_clamped(
        scroll_y in -5_000.0f64..50_000.0,
        document in 0.0f64..40_000.0,
        viewport in 1.0f64..3_000.0,
    ) {
        let p = scroll_progress(scroll_y, document, viewport);
        prop_assert!(p.is_finite());
        prop_assert!((0.0..=100.0).contains(&p));
        if document - viewport <= 0.0 {
            prop_assert_eq!(p, 0.0);
        }
    }

    #[test]
    fn progress_endpoints(extra in 1.0f64..40_000.0, viewport in 1.0f64..3_000.0) {
        let document = viewport + extra;
        prop_assert_eq!(scroll_progress(0.0, document, viewport), 0.0);
        prop_assert!((scroll_progress(extra, document, viewport) - 100.0).abs() < 1e-9);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Back-to-top
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn back_to_top_strictly_past_threshold(scroll_y in 0.0f64..2_000.0) {
        prop_assert_eq!(back_to_top_visible(scroll_y, 300.0), scroll_y > 300.0);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Counters
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn counter_monotonic_and_exact(
        target in 0u64..100_000,
        duration_ms in 16u64..5_000,
        tick_ms in 1u64..64,
    ) {
        let timing = CounterTiming::new(
            Duration::from_millis(duration_ms),
            Duration::from_millis(tick_ms),
        );
        let mut anim = CounterAnimation::new(target, timing);
        anim.start(Duration::ZERO);
        let mut prev = 0;
        let mut last = None;
        let mut steps = 0u32;
        while let Some(deadline) = anim.next_deadline() {
            let frame = anim.step(deadline).unwrap();
            prop_assert!(frame.value >= prev);
            prop_assert!(frame.value <= target);
            prev = frame.value;
            last = Some(frame);
            steps += 1;
            prop_assert!(steps <= 10_000);
        }
        let last = last.unwrap();
        prop_assert_eq!(last.value, target);
        prop_assert_eq!(last.text, format_counter(target, target));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. One-shot triggers
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn triggers_fire_at_most_once(
        samples in prop::collection::vec((0u32..8, 0.0f64..1.0, any::<bool>()), 0..64),
    ) {
        let mut set = OneShotSet::new(TriggerKind::Reveal, 0.2);
        for id in 0..8 {
            set.register(ElementId(id));
        }
        let mut fired = std::collections::HashSet::new();
        for (id, ratio, intersecting) in samples {
            let sample = IntersectionSample::new(ElementId(id), ratio, intersecting);
            if let Some(activation) = set.offer(&sample) {
                prop_assert!(fired.insert(activation.element), "fired twice: {:?}", activation);
            }
            if fired.contains(&ElementId(id)) {
                prop_assert!(set.is_fired(ElementId(id)));
            }
        }
        prop_assert_eq!(set.fired_len(), fired.len());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Carousel
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn carousel_index_stays_in_range(len in 2u32..10, moves in prop::collection::vec(any::<bool>(), 0..50)) {
        let mut carousel = Carousel::new((0..len).map(ElementId).collect()).unwrap();
        let mut expected: i64 = 0;
        for forward in moves {
            let change = if forward { carousel.next() } else { carousel.prev() };
            expected = (expected + if forward { 1 } else { -1 }).rem_euclid(i64::from(len));
            prop_assert_eq!(change.activate, ElementId(expected as u32));
            prop_assert!(carousel.current() < len as usize);
        }
    }
}
