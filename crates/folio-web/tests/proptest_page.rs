#![forbid(unsafe_code)]

//! Property tests for the page controller under arbitrary event streams.

use core::time::Duration;

use folio_core::{ElementId, IntersectionSample, PageConfig, Rect, ScrollMetrics, TriggerKind};
use folio_web::{Hook, MemoryElement, MemoryHost, PageController};
use proptest::prelude::*;

const SECTIONS: [(&str, f64); 4] = [
    ("home", 0.0),
    ("about", 700.0),
    ("projects", 1500.0),
    ("contact", 2600.0),
];

fn section_page() -> (PageController<MemoryHost>, Vec<ElementId>, ElementId) {
    let mut host = MemoryHost::new();
    host.set_metrics(ScrollMetrics::new(0.0, 800.0, 3400.0));
    let links = SECTIONS
        .iter()
        .map(|(id, _)| {
            host.insert(MemoryElement::new([Hook::NavLink]).with_attr("href", &format!("#{id}")))
        })
        .collect();
    for (i, (id, top)) in SECTIONS.iter().enumerate() {
        let bottom = SECTIONS.get(i + 1).map_or(3400.0, |(_, next)| *next);
        host.insert(
            MemoryElement::new([Hook::Section])
                .with_id(id)
                .with_rect(Rect::new(0.0, *top, 1000.0, bottom - top)),
        );
    }
    let progress = host.insert(MemoryElement::new([Hook::ProgressBar]));
    let mut page = PageController::new(host, PageConfig::default());
    page.init(Duration::ZERO);
    (page, links, progress)
}

proptest! {
    #[test]
    fn one_link_tracks_active_section(positions in prop::collection::vec(0.0f64..3000.0, 1..24)) {
        let (mut page, links, progress) = section_page();
        for y in positions {
            page.host_mut().set_scroll_y(y);
            page.on_scroll();

            let active: Vec<usize> = links
                .iter()
                .enumerate()
                .filter(|(_, link)| page.host().has_class(**link, "active"))
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(active.len(), 1);
            let expected = page.aggregator().active_section().map(str::to_string);
            prop_assert_eq!(Some(SECTIONS[active[0]].0.to_string()), expected);

            let width = page.host().style(progress, "width").unwrap_or("");
            let percent: f64 = width.trim_end_matches('%').parse().unwrap_or(-1.0);
            prop_assert!((0.0..=100.0).contains(&percent), "width {}", width);
        }
    }

    #[test]
    fn reveal_fires_once_per_element(
        samples in prop::collection::vec((0usize..5, 0.0f64..=1.0, any::<bool>()), 0..40),
    ) {
        let mut host = MemoryHost::new();
        let blocks: Vec<ElementId> = (0..5)
            .map(|_| host.insert(MemoryElement::new([Hook::Reveal])))
            .collect();
        let mut page = PageController::new(host, PageConfig::default());
        page.init(Duration::ZERO);

        let mut total = 0;
        for (index, ratio, intersecting) in samples {
            let sample = IntersectionSample::new(blocks[index], ratio, intersecting);
            total += page.on_intersection(TriggerKind::Reveal, &[sample]);
        }

        let visible = blocks
            .iter()
            .filter(|b| page.host().has_class(**b, "visible"))
            .count();
        prop_assert_eq!(visible, total);
        prop_assert_eq!(page.aggregator().triggers(TriggerKind::Reveal).fired_len(), total);
        for block in &blocks {
            let observed = page.host().observed_threshold(TriggerKind::Reveal, *block).is_some();
            prop_assert_eq!(observed, !page.host().has_class(*block, "visible"));
        }
    }
}
