#![forbid(unsafe_code)]

//! Project image carousel.
//!
//! Each carousel instance owns its slide list and current index. Exactly one
//! slide is active at any time; prev/next wrap around.

use crate::geometry::ElementId;

/// Class marking the visible slide.
pub const ACTIVE_SLIDE_CLASS: &str = "is-active";

/// Slides to deactivate and activate after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChange {
    pub deactivate: ElementId,
    pub activate: ElementId,
}

/// Per-instance carousel state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    slides: Vec<ElementId>,
    current: usize,
}

impl Carousel {
    /// Build a carousel; `None` unless there are at least two slides.
    #[must_use]
    pub fn new(slides: Vec<ElementId>) -> Option<Self> {
        (slides.len() > 1).then_some(Self { slides, current: 0 })
    }

    /// Initial `(slide, active)` states: only the first slide is active.
    pub fn initial_states(&self) -> impl Iterator<Item = (ElementId, bool)> + '_ {
        self.slides
            .iter()
            .enumerate()
            .map(move |(i, &slide)| (slide, i == self.current))
    }

    /// Move to `index`, wrapping modulo the slide count.
    pub fn go_to(&mut self, index: isize) -> SlideChange {
        let deactivate = self.slides[self.current];
        let len = self.slides.len() as isize;
        self.current = index.rem_euclid(len) as usize;
        SlideChange {
            deactivate,
            activate: self.slides[self.current],
        }
    }

    pub fn next(&mut self) -> SlideChange {
        self.go_to(self.current as isize + 1)
    }

    pub fn prev(&mut self) -> SlideChange {
        self.go_to(self.current as isize - 1)
    }

    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn active_slide(&self) -> ElementId {
        self.slides[self.current]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(n: u32) -> Carousel {
        Carousel::new((0..n).map(ElementId).collect()).unwrap()
    }

    #[test]
    fn needs_two_slides() {
        assert!(Carousel::new(vec![]).is_none());
        assert!(Carousel::new(vec![ElementId(1)]).is_none());
        assert!(Carousel::new(vec![ElementId(1), ElementId(2)]).is_some());
    }

    #[test]
    fn first_slide_starts_active() {
        let c = carousel(3);
        let states: Vec<_> = c.initial_states().collect();
        assert_eq!(
            states,
            vec![
                (ElementId(0), true),
                (ElementId(1), false),
                (ElementId(2), false)
            ]
        );
    }

    #[test]
    fn next_wraps_forward() {
        let mut c = carousel(3);
        c.next();
        c.next();
        let change = c.next();
        assert_eq!(
            change,
            SlideChange {
                deactivate: ElementId(2),
                activate: ElementId(0)
            }
        );
        assert_eq!(c.current(), 0);
    }

    #[test]
    fn prev_wraps_backward() {
        let mut c = carousel(3);
        let change = c.prev();
        assert_eq!(change.activate, ElementId(2));
        assert_eq!(c.active_slide(), ElementId(2));
    }

    #[test]
    fn go_to_large_indices() {
        let mut c = carousel(4);
        c.go_to(-9);
        assert_eq!(c.current(), 3);
        c.go_to(10);
        assert_eq!(c.current(), 2);
    }
}
