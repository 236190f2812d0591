#![forbid(unsafe_code)]

//! Back-to-top control visibility.

/// `true` iff `scroll_y` is strictly past `threshold`.
#[must_use]
pub fn back_to_top_visible(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Remembers the last visibility so callers can tell when it flips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackToTop {
    threshold: f64,
    visible: bool,
}

impl BackToTop {
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self {
            threshold,
            visible: false,
        }
    }

    /// Recompute visibility. Returns `true` if it changed.
    pub fn update(&mut self, scroll_y: f64) -> bool {
        let next = back_to_top_visible(scroll_y, self.threshold);
        let changed = next != self.visible;
        self.visible = next;
        changed
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_hidden() {
        assert!(!back_to_top_visible(300.0, 300.0));
        assert!(back_to_top_visible(301.0, 300.0));
        assert!(!back_to_top_visible(0.0, 300.0));
    }

    #[test]
    fn tracker_reports_flips() {
        let mut control = BackToTop::new(300.0);
        assert!(!control.update(100.0));
        assert!(control.update(450.0));
        assert!(control.is_visible());
        assert!(!control.update(500.0));
        assert!(control.update(300.0));
        assert!(!control.is_visible());
    }
}
