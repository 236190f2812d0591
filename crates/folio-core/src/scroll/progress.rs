#![forbid(unsafe_code)]

//! Scroll-progress meter.
//!
//! # Failure Modes
//!
//! - Content shorter than the viewport (scrollable height <= 0): progress is 0.
//! - Non-finite inputs: progress is 0.

/// Percentage of the scrollable height already scrolled, clamped to [0, 100].
#[must_use]
pub fn scroll_progress(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if !scrollable.is_finite() || scrollable <= 0.0 || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

/// CSS width value for a progress percentage.
#[must_use]
pub fn progress_width(percent: f64) -> String {
    format!("{percent}%")
}
