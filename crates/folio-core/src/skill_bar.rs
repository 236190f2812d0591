#![forbid(unsafe_code)]

//! Skill-bar fill.
//!
//! On activation a bar's width jumps to the percentage in its `data-percent`
//! attribute; CSS transitions supply any visible motion.

use crate::numeric::parse_leading_f64;

/// Target fill percentage from a raw `data-percent` value.
///
/// Invalid input coerces to 0; the result is clamped to [0, 100].
#[must_use]
pub fn skill_percent(raw: Option<&str>) -> f64 {
    parse_leading_f64(raw).clamp(0.0, 100.0)
}

/// CSS width for a raw `data-percent` value.
#[must_use]
pub fn skill_width(raw: Option<&str>) -> String {
    format!("{}%", skill_percent(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_percent() {
        assert_eq!(skill_width(Some("85")), "85%");
        assert_eq!(skill_width(Some("72.5")), "72.5%");
    }

    #[test]
    fn invalid_is_zero() {
        assert_eq!(skill_width(None), "0%");
        assert_eq!(skill_width(Some("lots")), "0%");
    }

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(skill_percent(Some("140")), 100.0);
        assert_eq!(skill_percent(Some("-3")), 0.0);
    }
}
