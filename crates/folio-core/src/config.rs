#![forbid(unsafe_code)]

//! Page configuration as data.
//!
//! Captures every tunable constant of the page behaviours as a single
//! [`PageConfig`] that the host can hand over as JSON at startup.
//!
//! ```json
//! {
//!   "scroll": { "back_to_top_threshold_px": 400 },
//!   "typing": { "phrases": ["Systems Engineer", "Rustacean"] },
//!   "contact": { "recipient": "me@example.org" }
//! }
//! ```
//!
//! Every field has a default, so partial documents are fine and
//! `PageConfig::default()` reproduces the stock page.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::counter::CounterTiming;
use crate::error::{ConfigError, Result};
use crate::trigger::TriggerKind;
use crate::typing::TypingTiming;

/// Top-level page configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Scroll-derived behaviours.
    pub scroll: ScrollPolicy,
    /// Intersection thresholds for one-shot triggers.
    pub triggers: TriggerPolicy,
    /// Statistic counter animation.
    pub counter: CounterPolicy,
    /// Typing effect.
    pub typing: TypingPolicy,
    /// Contact form.
    pub contact: ContactPolicy,
    /// Button ripple effect.
    pub ripple: RipplePolicy,
}

impl PageConfig {
    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        let problems = config.validate();
        if problems.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::invalid(problems))
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every parameter is within an acceptable range.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("scroll.active_header_offset_px", self.scroll.active_header_offset_px),
            ("scroll.scroll_header_offset_px", self.scroll.scroll_header_offset_px),
            ("scroll.back_to_top_threshold_px", self.scroll.back_to_top_threshold_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be a finite value >= 0, got {value}"));
            }
        }

        for (name, value) in [
            ("triggers.reveal_threshold", self.triggers.reveal_threshold),
            ("triggers.skill_bar_threshold", self.triggers.skill_bar_threshold),
            ("triggers.counter_threshold", self.triggers.counter_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{name} must be in [0, 1], got {value}"));
            }
        }

        if self.counter.tick_ms == 0 {
            errors.push("counter.tick_ms must be > 0".to_string());
        }
        if self.counter.duration_ms < self.counter.tick_ms {
            errors.push(format!(
                "counter.duration_ms ({}) must be >= counter.tick_ms ({})",
                self.counter.duration_ms, self.counter.tick_ms
            ));
        }

        if self.typing.phrases.iter().any(|p| p.is_empty()) {
            errors.push("typing.phrases must not contain empty phrases".to_string());
        }
        for (name, value) in [
            ("typing.type_ms", self.typing.type_ms),
            ("typing.delete_ms", self.typing.delete_ms),
        ] {
            if value == 0 {
                errors.push(format!("{name} must be > 0"));
            }
        }

        if self.contact.recipient.trim().is_empty() {
            errors.push("contact.recipient must not be empty".to_string());
        }

        errors
    }
}

/// Scroll-derived behaviour parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollPolicy {
    /// Header compensation for active-section selection.
    pub active_header_offset_px: f64,
    /// Header compensation when smooth-scrolling to an anchor.
    pub scroll_header_offset_px: f64,
    /// Back-to-top shows strictly above this offset.
    pub back_to_top_threshold_px: f64,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            active_header_offset_px: 120.0,
            scroll_header_offset_px: 72.0,
            back_to_top_threshold_px: 300.0,
        }
    }
}

/// Visible-area fractions that activate one-shot triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerPolicy {
    pub reveal_threshold: f64,
    pub skill_bar_threshold: f64,
    pub counter_threshold: f64,
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.2,
            skill_bar_threshold: 0.5,
            counter_threshold: 0.5,
        }
    }
}

impl TriggerPolicy {
    /// Threshold for one trigger kind.
    #[must_use]
    pub const fn threshold(&self, kind: TriggerKind) -> f64 {
        match kind {
            TriggerKind::Reveal => self.reveal_threshold,
            TriggerKind::SkillBar => self.skill_bar_threshold,
            TriggerKind::Counter => self.counter_threshold,
        }
    }
}

/// Statistic counter timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterPolicy {
    pub duration_ms: u64,
    pub tick_ms: u64,
}

impl Default for CounterPolicy {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            tick_ms: 16,
        }
    }
}

impl CounterPolicy {
    /// Timing for [`crate::counter::CounterAnimation`].
    #[must_use]
    pub fn timing(&self) -> CounterTiming {
        CounterTiming::new(
            Duration::from_millis(self.duration_ms),
            Duration::from_millis(self.tick_ms),
        )
    }
}

/// Typing effect phrases and pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingPolicy {
    pub phrases: Vec<String>,
    /// Delay after each typed character.
    pub type_ms: u64,
    /// Delay after each deleted character.
    pub delete_ms: u64,
    /// Pause once a phrase is fully typed.
    pub hold_ms: u64,
    /// Pause once a phrase is fully deleted.
    pub gap_ms: u64,
}

impl Default for TypingPolicy {
    fn default() -> Self {
        Self {
            phrases: vec![
                "Full-Stack Web Developer".to_string(),
                "Backend Developer".to_string(),
                "Frontend Developer".to_string(),
            ],
            type_ms: 100,
            delete_ms: 50,
            hold_ms: 2000,
            gap_ms: 500,
        }
    }
}

impl TypingPolicy {
    /// Timing for [`crate::typing::TypingEffect`].
    #[must_use]
    pub fn timing(&self) -> TypingTiming {
        TypingTiming {
            type_delay: Duration::from_millis(self.type_ms),
            delete_delay: Duration::from_millis(self.delete_ms),
            hold_delay: Duration::from_millis(self.hold_ms),
            gap_delay: Duration::from_millis(self.gap_ms),
        }
    }
}

/// Contact form behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPolicy {
    /// Address placed in the mailto URI.
    pub recipient: String,
    /// Subject used if the subject field is blank.
    pub default_subject: String,
    /// How long a banner stays shown.
    pub banner_visible_ms: u64,
    /// Fade-out time between hiding and clearing a banner.
    pub banner_fade_ms: u64,
    /// Delay between the success banner and opening the mail client.
    pub navigate_delay_ms: u64,
}

impl Default for ContactPolicy {
    fn default() -> Self {
        Self {
            recipient: "hello@example.com".to_string(),
            default_subject: "Portfolio Contact".to_string(),
            banner_visible_ms: 5000,
            banner_fade_ms: 300,
            navigate_delay_ms: 500,
        }
    }
}

impl ContactPolicy {
    #[must_use]
    pub fn banner_visible(&self) -> Duration {
        Duration::from_millis(self.banner_visible_ms)
    }

    #[must_use]
    pub fn banner_fade(&self) -> Duration {
        Duration::from_millis(self.banner_fade_ms)
    }

    #[must_use]
    pub fn navigate_delay(&self) -> Duration {
        Duration::from_millis(self.navigate_delay_ms)
    }
}

/// Ripple effect lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RipplePolicy {
    pub lifetime_ms: u64,
}

impl Default for RipplePolicy {
    fn default() -> Self {
        Self { lifetime_ms: 600 }
    }
}

impl RipplePolicy {
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        assert!(PageConfig::default().validate().is_empty());
    }

    #[test]
    fn defaults_match_stock_page() {
        let config = PageConfig::default();
        assert_eq!(config.scroll.active_header_offset_px, 120.0);
        assert_eq!(config.scroll.scroll_header_offset_px, 72.0);
        assert_eq!(config.scroll.back_to_top_threshold_px, 300.0);
        assert_eq!(config.triggers.reveal_threshold, 0.2);
        assert_eq!(config.triggers.counter_threshold, 0.5);
        assert_eq!(config.counter, CounterPolicy { duration_ms: 2000, tick_ms: 16 });
        assert_eq!(config.typing.phrases.len(), 3);
        assert_eq!(config.contact.banner_visible_ms, 5000);
        assert_eq!(config.ripple.lifetime_ms, 600);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = PageConfig::from_json_str(
            r#"{"scroll":{"back_to_top_threshold_px":450},"contact":{"recipient":"me@example.org"}}"#,
        )
        .unwrap();
        assert_eq!(config.scroll.back_to_top_threshold_px, 450.0);
        assert_eq!(config.scroll.active_header_offset_px, 120.0);
        assert_eq!(config.contact.recipient, "me@example.org");
        assert_eq!(config.contact.default_subject, "Portfolio Contact");
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(PageConfig::from_json_str("{}").unwrap(), PageConfig::default());
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = PageConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let err = PageConfig::from_json_str(
            r#"{"triggers":{"reveal_threshold":1.5},"counter":{"tick_ms":0},"typing":{"phrases":["ok",""]}}"#,
        )
        .unwrap_err();
        let ConfigError::Invalid { problems } = err else {
            panic!("expected validation failure");
        };
        assert_eq!(problems.len(), 3, "{problems:?}");
        assert!(problems.iter().any(|p| p.contains("reveal_threshold")));
        assert!(problems.iter().any(|p| p.contains("tick_ms")));
        assert!(problems.iter().any(|p| p.contains("empty phrases")));
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let mut config = PageConfig::default();
        config.typing.phrases = vec!["Rustacean".into()];
        let json = config.to_json_string().unwrap();
        assert_eq!(PageConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn timing_accessors_convert_millis() {
        let config = PageConfig::default();
        assert_eq!(config.contact.navigate_delay(), Duration::from_millis(500));
        assert_eq!(config.ripple.lifetime(), Duration::from_millis(600));
        assert_eq!(config.typing.timing().hold_delay, Duration::from_secs(2));
    }
}
