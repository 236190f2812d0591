#![forbid(unsafe_code)]

//! Contact form: validation, mailto construction, and the status banner.
//!
//! The form never transmits anything. A valid submission becomes a `mailto:`
//! URI that the host navigates to, so the visitor's own mail client sends
//! the message.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Separator line between the message and the sender details.
const BODY_RULE: &str = "-------------";

/// Why a submission was rejected. The message is shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Please fill in all fields.")]
    MissingField,

    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Trimmed contact-form fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// Build from raw field values, trimming each one.
    #[must_use]
    pub fn new(name: &str, email: &str, subject: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            subject: subject.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    /// Every field is required and the email must look like `local@domain.tld`.
    pub fn validate(&self) -> Result<(), ContactError> {
        if [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(ContactError::MissingField);
        }
        if !is_valid_email(&self.email) {
            return Err(ContactError::InvalidEmail);
        }
        Ok(())
    }

    /// Message body: the message, a rule, and the sender's details.
    #[must_use]
    pub fn body(&self) -> String {
        let from = format!(
            "From: {}",
            if self.name.is_empty() {
                "Anonymous"
            } else {
                self.name.as_str()
            }
        );
        let email = if self.email.is_empty() {
            String::new()
        } else {
            format!("Email: {}", self.email)
        };
        [self.message.as_str(), BODY_RULE, from.as_str(), email.as_str()]
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `mailto:` URI addressed to `recipient`.
    ///
    /// Falls back to `default_subject` when the subject is blank.
    #[must_use]
    pub fn mailto_uri(&self, recipient: &str, default_subject: &str) -> String {
        let subject = if self.subject.is_empty() {
            default_subject
        } else {
            self.subject.as_str()
        };
        format!(
            "mailto:{}?subject={}&body={}",
            encode_uri_component(recipient),
            encode_uri_component(subject),
            encode_uri_component(&self.body())
        )
    }
}

/// Simple `local@domain.tld` shape check; not RFC 5322.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
#[must_use]
pub fn encode_uri_component(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0f) as usize] as char);
            }
        }
    }
    out
}

/// Banner flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Font Awesome icon class.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "fa-check-circle",
            Self::Error => "fa-exclamation-circle",
        }
    }
}

/// Base class of the banner element.
pub const BANNER_BASE_CLASS: &str = "form-message";

/// Banner lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerPhase {
    Empty,
    Shown,
    Fading,
}

/// Status banner state.
///
/// Each `show` bumps a generation; hide/clear requests for an older
/// generation are ignored so a fresh banner is never dismissed early by the
/// timers of the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    generation: u64,
    phase: BannerPhase,
    kind: Option<BannerKind>,
    text: String,
}

impl Default for Banner {
    fn default() -> Self {
        Self::new()
    }
}

impl Banner {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            phase: BannerPhase::Empty,
            kind: None,
            text: String::new(),
        }
    }

    /// Show a banner; returns its generation.
    pub fn show(&mut self, kind: BannerKind, text: impl Into<String>) -> u64 {
        self.generation += 1;
        self.phase = BannerPhase::Shown;
        self.kind = Some(kind);
        self.text = text.into();
        self.generation
    }

    /// Start fading the banner of `generation`. Returns `false` if stale.
    pub fn hide(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != BannerPhase::Shown {
            return false;
        }
        self.phase = BannerPhase::Fading;
        true
    }

    /// Clear the banner of `generation`. Returns `false` if stale.
    pub fn clear(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != BannerPhase::Fading {
            return false;
        }
        self.phase = BannerPhase::Empty;
        self.kind = None;
        self.text.clear();
        true
    }

    #[must_use]
    pub const fn phase(&self) -> BannerPhase {
        self.phase
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Class attribute for the current phase.
    #[must_use]
    pub fn class_name(&self) -> String {
        match (self.phase, self.kind) {
            (BannerPhase::Shown, Some(kind)) => {
                format!("{BANNER_BASE_CLASS} {} show", kind.class())
            }
            (BannerPhase::Fading, Some(kind)) => format!("{BANNER_BASE_CLASS} {}", kind.class()),
            _ => BANNER_BASE_CLASS.to_string(),
        }
    }

    /// Inner markup for the current phase; empty once cleared.
    #[must_use]
    pub fn inner_html(&self) -> String {
        match self.kind {
            Some(kind) if self.phase != BannerPhase::Empty => format!(
                r#"<i class="fas {}"></i><span>{}</span>"#,
                kind.icon(),
                escape_html(&self.text)
            ),
            _ => String::new(),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid() -> ContactSubmission {
        ContactSubmission::new(" Ada ", "ada@example.com", "Hello there", "Let's talk & build.")
    }

    #[test]
    fn trims_fields() {
        let sub = valid();
        assert_eq!(sub.name, "Ada");
        assert!(sub.validate().is_ok());
    }

    #[test]
    fn empty_field_is_missing() {
        for sub in [
            ContactSubmission::new("", "a@b.co", "s", "m"),
            ContactSubmission::new("n", "   ", "s", "m"),
            ContactSubmission::new("n", "a@b.co", "", "m"),
            ContactSubmission::new("n", "a@b.co", "s", "\n\t"),
        ] {
            assert_eq!(sub.validate(), Err(ContactError::MissingField));
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("no-at.example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@b."));
        let sub = ContactSubmission::new("n", "nope", "s", "m");
        assert_eq!(sub.validate(), Err(ContactError::InvalidEmail));
    }

    #[test]
    fn error_messages_are_visitor_facing() {
        assert_eq!(ContactError::MissingField.to_string(), "Please fill in all fields.");
        assert_eq!(
            ContactError::InvalidEmail.to_string(),
            "Please enter a valid email address."
        );
    }

    #[test]
    fn body_layout() {
        assert_eq!(
            valid().body(),
            "Let's talk & build.\n-------------\nFrom: Ada\nEmail: ada@example.com"
        );
    }

    #[test]
    fn mailto_encodes_subject_and_body() {
        let uri = valid().mailto_uri("owner@example.com", "Portfolio Contact");
        assert_eq!(
            uri,
            "mailto:owner%40example.com?subject=Hello%20there&body=\
             Let's%20talk%20%26%20build.%0A-------------%0AFrom%3A%20Ada%0A\
             Email%3A%20ada%40example.com"
        );
    }

    #[test]
    fn blank_subject_uses_default() {
        let sub = ContactSubmission::new("n", "a@b.co", "", "m");
        assert!(sub.mailto_uri("x@y.z", "Portfolio Contact").contains("subject=Portfolio%20Contact"));
    }

    #[test]
    fn encode_matches_uri_component_rules() {
        assert_eq!(encode_uri_component("a-b_c.d!e~f*g'h(i)j"), "a-b_c.d!e~f*g'h(i)j");
        assert_eq!(encode_uri_component("a b/c?d=e&f"), "a%20b%2Fc%3Fd%3De%26f");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn banner_lifecycle() {
        let mut banner = Banner::new();
        let generation = banner.show(BannerKind::Error, "Please fill in all fields.");
        assert_eq!(banner.class_name(), "form-message error show");
        assert!(banner.inner_html().contains("fa-exclamation-circle"));
        assert!(banner.hide(generation));
        assert_eq!(banner.class_name(), "form-message error");
        assert!(banner.clear(generation));
        assert_eq!(banner.class_name(), "form-message");
        assert_eq!(banner.inner_html(), "");
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut banner = Banner::new();
        let old = banner.show(BannerKind::Error, "first");
        let new = banner.show(BannerKind::Success, "second");
        assert!(!banner.hide(old));
        assert_eq!(banner.phase(), BannerPhase::Shown);
        assert!(banner.hide(new));
        assert!(!banner.clear(old));
        assert!(banner.clear(new));
    }

    #[test]
    fn banner_text_is_escaped() {
        let mut banner = Banner::new();
        banner.show(BannerKind::Success, "<b>hi</b>");
        assert_eq!(
            banner.inner_html(),
            r#"<i class="fas fa-check-circle"></i><span>&lt;b&gt;hi&lt;/b&gt;</span>"#
        );
    }
}
