#![forbid(unsafe_code)]

//! Lenient numeric parsing for `data-*` attribute values.
//!
//! Page markup is hand-written, so attribute values such as `"150"`,
//! `" 85 "`, `"12px"` or `"oops"` all occur. Parsing reads the longest
//! numeric prefix after leading whitespace and never fails: anything without
//! a usable prefix coerces to zero.

/// Parse a leading integer, the way `parseInt(value, 10)` reads it.
///
/// Negative values, missing values, and values without leading digits all
/// coerce to `0`. Values beyond `u64::MAX` saturate.
#[must_use]
pub fn parse_leading_uint(value: Option<&str>) -> u64 {
    let Some(value) = value else {
        return 0;
    };
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let mut out: u64 = 0;
    let mut seen = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen = true;
        out = out
            .saturating_mul(10)
            .saturating_add(u64::from(byte - b'0'));
    }
    if !seen || negative { 0 } else { out }
}

/// Parse a leading decimal number, the way `parseFloat(value)` reads it.
///
/// Returns `0.0` when there is no numeric prefix or the result is not finite.
#[must_use]
pub fn parse_leading_f64(value: Option<&str>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };
    let trimmed = value.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return 0.0;
    }
    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
