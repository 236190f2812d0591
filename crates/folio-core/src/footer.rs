#![forbid(unsafe_code)]

//! Footer copyright year.

use chrono::{DateTime, Datelike, FixedOffset};

/// Wall-clock reading from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallClock {
    /// Milliseconds since the Unix epoch.
    pub unix_ms: i64,
    /// Local offset east of UTC, in minutes.
    pub utc_offset_minutes: i32,
}

impl WallClock {
    /// Local calendar year, or `None` if the reading is out of range.
    #[must_use]
    pub fn local_year(&self) -> Option<i32> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)?;
        let utc = DateTime::from_timestamp_millis(self.unix_ms)?;
        Some(utc.with_timezone(&offset).year())
    }
}
