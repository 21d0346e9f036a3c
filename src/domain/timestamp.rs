//! Store-native timestamps and their display form.
//!
//! Message timestamps reach this crate as debug-formatted text such as
//! `Timestamp(seconds=1700000000, nanoseconds=0)`. The text is carried
//! as-is through the inbox (it is part of the composite de-dup key) and
//! only parsed when rendered.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};

/// Rendered in place of a timestamp that cannot be parsed.
pub const INVALID_TIMESTAMP: &str = "Invalid timestamp";

/// Display pattern for message timestamps (`dd-MM-yyyy HH:mm`).
pub const DISPLAY_FORMAT: &str = "%d-%m-%Y %H:%M";

const SECONDS_FIELD: &str = "seconds=";

/// Store-native timestamp value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimestamp {
    /// Whole seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second part in nanoseconds.
    pub nanoseconds: u32,
}

impl StoreTimestamp {
    /// Creates a timestamp from its raw parts.
    #[must_use]
    pub const fn new(seconds: i64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }
}

impl From<DateTime<Utc>> for StoreTimestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::new(at.timestamp(), at.timestamp_subsec_nanos())
    }
}

impl fmt::Display for StoreTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timestamp(seconds={}, nanoseconds={})",
            self.seconds, self.nanoseconds
        )
    }
}

/// Extracts the epoch-seconds field from store timestamp text.
///
/// Takes the text after the first `seconds=` up to the next `,` (or the
/// end of the text) and parses it as an integer. No whitespace trimming.
#[must_use]
pub fn epoch_seconds(raw: &str) -> Option<i64> {
    let (_, after) = raw.split_once(SECONDS_FIELD)?;
    let field = after.split_once(',').map_or(after, |(head, _)| head);
    field.parse().ok()
}

/// Renders store timestamp text as `dd-MM-yyyy HH:mm` in the local zone.
///
/// Falls back to [`INVALID_TIMESTAMP`] on any failure.
#[must_use]
pub fn render(raw: &str) -> String {
    render_in(raw, &Local)
}

/// Renders store timestamp text in an explicit time zone.
#[must_use]
pub fn render_in<Tz>(raw: &str, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    epoch_seconds(raw)
        .and_then(|secs| zone.timestamp_opt(secs, 0).single())
        .map_or_else(
            || INVALID_TIMESTAMP.to_string(),
            |at| at.format(DISPLAY_FORMAT).to_string(),
        )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn extracts_seconds_field() {
        let raw = "Timestamp(seconds=1700000000, nanoseconds=0)";
        assert_eq!(epoch_seconds(raw), Some(1_700_000_000));
    }

    #[test]
    fn seconds_field_without_trailing_comma() {
        assert_eq!(epoch_seconds("seconds=42"), Some(42));
        assert_eq!(epoch_seconds("seconds=42)"), None);
    }

    #[test]
    fn missing_field_renders_placeholder() {
        assert_eq!(render("2024-01-01T00:00:00Z"), INVALID_TIMESTAMP);
        assert_eq!(render(""), INVALID_TIMESTAMP);
        assert_eq!(render("null"), INVALID_TIMESTAMP);
    }

    #[test]
    fn garbage_seconds_renders_placeholder() {
        assert_eq!(render("Timestamp(seconds=abc, nanoseconds=0)"), INVALID_TIMESTAMP);
        assert_eq!(render("Timestamp(seconds= 17, nanoseconds=0)"), INVALID_TIMESTAMP);
    }

    #[test]
    fn out_of_range_epoch_renders_placeholder() {
        let raw = format!("Timestamp(seconds={}, nanoseconds=0)", i64::MAX);
        assert_eq!(render(&raw), INVALID_TIMESTAMP);
    }

    #[test]
    fn renders_in_utc() {
        let raw = "Timestamp(seconds=1700000000, nanoseconds=0)";
        assert_eq!(render_in(raw, &Utc), "14-11-2023 22:13");
    }

    #[test]
    fn renders_in_fixed_offset() {
        let Some(ist) = FixedOffset::east_opt(5 * 3600 + 1800) else {
            panic!("valid offset");
        };
        let raw = "Timestamp(seconds=1700000000, nanoseconds=0)";
        assert_eq!(render_in(raw, &ist), "15-11-2023 03:43");
    }

    #[test]
    fn renders_in_local_zone() {
        let raw = "Timestamp(seconds=1700000000, nanoseconds=0)";
        let Some(expected) = Local.timestamp_opt(1_700_000_000, 0).single() else {
            panic!("local time must exist");
        };
        assert_eq!(render(raw), expected.format("%d-%m-%Y %H:%M").to_string());
    }

    #[test]
    fn display_round_trips_through_extraction() {
        let ts = StoreTimestamp::new(1_234_567_890, 500);
        assert_eq!(
            ts.to_string(),
            "Timestamp(seconds=1234567890, nanoseconds=500)"
        );
        assert_eq!(epoch_seconds(&ts.to_string()), Some(1_234_567_890));
    }
}
