//! Human-readable age of a feed record.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Offset of the civil timezone feed timestamps are written in (UTC+8).
pub const FEED_UTC_OFFSET_SECS: i32 = 8 * 3600;

const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a feed timestamp (`yyyy-MM-ddTHH:mm:ss`, UTC+8).
pub fn parse_feed_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(FEED_UTC_OFFSET_SECS)?;
    let naive = NaiveDateTime::parse_from_str(raw.trim(), FEED_TIMESTAMP_FORMAT).ok()?;
    offset.from_local_datetime(&naive).single()
}

/// How long ago a record was updated, bucketed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    /// Less than a minute ago, or in the future.
    JustNow,
    Minutes(i64),
    Hours(i64),
    Days(i64),
    /// The timestamp could not be parsed.
    Unknown,
}

impl Recency {
    /// Bucket the age of `raw` relative to `now`.
    ///
    /// Never fails: an unparseable timestamp yields [`Recency::Unknown`].
    pub fn from_feed_timestamp(raw: &str, now: DateTime<Utc>) -> Self {
        match parse_feed_timestamp(raw) {
            Some(updated) => Self::between(updated.with_timezone(&Utc), now),
            None => {
                tracing::debug!(timestamp = raw, "Unparseable feed timestamp");
                Recency::Unknown
            }
        }
    }

    /// Bucket the time elapsed from `updated` to `now`.
    pub fn between(updated: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed = now.signed_duration_since(updated);
        let minutes = elapsed.num_minutes();
        let hours = elapsed.num_hours();

        if minutes < 1 {
            Recency::JustNow
        } else if minutes < 60 {
            Recency::Minutes(minutes)
        } else if hours < 24 {
            Recency::Hours(hours)
        } else {
            Recency::Days(elapsed.num_days())
        }
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for Recency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recency::JustNow => write!(f, "Updated just now"),
            Recency::Minutes(n) => write!(f, "Updated {} minute{} ago", n, plural(*n)),
            Recency::Hours(n) => write!(f, "Updated {} hour{} ago", n, plural(*n)),
            Recency::Days(n) => write!(f, "Updated {} day{} ago", n, plural(*n)),
            Recency::Unknown => write!(f, "Updated recently"),
        }
    }
}
