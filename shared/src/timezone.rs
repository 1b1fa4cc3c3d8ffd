//! Timestamp and display timezone resolution.
//!
//! Stored timestamps are epoch nanoseconds (UTC). The display timezone is used only
//! for rendering and for anchoring relative time windows.

use crate::config::ConfigError;
use crate::query::QueryError;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// Format used for rendered timestamps (local wall-clock time, microsecond precision).
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Converts between stored nanosecond timestamps, the display timezone, and
/// relative time windows.
///
/// # Example
///
/// ```
/// use shared::timezone::TimeResolver;
///
/// let resolver = TimeResolver::new("UTC").unwrap();
/// assert_eq!(resolver.display(1_769_785_200_123_456_789), "2026-01-30 15:00:00.123456");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeResolver {
    tz: Tz,
}

impl TimeResolver {
    /// Creates a resolver for the given IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimezone`] if the name is not a known zone.
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        let tz = name
            .parse::<Tz>()
            .map_err(|e| ConfigError::InvalidTimezone {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { tz })
    }

    /// Returns the display timezone.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Returns the earliest epoch nanosecond inside a window reaching `minutes_ago`
    /// minutes back from `now`.
    ///
    /// `now` is taken in the display timezone before the offset is applied, then
    /// mapped back to UTC nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::WindowOutOfRange`] if the window start cannot be
    /// represented as epoch nanoseconds.
    pub fn window_start_ns(&self, now: DateTime<Utc>, minutes_ago: i64) -> Result<i64, QueryError> {
        let out_of_range = || QueryError::WindowOutOfRange {
            minutes: minutes_ago,
        };

        let offset = Duration::try_minutes(minutes_ago).ok_or_else(out_of_range)?;
        now.with_timezone(&self.tz)
            .checked_sub_signed(offset)
            .and_then(|start| start.timestamp_nanos_opt())
            .ok_or_else(out_of_range)
    }

    /// Renders a stored timestamp in the display timezone.
    ///
    /// The value is floor-divided by 1000 and read as epoch microseconds, so
    /// sub-microsecond digits never show up. Values outside chrono's range are
    /// rendered as the raw integer.
    #[must_use]
    pub fn display(&self, timestamp_ns: i64) -> String {
        let micros = timestamp_ns.div_euclid(1000);
        match DateTime::from_timestamp_micros(micros) {
            Some(utc) => utc
                .with_timezone(&self.tz)
                .naive_local()
                .format(DISPLAY_FORMAT)
                .to_string(),
            None => timestamp_ns.to_string(),
        }
    }
}
