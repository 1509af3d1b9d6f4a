//! Date-window rules shared by periods, councils and meetings.
//!
//! Timestamps are stored as RFC 3339 UTC strings with second precision
//! (`2025-03-01T08:00:00Z`), so they also compare correctly as text.

use crate::domain::status::TimelineStatus;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::borrow::Cow;

#[thesis_derive::thesis_error]
pub enum TimelineError {
    #[error("{message}{}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// A closed `[start, end]` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Builds a window, rejecting `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimelineError> {
        ensure_range(start, end)?;
        Ok(Self { start, end })
    }

    /// Window starting at `start` and lasting `minutes`.
    pub fn from_duration(start: DateTime<Utc>, minutes: i64) -> Result<Self, TimelineError> {
        Self::new(start, start + chrono::Duration::minutes(minutes))
    }

    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> TimelineStatus {
        status_at(self.start, self.end, now)
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// `true` if `inner` lies entirely inside this window.
    #[must_use]
    pub fn encloses(&self, inner: &Self) -> bool {
        self.start <= inner.start && inner.end <= self.end
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        overlaps(self, other)
    }

    /// Closed intersection: a shared edge instant counts.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// `UPCOMING` before `start`, `ACTIVE` within `[start, end]`, `COMPLETE` after `end`.
#[must_use]
pub fn status_at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> TimelineStatus {
    if now < start {
        TimelineStatus::Upcoming
    } else if now > end {
        TimelineStatus::Complete
    } else {
        TimelineStatus::Active
    }
}

pub fn ensure_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), TimelineError> {
    if start < end {
        Ok(())
    } else {
        Err(TimelineError::Validation {
            message: "Thời gian bắt đầu phải trước thời gian kết thúc".into(),
            context: None,
        })
    }
}

/// Half-open intersection: windows that only touch at an edge do not overlap.
#[must_use]
pub fn overlaps(a: &Window, b: &Window) -> bool {
    a.start < b.end && b.start < a.end
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse(value: &str) -> Result<DateTime<Utc>, TimelineError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimelineError::Validation {
            message: format!("Định dạng thời gian không hợp lệ: {trimmed}").into(),
            context: None,
        })
}

/// Like [`parse`], but a bare date means the last second of that day.
pub fn parse_end(value: &str) -> Result<DateTime<Utc>, TimelineError> {
    let trimmed = value.trim();
    if DateTime::parse_from_rfc3339(trimmed).is_err() && trimmed.len() == 10 {
        let start = parse(trimmed)?;
        return Ok(start + chrono::Duration::days(1) - chrono::Duration::seconds(1));
    }
    parse(trimmed)
}

/// Canonical storage form.
#[must_use]
pub fn format(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time truncated to the storage precision.
#[must_use]
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn status_boundaries_are_inclusive() {
        assert_eq!(status_at(at(8), at(10), at(7)), TimelineStatus::Upcoming);
        assert_eq!(status_at(at(8), at(10), at(8)), TimelineStatus::Active);
        assert_eq!(status_at(at(8), at(10), at(10)), TimelineStatus::Active);
        assert_eq!(status_at(at(8), at(10), at(11)), TimelineStatus::Complete);
    }

    #[test]
    fn range_must_be_strictly_ordered() {
        assert!(ensure_range(at(8), at(9)).is_ok());
        assert!(ensure_range(at(9), at(9)).is_err());
        assert!(Window::new(at(10), at(9)).is_err());
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        let morning = Window::new(at(8), at(10)).unwrap();
        let late = Window::new(at(10), at(12)).unwrap();
        let inside = Window::new(at(9), at(11)).unwrap();
        assert!(!morning.overlaps(&late));
        assert!(morning.intersects(&late));
        assert!(morning.overlaps(&inside));
        assert!(!morning.intersects(&Window::new(at(11), at(12)).unwrap()));
        assert!(Window::new(at(7), at(13)).unwrap().encloses(&inside));
    }

    #[test]
    fn parses_dates_and_timestamps() {
        assert_eq!(parse("2025-03-01").unwrap(), at(0));
        assert_eq!(parse("2025-03-01T15:00:00+07:00").unwrap(), at(8));
        assert!(parse("01/03/2025").is_err());
        assert_eq!(format(parse_end("2025-03-01").unwrap()), "2025-03-01T23:59:59Z");
        assert_eq!(parse_end("2025-03-01T08:00:00Z").unwrap(), at(8));
        assert_eq!(format(at(8)), "2025-03-01T08:00:00Z");
    }

    proptest! {
        #[test]
        fn exactly_one_status_and_ordered(start in 0i64..10_000, len in 1i64..10_000, offset in -5_000i64..25_000) {
            let base = at(0);
            let start = base + Duration::minutes(start);
            let end = start + Duration::minutes(len);
            let now = base + Duration::minutes(offset);

            let status = status_at(start, end, now);
            prop_assert_eq!(status == TimelineStatus::Active, Window::new(start, end).unwrap().contains(now));
            prop_assert_eq!(status == TimelineStatus::Upcoming, now < start);
            prop_assert_eq!(status == TimelineStatus::Complete, now > end);
        }

        #[test]
        fn overlap_is_symmetric(a in 0i64..500, al in 1i64..200, b in 0i64..500, bl in 1i64..200) {
            let base = at(0);
            let first = Window::from_duration(base + Duration::minutes(a), al).unwrap();
            let second = Window::from_duration(base + Duration::minutes(b), bl).unwrap();
            prop_assert_eq!(first.overlaps(&second), second.overlaps(&first));
        }

        #[test]
        fn format_parse_is_lossless(secs in 0i64..4_000_000_000) {
            let instant = DateTime::from_timestamp(secs, 0).unwrap();
            prop_assert_eq!(parse(&format(instant)).unwrap(), instant);
        }
    }
}
