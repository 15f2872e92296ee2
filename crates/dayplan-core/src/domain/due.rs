//! Due dates: lenient parsing, the countdown label and the overdue flag.
//!
//! Due dates are stored as the raw string the user entered. They are parsed
//! only when a view is derived, and a value that does not parse never fails
//! the derivation: it sorts after everything else, gets no countdown label and
//! is never overdue.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// 2100-01-01T00:00:00Z
const FAR_FUTURE_SECS: i64 = 4_102_444_800;

/// Sort key substituted for a missing or malformed due date.
pub fn far_future() -> DateTime<Utc> {
    DateTime::from_timestamp(FAR_FUTURE_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Parse an ISO 8601 due date.
///
/// Accepted forms:
/// - `2025-01-01` (midnight UTC)
/// - `2025-01-01T09:30` / `2025-01-01T09:30:00` (UTC)
/// - RFC 3339 with offset, e.g. `2025-01-01T09:30:00+02:00`
pub fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Blank strings mean "no due date".
pub fn normalize_due(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// `ceil((due - now) / 1 day)`, computed on whole milliseconds.
pub fn days_remaining(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (due - now).num_milliseconds();
    -(-millis).div_euclid(MILLIS_PER_DAY)
}

/// Overdue: has a due date in the past and is not completed.
pub fn is_overdue(due: Option<DateTime<Utc>>, completed: bool, now: DateTime<Utc>) -> bool {
    !completed && due.is_some_and(|due| due < now)
}

/// Human-readable proximity of a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// No (usable) due date: empty label.
    NoDueDate,
    /// More than one day left.
    DueIn(i64),
    Tomorrow,
    Today,
    /// Days past due (positive).
    Overdue(i64),
}

impl Countdown {
    pub fn compute(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(due) = due else {
            return Countdown::NoDueDate;
        };
        match days_remaining(due, now) {
            n if n > 1 => Countdown::DueIn(n),
            1 => Countdown::Tomorrow,
            0 => Countdown::Today,
            n => Countdown::Overdue(n.abs()),
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::NoDueDate => Ok(()),
            Countdown::DueIn(n) => write!(f, "Due in {n} days"),
            Countdown::Tomorrow => f.write_str("Due Tomorrow"),
            Countdown::Today => f.write_str("Due Today"),
            Countdown::Overdue(n) => write!(f, "Overdue by {n} days"),
        }
    }
}
