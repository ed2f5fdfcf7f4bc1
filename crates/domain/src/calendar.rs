// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar-day helpers bound to a time zone.
//!
//! All instants are stored in UTC. Calendar concepts (a day, "today",
//! a wall-clock start time) only make sense in the zone of the
//! reservation unit, which defaults to `Europe/Helsinki`.

use crate::error::DomainError;
use crate::time_range::TimeRange;
use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

/// Zone used when a caller does not name one.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Helsinki;

/// The instant a rule is evaluated at, and the zone in which calendar days
/// are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceTime {
    /// The evaluation instant.
    pub now: DateTime<Utc>,
    /// Zone used for "today" and day boundaries.
    pub timezone: Tz,
}

impl ReferenceTime {
    /// Creates a reference time at a fixed instant.
    #[must_use]
    pub const fn new(now: DateTime<Utc>, timezone: Tz) -> Self {
        Self { now, timezone }
    }

    /// Reads the system clock, counting days in `DEFAULT_TIMEZONE`.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Utc::now(), DEFAULT_TIMEZONE)
    }

    /// The local calendar date of `now`.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        local_date(self.now, self.timezone)
    }
}

/// The local calendar date of an instant.
#[must_use]
pub fn local_date(instant: DateTime<Utc>, timezone: Tz) -> NaiveDate {
    instant.with_timezone(&timezone).date_naive()
}

/// Whether `instant` falls on `date` in `timezone`.
#[must_use]
pub fn is_same_day(instant: DateTime<Utc>, date: NaiveDate, timezone: Tz) -> bool {
    local_date(instant, timezone) == date
}

/// Whether `instant` falls on the same local calendar day as `reference.now`.
#[must_use]
pub fn is_today(instant: DateTime<Utc>, reference: &ReferenceTime) -> bool {
    is_same_day(instant, reference.today(), reference.timezone)
}

/// First instant of a local calendar day.
///
/// When local midnight is skipped by a DST change, the day starts at the
/// first instant after the gap.
#[must_use]
pub fn start_of_day(date: NaiveDate, timezone: Tz) -> DateTime<Utc> {
    let midnight: NaiveDateTime = date.and_time(NaiveTime::MIN);
    match timezone.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let offset_seconds: i32 = timezone
                .offset_from_utc_datetime(&midnight)
                .fix()
                .local_minus_utc();
            Utc.from_utc_datetime(&(midnight - Duration::seconds(i64::from(offset_seconds))))
        }
    }
}

/// The whole local calendar day as a range.
#[must_use]
pub fn day_range(date: NaiveDate, timezone: Tz) -> TimeRange {
    let begin: DateTime<Utc> = start_of_day(date, timezone);
    let end: DateTime<Utc> = date
        .succ_opt()
        .map_or(begin + Duration::days(1), |next| start_of_day(next, timezone));
    TimeRange::new(begin, end)
}

/// Converts a wall-clock date and time in `timezone` into an instant.
///
/// # Errors
///
/// Returns `DomainError::NonexistentLocalTime` when the local time is
/// skipped by a DST transition. A time repeated by a transition resolves to
/// its earlier instant.
pub fn local_datetime(
    date: NaiveDate,
    time: NaiveTime,
    timezone: Tz,
) -> Result<DateTime<Utc>, DomainError> {
    match timezone.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(DomainError::NonexistentLocalTime {
            date,
            time,
            timezone: timezone.name().to_string(),
        }),
    }
}

/// Parses an `HH:MM` time of day as typed into reservation forms.
///
/// Single-digit hours (`9:30`) are accepted.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimeString` for anything else.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, DomainError> {
    let trimmed: &str = value.trim();
    let invalid = || DomainError::InvalidTimeString(value.to_string());

    let (hours, minutes) = trimmed.split_once(':').ok_or_else(invalid)?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// Parses a date written either as `d.M.yyyy` (form input) or `yyyy-MM-dd`
/// (API input).
///
/// # Errors
///
/// Returns `DomainError::InvalidDateString` if neither format matches.
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    let trimmed: &str = value.trim();
    NaiveDate::parse_from_str(trimmed, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| DomainError::InvalidDateString(value.to_string()))
}
