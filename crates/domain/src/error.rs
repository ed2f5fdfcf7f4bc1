// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Errors that can occur during domain validation.
///
/// The availability and policy functions never return these; they fall back
/// to empty or `false` results. Only the explicit validators and the
/// local-time conversions report errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A time range ends before it begins.
    InvalidTimeRange {
        /// The range start.
        begin: DateTime<Utc>,
        /// The range end.
        end: DateTime<Utc>,
    },
    /// A wall-clock time is skipped by a DST transition in the zone.
    NonexistentLocalTime {
        /// The local date.
        date: NaiveDate,
        /// The local time of day.
        time: NaiveTime,
        /// The IANA name of the time zone.
        timezone: String,
    },
    /// A date interval ends before it starts.
    InvalidDateRange {
        /// The first date of the interval.
        starting_date: NaiveDate,
        /// The last date of the interval.
        ending_date: NaiveDate,
    },
    /// A daily time window does not end after it starts.
    InvalidTimeWindow {
        /// The daily start time.
        start_time: NaiveTime,
        /// The daily end time.
        end_time: NaiveTime,
    },
    /// A repeat pattern selects no weekdays.
    EmptyRepeatDays,
    /// A time-of-day string could not be parsed.
    InvalidTimeString(String),
    /// A date string could not be parsed.
    InvalidDateString(String),
    /// A reservation start interval is not one of the supported values.
    InvalidStartInterval(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeRange { begin, end } => {
                write!(f, "Invalid time range: end {end} is before begin {begin}")
            }
            Self::NonexistentLocalTime {
                date,
                time,
                timezone,
            } => {
                write!(f, "Local time {date} {time} does not exist in {timezone}")
            }
            Self::InvalidDateRange {
                starting_date,
                ending_date,
            } => {
                write!(
                    f,
                    "Invalid date range: ending date {ending_date} is before \
                     starting date {starting_date}"
                )
            }
            Self::InvalidTimeWindow {
                start_time,
                end_time,
            } => {
                write!(
                    f,
                    "Invalid time window: end time {end_time} must be after start time {start_time}"
                )
            }
            Self::EmptyRepeatDays => write!(f, "Repeat pattern must select at least one weekday"),
            Self::InvalidTimeString(value) => {
                write!(f, "Invalid time '{value}': expected HH:MM")
            }
            Self::InvalidDateString(value) => {
                write!(f, "Invalid date '{value}': expected d.M.yyyy or yyyy-MM-dd")
            }
            Self::InvalidStartInterval(value) => {
                write!(f, "Invalid reservation start interval: {value}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
