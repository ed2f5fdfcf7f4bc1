// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::{DEFAULT_TIMEZONE, ReferenceTime, TimeRange, local_datetime, parse_time_of_day};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn time(value: &str) -> NaiveTime {
    parse_time_of_day(value).unwrap()
}

/// An instant given as local wall-clock time in Helsinki.
pub fn local(day: NaiveDate, value: &str) -> DateTime<Utc> {
    local_datetime(day, time(value), DEFAULT_TIMEZONE).unwrap()
}

/// A range given as local wall-clock times in Helsinki on one day.
pub fn local_range(day: NaiveDate, from: &str, to: &str) -> TimeRange {
    TimeRange::new(local(day, from), local(day, to))
}

pub fn reference_at(day: NaiveDate, value: &str) -> ReferenceTime {
    ReferenceTime::new(local(day, value), DEFAULT_TIMEZONE)
}
