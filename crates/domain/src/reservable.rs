// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservable time resolution.
//!
//! This module computes when a reservation unit can actually be booked,
//! based on:
//! - The unit's published reservable time spans
//! - Periods held by active application rounds
//! - Existing reservations and their buffers
//! - The unit's start interval, length limits and booking horizon
//!
//! ## Invariants
//!
//! - Candidate start times step from the beginning of each published window
//! - A candidate reservation lies entirely inside one free window
//! - The result does not depend on the order of blocks or reservations
//! - Missing spans produce no candidates, never an error
//! - The forward search for the next free time is bounded

use crate::calendar::{ReferenceTime, day_range, local_date, start_of_day};
use crate::time_range::{TimeRange, merge_ranges, subtract_all};
use crate::types::{ApplicationRoundBlock, BlockingReservation, ReservationUnit};
use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use tracing::debug;

/// Upper bound on how many days `next_available_time` searches.
pub const MAX_LOOKAHEAD_DAYS: u32 = 365;

/// A period during which an operator has marked the unit as reservable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReservableTimeSpan {
    /// The reservable period.
    pub range: TimeRange,
}

impl ReservableTimeSpan {
    /// Creates a new `ReservableTimeSpan`.
    #[must_use]
    pub const fn new(range: TimeRange) -> Self {
        Self { range }
    }
}

/// Reservable windows of a unit, grouped by local calendar date.
///
/// Built once when the unit's spans are loaded and rebuilt whenever they
/// change. Spans that cross local midnight are split at each midnight;
/// windows on the same day are sorted and merged when they overlap or touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservableMap {
    timezone: Tz,
    days: BTreeMap<NaiveDate, Vec<TimeRange>>,
}

impl ReservableMap {
    /// Groups reservable spans by the local date they fall on.
    #[must_use]
    pub fn from_spans(spans: &[ReservableTimeSpan], timezone: Tz) -> Self {
        let mut by_day: BTreeMap<NaiveDate, Vec<TimeRange>> = BTreeMap::new();

        for span in spans.iter().filter(|s| !s.range.is_empty()) {
            let mut date: NaiveDate = local_date(span.range.begin(), timezone);
            loop {
                let day: TimeRange = day_range(date, timezone);
                if day.begin() >= span.range.end() {
                    break;
                }
                if let Some(part) = span.range.intersection(&day) {
                    by_day.entry(date).or_default().push(part);
                }
                match date.succ_opt() {
                    Some(next) => date = next,
                    None => break,
                }
            }
        }

        let days: BTreeMap<NaiveDate, Vec<TimeRange>> = by_day
            .into_iter()
            .map(|(date, windows)| (date, merge_ranges(&windows)))
            .collect();

        Self { timezone, days }
    }

    /// The zone the map's dates are counted in.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Open windows on `date`, sorted by start. Empty if the unit is closed.
    #[must_use]
    pub fn windows_for(&self, date: NaiveDate) -> &[TimeRange] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    /// Dates with reservable time, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }
}

/// Everything needed to resolve bookable times for one unit.
#[derive(Debug, Clone, Copy)]
pub struct ReservableTimeQuery<'a> {
    /// The unit's reservable windows.
    pub reservable_times: &'a ReservableMap,
    /// The unit's booking configuration.
    pub reservation_unit: &'a ReservationUnit,
    /// Periods held by active application rounds.
    pub application_rounds: &'a [ApplicationRoundBlock],
    /// Existing reservations that occupy the unit.
    pub blocking_reservations: &'a [BlockingReservation],
}

impl ReservableTimeQuery<'_> {
    /// Every period a new reservation must stay out of.
    fn exclusions(&self) -> Vec<TimeRange> {
        let incoming = self.reservation_unit.buffers;
        self.application_rounds
            .iter()
            .map(|round| round.range)
            .chain(
                self.blocking_reservations
                    .iter()
                    .map(|r| r.exclusion_window_against(incoming)),
            )
            .collect()
    }

    /// Free windows on `date` after removing blocked periods.
    #[must_use]
    pub fn free_windows_for_day(&self, date: NaiveDate) -> Vec<TimeRange> {
        let windows: &[TimeRange] = self.reservable_times.windows_for(date);
        if windows.is_empty() {
            return Vec::new();
        }
        subtract_all(windows, &self.exclusions())
    }
}

/// Earliest and latest start allowed by the reference time and the unit's
/// booking horizon.
#[derive(Debug, Clone, Copy)]
struct StartLimits {
    earliest: DateTime<Utc>,
    latest_exclusive: Option<DateTime<Utc>>,
}

impl StartLimits {
    fn new(unit: &ReservationUnit, reference: &ReferenceTime, timezone: Tz) -> Self {
        let today: NaiveDate = local_date(reference.now, timezone);

        let mut earliest: DateTime<Utc> = reference.now;
        if let Some(min_days) = unit.reservations_min_days_before {
            if let Some(first_day) = today.checked_add_days(Days::new(u64::from(min_days))) {
                earliest = earliest.max(start_of_day(first_day, timezone));
            }
        }
        if let Some(begins) = unit.reservation_begins {
            earliest = earliest.max(begins);
        }

        let latest_exclusive: Option<DateTime<Utc>> =
            unit.reservations_max_days_before.and_then(|max_days| {
                today
                    .checked_add_days(Days::new(u64::from(max_days) + 1))
                    .map(|day_after| start_of_day(day_after, timezone))
            });

        Self {
            earliest,
            latest_exclusive,
        }
    }

    fn allows(&self, start: DateTime<Utc>) -> bool {
        start >= self.earliest && self.latest_exclusive.is_none_or(|latest| start < latest)
    }
}

/// Start times on `date` at which a reservation of `duration` can be made.
///
/// Candidates step by the unit's start interval from the beginning of each
/// published window. A candidate is kept when the whole reservation fits in
/// a window left free after removing application-round blocks and existing
/// reservations (with buffers), and when it respects the unit's length
/// limits, booking horizon and the reference time.
#[must_use]
pub fn possible_times_for_day(
    query: &ReservableTimeQuery<'_>,
    date: NaiveDate,
    duration: Duration,
    reference: &ReferenceTime,
) -> Vec<DateTime<Utc>> {
    let unit: &ReservationUnit = query.reservation_unit;
    let windows: &[TimeRange] = query.reservable_times.windows_for(date);
    if windows.is_empty() || !unit.accepts_duration(duration) {
        return Vec::new();
    }

    let free: Vec<TimeRange> = query.free_windows_for_day(date);
    let limits: StartLimits = StartLimits::new(unit, reference, query.reservable_times.timezone());
    let step: Duration = unit.start_interval.duration();

    let mut candidates: Vec<DateTime<Utc>> = Vec::new();
    for window in windows {
        let mut start: DateTime<Utc> = window.begin();
        while let Some(end) = start.checked_add_signed(duration) {
            if end > window.end() {
                break;
            }
            let reservation: TimeRange = TimeRange::new(start, end);
            let fits: bool = free.iter().any(|f| f.contains_range(&reservation));
            let within_publishing: bool = unit
                .reservation_ends
                .is_none_or(|ends| reservation.end() <= ends);
            if fits && within_publishing && limits.allows(start) {
                candidates.push(start);
            }
            match start.checked_add_signed(step) {
                Some(next) => start = next,
                None => break,
            }
        }
    }

    debug!(
        %date,
        windows = windows.len(),
        free_windows = free.len(),
        candidates = candidates.len(),
        "Resolved reservable start times"
    );

    candidates
}

/// Whether `range` is a bookable reservation.
///
/// The range must start at one of the candidate times of its local date
/// for its own length.
#[must_use]
pub fn is_range_reservable(
    query: &ReservableTimeQuery<'_>,
    range: &TimeRange,
    reference: &ReferenceTime,
) -> bool {
    if range.is_empty() {
        return false;
    }
    let date: NaiveDate = local_date(range.begin(), query.reservable_times.timezone());
    possible_times_for_day(query, date, range.duration(), reference).contains(&range.begin())
}

/// The first bookable start time at or after `start`.
///
/// Searches the open days from the local date of `start` on, for at most
/// `MAX_LOOKAHEAD_DAYS` days, stopping early past the unit's booking
/// horizon. Returns `None` if nothing is free.
#[must_use]
pub fn next_available_time(
    query: &ReservableTimeQuery<'_>,
    start: DateTime<Utc>,
    duration: Duration,
    reference: &ReferenceTime,
) -> Option<DateTime<Utc>> {
    let timezone: Tz = query.reservable_times.timezone();
    let first_date: NaiveDate = local_date(start, timezone);
    let lookahead_end: Option<NaiveDate> =
        first_date.checked_add_days(Days::new(u64::from(MAX_LOOKAHEAD_DAYS - 1)));
    let horizon: Option<NaiveDate> = query
        .reservation_unit
        .reservations_max_days_before
        .and_then(|max_days| {
            local_date(reference.now, timezone).checked_add_days(Days::new(u64::from(max_days)))
        });

    // Closed days have no entry in the map and are never visited
    for date in query
        .reservable_times
        .dates()
        .skip_while(|date| *date < first_date)
    {
        if lookahead_end.is_some_and(|last| date > last)
            || horizon.is_some_and(|last_bookable| date > last_bookable)
        {
            break;
        }
        let found: Option<DateTime<Utc>> =
            possible_times_for_day(query, date, duration, reference)
                .into_iter()
                .find(|candidate| *candidate >= start);
        if found.is_some() {
            return found;
        }
    }

    debug!(%start, "No reservable time found within lookahead");
    None
}
