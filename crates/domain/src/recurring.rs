// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurring reservation slot generation.
//!
//! Expands a repeat pattern into one slot per matching calendar date:
//! - Every date in `[starting_date, ending_date]` is visited in order
//! - Dates whose weekday is not selected are skipped
//! - Biweekly patterns keep every other Monday-started week
//! - Each surviving date gets the same daily time window and buffers
//!
//! ## Invariants
//!
//! - Generation is deterministic and restartable
//! - `ending_date < starting_date` yields no slots
//! - The first matching date on or after `starting_date` is always kept

use crate::calendar::local_datetime;
use crate::error::DomainError;
use crate::time_range::{TimeRange, overlaps};
use crate::types::{BlockingReservation, BufferTimes};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How often a recurring reservation repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepeatInterval {
    /// Every week.
    #[default]
    Weekly,
    /// Every other week.
    Biweekly,
}

impl RepeatInterval {
    /// Number of weeks between repetitions.
    #[must_use]
    pub const fn interval_weeks(&self) -> i64 {
        match self {
            Self::Weekly => 1,
            Self::Biweekly => 2,
        }
    }
}

/// A recurrence rule for a series of reservations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatPattern {
    /// First date of the series.
    pub starting_date: NaiveDate,
    /// Last date of the series (inclusive).
    pub ending_date: NaiveDate,
    /// Daily start time.
    pub start_time: NaiveTime,
    /// Daily end time.
    pub end_time: NaiveTime,
    /// Weekdays on which the reservation repeats.
    pub repeat_on_days: Vec<Weekday>,
    /// Weekly or biweekly.
    pub interval: RepeatInterval,
}

impl RepeatPattern {
    /// Checks the pattern for input mistakes that `generate` tolerates.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ending date is before the starting date
    /// - The end time is not after the start time
    /// - No weekday is selected
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.ending_date < self.starting_date {
            return Err(DomainError::InvalidDateRange {
                starting_date: self.starting_date,
                ending_date: self.ending_date,
            });
        }
        if self.end_time <= self.start_time {
            return Err(DomainError::InvalidTimeWindow {
                start_time: self.start_time,
                end_time: self.end_time,
            });
        }
        if self.repeat_on_days.is_empty() {
            return Err(DomainError::EmptyRepeatDays);
        }
        Ok(())
    }

    fn repeats_on(&self, date: NaiveDate) -> bool {
        self.repeat_on_days.contains(&date.weekday())
    }
}

/// One concrete reservation produced from a repeat pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecurringSlot {
    /// Local calendar date.
    pub date: NaiveDate,
    /// Local start time.
    pub start_time: NaiveTime,
    /// Local end time.
    pub end_time: NaiveTime,
    /// Buffers attached to this reservation.
    pub buffers: BufferTimes,
}

impl RecurringSlot {
    /// The slot as an absolute time range in `timezone`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NonexistentLocalTime` if either end falls into a
    /// DST gap. Times repeated by a DST change take their earlier instant.
    pub fn time_range(&self, timezone: Tz) -> Result<TimeRange, DomainError> {
        let begin = local_datetime(self.date, self.start_time, timezone)?;
        let end = local_datetime(self.date, self.end_time, timezone)?;
        Ok(TimeRange::new(begin, end))
    }
}

/// Iterator over the slots of a repeat pattern.
///
/// Created by [`generate`]. Calling `generate` again with the same pattern
/// restarts the sequence from the beginning.
#[derive(Debug, Clone)]
pub struct RecurringSlots<'a> {
    pattern: &'a RepeatPattern,
    buffers: BufferTimes,
    next_date: Option<NaiveDate>,
    anchor_week: Option<NaiveDate>,
}

impl Iterator for RecurringSlots<'_> {
    type Item = RecurringSlot;

    fn next(&mut self) -> Option<Self::Item> {
        let ending_date: NaiveDate = self.pattern.ending_date;
        while let Some(date) = self.next_date {
            self.next_date = date.succ_opt().filter(|d| *d <= ending_date);

            if !self.pattern.repeats_on(date) {
                continue;
            }

            let week: NaiveDate = week_start(date);
            let anchor: NaiveDate = *self.anchor_week.get_or_insert(week);
            let weeks_since_anchor: i64 = (week - anchor).num_weeks();
            if weeks_since_anchor % self.pattern.interval.interval_weeks() != 0 {
                continue;
            }

            return Some(RecurringSlot {
                date,
                start_time: self.pattern.start_time,
                end_time: self.pattern.end_time,
                buffers: self.buffers,
            });
        }
        None
    }
}

/// Expands `pattern` into concrete slots, each carrying `buffers`.
///
/// Use [`BufferTimes::resolve`] to derive `buffers` from the unit's
/// configuration and the reservation type.
#[must_use]
pub fn generate(pattern: &RepeatPattern, buffers: BufferTimes) -> RecurringSlots<'_> {
    let next_date: Option<NaiveDate> =
        Some(pattern.starting_date).filter(|start| *start <= pattern.ending_date);
    if next_date.is_none() {
        debug!(
            starting_date = %pattern.starting_date,
            ending_date = %pattern.ending_date,
            "Repeat pattern ends before it starts; no slots generated"
        );
    }

    RecurringSlots {
        pattern,
        buffers,
        next_date,
        anchor_week: None,
    }
}

/// Monday of the week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// A generated slot together with its collision status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedSlot {
    /// The generated slot.
    pub slot: RecurringSlot,
    /// Whether the slot collides with an existing reservation.
    pub is_overlapping: bool,
}

/// Marks generated slots that collide with existing reservations.
///
/// A slot collides when, with the larger of the facing buffers applied,
/// it overlaps an existing reservation.
///
/// # Errors
///
/// Returns an error if a slot's local times cannot be resolved in
/// `timezone`.
pub fn check_collisions<I>(
    slots: I,
    reservations: &[BlockingReservation],
    timezone: Tz,
) -> Result<Vec<CheckedSlot>, DomainError>
where
    I: IntoIterator<Item = RecurringSlot>,
{
    slots
        .into_iter()
        .map(|slot| {
            let range: TimeRange = slot.time_range(timezone)?;
            let is_overlapping: bool = reservations
                .iter()
                .any(|r| overlaps(&range, &r.exclusion_window_against(slot.buffers)));
            Ok(CheckedSlot {
                slot,
                is_overlapping,
            })
        })
        .collect()
}
