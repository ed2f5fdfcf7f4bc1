// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod calendar;
mod error;
mod recurring;
mod reservable;
mod reservation_state;
mod time_range;
mod types;

#[cfg(test)]
mod tests;

pub use calendar::{
    DEFAULT_TIMEZONE, ReferenceTime, day_range, is_same_day, is_today, local_date,
    local_datetime, parse_date, parse_time_of_day, start_of_day,
};
pub use error::DomainError;
pub use recurring::{
    CheckedSlot, RecurringSlot, RecurringSlots, RepeatInterval, RepeatPattern, check_collisions,
    generate,
};
pub use reservable::{
    MAX_LOOKAHEAD_DAYS, ReservableMap, ReservableTimeQuery, ReservableTimeSpan,
    is_range_reservable, next_available_time, possible_times_for_day,
};
pub use reservation_state::{
    CancellationRule, EDIT_GRACE_PERIOD, ReservationActions, ReservationState, can_user_cancel,
    is_possible_to_approve, is_possible_to_approve_now, is_possible_to_deny,
    is_possible_to_deny_now, is_possible_to_edit, is_possible_to_edit_now,
    is_possible_to_return, is_possible_to_return_now,
};
pub use time_range::{TimeRange, merge_ranges, overlaps, subtract_all};

// Re-export public types
pub use types::{
    ApplicationRoundBlock, BlockingReservation, BufferTimes, BufferToggles,
    ReservationStartInterval, ReservationType, ReservationUnit,
};
