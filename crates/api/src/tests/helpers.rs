// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use chrono::{DateTime, Utc};

use crate::{ReservableTimeSpanNode, ReservationNode, ReservationUnitNode};
use varaamo_domain::ReservationState;

pub fn instant(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap()
        .with_timezone(&Utc)
}

/// A unit open 09:00-17:00 Helsinki time (UTC+3) on 2026-06-10 with
/// half-hour start times and no buffers.
pub fn create_test_unit() -> ReservationUnitNode {
    ReservationUnitNode {
        reservation_start_interval: String::from("INTERVAL_30_MINS"),
        buffer_time_before: None,
        buffer_time_after: None,
        min_reservation_duration: None,
        max_reservation_duration: None,
        reservations_min_days_before: None,
        reservations_max_days_before: None,
        reservation_begins: None,
        reservation_ends: None,
        reservable_time_spans: vec![ReservableTimeSpanNode {
            start_datetime: instant("2026-06-10T06:00:00Z"),
            end_datetime: instant("2026-06-10T14:00:00Z"),
        }],
    }
}

/// A reservation from 12:00 to 13:00 Helsinki time on 2026-06-10.
pub fn create_lunch_reservation(state: ReservationState) -> ReservationNode {
    ReservationNode {
        begin: instant("2026-06-10T09:00:00Z"),
        end: instant("2026-06-10T10:00:00Z"),
        buffer_time_before: None,
        buffer_time_after: None,
        state,
        reservation_type: None,
    }
}

/// A week before the booking day, 08:00 Helsinki time.
pub fn test_now() -> DateTime<Utc> {
    instant("2026-06-03T05:00:00Z")
}
