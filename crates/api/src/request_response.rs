// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use chrono::{DateTime, NaiveDate, Utc};
use varaamo_domain::{ReservationState, ReservationType};

use crate::nodes::{
    ApplicationRoundNode, CancellationRuleNode, ReservationNode, ReservationUnitNode,
};

/// API request for the bookable start times of one day.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    /// IANA zone name; defaults to `Europe/Helsinki`.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Evaluation instant; defaults to the system clock.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// The local date to resolve.
    pub date: NaiveDate,
    /// Length of the wanted reservation.
    pub duration_minutes: i64,
    /// The unit being booked.
    pub reservation_unit: ReservationUnitNode,
    /// Application rounds holding parts of the calendar.
    #[serde(default)]
    pub application_rounds: Vec<ApplicationRoundNode>,
    /// Existing reservations on the unit.
    #[serde(default)]
    pub reservations: Vec<ReservationNode>,
}

/// API response listing bookable start times.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    /// The resolved date.
    pub date: NaiveDate,
    /// Bookable start instants in ascending order.
    pub start_times: Vec<DateTime<Utc>>,
    /// The same start times as local `HH:MM` labels.
    pub local_start_times: Vec<String>,
}

/// API request for the first bookable time at or after an instant.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextAvailableRequest {
    /// IANA zone name; defaults to `Europe/Helsinki`.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Evaluation instant; defaults to the system clock.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Search from this instant on; defaults to `now`.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Length of the wanted reservation.
    pub duration_minutes: i64,
    /// The unit being booked.
    pub reservation_unit: ReservationUnitNode,
    /// Application rounds holding parts of the calendar.
    #[serde(default)]
    pub application_rounds: Vec<ApplicationRoundNode>,
    /// Existing reservations on the unit.
    #[serde(default)]
    pub reservations: Vec<ReservationNode>,
}

/// API response for a next-available search.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextAvailableResponse {
    /// The first bookable start, or `null` when nothing is free.
    pub next_available: Option<DateTime<Utc>>,
}

/// API request to preview the slots of a recurring reservation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRequest {
    /// IANA zone name; defaults to `Europe/Helsinki`.
    #[serde(default)]
    pub timezone: Option<String>,
    /// First date, `d.M.yyyy` or `yyyy-MM-dd`.
    pub starting_date: String,
    /// Last date (inclusive), `d.M.yyyy` or `yyyy-MM-dd`.
    pub ending_date: String,
    /// Daily start time, `HH:MM`.
    pub start_time: String,
    /// Daily end time, `HH:MM`.
    pub end_time: String,
    /// Weekday names, e.g. `MONDAY`.
    pub repeat_on_days: Vec<String>,
    /// `weekly` or `biweekly`.
    pub repeat_pattern: String,
    /// Type of the reservations being created.
    #[serde(default)]
    pub reservation_type: ReservationType,
    /// Apply the unit's buffer before each slot.
    #[serde(default)]
    pub enable_buffer_time_before: bool,
    /// Apply the unit's buffer after each slot.
    #[serde(default)]
    pub enable_buffer_time_after: bool,
    /// The unit's buffer before, in seconds.
    #[serde(default)]
    pub buffer_time_before: Option<i64>,
    /// The unit's buffer after, in seconds.
    #[serde(default)]
    pub buffer_time_after: Option<i64>,
    /// Existing reservations to check the slots against.
    #[serde(default)]
    pub reservations: Vec<ReservationNode>,
}

/// One previewed slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotInfo {
    /// Local date.
    pub date: NaiveDate,
    /// Local start time, `HH:MM`.
    pub start_time: String,
    /// Local end time, `HH:MM`.
    pub end_time: String,
    /// Buffer before, in seconds.
    pub buffer_time_before: i64,
    /// Buffer after, in seconds.
    pub buffer_time_after: i64,
    /// Whether the slot collides with an existing reservation.
    pub is_overlapping: bool,
}

/// API response for a recurring preview.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringResponse {
    /// Slots in chronological order.
    pub slots: Vec<SlotInfo>,
    /// Number of slots that collide.
    pub overlapping_count: usize,
}

/// API request for the actions available on one reservation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsRequest {
    /// IANA zone name; defaults to `Europe/Helsinki`.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Evaluation instant; defaults to the system clock.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Current state.
    pub state: ReservationState,
    /// Start of the reservation.
    pub begin: DateTime<Utc>,
    /// End of the reservation.
    pub end: DateTime<Utc>,
    /// The unit's cancellation terms, if it has any.
    #[serde(default)]
    pub cancellation_rule: Option<CancellationRuleNode>,
}

/// API response listing the permitted actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsResponse {
    /// Staff may approve.
    pub can_approve: bool,
    /// Staff may deny.
    pub can_deny: bool,
    /// Staff may return the reservation to handling.
    pub can_return: bool,
    /// Staff may edit.
    pub can_edit: bool,
    /// The customer may cancel.
    pub can_cancel: bool,
}
