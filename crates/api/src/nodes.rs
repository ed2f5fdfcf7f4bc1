// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend document shapes.
//!
//! These mirror the fields the backend API returns for reservation units,
//! application rounds and reservations. Buffer times and durations are
//! given in seconds, instants in RFC 3339 and dates as `yyyy-MM-dd`.
//! Conversion into domain types happens here and nowhere else.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;
use varaamo_domain::{
    ApplicationRoundBlock, BlockingReservation, BufferTimes, CancellationRule, ReservableMap,
    ReservableTimeSpan, ReservationStartInterval, ReservationState, ReservationType,
    ReservationUnit, TimeRange, day_range, start_of_day,
};

use crate::error::ApiError;

/// Converts a non-negative number of seconds into a `Duration`.
pub(crate) fn seconds(field: &str, value: i64) -> Result<Duration, ApiError> {
    if value < 0 {
        return Err(ApiError::invalid_input(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Duration::try_seconds(value)
        .ok_or_else(|| ApiError::invalid_input(field, format!("out of range: {value}")))
}

fn optional_seconds(field: &str, value: Option<i64>) -> Result<Option<Duration>, ApiError> {
    value.map(|v| seconds(field, v)).transpose()
}

/// A reservable period as published by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservableTimeSpanNode {
    /// Start of the period.
    pub start_datetime: DateTime<Utc>,
    /// End of the period.
    pub end_datetime: DateTime<Utc>,
}

impl ReservableTimeSpanNode {
    /// Converts the node into a domain span.
    ///
    /// # Errors
    ///
    /// Returns an error if the span ends before it starts.
    pub fn to_domain(&self) -> Result<ReservableTimeSpan, ApiError> {
        let range: TimeRange = TimeRange::try_new(self.start_datetime, self.end_datetime)?;
        Ok(ReservableTimeSpan::new(range))
    }
}

/// Reservation unit fields relevant to booking rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationUnitNode {
    /// Start-time granularity, e.g. `INTERVAL_30_MINS`.
    pub reservation_start_interval: String,
    /// Buffer before reservations, in seconds.
    #[serde(default)]
    pub buffer_time_before: Option<i64>,
    /// Buffer after reservations, in seconds.
    #[serde(default)]
    pub buffer_time_after: Option<i64>,
    /// Shortest reservation, in seconds.
    #[serde(default)]
    pub min_reservation_duration: Option<i64>,
    /// Longest reservation, in seconds.
    #[serde(default)]
    pub max_reservation_duration: Option<i64>,
    /// Minimum booking lead time, in days.
    #[serde(default)]
    pub reservations_min_days_before: Option<u32>,
    /// Maximum booking lead time, in days.
    #[serde(default)]
    pub reservations_max_days_before: Option<u32>,
    /// Reservations are possible from this instant on.
    #[serde(default)]
    pub reservation_begins: Option<DateTime<Utc>>,
    /// Reservations are possible up to this instant.
    #[serde(default)]
    pub reservation_ends: Option<DateTime<Utc>>,
    /// Published reservable periods.
    #[serde(default)]
    pub reservable_time_spans: Vec<ReservableTimeSpanNode>,
}

impl ReservationUnitNode {
    /// The unit's configured buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if either buffer is negative.
    pub fn buffers(&self) -> Result<BufferTimes, ApiError> {
        Ok(BufferTimes::new(
            seconds("bufferTimeBefore", self.buffer_time_before.unwrap_or(0))?,
            seconds("bufferTimeAfter", self.buffer_time_after.unwrap_or(0))?,
        ))
    }

    /// Converts the node into the domain unit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the start interval is unknown or a duration is
    /// negative.
    pub fn to_domain(&self) -> Result<ReservationUnit, ApiError> {
        let start_interval: ReservationStartInterval = self
            .reservation_start_interval
            .parse()
            .map_err(|err: varaamo_domain::DomainError| {
                ApiError::invalid_input("reservationStartInterval", err.to_string())
            })?;

        Ok(ReservationUnit {
            start_interval,
            buffers: self.buffers()?,
            min_reservation_duration: optional_seconds(
                "minReservationDuration",
                self.min_reservation_duration,
            )?,
            max_reservation_duration: optional_seconds(
                "maxReservationDuration",
                self.max_reservation_duration,
            )?,
            reservations_min_days_before: self.reservations_min_days_before,
            reservations_max_days_before: self.reservations_max_days_before,
            reservation_begins: self.reservation_begins,
            reservation_ends: self.reservation_ends,
        })
    }

    /// Builds the reservable map from the unit's published spans.
    ///
    /// # Errors
    ///
    /// Returns an error if any span ends before it starts.
    pub fn reservable_map(&self, timezone: Tz) -> Result<ReservableMap, ApiError> {
        let spans: Vec<ReservableTimeSpan> = self
            .reservable_time_spans
            .iter()
            .map(ReservableTimeSpanNode::to_domain)
            .collect::<Result<_, _>>()?;
        Ok(ReservableMap::from_spans(&spans, timezone))
    }
}

/// An application round affecting the reservation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRoundNode {
    /// First day held by the round.
    pub reservation_period_begin: NaiveDate,
    /// Last day held by the round (inclusive).
    pub reservation_period_end: NaiveDate,
}

impl ApplicationRoundNode {
    /// The round's period as a block, whole local days in `timezone`.
    ///
    /// # Errors
    ///
    /// Returns an error if the period ends before it begins.
    pub fn to_domain(&self, timezone: Tz) -> Result<ApplicationRoundBlock, ApiError> {
        if self.reservation_period_end < self.reservation_period_begin {
            return Err(ApiError::invalid_input(
                "reservationPeriodEnd",
                format!(
                    "{} is before reservationPeriodBegin {}",
                    self.reservation_period_end, self.reservation_period_begin
                ),
            ));
        }
        let begin: DateTime<Utc> = start_of_day(self.reservation_period_begin, timezone);
        let end: DateTime<Utc> = day_range(self.reservation_period_end, timezone).end();
        Ok(ApplicationRoundBlock::new(TimeRange::new(begin, end)))
    }
}

/// An existing reservation on the unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationNode {
    /// Start of the reservation.
    pub begin: DateTime<Utc>,
    /// End of the reservation.
    pub end: DateTime<Utc>,
    /// Buffer before, in seconds.
    #[serde(default)]
    pub buffer_time_before: Option<i64>,
    /// Buffer after, in seconds.
    #[serde(default)]
    pub buffer_time_after: Option<i64>,
    /// Current state.
    pub state: ReservationState,
    /// Reservation type.
    #[serde(default, rename = "type")]
    pub reservation_type: Option<ReservationType>,
}

impl ReservationNode {
    /// Converts the node into a blocking reservation.
    ///
    /// Returns `Ok(None)` when the reservation no longer occupies the unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the reservation ends before it begins or carries
    /// negative buffers.
    pub fn to_blocking(&self) -> Result<Option<BlockingReservation>, ApiError> {
        if !self.state.is_blocking() {
            debug!(
                state = %self.state,
                begin = %self.begin,
                "Skipping reservation that does not block the unit"
            );
            return Ok(None);
        }
        let range: TimeRange = TimeRange::try_new(self.begin, self.end)?;
        let buffers: BufferTimes = if self.reservation_type == Some(ReservationType::Blocked) {
            BufferTimes::ZERO
        } else {
            BufferTimes::new(
                seconds("bufferTimeBefore", self.buffer_time_before.unwrap_or(0))?,
                seconds("bufferTimeAfter", self.buffer_time_after.unwrap_or(0))?,
            )
        };
        Ok(Some(BlockingReservation::new(range, buffers)))
    }
}

/// Converts every reservation that still occupies the unit.
///
/// # Errors
///
/// Returns the first conversion error.
pub fn blocking_reservations(
    reservations: &[ReservationNode],
) -> Result<Vec<BlockingReservation>, ApiError> {
    let mut blocking: Vec<BlockingReservation> = Vec::with_capacity(reservations.len());
    for reservation in reservations {
        if let Some(converted) = reservation.to_blocking()? {
            blocking.push(converted);
        }
    }
    Ok(blocking)
}

/// Cancellation terms of a reservation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationRuleNode {
    /// Minimum notice before the reservation begins, in seconds.
    #[serde(default)]
    pub can_be_cancelled_time_before: Option<i64>,
    /// Cancellations must be handled by staff.
    #[serde(default)]
    pub needs_handling: bool,
}

impl CancellationRuleNode {
    /// Converts the node into the domain rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the notice period is negative.
    pub fn to_domain(&self) -> Result<CancellationRule, ApiError> {
        Ok(CancellationRule {
            can_be_cancelled_time_before: seconds(
                "canBeCancelledTimeBefore",
                self.can_be_cancelled_time_before.unwrap_or(0),
            )?,
            needs_handling: self.needs_handling,
        })
    }
}
