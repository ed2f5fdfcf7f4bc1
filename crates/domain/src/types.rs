// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::time_range::TimeRange;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Who a reservation was made by, and for what purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationType {
    /// Made by a customer through the booking UI.
    #[default]
    Normal,
    /// Made by staff for internal use.
    Staff,
    /// Made by staff on behalf of a customer.
    Behalf,
    /// A closure entered by staff. Carries no buffers.
    Blocked,
    /// Allocated through a seasonal application round.
    Seasonal,
    /// Any type this build does not know about.
    #[serde(other)]
    Unknown,
}

/// Granularity at which reservations of a unit may start.
///
/// Start times are counted from the beginning of each reservable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReservationStartInterval {
    /// Every 15 minutes.
    #[serde(rename = "INTERVAL_15_MINS")]
    Interval15Mins,
    /// Every 30 minutes.
    #[serde(rename = "INTERVAL_30_MINS")]
    Interval30Mins,
    /// Every hour.
    #[serde(rename = "INTERVAL_60_MINS")]
    Interval60Mins,
    /// Every 90 minutes.
    #[serde(rename = "INTERVAL_90_MINS")]
    Interval90Mins,
    /// Every two hours.
    #[serde(rename = "INTERVAL_120_MINS")]
    Interval120Mins,
    /// Every three hours.
    #[serde(rename = "INTERVAL_180_MINS")]
    Interval180Mins,
    /// Every four hours.
    #[serde(rename = "INTERVAL_240_MINS")]
    Interval240Mins,
    /// Every five hours.
    #[serde(rename = "INTERVAL_300_MINS")]
    Interval300Mins,
    /// Every six hours.
    #[serde(rename = "INTERVAL_360_MINS")]
    Interval360Mins,
    /// Every seven hours.
    #[serde(rename = "INTERVAL_420_MINS")]
    Interval420Mins,
}

impl ReservationStartInterval {
    /// Length of the interval in minutes.
    #[must_use]
    pub const fn minutes(&self) -> i64 {
        match self {
            Self::Interval15Mins => 15,
            Self::Interval30Mins => 30,
            Self::Interval60Mins => 60,
            Self::Interval90Mins => 90,
            Self::Interval120Mins => 120,
            Self::Interval180Mins => 180,
            Self::Interval240Mins => 240,
            Self::Interval300Mins => 300,
            Self::Interval360Mins => 360,
            Self::Interval420Mins => 420,
        }
    }

    /// Length of the interval.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::minutes(self.minutes())
    }

    /// Returns the backend string representation of the interval.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interval15Mins => "INTERVAL_15_MINS",
            Self::Interval30Mins => "INTERVAL_30_MINS",
            Self::Interval60Mins => "INTERVAL_60_MINS",
            Self::Interval90Mins => "INTERVAL_90_MINS",
            Self::Interval120Mins => "INTERVAL_120_MINS",
            Self::Interval180Mins => "INTERVAL_180_MINS",
            Self::Interval240Mins => "INTERVAL_240_MINS",
            Self::Interval300Mins => "INTERVAL_300_MINS",
            Self::Interval360Mins => "INTERVAL_360_MINS",
            Self::Interval420Mins => "INTERVAL_420_MINS",
        }
    }
}

impl FromStr for ReservationStartInterval {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INTERVAL_15_MINS" => Ok(Self::Interval15Mins),
            "INTERVAL_30_MINS" => Ok(Self::Interval30Mins),
            "INTERVAL_60_MINS" => Ok(Self::Interval60Mins),
            "INTERVAL_90_MINS" => Ok(Self::Interval90Mins),
            "INTERVAL_120_MINS" => Ok(Self::Interval120Mins),
            "INTERVAL_180_MINS" => Ok(Self::Interval180Mins),
            "INTERVAL_240_MINS" => Ok(Self::Interval240Mins),
            "INTERVAL_300_MINS" => Ok(Self::Interval300Mins),
            "INTERVAL_360_MINS" => Ok(Self::Interval360Mins),
            "INTERVAL_420_MINS" => Ok(Self::Interval420Mins),
            _ => Err(DomainError::InvalidStartInterval(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReservationStartInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Padding before and after a reservation during which the unit cannot be
/// booked (cleaning, setup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferTimes {
    /// Padding before the reservation begins.
    pub before: Duration,
    /// Padding after the reservation ends.
    pub after: Duration,
}

/// Which buffer sides the person creating a reservation wants applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BufferToggles {
    /// Apply the unit's buffer before the reservation.
    pub before: bool,
    /// Apply the unit's buffer after the reservation.
    pub after: bool,
}

impl BufferToggles {
    /// Both buffers enabled.
    pub const BOTH: Self = Self {
        before: true,
        after: true,
    };
}

impl BufferTimes {
    /// No padding on either side.
    pub const ZERO: Self = Self {
        before: Duration::zero(),
        after: Duration::zero(),
    };

    /// Creates new `BufferTimes`.
    #[must_use]
    pub const fn new(before: Duration, after: Duration) -> Self {
        Self { before, after }
    }

    /// Resolves the buffers a new reservation receives.
    ///
    /// Blocked reservations never get buffers. Otherwise each side takes the
    /// unit's configured value when its toggle is on and zero when it is off.
    #[must_use]
    pub fn resolve(
        unit_buffers: Self,
        toggles: BufferToggles,
        reservation_type: ReservationType,
    ) -> Self {
        if reservation_type == ReservationType::Blocked {
            return Self::ZERO;
        }
        Self {
            before: if toggles.before {
                unit_buffers.before
            } else {
                Duration::zero()
            },
            after: if toggles.after {
                unit_buffers.after
            } else {
                Duration::zero()
            },
        }
    }
}

impl Default for BufferTimes {
    fn default() -> Self {
        Self::ZERO
    }
}

/// The configuration of a bookable resource that affects when it can be
/// reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationUnit {
    /// Granularity of reservation start times.
    pub start_interval: ReservationStartInterval,
    /// Buffers applied around new reservations.
    pub buffers: BufferTimes,
    /// Shortest allowed reservation.
    pub min_reservation_duration: Option<Duration>,
    /// Longest allowed reservation.
    pub max_reservation_duration: Option<Duration>,
    /// Reservations must start at least this many days from today.
    pub reservations_min_days_before: Option<u32>,
    /// Reservations may start at most this many days from today.
    pub reservations_max_days_before: Option<u32>,
    /// Reservations can be made for times from this instant on.
    pub reservation_begins: Option<DateTime<Utc>>,
    /// Reservations can be made for times up to this instant.
    pub reservation_ends: Option<DateTime<Utc>>,
}

impl ReservationUnit {
    /// Creates a unit with the given start interval and no other limits.
    #[must_use]
    pub const fn new(start_interval: ReservationStartInterval) -> Self {
        Self {
            start_interval,
            buffers: BufferTimes::ZERO,
            min_reservation_duration: None,
            max_reservation_duration: None,
            reservations_min_days_before: None,
            reservations_max_days_before: None,
            reservation_begins: None,
            reservation_ends: None,
        }
    }

    /// Sets the unit's buffers.
    #[must_use]
    pub const fn with_buffers(mut self, buffers: BufferTimes) -> Self {
        self.buffers = buffers;
        self
    }

    /// Whether a reservation of `duration` satisfies the unit's length limits.
    #[must_use]
    pub fn accepts_duration(&self, duration: Duration) -> bool {
        if duration <= Duration::zero() {
            return false;
        }
        if self
            .min_reservation_duration
            .is_some_and(|min| duration < min)
        {
            return false;
        }
        !self
            .max_reservation_duration
            .is_some_and(|max| duration > max)
    }
}

/// A period during which a seasonal application round holds the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApplicationRoundBlock {
    /// The blocked period.
    pub range: TimeRange,
}

impl ApplicationRoundBlock {
    /// Creates a new `ApplicationRoundBlock`.
    #[must_use]
    pub const fn new(range: TimeRange) -> Self {
        Self { range }
    }
}

/// An existing reservation that keeps new bookings out of its time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockingReservation {
    /// The reserved time itself.
    pub range: TimeRange,
    /// The reservation's own buffers.
    pub buffers: BufferTimes,
}

impl BlockingReservation {
    /// Creates a new `BlockingReservation`.
    #[must_use]
    pub const fn new(range: TimeRange, buffers: BufferTimes) -> Self {
        Self { range, buffers }
    }

    /// The reservation widened by its own buffers.
    #[must_use]
    pub fn exclusion_window(&self) -> TimeRange {
        self.range.buffered(self.buffers.before, self.buffers.after)
    }

    /// The window a new reservation with `incoming` buffers must stay out of.
    ///
    /// Between two adjacent reservations the larger of the facing buffers
    /// applies.
    #[must_use]
    pub fn exclusion_window_against(&self, incoming: BufferTimes) -> TimeRange {
        self.range.buffered(
            self.buffers.before.max(incoming.after),
            self.buffers.after.max(incoming.before),
        )
    }
}
