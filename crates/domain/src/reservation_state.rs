// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation states and the staff actions they permit.
//!
//! The policy functions do not perform transitions. They only answer
//! whether an action should be offered for a reservation given its state,
//! its end time and the reference time. Transitions themselves are carried
//! out by the backend.
//!
//! ## Invariants
//!
//! - Every check matches the state exhaustively
//! - `Unknown` states never permit any action
//! - "Today" is the local calendar day of the reference time's zone

use crate::calendar::{ReferenceTime, is_today};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Grace period during which a confirmed reservation that already ended
/// can still be edited.
pub const EDIT_GRACE_PERIOD: Duration = Duration::hours(1);

/// Reservation lifecycle state as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationState {
    /// Created but not yet submitted by the customer.
    Created,
    /// Submitted and waiting for staff to approve or deny it.
    RequiresHandling,
    /// Approved and waiting for online payment.
    WaitingForPayment,
    /// Approved.
    Confirmed,
    /// Rejected by staff.
    Denied,
    /// Cancelled by the customer or staff.
    Cancelled,
    /// Any state this build does not know about.
    #[serde(other)]
    Unknown,
}

impl ReservationState {
    /// Returns the backend string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::RequiresHandling => "REQUIRES_HANDLING",
            Self::WaitingForPayment => "WAITING_FOR_PAYMENT",
            Self::Confirmed => "CONFIRMED",
            Self::Denied => "DENIED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether a reservation in this state occupies the calendar.
    ///
    /// Denied and cancelled reservations release their time.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        match self {
            Self::Created | Self::RequiresHandling | Self::WaitingForPayment | Self::Confirmed => {
                true
            }
            Self::Denied | Self::Cancelled | Self::Unknown => false,
        }
    }
}

impl FromStr for ReservationState {
    type Err = std::convert::Infallible;

    /// Parses a backend state string. Unrecognized values become `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "CREATED" => Self::Created,
            "REQUIRES_HANDLING" => Self::RequiresHandling,
            "WAITING_FOR_PAYMENT" => Self::WaitingForPayment,
            "CONFIRMED" => Self::Confirmed,
            "DENIED" => Self::Denied,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Unknown,
        })
    }
}

impl std::fmt::Display for ReservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether staff may approve the reservation.
#[must_use]
pub fn is_possible_to_approve(
    state: ReservationState,
    end: DateTime<Utc>,
    reference: &ReferenceTime,
) -> bool {
    match state {
        ReservationState::RequiresHandling => end > reference.now,
        ReservationState::Created
        | ReservationState::WaitingForPayment
        | ReservationState::Confirmed
        | ReservationState::Denied
        | ReservationState::Cancelled
        | ReservationState::Unknown => false,
    }
}

/// Whether staff may deny the reservation.
///
/// Pending reservations can always be denied, even after they ended.
#[must_use]
pub fn is_possible_to_deny(
    state: ReservationState,
    end: DateTime<Utc>,
    reference: &ReferenceTime,
) -> bool {
    match state {
        ReservationState::RequiresHandling => true,
        ReservationState::Confirmed => end > reference.now,
        ReservationState::Created
        | ReservationState::WaitingForPayment
        | ReservationState::Denied
        | ReservationState::Cancelled
        | ReservationState::Unknown => false,
    }
}

/// Whether staff may return the reservation to handling.
#[must_use]
pub fn is_possible_to_return(
    state: ReservationState,
    end: DateTime<Utc>,
    reference: &ReferenceTime,
) -> bool {
    match state {
        ReservationState::Denied | ReservationState::Confirmed => end > reference.now,
        ReservationState::Created
        | ReservationState::RequiresHandling
        | ReservationState::WaitingForPayment
        | ReservationState::Cancelled
        | ReservationState::Unknown => false,
    }
}

/// Whether staff may edit the reservation.
///
/// A confirmed reservation stays editable for an hour after it ended, and
/// for the rest of the day it ended on.
#[must_use]
pub fn is_possible_to_edit(
    state: ReservationState,
    end: DateTime<Utc>,
    reference: &ReferenceTime,
) -> bool {
    match state {
        ReservationState::Confirmed => {
            end > reference.now - EDIT_GRACE_PERIOD || is_today(end, reference)
        }
        ReservationState::Created
        | ReservationState::RequiresHandling
        | ReservationState::WaitingForPayment
        | ReservationState::Denied
        | ReservationState::Cancelled
        | ReservationState::Unknown => false,
    }
}

/// `is_possible_to_approve` evaluated against the system clock.
#[must_use]
pub fn is_possible_to_approve_now(state: ReservationState, end: DateTime<Utc>) -> bool {
    is_possible_to_approve(state, end, &ReferenceTime::current())
}

/// `is_possible_to_deny` evaluated against the system clock.
#[must_use]
pub fn is_possible_to_deny_now(state: ReservationState, end: DateTime<Utc>) -> bool {
    is_possible_to_deny(state, end, &ReferenceTime::current())
}

/// `is_possible_to_return` evaluated against the system clock.
#[must_use]
pub fn is_possible_to_return_now(state: ReservationState, end: DateTime<Utc>) -> bool {
    is_possible_to_return(state, end, &ReferenceTime::current())
}

/// `is_possible_to_edit` evaluated against the system clock.
#[must_use]
pub fn is_possible_to_edit_now(state: ReservationState, end: DateTime<Utc>) -> bool {
    is_possible_to_edit(state, end, &ReferenceTime::current())
}

/// Cancellation terms attached to a reservation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationRule {
    /// Minimum time between cancellation and the reservation's start.
    pub can_be_cancelled_time_before: Duration,
    /// Cancellations must go through staff handling instead.
    pub needs_handling: bool,
}

/// Whether the customer may cancel the reservation themselves.
///
/// Without a cancellation rule the unit does not allow self-service
/// cancellation at all.
#[must_use]
pub fn can_user_cancel(
    state: ReservationState,
    begin: DateTime<Utc>,
    rule: Option<&CancellationRule>,
    reference: &ReferenceTime,
) -> bool {
    let Some(rule) = rule else {
        return false;
    };
    if rule.needs_handling {
        return false;
    }
    match state {
        ReservationState::Confirmed => begin - reference.now >= rule.can_be_cancelled_time_before,
        ReservationState::Created
        | ReservationState::RequiresHandling
        | ReservationState::WaitingForPayment
        | ReservationState::Denied
        | ReservationState::Cancelled
        | ReservationState::Unknown => false,
    }
}

/// The set of actions to offer for one reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationActions {
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

impl ReservationActions {
    /// Evaluates every policy for one reservation.
    #[must_use]
    pub fn evaluate(
        state: ReservationState,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        cancellation_rule: Option<&CancellationRule>,
        reference: &ReferenceTime,
    ) -> Self {
        Self {
            can_approve: is_possible_to_approve(state, end, reference),
            can_deny: is_possible_to_deny(state, end, reference),
            can_return: is_possible_to_return(state, end, reference),
            can_edit: is_possible_to_edit(state, end, reference),
            can_cancel: can_user_cancel(state, begin, cancellation_rule, reference),
        }
    }
}
