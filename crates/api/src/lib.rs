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
    clippy::all
)]

mod error;
mod handlers;
mod nodes;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::ApiError;
pub use handlers::{
    evaluate_actions, find_next_available, parse_request, parse_timezone, preview_recurring,
    repeat_pattern_from_request, resolve_availability,
};
pub use nodes::{
    ApplicationRoundNode, CancellationRuleNode, ReservableTimeSpanNode, ReservationNode,
    ReservationUnitNode, blocking_reservations,
};
pub use request_response::{
    ActionsRequest, ActionsResponse, AvailabilityRequest, AvailabilityResponse,
    NextAvailableRequest, NextAvailableResponse, RecurringRequest, RecurringResponse, SlotInfo,
};
