// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Each handler translates a request into domain types, runs the domain
//! rule and shapes the result into a response. Handlers never read the
//! system clock themselves except as the documented default for `now`.

use chrono::{DateTime, Duration, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use varaamo_domain::{
    ApplicationRoundBlock, BlockingReservation, BufferTimes, BufferToggles, CancellationRule,
    CheckedSlot, DEFAULT_TIMEZONE, DomainError, ReferenceTime, RepeatInterval, RepeatPattern,
    ReservableMap, ReservableTimeQuery, ReservationActions, ReservationUnit, check_collisions,
    generate, next_available_time, parse_date, parse_time_of_day, possible_times_for_day,
};

use crate::error::ApiError;
use crate::nodes::{
    ApplicationRoundNode, CancellationRuleNode, ReservationNode, ReservationUnitNode,
    blocking_reservations, seconds,
};
use crate::request_response::{
    ActionsRequest, ActionsResponse, AvailabilityRequest, AvailabilityResponse,
    NextAvailableRequest, NextAvailableResponse, RecurringRequest, RecurringResponse, SlotInfo,
};

/// Parses a JSON request document.
///
/// # Errors
///
/// Returns `ApiError::Serialization` if the document does not match `T`.
pub fn parse_request<T: DeserializeOwned>(input: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(input)?)
}

/// Resolves an optional IANA zone name, defaulting to `Europe/Helsinki`.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for unknown zone names.
pub fn parse_timezone(name: Option<&str>) -> Result<Tz, ApiError> {
    match name {
        None => Ok(DEFAULT_TIMEZONE),
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| ApiError::invalid_input("timezone", format!("unknown zone '{name}'"))),
    }
}

fn reference_time(now: Option<DateTime<Utc>>, timezone: Tz) -> ReferenceTime {
    ReferenceTime::new(now.unwrap_or_else(Utc::now), timezone)
}

fn reservation_duration(minutes: i64) -> Result<Duration, ApiError> {
    if minutes <= 0 {
        return Err(ApiError::invalid_input(
            "durationMinutes",
            format!("must be positive, got {minutes}"),
        ));
    }
    Duration::try_minutes(minutes).ok_or_else(|| {
        ApiError::invalid_input("durationMinutes", format!("out of range: {minutes}"))
    })
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Domain inputs shared by the availability handlers.
struct UnitContext {
    unit: ReservationUnit,
    reservable: ReservableMap,
    rounds: Vec<ApplicationRoundBlock>,
    reservations: Vec<BlockingReservation>,
}

impl UnitContext {
    fn build(
        node: &ReservationUnitNode,
        rounds: &[ApplicationRoundNode],
        reservations: &[ReservationNode],
        timezone: Tz,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            unit: node.to_domain()?,
            reservable: node.reservable_map(timezone)?,
            rounds: rounds
                .iter()
                .map(|round| round.to_domain(timezone))
                .collect::<Result<_, _>>()?,
            reservations: blocking_reservations(reservations)?,
        })
    }

    fn query(&self) -> ReservableTimeQuery<'_> {
        ReservableTimeQuery {
            reservable_times: &self.reservable,
            reservation_unit: &self.unit,
            application_rounds: &self.rounds,
            blocking_reservations: &self.reservations,
        }
    }
}

/// Lists the bookable start times of one local date.
///
/// # Errors
///
/// Returns an error if the timezone, duration or any backend node is
/// invalid.
pub fn resolve_availability(
    request: &AvailabilityRequest,
) -> Result<AvailabilityResponse, ApiError> {
    let timezone: Tz = parse_timezone(request.timezone.as_deref())?;
    let reference: ReferenceTime = reference_time(request.now, timezone);
    let duration: Duration = reservation_duration(request.duration_minutes)?;
    info!(
        date = %request.date,
        duration_minutes = request.duration_minutes,
        %timezone,
        "Resolving availability"
    );

    let context: UnitContext = UnitContext::build(
        &request.reservation_unit,
        &request.application_rounds,
        &request.reservations,
        timezone,
    )?;
    let start_times: Vec<DateTime<Utc>> =
        possible_times_for_day(&context.query(), request.date, duration, &reference);
    let local_start_times: Vec<String> = start_times
        .iter()
        .map(|start| format_time(start.with_timezone(&timezone).time()))
        .collect();

    info!(count = start_times.len(), "Availability resolved");
    Ok(AvailabilityResponse {
        date: request.date,
        start_times,
        local_start_times,
    })
}

/// Finds the first bookable start at or after the requested instant.
///
/// # Errors
///
/// Returns an error if the timezone, duration or any backend node is
/// invalid.
pub fn find_next_available(
    request: &NextAvailableRequest,
) -> Result<NextAvailableResponse, ApiError> {
    let timezone: Tz = parse_timezone(request.timezone.as_deref())?;
    let reference: ReferenceTime = reference_time(request.now, timezone);
    let duration: Duration = reservation_duration(request.duration_minutes)?;
    let start: DateTime<Utc> = request.start.unwrap_or(reference.now);
    info!(%start, duration_minutes = request.duration_minutes, "Searching next available time");

    let context: UnitContext = UnitContext::build(
        &request.reservation_unit,
        &request.application_rounds,
        &request.reservations,
        timezone,
    )?;
    let next_available: Option<DateTime<Utc>> =
        next_available_time(&context.query(), start, duration, &reference);

    info!(found = next_available.is_some(), "Next available search done");
    Ok(NextAvailableResponse { next_available })
}

fn parse_weekday(value: &str) -> Result<Weekday, ApiError> {
    value
        .trim()
        .to_lowercase()
        .parse::<Weekday>()
        .map_err(|_| ApiError::invalid_input("repeatOnDays", format!("unknown weekday '{value}'")))
}

fn parse_repeat_interval(value: &str) -> Result<RepeatInterval, ApiError> {
    match value.trim().to_lowercase().as_str() {
        "weekly" => Ok(RepeatInterval::Weekly),
        "biweekly" => Ok(RepeatInterval::Biweekly),
        _ => Err(ApiError::invalid_input(
            "repeatPattern",
            format!("expected 'weekly' or 'biweekly', got '{value}'"),
        )),
    }
}

fn field(name: &'static str) -> impl Fn(DomainError) -> ApiError {
    move |err: DomainError| ApiError::invalid_input(name, err.to_string())
}

/// Translates a recurring request into a validated repeat pattern.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for malformed fields and
/// `ApiError::Domain` if the pattern itself is inconsistent.
pub fn repeat_pattern_from_request(request: &RecurringRequest) -> Result<RepeatPattern, ApiError> {
    let pattern: RepeatPattern = RepeatPattern {
        starting_date: parse_date(&request.starting_date).map_err(field("startingDate"))?,
        ending_date: parse_date(&request.ending_date).map_err(field("endingDate"))?,
        start_time: parse_time_of_day(&request.start_time).map_err(field("startTime"))?,
        end_time: parse_time_of_day(&request.end_time).map_err(field("endTime"))?,
        repeat_on_days: request
            .repeat_on_days
            .iter()
            .map(|day| parse_weekday(day))
            .collect::<Result<_, _>>()?,
        interval: parse_repeat_interval(&request.repeat_pattern)?,
    };

    if let Err(err) = pattern.validate() {
        warn!(error = %err, "Rejecting recurring pattern");
        return Err(err.into());
    }
    Ok(pattern)
}

/// Previews the slots of a recurring reservation and flags collisions.
///
/// # Errors
///
/// Returns an error if the pattern is invalid, a backend node is invalid,
/// or a slot falls on a local time skipped or repeated by DST.
pub fn preview_recurring(request: &RecurringRequest) -> Result<RecurringResponse, ApiError> {
    let timezone: Tz = parse_timezone(request.timezone.as_deref())?;
    let pattern: RepeatPattern = repeat_pattern_from_request(request)?;
    info!(
        starting_date = %pattern.starting_date,
        ending_date = %pattern.ending_date,
        interval = ?pattern.interval,
        "Previewing recurring reservation"
    );

    let unit_buffers: BufferTimes = BufferTimes::new(
        seconds("bufferTimeBefore", request.buffer_time_before.unwrap_or(0))?,
        seconds("bufferTimeAfter", request.buffer_time_after.unwrap_or(0))?,
    );
    let buffers: BufferTimes = BufferTimes::resolve(
        unit_buffers,
        BufferToggles {
            before: request.enable_buffer_time_before,
            after: request.enable_buffer_time_after,
        },
        request.reservation_type,
    );
    let existing: Vec<BlockingReservation> = blocking_reservations(&request.reservations)?;

    let checked: Vec<CheckedSlot> =
        check_collisions(generate(&pattern, buffers), &existing, timezone)?;
    let slots: Vec<SlotInfo> = checked
        .iter()
        .map(|checked| SlotInfo {
            date: checked.slot.date,
            start_time: format_time(checked.slot.start_time),
            end_time: format_time(checked.slot.end_time),
            buffer_time_before: checked.slot.buffers.before.num_seconds(),
            buffer_time_after: checked.slot.buffers.after.num_seconds(),
            is_overlapping: checked.is_overlapping,
        })
        .collect();
    let overlapping_count: usize = slots.iter().filter(|slot| slot.is_overlapping).count();

    info!(
        slots = slots.len(),
        overlapping = overlapping_count,
        "Recurring preview done"
    );
    Ok(RecurringResponse {
        slots,
        overlapping_count,
    })
}

/// Evaluates which actions apply to one reservation.
///
/// # Errors
///
/// Returns an error if the timezone or cancellation rule is invalid.
pub fn evaluate_actions(request: &ActionsRequest) -> Result<ActionsResponse, ApiError> {
    let timezone: Tz = parse_timezone(request.timezone.as_deref())?;
    let reference: ReferenceTime = reference_time(request.now, timezone);
    let rule: Option<CancellationRule> = request
        .cancellation_rule
        .as_ref()
        .map(CancellationRuleNode::to_domain)
        .transpose()?;
    info!(state = %request.state, end = %request.end, "Evaluating reservation actions");

    let actions: ReservationActions = ReservationActions::evaluate(
        request.state,
        request.begin,
        request.end,
        rule.as_ref(),
        &reference,
    );
    Ok(ActionsResponse {
        can_approve: actions.can_approve,
        can_deny: actions.can_deny,
        can_return: actions.can_return,
        can_edit: actions.can_edit,
        can_cancel: actions.can_cancel,
    })
}
