// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use varaamo_domain::ReservationState;

use crate::{
    ApiError, ApplicationRoundNode, AvailabilityRequest, AvailabilityResponse,
    NextAvailableRequest, NextAvailableResponse, ReservationNode, find_next_available,
    parse_request, resolve_availability,
};

use super::helpers::{create_lunch_reservation, create_test_unit, instant, test_now};

fn booking_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()
}

fn create_request(reservations: Vec<ReservationNode>) -> AvailabilityRequest {
    AvailabilityRequest {
        timezone: None,
        now: Some(test_now()),
        date: booking_day(),
        duration_minutes: 60,
        reservation_unit: create_test_unit(),
        application_rounds: Vec::new(),
        reservations,
    }
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[test]
fn test_open_day_lists_every_half_hour() {
    let response: AvailabilityResponse = resolve_availability(&create_request(Vec::new())).unwrap();
    assert_eq!(response.date, booking_day());
    assert_eq!(response.start_times.len(), 15);
    assert_eq!(response.start_times[0], instant("2026-06-10T06:00:00Z"));
    assert_eq!(response.local_start_times[0], "09:00");
    assert_eq!(response.local_start_times[14], "16:00");
}

#[test]
fn test_confirmed_reservation_blocks_its_hour() {
    let request: AvailabilityRequest =
        create_request(vec![create_lunch_reservation(ReservationState::Confirmed)]);
    let response: AvailabilityResponse = resolve_availability(&request).unwrap();
    assert_eq!(
        response.local_start_times,
        labels(&[
            "09:00", "09:30", "10:00", "10:30", "11:00", "13:00", "13:30", "14:00", "14:30",
            "15:00", "15:30", "16:00",
        ])
    );
}

#[test]
fn test_denied_reservation_does_not_block() {
    let request: AvailabilityRequest =
        create_request(vec![create_lunch_reservation(ReservationState::Denied)]);
    let response: AvailabilityResponse = resolve_availability(&request).unwrap();
    assert_eq!(response.start_times.len(), 15);
}

#[test]
fn test_unit_buffers_widen_the_blocked_period() {
    let mut request: AvailabilityRequest =
        create_request(vec![create_lunch_reservation(ReservationState::Confirmed)]);
    request.reservation_unit.buffer_time_before = Some(1800);
    request.reservation_unit.buffer_time_after = Some(1800);

    let response: AvailabilityResponse = resolve_availability(&request).unwrap();
    assert_eq!(
        response.local_start_times,
        labels(&[
            "09:00", "09:30", "10:00", "10:30", "13:30", "14:00", "14:30", "15:00", "15:30",
            "16:00",
        ])
    );
}

#[test]
fn test_application_round_closes_the_day() {
    let mut request: AvailabilityRequest = create_request(Vec::new());
    request.application_rounds = vec![ApplicationRoundNode {
        reservation_period_begin: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        reservation_period_end: booking_day(),
    }];
    let response: AvailabilityResponse = resolve_availability(&request).unwrap();
    assert!(response.start_times.is_empty());
}

#[test]
fn test_now_removes_past_start_times() {
    let mut request: AvailabilityRequest = create_request(Vec::new());
    // 12:40 Helsinki time on the booking day
    request.now = Some(instant("2026-06-10T09:40:00Z"));
    let response: AvailabilityResponse = resolve_availability(&request).unwrap();
    assert_eq!(response.local_start_times.first().unwrap(), "13:00");
    assert_eq!(response.start_times.len(), 7);
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let mut bad_zone: AvailabilityRequest = create_request(Vec::new());
    bad_zone.timezone = Some(String::from("Europe/Atlantis"));
    assert!(matches!(
        resolve_availability(&bad_zone),
        Err(ApiError::InvalidInput { field, .. }) if field == "timezone"
    ));

    let mut bad_duration: AvailabilityRequest = create_request(Vec::new());
    bad_duration.duration_minutes = 0;
    assert!(matches!(
        resolve_availability(&bad_duration),
        Err(ApiError::InvalidInput { field, .. }) if field == "durationMinutes"
    ));

    let mut bad_interval: AvailabilityRequest = create_request(Vec::new());
    bad_interval.reservation_unit.reservation_start_interval = String::from("INTERVAL_7_MINS");
    assert!(matches!(
        resolve_availability(&bad_interval),
        Err(ApiError::InvalidInput { field, .. }) if field == "reservationStartInterval"
    ));
}

#[test]
fn test_request_parsed_from_json() {
    let document: &str = r#"{
        "timezone": "Europe/Helsinki",
        "now": "2026-06-03T05:00:00Z",
        "date": "2026-06-10",
        "durationMinutes": 90,
        "reservationUnit": {
            "reservationStartInterval": "INTERVAL_60_MINS",
            "reservableTimeSpans": [
                { "startDatetime": "2026-06-10T06:00:00Z", "endDatetime": "2026-06-10T14:00:00Z" }
            ]
        },
        "reservations": [
            {
                "begin": "2026-06-10T09:00:00Z",
                "end": "2026-06-10T10:00:00Z",
                "state": "BLOCKED_BY_ADMIN",
                "type": "STAFF"
            }
        ]
    }"#;

    let request: AvailabilityRequest = parse_request(document).unwrap();
    let response: AvailabilityResponse = resolve_availability(&request).unwrap();
    // Unknown states never block
    assert_eq!(
        response.local_start_times,
        labels(&["09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00"])
    );
}

#[test]
fn test_malformed_json_is_a_serialization_error() {
    let result: Result<AvailabilityRequest, ApiError> = parse_request("{ \"date\": 12 }");
    assert!(matches!(result, Err(ApiError::Serialization(_))));
}

fn create_next_request(reservations: Vec<ReservationNode>) -> NextAvailableRequest {
    NextAvailableRequest {
        timezone: None,
        now: Some(test_now()),
        start: None,
        duration_minutes: 60,
        reservation_unit: create_test_unit(),
        application_rounds: Vec::new(),
        reservations,
    }
}

#[test]
fn test_next_available_defaults_start_to_now() {
    let response: NextAvailableResponse =
        find_next_available(&create_next_request(Vec::new())).unwrap();
    assert_eq!(
        response.next_available,
        Some(instant("2026-06-10T06:00:00Z"))
    );
}

#[test]
fn test_next_available_skips_blocked_start() {
    let mut request: NextAvailableRequest =
        create_next_request(vec![create_lunch_reservation(ReservationState::Confirmed)]);
    // 11:30 Helsinki time
    request.start = Some(instant("2026-06-10T08:30:00Z"));
    let response: NextAvailableResponse = find_next_available(&request).unwrap();
    assert_eq!(
        response.next_available,
        Some(instant("2026-06-10T10:00:00Z"))
    );
}

#[test]
fn test_next_available_none_when_fully_booked() {
    let whole_day: ReservationNode = ReservationNode {
        begin: instant("2026-06-10T06:00:00Z"),
        end: instant("2026-06-10T14:00:00Z"),
        buffer_time_before: None,
        buffer_time_after: None,
        state: ReservationState::Confirmed,
        reservation_type: None,
    };
    let response: NextAvailableResponse =
        find_next_available(&create_next_request(vec![whole_day])).unwrap();
    assert_eq!(response.next_available, None);

    let json: String = serde_json::to_string(&response).unwrap();
    assert_eq!(json, r#"{"nextAvailable":null}"#);
}

#[test]
fn test_huge_reservation_buffer_does_not_overflow() {
    let mut lunch: ReservationNode = create_lunch_reservation(ReservationState::Confirmed);
    lunch.buffer_time_before = Some(9_000_000_000_000_000);
    let request: AvailabilityRequest = create_request(vec![lunch.clone()]);

    let response: AvailabilityResponse = resolve_availability(&request).unwrap();
    assert_eq!(
        response.local_start_times,
        labels(&["13:00", "13:30", "14:00", "14:30", "15:00", "15:30", "16:00"])
    );

    let next: NextAvailableResponse =
        find_next_available(&create_next_request(vec![lunch])).unwrap();
    assert_eq!(next.next_available, Some(instant("2026-06-10T10:00:00Z")));
}

#[test]
fn test_huge_duration_finds_nothing() {
    let mut request: AvailabilityRequest = create_request(Vec::new());
    request.duration_minutes = 100_000_000_000_000;
    let response: AvailabilityResponse = resolve_availability(&request).unwrap();
    assert!(response.start_times.is_empty());

    let mut next_request: NextAvailableRequest = create_next_request(Vec::new());
    next_request.duration_minutes = 100_000_000_000_000;
    let next: NextAvailableResponse = find_next_available(&next_request).unwrap();
    assert_eq!(next.next_available, None);
}
