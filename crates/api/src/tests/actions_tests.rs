// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Duration, Utc};
use varaamo_domain::ReservationState;

use crate::{
    ActionsRequest, ActionsResponse, ApiError, CancellationRuleNode, evaluate_actions,
    parse_request,
};

use super::helpers::test_now;

fn create_request(state: ReservationState, begin: DateTime<Utc>) -> ActionsRequest {
    ActionsRequest {
        timezone: None,
        now: Some(test_now()),
        state,
        begin,
        end: begin + Duration::hours(2),
        cancellation_rule: None,
    }
}

#[test]
fn test_pending_future_reservation_can_be_handled() {
    let request: ActionsRequest = create_request(
        ReservationState::RequiresHandling,
        test_now() + Duration::days(2),
    );
    let response: ActionsResponse = evaluate_actions(&request).unwrap();
    assert_eq!(
        response,
        ActionsResponse {
            can_approve: true,
            can_deny: true,
            can_return: false,
            can_edit: false,
            can_cancel: false,
        }
    );
}

#[test]
fn test_confirmed_reservation_with_cancellation_rule() {
    let mut request: ActionsRequest =
        create_request(ReservationState::Confirmed, test_now() + Duration::days(2));
    request.cancellation_rule = Some(CancellationRuleNode {
        can_be_cancelled_time_before: Some(86_400),
        needs_handling: false,
    });
    let response: ActionsResponse = evaluate_actions(&request).unwrap();
    assert!(!response.can_approve);
    assert!(response.can_deny);
    assert!(response.can_return);
    assert!(response.can_edit);
    assert!(response.can_cancel);
}

#[test]
fn test_finished_reservation_is_locked() {
    let request: ActionsRequest =
        create_request(ReservationState::Confirmed, test_now() - Duration::days(5));
    let response: ActionsResponse = evaluate_actions(&request).unwrap();
    assert!(!response.can_deny);
    assert!(!response.can_return);
    assert!(!response.can_edit);
    assert!(!response.can_cancel);
}

#[test]
fn test_negative_cancellation_notice_is_rejected() {
    let mut request: ActionsRequest =
        create_request(ReservationState::Confirmed, test_now() + Duration::days(2));
    request.cancellation_rule = Some(CancellationRuleNode {
        can_be_cancelled_time_before: Some(-1),
        needs_handling: false,
    });
    assert!(matches!(
        evaluate_actions(&request),
        Err(ApiError::InvalidInput { field, .. }) if field == "canBeCancelledTimeBefore"
    ));
}

#[test]
fn test_unknown_state_from_json_permits_nothing() {
    let document: &str = r#"{
        "now": "2026-06-03T05:00:00Z",
        "state": "SOMETHING_NEW",
        "begin": "2026-06-10T09:00:00Z",
        "end": "2026-06-10T10:00:00Z",
        "cancellationRule": { "canBeCancelledTimeBefore": 0 }
    }"#;
    let request: ActionsRequest = parse_request(document).unwrap();
    assert_eq!(request.state, ReservationState::Unknown);

    let response: ActionsResponse = evaluate_actions(&request).unwrap();
    let json: serde_json::Value = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "canApprove": false,
            "canDeny": false,
            "canReturn": false,
            "canEdit": false,
            "canCancel": false
        })
    );
}
