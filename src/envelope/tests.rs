//! Tests for the envelope module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use test_case::test_case;

fn ok(body: &str) -> Envelope {
    Envelope::parse(RawResponse::new(200, body), None)
}

fn rate_limited(body: &str) -> Envelope {
    let response = RawResponse::new(200, body)
        .with_header("Ratelimit-Limit", "30")
        .with_header("Ratelimit-Remaining", "29")
        .with_header("Ratelimit-Reset", "1000");
    Envelope::parse(response, None)
}

// ============================================================================
// Payload Tests
// ============================================================================

#[test]
fn test_data_list_is_shifted_in_order() {
    let mut envelope = ok(r#"{"data":["a","b","c"],"total":3}"#);

    assert!(envelope.success());
    assert_eq!(envelope.status(), 200);
    assert_eq!(envelope.item_count(), 3);
    assert_eq!(envelope.total(), 3);

    assert_eq!(envelope.shift_first(), Some(json!("a")));
    assert_eq!(envelope.shift_first(), Some(json!("b")));
    assert_eq!(envelope.shift_first(), Some(json!("c")));
    assert_eq!(envelope.shift_first(), None);
    assert_eq!(envelope.shift_first(), None);
    assert_eq!(envelope.item_count(), 0);
}

#[test]
fn test_peek_first_does_not_consume() {
    let mut envelope = ok(r#"{"data":[{"id":"1"},{"id":"2"}]}"#);

    assert_eq!(envelope.peek_first(), Some(&json!({"id": "1"})));
    assert_eq!(envelope.peek_first(), Some(&json!({"id": "1"})));
    assert_eq!(envelope.item_count(), 2);

    envelope.shift_first();
    assert_eq!(envelope.peek_first(), Some(&json!({"id": "2"})));
}

#[test]
fn test_body_without_data_is_single() {
    let mut envelope = ok(r#"{"id":"x"}"#);

    assert_eq!(envelope.item_count(), 0);
    assert_eq!(envelope.payload(), &Payload::Single(json!({"id": "x"})));
    assert_eq!(envelope.total(), 0);
    assert!(envelope.cursor().is_none());
    assert_eq!(envelope.shift_first(), None);
    assert_eq!(envelope.peek_first(), None);
}

#[test]
fn test_null_data_is_empty_list() {
    let envelope = ok(r#"{"data":null,"total":0}"#);
    assert_eq!(envelope.payload(), &Payload::Items(Default::default()));
    assert_eq!(envelope.item_count(), 0);
}

#[test]
fn test_missing_total_defaults_to_zero() {
    let envelope = ok(r#"{"data":[1,2]}"#);
    assert_eq!(envelope.total(), 0);
    assert_eq!(envelope.item_count(), 2);
}

#[test_case(""; "empty body")]
#[test_case("not json"; "plain text")]
#[test_case("{\"data\": [1,"; "truncated json")]
#[test_case("null"; "json null")]
fn test_undecodable_body_is_empty(body: &str) {
    let mut envelope = ok(body);

    assert!(envelope.success());
    assert!(envelope.payload().is_empty());
    assert_eq!(envelope.item_count(), 0);
    assert_eq!(envelope.total(), 0);
    assert!(envelope.cursor().is_none());
    assert!(envelope.rate_limit().is_none());
    assert_eq!(envelope.shift_first(), None);
}

#[test]
fn test_top_level_array_is_single() {
    let envelope = ok("[1,2,3]");
    assert_eq!(envelope.payload(), &Payload::Single(json!([1, 2, 3])));
    assert_eq!(envelope.item_count(), 0);
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[test]
fn test_cursor_serves_both_directions() {
    let envelope = ok(r#"{"data":[],"pagination":{"cursor":"abc"}}"#);

    let cursor = envelope.cursor().unwrap();
    assert_eq!(cursor.after.as_deref(), Some("abc"));
    assert_eq!(cursor.before.as_deref(), Some("abc"));
    assert!(envelope.has_next());
    assert!(envelope.has_previous());
}

#[test]
fn test_explicit_directions_win() {
    let envelope = ok(r#"{"data":[],"pagination":{"cursor":"c","after":"a"}}"#);

    let cursor = envelope.cursor().unwrap();
    assert_eq!(cursor.after.as_deref(), Some("a"));
    assert_eq!(cursor.before.as_deref(), Some("c"));
}

#[test_case(r#"{"data":[]}"#; "no pagination")]
#[test_case(r#"{"data":[],"pagination":null}"#; "null pagination")]
#[test_case(r#"{"data":[],"pagination":{}}"#; "empty pagination")]
#[test_case(r#"{"data":[],"pagination":{"cursor":""}}"#; "empty cursor")]
fn test_no_usable_cursor(body: &str) {
    let envelope = ok(body);
    assert!(envelope.cursor().is_none());
    assert!(!envelope.has_next());
    assert!(!envelope.has_previous());
}

#[test]
fn test_empty_page_with_cursor_keeps_both_facts() {
    let envelope = ok(r#"{"data":[],"pagination":{"cursor":"more"}}"#);
    assert_eq!(envelope.item_count(), 0);
    assert!(envelope.has_next());
}

// ============================================================================
// Rate Limit Tests
// ============================================================================

#[test]
fn test_rate_limit_full() {
    let envelope = rate_limited("{}");

    let expected = RateLimit {
        limit: 30,
        remaining: 29,
        reset: 1000,
    };
    assert_eq!(envelope.rate_limit(), Some(expected));
    assert_eq!(
        envelope.rate_limit_info(None).unwrap(),
        Some(RateLimitInfo::All(expected))
    );
}

#[test_case("limit", 30)]
#[test_case("remaining", 29)]
#[test_case("reset", 1000)]
fn test_rate_limit_field(key: &str, expected: u64) {
    let envelope = rate_limited("{}");
    assert_eq!(
        envelope.rate_limit_info(Some(key)).unwrap(),
        Some(RateLimitInfo::Field(expected))
    );
}

#[test]
fn test_rate_limit_unknown_key() {
    let envelope = rate_limited("{}");
    let err = envelope.rate_limit_info(Some("bogus")).unwrap_err();
    assert!(matches!(err, Error::UnknownRateLimitKey { ref key } if key == "bogus"));

    // Rejected even when there is nothing to look up
    let err = ok("{}").rate_limit_info(Some("bogus")).unwrap_err();
    assert!(matches!(err, Error::UnknownRateLimitKey { .. }));
}

#[test]
fn test_rate_limit_absent_without_headers() {
    let envelope = ok("{}");
    assert!(envelope.rate_limit().is_none());
    assert_eq!(envelope.rate_limit_info(None).unwrap(), None);
    assert_eq!(envelope.rate_limit_info(Some("remaining")).unwrap(), None);
}

#[test]
fn test_rate_limit_headers_are_case_insensitive() {
    let response = RawResponse::new(200, "{}")
        .with_header("RATELIMIT-REMAINING", "5")
        .with_header("ratelimit-limit", "800");
    let envelope = Envelope::parse(response, None);

    let rate_limit = envelope.rate_limit().unwrap();
    assert_eq!(rate_limit.remaining, 5);
    assert_eq!(rate_limit.limit, 800);
    assert_eq!(rate_limit.reset, 0);
}

#[test]
fn test_rate_limit_reset_at() {
    let rate_limit = RateLimit {
        limit: 1,
        remaining: 0,
        reset: 1_700_000_000,
    };
    assert_eq!(rate_limit.reset_at().unwrap().timestamp(), 1_700_000_000);
}

// ============================================================================
// Error Message Tests
// ============================================================================

#[test]
fn test_error_message_from_upstream_body() {
    let response = RawResponse::new(401, r#"{"error":"Unauthorized","status":401,"message":"invalid token"}"#);
    let error = TransportError::with_response("Client error: 401", response);
    let envelope = Envelope::from_exchange(Err(error));

    assert!(!envelope.success());
    assert_eq!(envelope.status(), 401);
    assert_eq!(envelope.error_message(), "invalid token");
    assert_eq!(envelope.error().unwrap().source().message, "Client error: 401");
}

#[test]
fn test_error_message_without_response() {
    let envelope = Envelope::from_exchange(Err(TransportError::new("connection refused")));

    assert!(!envelope.success());
    assert_eq!(envelope.status(), 0);
    assert!(envelope.payload().is_empty());
    assert_eq!(envelope.error_message(), API_UNAVAILABLE);
}

#[test_case("gateway exploded"; "plain text body")]
#[test_case(r#"{"error":"Bad Gateway"}"#; "json without message")]
#[test_case(r#"{"message":""}"#; "empty message")]
fn test_error_message_falls_back_to_transport_text(body: &str) {
    let error = TransportError::with_response("Server error: 502", RawResponse::new(502, body));
    let envelope = Envelope::parse(RawResponse::new(502, body), Some(error));

    assert_eq!(envelope.error_message(), "Server error: 502");
}

#[test]
fn test_error_message_on_success_is_generic() {
    let envelope = ok(r#"{"data":[]}"#);
    assert!(envelope.error().is_none());
    assert_eq!(envelope.error_message(), API_UNAVAILABLE);
}

#[test]
fn test_error_message_is_stable() {
    let response = RawResponse::new(400, r#"{"message":"missing id"}"#);
    let envelope = Envelope::from_exchange(Err(TransportError::with_response("Client error", response)));

    let detail = envelope.error().unwrap();
    assert_eq!(detail.message(), "missing id");
    assert!(std::ptr::eq(detail.message(), detail.message()));
}

// ============================================================================
// Typed Decode Tests
// ============================================================================

#[derive(Debug, Deserialize, PartialEq)]
struct Thing {
    id: String,
    #[serde(default)]
    label: Option<String>,
}

#[test]
fn test_items_as_typed_records() {
    let envelope = ok(r#"{"data":[{"id":"1","label":"one"},{"id":"2"}]}"#);
    let things: Vec<Thing> = envelope.items_as().unwrap();

    assert_eq!(
        things,
        vec![
            Thing {
                id: "1".to_string(),
                label: Some("one".to_string())
            },
            Thing {
                id: "2".to_string(),
                label: None
            },
        ]
    );
}

#[test]
fn test_items_as_reports_bad_item() {
    let envelope = ok(r#"{"data":[{"id":"1"},{"label":"no id"}]}"#);
    let err = envelope.items_as::<Thing>().unwrap_err();
    assert!(err.to_string().contains("item 1"));
}

#[test]
fn test_single_as() {
    let envelope = ok(r#"{"id":"x"}"#);
    let thing: Option<Thing> = envelope.single_as().unwrap();
    assert_eq!(thing.unwrap().id, "x");

    let list = ok(r#"{"data":[]}"#);
    assert!(list.single_as::<Thing>().unwrap().is_none());
}
