use super::*;
use crate::config::{ApiConfig, ApiTimeouts};

// =============================================================
// normalize_base_url
// =============================================================

#[test]
fn base_url_trims_trailing_slashes() {
    assert_eq!(normalize_base_url("http://localhost:8080/").unwrap(), "http://localhost:8080");
    assert_eq!(normalize_base_url(" https://tracks.example//").unwrap(), "https://tracks.example");
}

#[test]
fn base_url_rejects_missing_scheme_or_host() {
    assert_eq!(
        normalize_base_url("localhost:8080").unwrap_err(),
        ApiError::InvalidBaseUrl("localhost:8080".into())
    );
    assert!(normalize_base_url("http://").is_err());
    assert!(normalize_base_url("").is_err());
}

// =============================================================
// parse_json
// =============================================================

#[test]
fn parse_user_list() {
    let users: Vec<UserId> = parse_json("[1,\n2,\n4]").unwrap();
    assert_eq!(users, vec![1, 2, 4]);
}

#[test]
fn parse_points_with_omitted_zero_fields() {
    let points: Vec<Point> = parse_json(r#"[{"latitude": 1.5}, {"longitude": 2.5}]"#).unwrap();
    assert_eq!(points, vec![Point::new(1.5, 0.0), Point::new(0.0, 2.5)]);
}

#[test]
fn parse_summary() {
    let summary: TrackSummary = parse_json(r#"{"numPoints": 15, "length": 4200.5}"#).unwrap();
    assert_eq!(summary, TrackSummary { num_points: 15, length: 4200.5 });
}

#[test]
fn parse_rejects_negative_user_ids() {
    let err = parse_json::<Vec<UserId>>("[-1]").unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[test]
fn parse_rejects_non_json() {
    assert!(matches!(parse_json::<Vec<UserId>>("<html>"), Err(ApiError::Parse(_))));
}

// =============================================================
// HttpTrackApi::new
// =============================================================

#[test]
fn new_normalizes_base_url() {
    let config = ApiConfig { base_url: "http://127.0.0.1:9/".into(), timeouts: ApiTimeouts::default() };
    let api = HttpTrackApi::new(&config).unwrap();
    assert_eq!(api.base_url(), "http://127.0.0.1:9");
    assert_eq!(api.url("/users"), "http://127.0.0.1:9/users");
}

#[test]
fn new_rejects_bad_base_url() {
    let config = ApiConfig { base_url: "ftp://x".into(), timeouts: ApiTimeouts::default() };
    assert!(matches!(HttpTrackApi::new(&config), Err(ApiError::InvalidBaseUrl(_))));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let config = ApiConfig { base_url: "http://127.0.0.1:9".into(), timeouts: ApiTimeouts { request_secs: 2, connect_secs: 1 } };
    let api = HttpTrackApi::new(&config).unwrap();
    let err = api.list_users().await.unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
}
