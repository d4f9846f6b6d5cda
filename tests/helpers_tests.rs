mod common;

use common::mock_api::MockApi;
use common::session::Fixture;
use conduit_loadtest::client::{Method, AUTHORIZATION, CONTENT_TYPE};
use conduit_loadtest::helpers::{auth_headers, login, register_user};
use serde_json::Value;

#[tokio::test]
async fn test_login_returns_token() {
    let api = MockApi::new().respond("POST /users/login", 200, r#"{"user":{"token":"abc123"}}"#);
    let fixture = Fixture::default();
    let mut session = fixture.session(&api);

    let token = login(&mut session, "test@example.com", "password").await;

    assert_eq!(token.as_deref(), Some("abc123"));
    assert_eq!(fixture.reporter.check("login successful"), Some(true));
    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].path(), "/api/users/login");
    let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["user"]["email"], "test@example.com");
    assert_eq!(body["user"]["password"], "password");
    assert!(body["user"].get("username").is_none());
    assert_eq!(requests[0].headers[CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn test_login_failure_is_not_retried() {
    let api = MockApi::new().respond("POST /users/login", 401, r#"{"errors":{"body":["invalid"]}}"#);
    let fixture = Fixture::default();
    let mut session = fixture.session(&api);

    let token = login(&mut session, "test@example.com", "wrong").await;

    assert_eq!(token, None);
    assert_eq!(fixture.reporter.check("login successful"), Some(false));
    assert_eq!(api.count("POST /users/login"), 1);
}

#[tokio::test]
async fn test_login_200_without_token_passes_check_but_returns_none() {
    let api = MockApi::new().respond("POST /users/login", 200, r#"{"user":{}}"#);
    let fixture = Fixture::default();
    let mut session = fixture.session(&api);

    assert_eq!(login(&mut session, "a@b.c", "pw").await, None);
    assert_eq!(fixture.reporter.check("login successful"), Some(true));
}

#[tokio::test]
async fn test_register_accepts_200_and_201() {
    for status in [200, 201] {
        let api = MockApi::new().respond("POST /users", status, r#"{"user":{"token":"fresh"}}"#);
        let fixture = Fixture::default();
        let mut session = fixture.session(&api);

        let token = register_user(&mut session, "perf-test@example.com", "perftest", "PerfTest123!").await;

        assert_eq!(token.as_deref(), Some("fresh"));
        assert_eq!(fixture.reporter.check("registration successful"), Some(true));
        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["user"]["username"], "perftest");
        assert_eq!(body["user"]["email"], "perf-test@example.com");
    }
}

#[tokio::test]
async fn test_register_conflict_records_failed_check() {
    let api = MockApi::new().respond("POST /users", 422, r#"{"errors":{"email":["has already been taken"]}}"#);
    let fixture = Fixture::default();
    let mut session = fixture.session(&api);

    let token = register_user(&mut session, "perf-test@example.com", "perftest", "PerfTest123!").await;

    assert_eq!(token, None);
    assert_eq!(fixture.reporter.check("registration successful"), Some(false));
    assert_eq!(api.requests().len(), 1);
}

#[tokio::test]
async fn test_transport_failure_surfaces_as_status_zero() {
    let api = MockApi::new().unreachable("POST /users/login");
    let fixture = Fixture::default();
    let mut session = fixture.session(&api);

    assert_eq!(login(&mut session, "a@b.c", "pw").await, None);
    assert_eq!(fixture.reporter.check("login successful"), Some(false));
    let samples = fixture.reporter.samples();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].status, 0);
    assert!(samples[0].failed());
}

#[test]
fn test_auth_headers_with_empty_token() {
    let headers = auth_headers("");
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[AUTHORIZATION], "Token ");
}
