#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Token attachment and the single refresh-and-retry on 401.

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use hrms_client::{ApiClient, ApiClientConfig, ApiError, ApiRequest, AuthState};
use hrms_http::HttpClientConfig;
use hrms_session::{
    ACCESS_TOKEN_KEY, KeyValueStore, MemoryStore, Profile, REFRESH_TOKEN_KEY, Role, SecretString,
    SessionStore, StorageError, USER_KEY,
};
use serde_json::json;

fn profile() -> Profile {
    Profile {
        id: "1".to_owned(),
        name: "Priya Sharma".to_owned(),
        email: "priya@example.com".to_owned(),
        role: Role::Admin,
        employee_id: Some("EMP001".to_owned()),
        avatar: None,
        department: Some("Human Resources".to_owned()),
        designation: None,
    }
}

fn client(server: &MockServer, session: SessionStore) -> ApiClient {
    let config = ApiClientConfig::new(&server.url("/api"))
        .unwrap()
        .with_http(HttpClientConfig::for_testing());
    ApiClient::new(config, session).unwrap()
}

fn logged_in(access: &str, refresh: &str) -> SessionStore {
    let store = SessionStore::in_memory();
    store
        .save(&SecretString::new(access), &SecretString::new(refresh), &profile())
        .unwrap();
    store
}

#[tokio::test]
async fn token_is_attached_and_2xx_returned_unchanged() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/dashboard.php")
            .query_param("type", "stats")
            .header("x-auth-token", "T1");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"success": true, "data": {"employees": 42}}));
    });

    let api = client(&server, logged_in("T1", "R1"));
    let response = api
        .send(&ApiRequest::get("dashboard.php").query("type", "stats"))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["data"]["employees"], 42);
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_retried_once() {
    let server = MockServer::start();
    let stale = server.mock(|when, then| {
        when.method(GET)
            .path("/api/employees.php")
            .header("x-auth-token", "T1");
        then.status(401).json_body(json!({"message": "Token expired"}));
    });
    let refresh = server.mock(|when, then| {
        when.method(POST)
            .path("/api/refresh.php")
            .json_body(json!({"refreshToken": "R1"}));
        then.status(200).json_body(json!({"token": "T2"}));
    });
    let fresh = server.mock(|when, then| {
        when.method(GET)
            .path("/api/employees.php")
            .header("x-auth-token", "T2");
        then.status(200).json_body(json!({"data": []}));
    });

    let session = logged_in("T1", "R1");
    let api = client(&server, session.clone());
    let response = api.send(&ApiRequest::get("employees.php")).await.unwrap();

    assert_eq!(response.status(), 200);
    stale.assert_calls(1);
    refresh.assert_calls(1);
    fresh.assert_calls(1);

    assert_eq!(session.access_token().unwrap().expose(), "T2");
    assert_eq!(session.refresh_token().unwrap().expose(), "R1");
    assert_eq!(session.profile().unwrap(), profile());
    assert_eq!(api.auth_state(), AuthState::Authenticated);
}

#[tokio::test]
async fn retry_resends_the_same_body() {
    let server = MockServer::start();
    let body = json!({"leaveType": "Sick Leave", "fromDate": "2024-04-01", "toDate": "2024-04-02", "reason": "Fever"});

    let stale = server.mock(|when, then| {
        when.method(POST)
            .path("/api/leave.php")
            .header("x-auth-token", "T1");
        then.status(401);
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(200).json_body(json!({"token": "T2"}));
    });
    let fresh = server.mock(|when, then| {
        when.method(POST)
            .path("/api/leave.php")
            .header("x-auth-token", "T2")
            .json_body(body.clone());
        then.status(201).json_body(json!({"success": true}));
    });

    let api = client(&server, logged_in("T1", "R1"));
    let response = api
        .send(&ApiRequest::post("leave.php").body(body.clone()))
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    stale.assert_calls(1);
    fresh.assert_calls(1);
}

#[tokio::test]
async fn failed_refresh_clears_session_and_requires_login() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/payroll.php");
        then.status(401);
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(401)
            .json_body(json!({"message": "Refresh token revoked"}));
    });

    let session = logged_in("T1", "R1");
    let api = client(&server, session.clone());
    let mut states = api.subscribe();

    let err = api
        .send(&ApiRequest::get("payroll.php").query("month", "03").query("year", 2024))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ReauthRequired), "got {err:?}");
    refresh.assert_calls(1);
    assert!(!session.is_logged_in());
    assert!(session.access_token().is_none());
    assert!(session.refresh_token().is_none());
    assert!(session.profile().is_none());

    assert!(states.has_changed().unwrap());
    assert_eq!(*states.borrow_and_update(), AuthState::ReauthRequired);
}

#[tokio::test]
async fn refresh_response_without_token_counts_as_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/assets.php");
        then.status(401);
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(200).json_body(json!({"success": false}));
    });

    let session = logged_in("T1", "R1");
    let api = client(&server, session.clone());
    let err = api.send(&ApiRequest::get("assets.php")).await.unwrap_err();

    assert!(matches!(err, ApiError::ReauthRequired));
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn missing_refresh_endpoint_requires_login() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/training.php");
        then.status(401);
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(404);
    });

    let session = logged_in("T1", "R1");
    let api = client(&server, session.clone());
    let err = api
        .send(&ApiRequest::get("training.php").query("type", "programs"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ReauthRequired));
    refresh.assert_calls(1);
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn absolute_refresh_path_is_rejected() {
    let mut config = ApiClientConfig::new("https://hr.example.com/api").unwrap();
    "https://elsewhere.example.com/refresh.php".clone_into(&mut config.refresh_path);

    let err = ApiClient::new(config, SessionStore::in_memory()).unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));
}

#[tokio::test]
async fn without_token_no_header_and_no_refresh() {
    let server = MockServer::start();
    let with_header = server.mock(|when, then| {
        when.method(GET)
            .path("/api/profile.php")
            .header_exists("x-auth-token");
        then.status(200);
    });
    let without_header = server.mock(|when, then| {
        when.method(GET).path("/api/profile.php");
        then.status(401).json_body(json!({"message": "Not logged in"}));
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(200).json_body(json!({"token": "never"}));
    });

    let api = client(&server, SessionStore::in_memory());
    let err = api.send(&ApiRequest::get("profile.php")).await.unwrap_err();

    match &err {
        ApiError::Unauthorized { body } => assert!(body.contains("Not logged in")),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    assert_eq!(err.server_message().as_deref(), Some("Not logged in"));
    with_header.assert_calls(0);
    without_header.assert_calls(1);
    refresh.assert_calls(0);
}

#[tokio::test]
async fn token_without_refresh_token_propagates_401() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/leave.php");
        then.status(401);
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(200).json_body(json!({"token": "T2"}));
    });

    let store = SessionStore::in_memory();
    store.update_access_token(&SecretString::new("T1")).unwrap();
    let api = client(&server, store.clone());

    let err = api.send(&ApiRequest::get("leave.php")).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    refresh.assert_calls(0);
    assert_eq!(store.access_token().unwrap().expose(), "T1");
}

#[tokio::test]
async fn refresh_token_alone_recovers_the_session() {
    let server = MockServer::start();
    let anonymous = server.mock(|when, then| {
        when.method(GET)
            .path("/api/leave.php")
            .header_missing("x-auth-token");
        then.status(401);
    });
    let refresh = server.mock(|when, then| {
        when.method(POST)
            .path("/api/refresh.php")
            .json_body(json!({"refreshToken": "R1"}));
        then.status(200).json_body(json!({"token": "T2"}));
    });
    let fresh = server.mock(|when, then| {
        when.method(GET)
            .path("/api/leave.php")
            .header("x-auth-token", "T2");
        then.status(200).json_body(json!([]));
    });

    let backend = Arc::new(MemoryStore::new());
    backend.set(REFRESH_TOKEN_KEY, "R1").unwrap();
    let session = SessionStore::from_arc(backend);
    let api = client(&server, session.clone());

    let response = api.send(&ApiRequest::get("leave.php")).await.unwrap();

    assert_eq!(response.status(), 200);
    anonymous.assert_calls(1);
    refresh.assert_calls(1);
    fresh.assert_calls(1);
    assert_eq!(session.access_token().unwrap().expose(), "T2");
}

/// Accepts every write except a new access token.
#[derive(Default)]
struct AccessTokenWriteFails(MemoryStore);

impl KeyValueStore for AccessTokenWriteFails {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == ACCESS_TOKEN_KEY {
            return Err(StorageError::Backend("disk full".to_owned()));
        }
        self.0.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.0.remove(key)
    }
}

#[tokio::test]
async fn unstorable_refreshed_token_clears_session() {
    let server = MockServer::start();
    let stale = server.mock(|when, then| {
        when.method(GET)
            .path("/api/travel.php")
            .header("x-auth-token", "T1");
        then.status(401);
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(200).json_body(json!({"token": "T2"}));
    });
    let retried = server.mock(|when, then| {
        when.method(GET)
            .path("/api/travel.php")
            .header("x-auth-token", "T2");
        then.status(200);
    });

    let backend = AccessTokenWriteFails::default();
    backend.0.set(ACCESS_TOKEN_KEY, "T1").unwrap();
    backend.0.set(REFRESH_TOKEN_KEY, "R1").unwrap();
    backend
        .0
        .set(USER_KEY, &serde_json::to_string(&profile()).unwrap())
        .unwrap();
    let session = SessionStore::from_arc(Arc::new(backend));
    let api = client(&server, session.clone());
    assert_eq!(api.auth_state(), AuthState::Authenticated);

    let err = api.send(&ApiRequest::get("travel.php")).await.unwrap_err();

    assert!(matches!(err, ApiError::ReauthRequired), "got {err:?}");
    stale.assert_calls(1);
    retried.assert_calls(0);
    assert!(session.access_token().is_none());
    assert!(session.refresh_token().is_none());
    assert!(session.profile().is_none());
    assert_eq!(api.auth_state(), AuthState::ReauthRequired);
}

fn impatient_client(server: &MockServer, session: SessionStore) -> ApiClient {
    let http = HttpClientConfig {
        request_timeout: Duration::from_millis(50),
        ..HttpClientConfig::for_testing()
    };
    let config = ApiClientConfig::new(&server.url("/api"))
        .unwrap()
        .with_http(http);
    ApiClient::new(config, session).unwrap()
}

#[tokio::test]
async fn slow_response_is_network_error_without_refresh() {
    let server = MockServer::start();
    let resource = server.mock(|when, then| {
        when.method(GET).path("/api/reports.php");
        then.status(200).delay(Duration::from_millis(500));
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(200).json_body(json!({"token": "T2"}));
    });

    let session = logged_in("T1", "R1");
    let api = impatient_client(&server, session.clone());
    let err = api
        .send(&ApiRequest::get("reports.php").query("type", "headcount"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    resource.assert_calls(1);
    refresh.assert_calls(0);
    assert!(session.is_logged_in());
}

#[tokio::test]
async fn slow_refresh_requires_login() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/performance.php");
        then.status(401);
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(200)
            .json_body(json!({"token": "T2"}))
            .delay(Duration::from_millis(500));
    });

    let session = logged_in("T1", "R1");
    let api = impatient_client(&server, session.clone());
    let err = api.send(&ApiRequest::get("performance.php")).await.unwrap_err();

    assert!(matches!(err, ApiError::ReauthRequired), "got {err:?}");
    refresh.assert_calls(1);
    assert!(!session.is_logged_in());
    assert_eq!(api.auth_state(), AuthState::ReauthRequired);
}

#[tokio::test]
async fn second_401_is_unauthorized_after_exactly_one_refresh() {
    let server = MockServer::start();
    let resource = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/employees.php")
            .query_param("id", "EMP009");
        then.status(401).json_body(json!({"message": "Forbidden for role"}));
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(200).json_body(json!({"token": "T2"}));
    });

    let session = logged_in("T1", "R1");
    let api = client(&server, session.clone());
    let err = api
        .send(&ApiRequest::delete("employees.php").query("id", "EMP009"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    refresh.assert_calls(1);
    resource.assert_calls(2);
    // The refreshed token stays; only a failed refresh clears the session.
    assert!(session.is_logged_in());
    assert_eq!(session.access_token().unwrap().expose(), "T2");
}

#[tokio::test]
async fn server_error_is_propagated_without_refresh_or_retry() {
    let server = MockServer::start();
    let resource = server.mock(|when, then| {
        when.method(GET).path("/api/reports.php");
        then.status(500).body("database unavailable");
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(200).json_body(json!({"token": "T2"}));
    });

    let api = client(&server, logged_in("T1", "R1"));
    let err = api
        .send(&ApiRequest::get("reports.php").query("type", "attrition"))
        .await
        .unwrap_err();

    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("expected Http, got {other:?}"),
    }
    resource.assert_calls(1);
    refresh.assert_calls(0);
}

#[tokio::test]
async fn connection_failure_is_network_error() {
    let config = ApiClientConfig::new("http://127.0.0.1:9/api")
        .unwrap()
        .with_http(HttpClientConfig::for_testing());
    let session = logged_in("T1", "R1");
    let api = ApiClient::new(config, session.clone()).unwrap();

    let err = api.send(&ApiRequest::get("dashboard.php")).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    assert!(session.is_logged_in());
}

#[tokio::test]
async fn bearer_scheme_is_supported() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/organization.php")
            .header("authorization", "Bearer T1");
        then.status(200).json_body(json!({"name": "Acme Industries"}));
    });

    let config = ApiClientConfig::new(&server.url("/api"))
        .unwrap()
        .with_bearer_auth()
        .with_http(HttpClientConfig::for_testing());
    let api = ApiClient::new(config, logged_in("T1", "R1")).unwrap();

    api.organization().company().await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn concurrent_401s_each_refresh_independently() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/attendance.php")
            .header("x-auth-token", "T1");
        then.status(401);
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/api/refresh.php");
        then.status(200).json_body(json!({"token": "T2"}));
    });
    let ok = server.mock(|when, then| {
        when.method(GET)
            .path("/api/attendance.php")
            .header("x-auth-token", "T2");
        then.status(200).json_body(json!([]));
    });

    let api = client(&server, logged_in("T1", "R1"));
    let request = ApiRequest::get("attendance.php");
    let (a, b) = tokio::join!(api.send(&request), api.send(&request));

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(ok.calls(), 2);
    assert!((1..=2).contains(&refresh.calls()));
}
