//! Tests for the auth module

use super::*;
use crate::error::Error;
use base64::Engine;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn authenticator(server: &MockServer) -> Authenticator {
    let token_url = Url::parse(&format!("{}/auth/oauth/v2/token", server.uri())).unwrap();
    Authenticator::with_client(
        token_url,
        ClientCredentials::new("my-client", "my-secret"),
        reqwest::Client::new(),
    )
}

fn basic_header(id: &str, secret: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{id}:{secret}"));
    format!("Basic {encoded}")
}

#[tokio::test]
async fn test_client_credentials_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/oauth/v2/token"))
        .and(header(
            "Authorization",
            basic_header("my-client", "my-secret").as_str(),
        ))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "oauth-token-123",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "api"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    let token = auth.fetch_token().await.unwrap();

    assert_eq!(token.token, "oauth-token-123");
    assert!(token.expires_at.is_some());
    assert!(!token.is_expired());
}

#[tokio::test]
async fn test_apply_sets_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "oauth-token-123"
        })))
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    let client = reqwest::Client::new();
    let req = client.get("https://api.adp.com/hr/v2/workers");
    let built = auth.apply(req).await.unwrap().build().unwrap();

    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer oauth-token-123"
    );
}

#[tokio::test]
async fn test_token_caching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "cached-token",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);

    assert_eq!(auth.token().await.unwrap(), "cached-token");
    assert_eq!(auth.token().await.unwrap(), "cached-token");
    assert_eq!(auth.token().await.unwrap(), "cached-token");
}

#[tokio::test]
async fn test_expired_token_is_refetched() {
    let mock_server = MockServer::start().await;

    // expires_in below the 30s buffer, so every call fetches again
    Mock::given(method("POST"))
        .and(path("/auth/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "short-lived",
            "expires_in": 5
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    auth.token().await.unwrap();
    auth.token().await.unwrap();
}

#[tokio::test]
async fn test_refresh_replaces_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "first",
            "expires_in": 3600
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "second",
            "expires_in": 3600
        })))
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    assert_eq!(auth.token().await.unwrap(), "first");
    assert_eq!(auth.refresh().await.unwrap(), "second");
    assert_eq!(auth.token().await.unwrap(), "second");
}

#[tokio::test]
async fn test_refresh_failure_is_token_refresh_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    let err = auth.refresh().await.unwrap_err();
    assert!(matches!(err, Error::TokenRefresh { .. }));
}

#[tokio::test]
async fn test_token_endpoint_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Client authentication failed"
        })))
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    let err = auth.token().await.unwrap_err();

    match err {
        Error::OAuth2 { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid_client"));
        }
        other => panic!("Expected OAuth2 error, got {other}"),
    }
}

#[tokio::test]
async fn test_missing_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer"
        })))
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    let err = auth.fetch_token().await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { ref field, .. } if field == "access_token"));
}

#[test]
fn test_extract_jsonpath() {
    let data = json!({
        "meta": {
            "totalNumber": 250,
            "label": "workers"
        }
    });

    assert_eq!(
        extract_jsonpath(&data, "$.meta.totalNumber"),
        Some("250".to_string())
    );
    assert_eq!(
        extract_jsonpath(&data, "meta.label"),
        Some("workers".to_string())
    );
    assert_eq!(extract_jsonpath(&data, "$.meta"), None);
    assert_eq!(extract_jsonpath(&data, "$.missing"), None);
}
