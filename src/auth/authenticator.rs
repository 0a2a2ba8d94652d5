//! Authenticator implementation
//!
//! Handles acquiring the client-credentials token, caching it and applying
//! it to outgoing requests.

use super::types::{AccessToken, ClientCredentials};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

/// Authenticator handles obtaining and applying the bearer token
pub struct Authenticator {
    /// OAuth2 token endpoint
    token_url: Url,
    /// Client id/secret for Basic auth
    credentials: ClientCredentials,
    /// Cached bearer token
    cached_token: Arc<RwLock<Option<AccessToken>>>,
    /// HTTP client for token requests (carries the mTLS identity)
    http_client: Client,
}

impl Authenticator {
    /// Create an authenticator that uses the given client for token requests
    pub fn with_client(token_url: Url, credentials: ClientCredentials, http_client: Client) -> Self {
        Self {
            token_url,
            credentials,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply the bearer token to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token().await?;
        Ok(req.bearer_auth(token))
    }

    /// Get a valid token, fetching a new one if none is cached or it expired
    pub async fn token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Drop the cached token and fetch a new one
    ///
    /// Used after the API rejects the current token with a `401`.
    pub async fn refresh(&self) -> Result<String> {
        let mut cached = self.cached_token.write().await;
        *cached = None;

        let new_token = self.fetch_token().await.map_err(|e| Error::TokenRefresh {
            message: e.to_string(),
        })?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        info!("Refreshed access token");
        Ok(token_str)
    }

    /// Perform the client-credentials exchange
    pub async fn fetch_token(&self) -> Result<AccessToken> {
        debug!(url = %self.token_url, "Requesting access token");

        let response = self
            .http_client
            .post(self.token_url.clone())
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::OAuth2 { status, body });
        }

        let body: Value = response.json().await.map_err(Error::Http)?;
        parse_token_response(&body)
    }

    /// Token endpoint in use
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("token_url", &self.token_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Read `access_token` and the optional `expires_in` from a token response
fn parse_token_response(body: &Value) -> Result<AccessToken> {
    let token = extract_jsonpath(body, "access_token")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::malformed("access_token", "not present in token response"))?;

    let expires_in = extract_jsonpath(body, "expires_in").and_then(|v| v.parse::<i64>().ok());

    Ok(match expires_in {
        Some(secs) => AccessToken::expires_in(token, secs),
        None => AccessToken::new(token, None),
    })
}

/// Extract a value from JSON using a simple JSONPath expression
/// Supports basic paths like "$.meta.totalNumber" or "meta.totalNumber"
pub fn extract_jsonpath(value: &Value, path: &str) -> Option<String> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let parts: Vec<&str> = path.split('.').collect();

    let mut current = value;
    for part in parts {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
