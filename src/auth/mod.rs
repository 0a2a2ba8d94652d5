//! Authentication module
//!
//! OAuth2 client-credentials grant against the ADP token endpoint. The
//! request is authenticated twice: HTTP Basic with the client id/secret and
//! mutual TLS through the client certificate installed on the shared
//! `reqwest::Client`.
//!
//! The `Authenticator` caches the bearer token, refreshes it once it is
//! about to expire and can be told to drop it after a `401`.

mod authenticator;
mod types;

pub use authenticator::{extract_jsonpath, Authenticator};
pub use types::{AccessToken, ClientCredentials};

#[cfg(test)]
mod tests;
