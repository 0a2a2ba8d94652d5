//! HTTP client module
//!
//! Thin wrapper over `reqwest` that carries the mutual-TLS identity, applies
//! the bearer token and turns non-2xx responses into errors.
//!
//! # Features
//!
//! - **Mutual TLS**: client identity installed once on the shared client
//! - **Authentication**: bearer token from the `Authenticator`
//! - **Token refresh**: a `401` refreshes the token and retries the request once

mod client;

pub use client::{HttpClient, HttpClientConfig};
