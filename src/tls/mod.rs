//! Client certificate handling for mutual TLS
//!
//! The certificate and private key arrive as PEM text in the config. By
//! default they are handed to the TLS stack straight from memory. When
//! `materialize_credentials` is set they are first written into a private
//! temporary directory that is removed when the guard is dropped.

mod identity;

pub use identity::{ClientCertificate, ClientIdentity, MaterializedCredentials};
