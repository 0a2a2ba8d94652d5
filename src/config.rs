//! Configuration types for the ADP workers source
//!
//! The user-supplied connection config (client credentials plus the PEM
//! certificate/key pair), the connection specification reported by `spec`,
//! and the catalog types exchanged with the host.

use crate::auth::ClientCredentials;
use crate::error::{Error, Result};
use crate::pagination::TerminationPolicy;
use crate::tls::ClientCertificate;
use crate::types::{OptionStringExt, PropertyType, SyncMode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use url::Url;

/// ADP OAuth2 token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.adp.com/auth/oauth/v2/token";

/// Base URL of the ADP HR v2 API
pub const DEFAULT_BASE_URL: &str = "https://api.adp.com/hr/v2/";

/// Name of the only stream this source exposes
pub const WORKERS_STREAM: &str = "workers";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Source Config
// ============================================================================

/// Connection config for the source
///
/// The four credential fields are required; everything else has a default
/// pointing at the production ADP endpoints.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// OAuth2 client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth2 client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Client certificate (PEM text)
    #[serde(default)]
    pub ssl_cert: Option<String>,

    /// Client private key (PEM text)
    #[serde(default)]
    pub ssl_key: Option<String>,

    /// Override for the token endpoint
    #[serde(default)]
    pub token_url: Option<String>,

    /// Override for the API base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// When to stop paging
    #[serde(default)]
    pub termination: TerminationPolicy,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Write the certificate/key to a private temp directory instead of
    /// handing the PEM buffers to the TLS stack directly
    #[serde(default)]
    pub materialize_credentials: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SourceConfig {
    /// Parse and validate a config JSON value
    pub fn from_value(value: &Value) -> Result<Self> {
        let config: SourceConfig = serde_json::from_value(value.clone())
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields and endpoint overrides
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("ssl_cert", &self.ssl_cert),
            ("ssl_key", &self.ssl_key),
        ] {
            if value.clone().none_if_blank().is_none() {
                return Err(Error::missing_field(field));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::invalid_value(
                "request_timeout_secs",
                "must be greater than zero",
            ));
        }

        self.token_url()?;
        self.base_url()?;
        Ok(())
    }

    /// OAuth2 client id/secret pair
    pub fn client_credentials(&self) -> Result<ClientCredentials> {
        Ok(ClientCredentials::new(
            required(&self.client_id, "client_id")?,
            required(&self.client_secret, "client_secret")?,
        ))
    }

    /// Certificate/key pair for mutual TLS
    pub fn client_certificate(&self) -> Result<ClientCertificate> {
        Ok(ClientCertificate::new(
            required(&self.ssl_cert, "ssl_cert")?,
            required(&self.ssl_key, "ssl_key")?,
        ))
    }

    /// Token endpoint URL
    pub fn token_url(&self) -> Result<Url> {
        let raw = self.token_url.as_deref().unwrap_or(DEFAULT_TOKEN_URL);
        parse_http_url("token_url", raw)
    }

    /// API base URL, always ending with a slash so resource paths join under it
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let mut url = parse_http_url("base_url", raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("ssl_cert", &self.ssl_cert.as_ref().map(|_| "<pem>"))
            .field("ssl_key", &self.ssl_key.as_ref().map(|_| "***"))
            .field("token_url", &self.token_url)
            .field("base_url", &self.base_url)
            .field("termination", &self.termination)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("materialize_credentials", &self.materialize_credentials)
            .finish()
    }
}

fn required(value: &Option<String>, field: &str) -> Result<String> {
    value
        .clone()
        .none_if_blank()
        .ok_or_else(|| Error::missing_field(field))
}

fn parse_http_url(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::invalid_value(
            field,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

// ============================================================================
// Spec Config (for UI)
// ============================================================================

/// Configuration specification for connector setup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecConfig {
    /// Configuration properties
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyConfig>,
}

/// Configuration property definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyConfig {
    /// Property type
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,

    /// Human-readable title
    #[serde(default)]
    pub title: Option<String>,

    /// Property description
    #[serde(default)]
    pub description: Option<String>,

    /// Whether this is a secret (should be masked)
    #[serde(default)]
    pub secret: bool,

    /// Whether this property is required
    #[serde(default)]
    pub required: bool,

    /// Whether the UI should offer a multi-line input
    #[serde(default)]
    pub multiline: bool,

    /// Default value
    #[serde(default)]
    pub default: Option<Value>,

    /// Enum of allowed values
    #[serde(rename = "enum", default)]
    pub allowed_values: Option<Vec<Value>>,
}

impl PropertyConfig {
    fn new(property_type: PropertyType, title: &str, description: &str) -> Self {
        Self {
            property_type,
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            ..Default::default()
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

impl SpecConfig {
    /// The connection specification of this source
    pub fn adp_workers() -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(
            "client_id".to_string(),
            PropertyConfig::new(
                PropertyType::String,
                "Client ID",
                "Client ID of the ADP API application",
            )
            .required(),
        );
        properties.insert(
            "client_secret".to_string(),
            PropertyConfig::new(
                PropertyType::String,
                "Client Secret",
                "Client secret of the ADP API application",
            )
            .required()
            .secret(),
        );
        properties.insert(
            "ssl_cert".to_string(),
            PropertyConfig::new(
                PropertyType::String,
                "SSL Certificate",
                "PEM encoded client certificate issued by ADP",
            )
            .required()
            .secret()
            .multiline(),
        );
        properties.insert(
            "ssl_key".to_string(),
            PropertyConfig::new(
                PropertyType::String,
                "SSL Private Key",
                "PEM encoded private key matching the client certificate",
            )
            .required()
            .secret()
            .multiline(),
        );
        properties.insert(
            "token_url".to_string(),
            PropertyConfig::new(PropertyType::String, "Token URL", "OAuth2 token endpoint")
                .default_value(json!(DEFAULT_TOKEN_URL)),
        );
        properties.insert(
            "base_url".to_string(),
            PropertyConfig::new(PropertyType::String, "Base URL", "ADP HR API base URL")
                .default_value(json!(DEFAULT_BASE_URL)),
        );
        let mut termination = PropertyConfig::new(
            PropertyType::String,
            "Pagination Termination",
            "Stop at the page computed from the worker count, or scan until an empty page",
        )
        .default_value(json!("final_page"));
        termination.allowed_values = Some(vec![json!("final_page"), json!("empty_page")]);
        properties.insert("termination".to_string(), termination);
        properties.insert(
            "request_timeout_secs".to_string(),
            PropertyConfig::new(
                PropertyType::Integer,
                "Request Timeout",
                "Timeout for each HTTP request, in seconds",
            )
            .default_value(json!(DEFAULT_TIMEOUT_SECS)),
        );
        properties.insert(
            "materialize_credentials".to_string(),
            PropertyConfig::new(
                PropertyType::Boolean,
                "Materialize Credentials",
                "Write the certificate and key to a private temporary directory for the run",
            )
            .default_value(json!(false)),
        );

        Self { properties }
    }

    /// Render as a JSON schema `connectionSpecification`
    pub fn to_json_schema(&self, title: &str) -> Value {
        let required: Vec<&String> = self
            .properties
            .iter()
            .filter(|(_, p)| p.required)
            .map(|(name, _)| name)
            .collect();

        let properties: serde_json::Map<String, Value> = self
            .properties
            .iter()
            .map(|(name, p)| {
                let mut prop = json!({ "type": p.property_type });
                if let Some(title) = &p.title {
                    prop["title"] = json!(title);
                }
                if let Some(description) = &p.description {
                    prop["description"] = json!(description);
                }
                if p.secret {
                    prop["airbyte_secret"] = json!(true);
                }
                if p.multiline {
                    prop["multiline"] = json!(true);
                }
                if let Some(default) = &p.default {
                    prop["default"] = default.clone();
                }
                if let Some(values) = &p.allowed_values {
                    prop["enum"] = json!(values);
                }
                (name.clone(), prop)
            })
            .collect();

        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "title": title,
            "required": required,
            "properties": properties,
            "additionalProperties": true
        })
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Discovered catalog (available streams)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Available streams
    pub streams: Vec<CatalogStream>,
}

/// Stream in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStream {
    /// Stream name
    pub name: String,

    /// JSON schema for the stream
    #[serde(default)]
    pub json_schema: Value,

    /// Supported sync modes
    #[serde(default)]
    pub supported_sync_modes: Vec<SyncMode>,

    /// Source-defined primary key
    #[serde(default)]
    pub source_defined_primary_key: Option<Vec<Vec<String>>>,
}

impl CatalogStream {
    /// The `workers` stream: opaque records, full refresh only
    pub fn workers() -> Self {
        Self {
            name: WORKERS_STREAM.to_string(),
            json_schema: json!({
                "$schema": "http://json-schema.org/draft-07/schema#",
                "type": "object",
                "properties": {},
                "additionalProperties": true
            }),
            supported_sync_modes: vec![SyncMode::FullRefresh],
            source_defined_primary_key: None,
        }
    }
}

/// Configured catalog (selected streams for sync)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    /// Selected streams
    pub streams: Vec<ConfiguredStream>,
}

impl ConfiguredCatalog {
    /// Catalog selecting every stream of a discovered catalog in full refresh
    pub fn full_refresh(catalog: &Catalog) -> Self {
        Self {
            streams: catalog
                .streams
                .iter()
                .map(|stream| ConfiguredStream {
                    stream: stream.clone(),
                    sync_mode: SyncMode::FullRefresh,
                })
                .collect(),
        }
    }

    /// Whether a stream is selected
    pub fn contains(&self, name: &str) -> bool {
        self.streams.iter().any(|s| s.stream.name == name)
    }
}

/// Configured stream for sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfiguredStream {
    /// Stream reference
    pub stream: CatalogStream,

    /// Selected sync mode
    #[serde(default)]
    pub sync_mode: SyncMode,
}
