//! ADP Worker Management source
//!
//! `AdpWorkersSource` implements `Connector` for the single `workers` stream.

use crate::auth::Authenticator;
use crate::config::{Catalog, CatalogStream, ConfiguredCatalog, SourceConfig, SpecConfig, WORKERS_STREAM};
use crate::connector::{CheckResult, Connector, ConnectorSpec, MessageStream};
use crate::engine::{SyncConfig, SyncEngine};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::tls::ClientIdentity;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Build the mutual-TLS HTTP client with an authenticator attached
///
/// The returned identity owns any materialized credential files and must
/// outlive every request made through the client.
pub fn connect(config: &SourceConfig) -> Result<(HttpClient, ClientIdentity)> {
    let certificate = config.client_certificate()?;
    let identity = ClientIdentity::load(&certificate, config.materialize_credentials)?;

    let http_config = HttpClientConfig::builder()
        .base_url(config.base_url()?)
        .timeout(config.timeout())
        .build();
    let mut client = HttpClient::with_identity(http_config, identity.identity())?;

    let authenticator = Authenticator::with_client(
        config.token_url()?,
        config.client_credentials()?,
        client.inner().clone(),
    );
    client.set_authenticator(authenticator);

    Ok((client, identity))
}

/// Source connector for ADP workers
#[derive(Debug, Clone, Default)]
pub struct AdpWorkersSource {
    max_records: usize,
}

impl AdpWorkersSource {
    /// Create a new source
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop reading after `max` records (0 = unlimited)
    #[must_use]
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }

    async fn check_connection(&self, config: &Value) -> Result<()> {
        let config = SourceConfig::from_value(config)?;
        let (client, _identity) = connect(&config)?;
        let authenticator = client
            .authenticator()
            .ok_or_else(|| Error::auth("no authenticator configured"))?;

        authenticator.fetch_token().await?;
        Ok(())
    }
}

#[async_trait]
impl Connector for AdpWorkersSource {
    fn spec(&self) -> ConnectorSpec {
        ConnectorSpec {
            name: "source-adp-workers".to_string(),
            title: "ADP Workers".to_string(),
            description: Some(
                "Full-refresh extraction of worker records from the ADP HR v2 API".to_string(),
            ),
            spec: SpecConfig::adp_workers(),
            documentation_url: Some("https://developers.adp.com/".to_string()),
        }
    }

    async fn check(&self, config: &Value) -> Result<CheckResult> {
        match self.check_connection(config).await {
            Ok(()) => {
                info!("Connection check succeeded");
                Ok(CheckResult::success())
            }
            Err(e) => {
                warn!("Connection check failed: {}", e);
                Ok(CheckResult::failure(e.to_string()))
            }
        }
    }

    async fn discover(&self, _config: &Value) -> Result<Catalog> {
        Ok(Catalog {
            streams: vec![CatalogStream::workers()],
        })
    }

    async fn read(&self, config: &Value, catalog: &ConfiguredCatalog) -> Result<MessageStream> {
        if let Some(unknown) = catalog
            .streams
            .iter()
            .find(|configured| configured.stream.name != WORKERS_STREAM)
        {
            return Err(Error::StreamNotFound {
                stream: unknown.stream.name.clone(),
            });
        }
        if !catalog.contains(WORKERS_STREAM) {
            return Err(Error::StreamNotFound {
                stream: WORKERS_STREAM.to_string(),
            });
        }

        let config = SourceConfig::from_value(config)?;
        debug!("Reading with {:?}", config);
        let (client, identity) = connect(&config)?;

        let sync_config = SyncConfig::new()
            .with_termination(config.termination)
            .with_max_records(self.max_records);

        SyncEngine::new(client)
            .with_config(sync_config)
            .with_identity(identity)
            .start()
            .await
    }
}
