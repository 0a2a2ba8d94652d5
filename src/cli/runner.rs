//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ConfiguredCatalog;
use crate::connector::{CheckResult, Connector, Message};
use crate::error::{Error, Result, ResultExt};
use crate::source::AdpWorkersSource;
use futures::StreamExt;
use serde_json::{json, Value};
use std::fs;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(),
            Commands::Check { config_json } => self.check(config_json.as_deref()).await,
            Commands::Discover { config_json } => self.discover(config_json.as_deref()).await,
            Commands::Read {
                config_json,
                max_records,
            } => self.read(config_json.as_deref(), *max_records).await,
        }
    }

    /// Load config
    fn load_config(&self, inline: Option<&str>) -> Result<Value> {
        // Inline config takes precedence
        if let Some(json_str) = inline {
            return serde_json::from_str(json_str)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")));
        }

        if let Some(path) = &self.cli.config {
            let content = fs::read_to_string(path).with_context(|| {
                format!("Failed to read config file {}", path.display())
            })?;
            return serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")));
        }

        Ok(json!({}))
    }

    /// Print the connection specification
    fn spec(&self) -> Result<()> {
        let spec = AdpWorkersSource::new().spec();

        self.output_message(&json!({
            "type": "SPEC",
            "spec": {
                "documentationUrl": spec.documentation_url,
                "connectionSpecification": spec.connection_specification()
            }
        }));

        Ok(())
    }

    /// Check connection
    async fn check(&self, config_json: Option<&str>) -> Result<()> {
        let config = self.load_config(config_json)?;
        let result = AdpWorkersSource::new().check(&config).await?;
        self.output_message(&check_to_json(&result));
        Ok(())
    }

    /// Discover streams
    async fn discover(&self, config_json: Option<&str>) -> Result<()> {
        let config = self.load_config(config_json)?;
        let catalog = AdpWorkersSource::new().discover(&config).await?;

        self.output_message(&json!({
            "type": "CATALOG",
            "catalog": catalog
        }));

        Ok(())
    }

    /// Read every stream of the discovered catalog
    async fn read(&self, config_json: Option<&str>, max_records: Option<usize>) -> Result<()> {
        let config = self.load_config(config_json)?;
        let source = AdpWorkersSource::new().with_max_records(max_records.unwrap_or(0));

        let catalog = ConfiguredCatalog::full_refresh(&source.discover(&config).await?);
        debug!("Reading {} stream(s)", catalog.streams.len());

        let mut messages = source.read(&config, &catalog).await?;
        while let Some(message) = messages.next().await {
            self.output_message(&message_to_json(&message?));
        }

        Ok(())
    }

    /// Output a protocol message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Protocol JSON for a check result
pub(crate) fn check_to_json(result: &CheckResult) -> Value {
    let status = if result.success { "SUCCEEDED" } else { "FAILED" };
    let mut connection_status = json!({ "status": status });
    if let Some(message) = &result.message {
        connection_status["message"] = json!(message);
    }

    json!({
        "type": "CONNECTION_STATUS",
        "connectionStatus": connection_status
    })
}

/// Protocol JSON for a read message
pub fn message_to_json(message: &Message) -> Value {
    match message {
        Message::Record {
            stream,
            data,
            emitted_at,
        } => json!({
            "type": "RECORD",
            "record": {
                "stream": stream,
                "data": data,
                "emitted_at": emitted_at.timestamp_millis()
            }
        }),
        Message::Log { level, message } => json!({
            "type": "LOG",
            "log": {
                "level": level,
                "message": message
            }
        }),
    }
}
