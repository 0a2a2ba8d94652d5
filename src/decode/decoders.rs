//! Decoder implementations

use crate::auth::extract_jsonpath;
use crate::error::{Error, Result};
use serde_json::Value;

/// Trait for decoding response bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the response body into a list of records
    fn decode(&self, body: &str) -> Result<Vec<Value>>;

    /// Extract records from an already parsed body
    fn extract(&self, value: Value) -> Result<Vec<Value>>;
}

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder that extracts the array found at a dot-separated path
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    record_path: String,
}

impl JsonDecoder {
    /// Create a decoder for records under `path`
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: path.into(),
        }
    }

    /// Decoder for the `workers` wrapper of ADP HR responses
    pub fn workers() -> Self {
        Self::with_path("workers")
    }

    /// The record path
    pub fn record_path(&self) -> &str {
        &self.record_path
    }

    fn extraction_error(&self, message: impl Into<String>) -> Error {
        Error::RecordExtraction {
            path: self.record_path.clone(),
            message: message.into(),
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;
        self.extract(value)
    }

    fn extract(&self, value: Value) -> Result<Vec<Value>> {
        let path = self
            .record_path
            .strip_prefix("$.")
            .unwrap_or(&self.record_path);

        let mut current = value;
        for part in path.split('.') {
            current = match current {
                Value::Object(mut map) => map
                    .remove(part)
                    .ok_or_else(|| self.extraction_error(format!("field '{part}' not found")))?,
                _ => return Err(self.extraction_error("expected a JSON object")),
            };
        }

        match current {
            Value::Array(records) => Ok(records),
            Value::Null => Ok(Vec::new()),
            other => Err(self.extraction_error(format!(
                "expected an array, found {}",
                json_type_name(&other)
            ))),
        }
    }
}

// ============================================================================
// Total Count Decoder
// ============================================================================

/// Reads the total record count from a `count=true` response
#[derive(Debug, Clone)]
pub struct TotalCountDecoder {
    count_path: String,
}

impl Default for TotalCountDecoder {
    fn default() -> Self {
        Self::with_path("meta.totalNumber")
    }
}

impl TotalCountDecoder {
    /// Create a decoder reading the count at `path`
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            count_path: path.into(),
        }
    }

    /// Parse a raw count response body
    pub fn decode(&self, body: &str) -> Result<u64> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::malformed(&self.count_path, format!("count response is not valid JSON: {e}")))?;
        self.total(&value)
    }

    /// Extract the count; accepts a JSON number or a numeric string
    pub fn total(&self, body: &Value) -> Result<u64> {
        let raw = extract_jsonpath(body, &self.count_path)
            .ok_or_else(|| Error::malformed(&self.count_path, "not present in count response"))?;

        raw.trim()
            .parse::<u64>()
            .map_err(|e| Error::malformed(&self.count_path, format!("'{raw}' is not a count: {e}")))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
