//! Custom error types for the Arc client
//!
//! `ArcError` covers construction and configuration failures. `ApiError` is the
//! structured error returned by every strict operation: either the error body
//! sent by the server, or a synthetic body built from the local failure.

use serde_json::{json, Map, Value};
use std::fmt;
use uuid::Uuid;

use crate::constants::api_error::{GENERIC_STATUS, ID_LEN};

/// Main error type for the Arc client
#[derive(Debug)]
pub enum ArcError {
    /// A constructor or configuration argument was rejected
    InvalidArgument { field: String, reason: String },

    /// Configuration loading errors
    Config(ConfigError),

    /// The underlying HTTP client could not be built
    ClientBuild { reason: String },
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },

    /// Configuration parsing error
    ParseError { path: String, reason: String },
}

/// Structured error carried by strict operations.
///
/// Mirrors the JSON error document of the Arc API:
///
/// ```json
/// {"id": "...", "status": "Unauthorized", "code": 401, "title": "...",
///  "detail": "...", "source": {"pointer": "(GET) /api/v1/agents", "parameter": "map[]"}}
/// ```
///
/// The raw text is kept as received; fields are read from the parsed document on demand.
#[derive(Debug, Clone)]
pub struct ApiError {
    json_data: String,
    json: Value,
}

/// What a strict operation was doing when it failed, echoed into synthetic errors.
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorSource {
    pub pointer: String,
    pub parameter: Value,
}

impl ApiError {
    /// Wrap a raw error document. Text that is not valid JSON is kept as-is and
    /// every field accessor returns `None`.
    pub fn from_json(json_data: impl Into<String>) -> Self {
        let json_data = json_data.into();
        let json = serde_json::from_str(&json_data).unwrap_or(Value::Null);
        Self { json_data, json }
    }

    /// Build an error document for a failure that produced no server error body.
    pub(crate) fn synthetic(
        http_status: Option<reqwest::StatusCode>,
        title: &str,
        detail: &str,
        source: ErrorSource,
    ) -> Self {
        let (status, code) = match http_status {
            Some(s) => (
                s.canonical_reason().unwrap_or(GENERIC_STATUS).to_string(),
                s.as_u16(),
            ),
            None => (GENERIC_STATUS.to_string(), 0),
        };

        let document = json!({
            "id": correlation_id(),
            "status": status,
            "code": code,
            "title": title,
            "detail": escape_html(detail),
            "source": {
                "pointer": source.pointer,
                "parameter": source.parameter,
            }
        });

        Self {
            json_data: document.to_string(),
            json: document,
        }
    }

    /// The error document exactly as received or generated
    pub fn json_data(&self) -> &str {
        &self.json_data
    }

    pub fn id(&self) -> Option<&str> {
        self.field("id").and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.field("status").and_then(Value::as_str)
    }

    pub fn code(&self) -> Option<i64> {
        self.field("code").and_then(Value::as_i64)
    }

    pub fn title(&self) -> Option<&str> {
        self.field("title").and_then(Value::as_str)
    }

    pub fn detail(&self) -> Option<&str> {
        self.field("detail").and_then(Value::as_str)
    }

    /// `"<pointer> - <parameter>"`, with missing parts rendered empty
    pub fn source(&self) -> String {
        let source = self.field("source");
        let pointer = source.and_then(|s| s.get("pointer"));
        let parameter = source.and_then(|s| s.get("parameter"));
        format!("{} - {}", display_value(pointer), display_value(parameter))
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.object().and_then(|o| o.get(key))
    }

    fn object(&self) -> Option<&Map<String, Value>> {
        self.json.as_object()
    }
}

/// Eight uppercase hex characters, enough to quote in a support ticket
fn correlation_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id.to_uppercase()
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// Implement Display for all error types
impl fmt::Display for ArcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcError::InvalidArgument { field, reason } => {
                write!(f, "Invalid argument '{}': {}", field, reason)
            }
            ArcError::Config(e) => write!(f, "Configuration error: {}", e),
            ArcError::ClientBuild { reason } => {
                write!(f, "Failed to build HTTP client: {}", reason)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ConfigError::ParseError { path, reason } => {
                write!(f, "Failed to parse config '{}': {}", path, reason)
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object() {
            Some(_) => write!(
                f,
                "{} {}",
                display_value(self.field("title")),
                display_value(self.field("detail"))
            ),
            None => write!(f, "{}", self.json_data),
        }
    }
}

impl std::error::Error for ArcError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for ApiError {}

impl From<ConfigError> for ArcError {
    fn from(err: ConfigError) -> Self {
        ArcError::Config(err)
    }
}
