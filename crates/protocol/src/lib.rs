//! # Mapping Protocol
//!
//! Data model shared by every stage of the mapping check, and the JSON shape of
//! the report it writes.
//!
//! ```text
//! EndpointEntry ──┐
//!                 ├──> ReconciliationRecord ──> Report
//! CallSite ───────┘
//! ```

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod paths;

pub use paths::{join_url, normalize_path, same_path};

/// One endpoint declared in the front-end registry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndpointEntry {
    /// Dotted registry name, e.g. `calculadoras.previdenciario.tempo_especial`
    pub key_path: String,
    /// URL path declared for the key
    pub path: String,
}

impl EndpointEntry {
    pub fn new(key_path: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key_path: key_path.into(),
            path: path.into(),
        }
    }
}

/// HTTP verbs the call detector recognizes
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Case-insensitive: `get`, `Get` and `GET` all parse.
    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| format!("unsupported HTTP method '{raw}'"))
    }
}

/// How a call site was tied to a path
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallSource {
    /// Resolved through a registry reference such as `ENDPOINTS.a.b`
    Endpoints,
    /// Parsed from a quoted path literal
    Literal,
}

/// One HTTP client invocation found in source
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallSite {
    pub file: String,
    pub method: HttpMethod,
    pub key_path: Option<String>,
    pub path: String,
    pub source: CallSource,
}

/// Outcome of comparing one endpoint/method pair with the backend schema
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    MethodMismatch,
    NotFound,
    UnknownMethod,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Ok,
        Status::MethodMismatch,
        Status::NotFound,
        Status::UnknownMethod,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::MethodMismatch => "METHOD_MISMATCH",
            Self::NotFound => "NOT_FOUND",
            Self::UnknownMethod => "UNKNOWN_METHOD",
        }
    }

    /// Statuses that mean the front-end and backend disagree.
    pub fn is_drift(self) -> bool {
        matches!(self, Self::MethodMismatch | Self::NotFound)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the report
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRecord {
    /// `None` for calls that target a path missing from the registry
    pub key_path: Option<String>,
    pub path: String,
    /// `None` when no call site was found for a declared endpoint
    pub method: Option<HttpMethod>,
    pub status: Status,
    pub backend_available_methods: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_frontend_endpoints: usize,
    pub total_calls_detected: usize,
}

/// Full result of one run
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// RFC 3339 / ISO-8601 timestamp (UTC)
    pub generated_at: String,
    pub api_base_url: String,
    pub openapi_url: String,
    pub summary: ReportSummary,
    pub details: Vec<ReconciliationRecord>,
}

impl Report {
    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::from_records(&self.details)
    }

    pub fn has_drift(&self) -> bool {
        self.details.iter().any(|record| record.status.is_drift())
    }
}

/// Per-status tally used by the console summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub ok: usize,
    pub method_mismatch: usize,
    pub not_found: usize,
    pub unknown_method: usize,
}

impl StatusCounts {
    pub fn from_records(records: &[ReconciliationRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.add(record.status);
        }
        counts
    }

    pub fn add(&mut self, status: Status) {
        match status {
            Status::Ok => self.ok += 1,
            Status::MethodMismatch => self.method_mismatch += 1,
            Status::NotFound => self.not_found += 1,
            Status::UnknownMethod => self.unknown_method += 1,
        }
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Ok => self.ok,
            Status::MethodMismatch => self.method_mismatch,
            Status::NotFound => self.not_found,
            Status::UnknownMethod => self.unknown_method,
        }
    }

    pub fn total(&self) -> usize {
        self.ok + self.method_mismatch + self.not_found + self.unknown_method
    }
}

/// JSON Schema describing the report file.
pub fn report_json_schema() -> Result<String> {
    let schema = schemars::schema_for!(Report);
    serde_json::to_string_pretty(&schema).map_err(Into::into)
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
