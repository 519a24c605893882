use std::path::PathBuf;
use thiserror::Error;

/// Result type for schema loading
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Fatal errors while obtaining the backend schema
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Building the HTTP client failed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (DNS, connect, timeout, ...)
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body is not JSON
    #[error("Schema from {origin} is not valid JSON: {source}")]
    InvalidBody {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON, but not an OpenAPI document with a `paths` object
    #[error("Schema from {origin} is not an OpenAPI document: {message}")]
    InvalidDocument { origin: String, message: String },

    /// Local schema file could not be read
    #[error("Cannot read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
