//! # Mapping Schema
//!
//! Loads the backend's OpenAPI document (over HTTP or from disk) and reduces it
//! to a [`SchemaIndex`]: path -> set of uppercase methods.

mod error;
mod fetch;
mod index;

pub use error::{Result, SchemaError};
pub use fetch::{load_schema_file, SchemaFetcher, DEFAULT_BACKOFF, DEFAULT_TIMEOUT};
pub use index::SchemaIndex;
