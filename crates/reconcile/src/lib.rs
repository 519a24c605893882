//! # Mapping Reconcile
//!
//! Joins declared endpoints and detected calls with the backend schema index
//! and classifies every endpoint/method pair.

mod reconcile;

pub use mapping_protocol::normalize_path;
pub use reconcile::{classify, reconcile};
