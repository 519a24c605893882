//! # Mapping Detector
//!
//! Finds HTTP client calls in front-end sources and ties each one to a path,
//! either through a registry reference (`api.get(ENDPOINTS.auth.me)`) or a
//! quoted literal (`api.post('/api/v1/pdf', body)`).

mod detector;
mod error;

pub use detector::{CallSiteDetector, DetectorConfig, DEFAULT_CLIENTS};
pub use error::{DetectorError, Result};
