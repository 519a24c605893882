//! # Mapping Registry
//!
//! Extracts the front-end endpoint registry (symbolic name -> URL path) from a
//! config source file without evaluating it.
//!
//! ```text
//! config file ──> tree-sitter (TypeScript) ──> program-level `const ENDPOINTS = {...}`
//!                    └─> object literal (strings and nested objects only)
//!                          └─> flatten to EndpointEntry { keyPath, path }
//! ```

mod error;
mod literal;
mod registry;
mod syntax;

pub use error::{RegistryError, Result};
pub use literal::{locate_registry, parse_registry, RegistryNode};
pub use registry::{flatten, load_registry, EndpointRegistry, DEFAULT_REGISTRY_NAME};
