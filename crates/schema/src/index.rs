use crate::error::{Result, SchemaError};
use mapping_protocol::normalize_path;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Path item keys that declare operations; everything else (`parameters`,
/// `summary`, `servers`, `$ref`, ...) is ignored.
const OPERATION_KEYS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Backend contract reduced to path -> supported methods
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaIndex {
    /// Paths exactly as declared in the schema
    paths: BTreeMap<String, BTreeSet<String>>,
    /// Same data keyed by normalized path; trailing-slash variants are merged
    normalized: BTreeMap<String, BTreeSet<String>>,
}

impl SchemaIndex {
    /// Index the `paths` object of an OpenAPI document. `origin` names the URL or
    /// file in error messages.
    pub fn from_document(doc: &Value, origin: &str) -> Result<Self> {
        let invalid = |message: &str| SchemaError::InvalidDocument {
            origin: origin.to_string(),
            message: message.to_string(),
        };

        let root = doc
            .as_object()
            .ok_or_else(|| invalid("top level is not an object"))?;
        let paths = root
            .get("paths")
            .ok_or_else(|| invalid("missing `paths`"))?
            .as_object()
            .ok_or_else(|| invalid("`paths` is not an object"))?;

        let mut index = Self::default();
        for (path, item) in paths {
            let methods = item
                .as_object()
                .map(|ops| {
                    ops.keys()
                        .filter(|key| OPERATION_KEYS.contains(&key.to_ascii_lowercase().as_str()))
                        .map(|key| key.to_ascii_uppercase())
                        .collect::<BTreeSet<_>>()
                })
                .unwrap_or_default();
            index.insert(path, methods);
        }

        log::info!("Schema from {origin} declares {} paths", index.len());
        Ok(index)
    }

    /// Parse a JSON document and index it
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(text).map_err(|source| SchemaError::InvalidBody {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_document(&doc, origin)
    }

    pub fn insert(&mut self, path: &str, methods: BTreeSet<String>) {
        self.normalized
            .entry(normalize_path(path).to_string())
            .or_default()
            .extend(methods.iter().cloned());
        self.paths.entry(path.to_string()).or_default().extend(methods);
    }

    /// Methods declared for `path`, compared after normalization.
    /// `None` when the schema has no such path at all.
    pub fn methods_for(&self, path: &str) -> Option<&BTreeSet<String>> {
        self.normalized.get(normalize_path(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.methods_for(path).is_some()
    }

    /// Paths verbatim as declared
    pub fn paths(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
