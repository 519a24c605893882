use crate::error::{RegistryError, Result};
use crate::literal::{parse_registry, RegistryNode};
use mapping_protocol::EndpointEntry;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Default name of the registry declaration in the front-end config
pub const DEFAULT_REGISTRY_NAME: &str = "ENDPOINTS";

/// Flatten a parsed registry depth-first, in key order. Each string leaf becomes
/// one entry keyed by the dotted chain of its parent keys.
pub fn flatten(node: &RegistryNode) -> Result<Vec<EndpointEntry>> {
    let mut out = Vec::with_capacity(node.leaf_count());
    walk("", node, &mut out);

    let mut seen = HashSet::with_capacity(out.len());
    for entry in &out {
        if !seen.insert(entry.key_path.as_str()) {
            return Err(RegistryError::DuplicateKey {
                key: entry.key_path.clone(),
            });
        }
    }
    Ok(out)
}

fn walk(prefix: &str, node: &RegistryNode, out: &mut Vec<EndpointEntry>) {
    match node {
        RegistryNode::Path(path) => out.push(EndpointEntry::new(prefix, path.clone())),
        RegistryNode::Group(children) => {
            for (key, child) in children {
                let key_path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                walk(&key_path, child, out);
            }
        }
    }
}

/// Flattened endpoint registry with lookups used by call-site detection
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    name: String,
    entries: Vec<EndpointEntry>,
    by_path: HashMap<String, usize>,
}

impl EndpointRegistry {
    pub fn new(name: impl Into<String>, entries: Vec<EndpointEntry>) -> Self {
        let mut by_path = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            // First declaration wins when two keys share a path.
            by_path.entry(entry.path.clone()).or_insert(idx);
        }
        Self {
            name: name.into(),
            entries,
            by_path,
        }
    }

    /// Locate, parse and flatten the registry declared as `name` in `text`
    pub fn parse(text: &str, name: &str) -> Result<Self> {
        let node = parse_registry(text, name)?;
        let entries = flatten(&node)?;
        Ok(Self::new(name, entries))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[EndpointEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key as it is written at call sites, e.g. `ENDPOINTS.auth.login`
    pub fn qualified_key(&self, entry: &EndpointEntry) -> String {
        format!("{}.{}", self.name, entry.key_path)
    }

    pub fn qualified_keys(&self) -> Vec<(String, &EndpointEntry)> {
        self.entries
            .iter()
            .map(|entry| (self.qualified_key(entry), entry))
            .collect()
    }

    /// Registry key declared for an exact literal path
    pub fn key_for_path(&self, path: &str) -> Option<&str> {
        self.by_path
            .get(path)
            .map(|&idx| self.entries[idx].key_path.as_str())
    }
}

/// Read the config file and extract the registry declared as `name`
pub fn load_registry(file: &Path, name: &str) -> Result<EndpointRegistry> {
    let bytes = std::fs::read(file).map_err(|source| RegistryError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let registry = EndpointRegistry::parse(&text, name)?;
    log::info!(
        "Loaded {} endpoints from `{}` in {}",
        registry.len(),
        name,
        file.display()
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn literal(object: &str) -> RegistryNode {
        parse_registry(&format!("const ENDPOINTS = {object};"), DEFAULT_REGISTRY_NAME).unwrap()
    }

    #[test]
    fn flatten_builds_dotted_keys_in_source_order() {
        let node = literal("{ z: '/z', a: { c: '/a/c', b: { d: '/a/b/d' } }, m: '/m' }");
        let entries = flatten(&node).unwrap();
        assert_eq!(
            entries,
            vec![
                EndpointEntry::new("z", "/z"),
                EndpointEntry::new("a.c", "/a/c"),
                EndpointEntry::new("a.b.d", "/a/b/d"),
                EndpointEntry::new("m", "/m"),
            ]
        );
    }

    #[test]
    fn flatten_yields_one_unique_entry_per_leaf() {
        let node = literal("{ a: { b: '/1', c: '/2' }, d: { e: { f: '/3', g: '/3' } }, h: {} }");
        let entries = flatten(&node).unwrap();
        assert_eq!(entries.len(), node.leaf_count());
        let keys: HashSet<_> = entries.iter().map(|e| e.key_path.as_str()).collect();
        assert_eq!(keys.len(), entries.len());
    }

    #[test]
    fn dotted_quoted_key_colliding_with_nested_key_is_rejected() {
        let node = literal("{ 'a.b': '/1', a: { b: '/2' } }");
        assert!(matches!(
            flatten(&node),
            Err(RegistryError::DuplicateKey { key }) if key == "a.b"
        ));
    }

    #[test]
    fn registry_lookups() {
        let registry = EndpointRegistry::parse(
            "export const ENDPOINTS = { a: { b: '/x/y' }, c: '/shared', d: '/shared' };",
            DEFAULT_REGISTRY_NAME,
        )
        .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.key_for_path("/x/y"), Some("a.b"));
        assert_eq!(registry.key_for_path("/shared"), Some("c"));
        assert_eq!(registry.key_for_path("/x/y/"), None);

        let qualified: Vec<String> = registry
            .qualified_keys()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(qualified, vec!["ENDPOINTS.a.b", "ENDPOINTS.c", "ENDPOINTS.d"]);
    }
}
