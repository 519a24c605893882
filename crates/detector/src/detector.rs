use crate::error::{DetectorError, Result};
use mapping_protocol::{CallSite, CallSource, HttpMethod};
use mapping_registry::EndpointRegistry;
use mapping_scanner::SourceFile;
use regex::Regex;
use std::path::Path;

/// Client identifiers recognized when no override is configured
pub const DEFAULT_CLIENTS: &[&str] = &["api", "axios", "http", "client", "httpClient"];

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Identifiers whose `.get/.post/...` calls count as HTTP requests
    pub clients: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            clients: DEFAULT_CLIENTS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Characters accepted in a quoted path literal after the leading `/`
const PATH_CHARS: &str = r"[A-Za-z0-9\-._~%!&*+,;=:@/?#\[\]{}]*";

/// Regex-based scan for `<client>.<verb>(<args>)` call expressions.
///
/// This is an approximate static scan: arguments end at the first `)`, and
/// URLs built at runtime or calls through unknown client names are not seen.
pub struct CallSiteDetector<'a> {
    registry: &'a EndpointRegistry,
    qualified: Vec<(String, usize)>,
    call: Regex,
    literal: Regex,
}

impl<'a> CallSiteDetector<'a> {
    pub fn new(registry: &'a EndpointRegistry, config: &DetectorConfig) -> Result<Self> {
        if config.clients.is_empty() {
            return Err(DetectorError::NoClients);
        }
        for client in &config.clients {
            if !is_identifier(client) {
                return Err(DetectorError::InvalidClient(client.clone()));
            }
        }

        let clients = config
            .clients
            .iter()
            .map(|c| regex::escape(c))
            .collect::<Vec<_>>()
            .join("|");
        let call = Regex::new(&format!(
            r"(?:^|[^\w$.])(?:{clients})\s*\.\s*(?i:(get|post|put|patch|delete))\s*(?:<[^()]*?>)?\s*\(([^)]*)\)"
        ))?;
        let literal = Regex::new(&format!(
            r#"'(/{PATH_CHARS})'|"(/{PATH_CHARS})"|`(/{PATH_CHARS})`"#
        ))?;

        let qualified = registry
            .entries()
            .iter()
            .enumerate()
            .map(|(idx, entry)| (registry.qualified_key(entry), idx))
            .collect();

        Ok(Self {
            registry,
            qualified,
            call,
            literal,
        })
    }

    /// Detect call sites in every file, in file order then match order.
    /// `display_root` makes reported file paths relative.
    pub fn detect(&self, sources: &[SourceFile], display_root: &Path) -> Vec<CallSite> {
        let calls: Vec<CallSite> = sources
            .iter()
            .flat_map(|source| self.detect_in(&source.display_path(display_root), &source.content))
            .collect();
        log::info!(
            "Detected {} call sites in {} files",
            calls.len(),
            sources.len()
        );
        calls
    }

    /// Detect call sites in one file's text
    pub fn detect_in(&self, file: &str, content: &str) -> Vec<CallSite> {
        let mut out = Vec::new();

        for caps in self.call.captures_iter(content) {
            let (Some(verb), Some(args)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let Ok(method) = verb.as_str().parse::<HttpMethod>() else {
                continue;
            };
            let args = args.as_str();

            let keyed = self.registry_refs(args);
            if !keyed.is_empty() {
                for idx in keyed {
                    let entry = &self.registry.entries()[idx];
                    out.push(CallSite {
                        file: file.to_string(),
                        method,
                        key_path: Some(entry.key_path.clone()),
                        path: entry.path.clone(),
                        source: CallSource::Endpoints,
                    });
                }
                continue;
            }

            if let Some(path) = self.path_literal(args) {
                out.push(CallSite {
                    file: file.to_string(),
                    method,
                    key_path: self.registry.key_for_path(path).map(str::to_string),
                    path: path.to_string(),
                    source: CallSource::Literal,
                });
                continue;
            }

            log::debug!(
                "{file}: unresolved {} call with arguments `{}`",
                method,
                args.trim()
            );
        }

        out
    }

    /// Registry entries referenced as whole words in `args`, in registry order
    fn registry_refs(&self, args: &str) -> Vec<usize> {
        if !args.contains(self.registry.name()) {
            return Vec::new();
        }
        self.qualified
            .iter()
            .filter(|(key, _)| contains_word(args, key))
            .map(|(_, idx)| *idx)
            .collect()
    }

    fn path_literal<'t>(&self, args: &'t str) -> Option<&'t str> {
        let caps = self.literal.captures(args)?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(is_ident_char)
        }
        _ => false,
    }
}

/// `needle` occurs in `haystack` not glued to a longer identifier or member chain
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(|c| is_ident_char(c) || c == '.')
            && !after.is_some_and(is_ident_char)
    })
}
