use crate::error::{RegistryError, Result};
use crate::syntax::{find_registry_object, node_text, parse_program};
use tree_sitter::Node;

/// Parsed registry literal. Keys keep their source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryNode {
    /// A leaf: the URL path string
    Path(String),
    /// A nested object
    Group(Vec<(String, RegistryNode)>),
}

impl RegistryNode {
    /// Number of string leaves below this node
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Path(_) => 1,
            Self::Group(children) => children.iter().map(|(_, child)| child.leaf_count()).sum(),
        }
    }
}

/// Parse the object literal bound to `name` in a config source.
///
/// Accepted: identifier, number or quoted keys; `'`, `"` and backtick strings
/// (no `${}`); nested objects. Spreads, shorthand or computed keys, methods,
/// numbers, calls and any other expression are rejected with their line and
/// column. Nothing is ever evaluated.
pub fn parse_registry(text: &str, name: &str) -> Result<RegistryNode> {
    let tree = parse_program(text)?;
    let object = find_registry_object(tree.root_node(), text, name)?;
    object_node(object, text)
}

/// Text of the object literal bound to `name`, braces included
pub fn locate_registry<'a>(text: &'a str, name: &str) -> Result<&'a str> {
    let tree = parse_program(text)?;
    let object = find_registry_object(tree.root_node(), text, name)?;
    Ok(node_text(object, text))
}

fn object_node(object: Node<'_>, text: &str) -> Result<RegistryNode> {
    let mut members: Vec<(String, RegistryNode)> = Vec::new();
    let mut cursor = object.walk();

    for member in object.named_children(&mut cursor) {
        if member.is_extra() {
            continue;
        }
        if member.kind() != "pair" {
            return Err(located(
                text,
                member,
                format!("expected `key: value`, found {}", describe(member)),
            ));
        }

        let (Some(key), Some(value)) = (
            member.child_by_field_name("key"),
            member.child_by_field_name("value"),
        ) else {
            return Err(located(text, member, "incomplete property"));
        };
        let key = property_key(key, text)?;
        let value = match value.kind() {
            "object" => object_node(value, text)?,
            "string" | "template_string" => RegistryNode::Path(string_value(value, text)?),
            _ => {
                return Err(located(
                    text,
                    value,
                    format!(
                        "expected a string path or a nested object, found {}",
                        describe(value)
                    ),
                ))
            }
        };

        if members.iter().any(|(existing, _)| existing == &key) {
            return Err(RegistryError::DuplicateKey { key });
        }
        members.push((key, value));
    }

    Ok(RegistryNode::Group(members))
}

fn property_key(key: Node<'_>, text: &str) -> Result<String> {
    match key.kind() {
        "property_identifier" | "number" => Ok(node_text(key, text).to_string()),
        "string" => string_value(key, text),
        _ => Err(located(
            text,
            key,
            format!("expected a property name, found {}", describe(key)),
        )),
    }
}

/// Decoded value of a `string` or substitution-free `template_string` node
fn string_value(node: Node<'_>, text: &str) -> Result<String> {
    let mut cursor = node.walk();
    let substitution = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == "template_substitution");
    if let Some(substitution) = substitution {
        return Err(located(
            text,
            substitution,
            "template interpolation is not allowed",
        ));
    }

    let raw = node_text(node, text);
    let body = raw
        .get(1..raw.len().saturating_sub(1))
        .filter(|_| raw.len() >= 2)
        .unwrap_or_default();
    decode_escapes(body).map_err(|offset| {
        RegistryError::parse_at(text, node.start_byte() + 1 + offset, "invalid escape sequence")
    })
}

/// JavaScript string escapes. On failure returns the byte offset of the
/// offending backslash within `body`.
fn decode_escapes(body: &str) -> std::result::Result<String, usize> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            return Err(start);
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // Line continuation
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                chars.next_if(|&(_, next)| next == '\n');
            }
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next().map(|(_, h)| h)).collect();
                out.push(hex_char(&hex, 2).ok_or(start)?);
            }
            'u' if chars.next_if(|&(_, next)| next == '{').is_some() => {
                let mut hex = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, h)) => hex.push(h),
                        None => return Err(start),
                    }
                }
                if hex.is_empty() || hex.len() > 6 {
                    return Err(start);
                }
                out.push(hex_char(&hex, hex.len()).ok_or(start)?);
            }
            'u' => {
                let hex: String = (0..4).filter_map(|_| chars.next().map(|(_, h)| h)).collect();
                out.push(hex_char(&hex, 4).ok_or(start)?);
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn hex_char(hex: &str, digits: usize) -> Option<char> {
    if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

fn located(text: &str, node: Node<'_>, msg: impl Into<String>) -> RegistryError {
    RegistryError::parse_at(text, node.start_byte(), msg)
}

fn describe(node: Node<'_>) -> String {
    node.kind().replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn group(members: Vec<(&str, RegistryNode)>) -> RegistryNode {
        RegistryNode::Group(
            members
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    fn path(p: &str) -> RegistryNode {
        RegistryNode::Path(p.to_string())
    }

    fn parse(literal: &str) -> Result<RegistryNode> {
        parse_registry(&format!("const ENDPOINTS = {literal};"), "ENDPOINTS")
    }

    #[test]
    fn parses_js_style_registry() {
        let text = r#"{
  // auth
  auth: { login: '/api/v1/auth/login', "me": "/api/v1/auth/me" },
  calculadoras: {
    previdenciario: {
      tempo_especial: `/api/v1/tempo-especial`, /* inline */
    },
  },
}"#;
        let node = parse(text).unwrap();
        assert_eq!(
            node,
            group(vec![
                (
                    "auth",
                    group(vec![
                        ("login", path("/api/v1/auth/login")),
                        ("me", path("/api/v1/auth/me")),
                    ])
                ),
                (
                    "calculadoras",
                    group(vec![(
                        "previdenciario",
                        group(vec![("tempo_especial", path("/api/v1/tempo-especial"))])
                    )])
                ),
            ])
        );
        assert_eq!(node.leaf_count(), 3);
    }

    #[test]
    fn accepts_plain_json_and_numeric_keys() {
        let node = parse(r#"{"a": {"b": "/x/y"}, 2: '/two'}"#).unwrap();
        assert_eq!(
            node,
            group(vec![
                ("a", group(vec![("b", path("/x/y"))])),
                ("2", path("/two")),
            ])
        );
    }

    #[test]
    fn decodes_escapes() {
        let node = parse(r#"{ a: 'it\'s/ok', b: '\x2Fv1/x\u{2F}y' }"#).unwrap();
        assert_eq!(
            node,
            group(vec![("a", path("it's/ok")), ("b", path("/v1/x/y"))])
        );
    }

    #[test]
    fn line_continuation_is_dropped() {
        let node = parse("{ a: '/api/v1/\\\n  long' }").unwrap();
        assert_eq!(node, group(vec![("a", path("/api/v1/  long"))]));
    }

    #[test]
    fn decode_escapes_reports_bad_sequences() {
        assert_eq!(decode_escapes(r"/a\x4"), Err(2));
        assert_eq!(decode_escapes(r"\u{110000}"), Err(0));
        assert_eq!(decode_escapes(r"\q/x").as_deref(), Ok("q/x"));
    }

    #[test]
    fn rejects_code_instead_of_evaluating_it() {
        for bad in [
            "{ a: buildUrl('/x') }",
            "{ ...BASE, a: '/x' }",
            "{ a: `/users/${id}` }",
            "{ a: 42 }",
            "{ [key]: '/x' }",
            "{ a }",
            "{ a() { return '/x'; } }",
            "{ a: '/x' + '/y' }",
        ] {
            let err = parse(bad).unwrap_err();
            assert!(
                matches!(err, RegistryError::Parse { .. }),
                "expected parse error for {bad}, got {err:?}"
            );
        }
    }

    #[test]
    fn parse_error_carries_location() {
        let err = parse_registry(
            "const ENDPOINTS = {\n  a: '/x',\n  b: fetch()\n}",
            "ENDPOINTS",
        )
        .unwrap_err();
        match err {
            RegistryError::Parse { line, column, .. } => {
                assert_eq!((line, column), (3, 6));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_keys() {
        assert!(matches!(
            parse("{ a: '/x', a: '/y' }"),
            Err(RegistryError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn locate_returns_literal_text() {
        let text = "export const ENDPOINTS = { a: '/a' } satisfies Record<string, string>;";
        assert_eq!(locate_registry(text, "ENDPOINTS").unwrap(), "{ a: '/a' }");
    }
}
