use crate::error::{RegistryError, Result};
use tree_sitter::{Node, Parser, Tree};

/// Parse a JavaScript or TypeScript config file
pub(crate) fn parse_program(text: &str) -> Result<Tree> {
    let language: tree_sitter::Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| RegistryError::tree_sitter(format!("Failed to set language: {e}")))?;
    parser
        .parse(text, None)
        .ok_or_else(|| RegistryError::tree_sitter("Failed to parse registry source"))
}

/// Object literal bound to `name` by a program-level declaration such as
/// `export const ENDPOINTS = { ... } as const;`.
///
/// Declarations nested in functions or blocks are not candidates.
pub(crate) fn find_registry_object<'t>(
    root: Node<'t>,
    text: &str,
    name: &str,
) -> Result<Node<'t>> {
    if !is_identifier(name) {
        return Err(RegistryError::InvalidName {
            name: name.to_string(),
        });
    }

    let mut found: Vec<Node<'t>> = Vec::new();
    let mut cursor = root.walk();
    for statement in root.named_children(&mut cursor) {
        let declaration = match statement.kind() {
            "export_statement" => match statement.child_by_field_name("declaration") {
                Some(declaration) => declaration,
                None => continue,
            },
            _ => statement,
        };
        if !matches!(
            declaration.kind(),
            "lexical_declaration" | "variable_declaration"
        ) {
            continue;
        }

        let mut decl_cursor = declaration.walk();
        for declarator in declaration.named_children(&mut decl_cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let binds_name = declarator
                .child_by_field_name("name")
                .is_some_and(|ident| node_text(ident, text) == name);
            if binds_name {
                found.push(declarator);
            }
        }
    }

    let declarator = match found.as_slice() {
        [] => {
            if let Some(error) = first_syntax_error(root) {
                return Err(syntax_error(text, error));
            }
            return Err(RegistryError::NotFound {
                name: name.to_string(),
            });
        }
        [single] => *single,
        _ => {
            return Err(RegistryError::Ambiguous {
                name: name.to_string(),
            })
        }
    };

    let Some(value) = declarator.child_by_field_name("value") else {
        return Err(RegistryError::parse_at(
            text,
            declarator.end_byte(),
            format!("`{name}` has no initializer"),
        ));
    };
    let value = unwrap_expression(value);
    if value.kind() != "object" {
        return Err(RegistryError::parse_at(
            text,
            value.start_byte(),
            format!("`{name}` must be initialized with an object literal"),
        ));
    }
    if let Some(error) = first_syntax_error(value) {
        return Err(syntax_error(text, error));
    }

    log::debug!(
        "Registry `{name}` literal spans bytes {}..{}",
        value.start_byte(),
        value.end_byte()
    );
    Ok(value)
}

/// Strip `( ... )`, `... as const` and `... satisfies T` around the literal
fn unwrap_expression(mut node: Node<'_>) -> Node<'_> {
    while matches!(
        node.kind(),
        "parenthesized_expression" | "as_expression" | "satisfies_expression"
    ) {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// First ERROR or MISSING node below `node`, in source order
pub(crate) fn first_syntax_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_syntax_error)
}

fn syntax_error(text: &str, node: Node<'_>) -> RegistryError {
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        "syntax error".to_string()
    };
    RegistryError::parse_at(text, node.start_byte(), message)
}

pub(crate) fn node_text<'a>(node: Node<'_>, text: &'a str) -> &'a str {
    text.get(node.start_byte()..node.end_byte()).unwrap_or_default()
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
