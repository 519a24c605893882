use std::path::PathBuf;
use thiserror::Error;

/// Result type for registry extraction
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Configuration errors raised while loading the endpoint registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry file could not be read
    #[error("Cannot read registry file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry name is not a plain identifier
    #[error("Invalid registry name `{name}`")]
    InvalidName { name: String },

    /// No `const <name> = { ... }` declaration in the file
    #[error("Registry declaration `{name}` not found")]
    NotFound { name: String },

    /// More than one top-level declaration with the same name
    #[error("Registry declaration `{name}` is declared more than once")]
    Ambiguous { name: String },

    /// The literal is outside the accepted object/string grammar
    #[error("Invalid registry literal at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// A key appears twice in the same object
    #[error("Duplicate registry key `{key}`")]
    DuplicateKey { key: String },

    /// Tree-sitter setup failed
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

impl RegistryError {
    /// Create a parse error located at `offset` within `text`
    pub fn parse_at(text: &str, offset: usize, msg: impl Into<String>) -> Self {
        let (line, column) = line_column(text, offset);
        Self::Parse {
            line,
            column,
            message: msg.into(),
        }
    }

    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitter(msg.into())
    }
}

/// 1-based line and column of a byte offset
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(pos) => before[pos + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::line_column;

    #[test]
    fn line_column_is_one_based() {
        let text = "{\n  a: 1\n}";
        assert_eq!(line_column(text, 0), (1, 1));
        assert_eq!(line_column(text, 4), (2, 3));
        assert_eq!(line_column(text, text.len()), (3, 2));
    }
}
