use std::path::{Path, PathBuf};

/// A scanned file with its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Path as it should appear in reports (forward slashes, relative to `base` when possible)
    pub fn display_path(&self, base: &Path) -> String {
        let relative = self.path.strip_prefix(base).unwrap_or(&self.path);
        relative.to_string_lossy().replace('\\', "/")
    }
}

/// Read a file as text. Invalid UTF-8 sequences become U+FFFD; only
/// unreadable files count as empty.
pub fn read_source(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            log::warn!("Failed to read {}: {err}; treating as empty", path.display());
            String::new()
        }
    }
}

pub fn load_sources(paths: &[PathBuf]) -> Vec<SourceFile> {
    paths
        .iter()
        .map(|path| SourceFile::new(path.clone(), read_source(path)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn unreadable_file_becomes_empty_content() {
        let temp = tempdir().unwrap();
        let good = temp.path().join("ok.ts");
        let binary = temp.path().join("blob.ts");
        let missing = temp.path().join("gone.ts");
        fs::write(&good, "api.get('/x')").unwrap();
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let sources = load_sources(&[good.clone(), binary, missing]);

        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].content, "api.get('/x')");
        assert_eq!(sources[1].content, "\u{FFFD}\u{FFFD}\u{0}\u{FFFD}");
        assert_eq!(sources[2].content, "");
    }

    #[test]
    fn latin1_file_keeps_its_code() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("calc.ts");
        let mut bytes = b"// C\xe1lculo de tempo especial\n".to_vec();
        bytes.extend_from_slice(b"export const run = () => api.get(ENDPOINTS.a.b);\n");
        fs::write(&file, bytes).unwrap();

        let content = read_source(&file);

        assert!(content.starts_with("// C\u{FFFD}lculo"), "{content}");
        assert!(content.contains("api.get(ENDPOINTS.a.b)"));
    }

    #[test]
    fn display_path_is_relative_with_forward_slashes() {
        let base = Path::new("/project");
        let file = SourceFile::new("/project/src/pages/Home.tsx", "");
        assert_eq!(file.display_path(base), "src/pages/Home.tsx");

        let outside = SourceFile::new("/elsewhere/a.ts", "");
        assert_eq!(outside.display_path(base), "/elsewhere/a.ts");
    }
}
