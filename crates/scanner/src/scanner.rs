use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};

/// What the scanner considers front-end source
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Lowercase extensions without the dot
    pub extensions: Vec<String>,
    /// Directory names never entered (matched case-insensitively)
    pub ignored_scopes: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: SOURCE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            ignored_scopes: IGNORED_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Scanner for finding source files in a front-end tree
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_options(root, ScanOptions::default())
    }

    pub fn with_options(root: impl AsRef<Path>, options: ScanOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every file below the root with an accepted extension.
    ///
    /// Hidden, gitignored and large files are listed too; only dependency
    /// scopes are pruned. Never fails: unreadable entries are logged and
    /// skipped, a missing root yields an empty list. Output is sorted.
    pub fn scan(&self) -> Vec<PathBuf> {
        if !self.root.is_dir() {
            log::warn!("Source root {} is not a directory", self.root.display());
            return Vec::new();
        }

        let mut files = Vec::new();

        let ignored = self.options.ignored_scopes.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder.standard_filters(false).follow_links(false);
        builder.filter_entry(move |entry| !is_ignored_scope(entry, &ignored));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !self.is_source_file(path) {
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!(
            "Found {} source files under {}",
            files.len(),
            self.root.display()
        );
        files
    }

    fn is_source_file(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.options
            .extensions
            .iter()
            .any(|candidate| candidate == &ext)
    }
}

/// A directory below the root whose own name is an ignored scope
fn is_ignored_scope(entry: &DirEntry, ignored: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_dir()) {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    ignored.iter().any(|scope| scope.eq_ignore_ascii_case(&name))
}

const IGNORED_SCOPES: &[&str] = &["node_modules", ".git"];

const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "vue", "svelte"];
