//! # Mapping Scanner
//!
//! Finds front-end source files and loads their text for call-site detection.
//!
//! ```no_run
//! use mapping_scanner::{load_sources, FileScanner};
//!
//! let files = FileScanner::new("src").scan();
//! let sources = load_sources(&files);
//! println!("{} files", sources.len());
//! ```

mod scanner;
mod source;

pub use scanner::{FileScanner, ScanOptions};
pub use source::{load_sources, read_source, SourceFile};
