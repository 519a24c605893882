use thiserror::Error;

/// Result type for call-site detection
pub type Result<T> = std::result::Result<T, DetectorError>;

#[derive(Error, Debug)]
pub enum DetectorError {
    /// A configured client name cannot appear in a call expression
    #[error("Invalid HTTP client identifier `{0}`")]
    InvalidClient(String),

    /// No client identifiers configured
    #[error("At least one HTTP client identifier is required")]
    NoClients,

    #[error("Call pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
