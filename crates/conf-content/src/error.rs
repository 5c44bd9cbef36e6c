//! Error types for conf-content

/// Result type for conf-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing configuration text
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("option line before any section header at line {line}: {content:?}")]
    Malformed { line: usize, content: String },
}
