//! Declaration loading error types.

/// Errors that can occur while loading a declaration sequence.
#[derive(Debug, thiserror::Error)]
pub enum DeclError {
    /// The declaration sequence is structurally inconsistent.
    #[error("invalid declaration: {detail}")]
    InvalidDeclaration { detail: String },

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for declaration loading.
pub type Result<T> = std::result::Result<T, DeclError>;
