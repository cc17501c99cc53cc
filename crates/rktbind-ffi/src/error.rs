//! Binding generation error types.
//!
//! Generation itself never fails; only loading inputs and configuration can.

/// Errors that can occur around a binding generation run.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// Invalid configuration value.
    #[error("invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    /// Declaration loading error.
    #[error(transparent)]
    Declarations(#[from] rktbind_core::DeclError),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for binding generation.
pub type Result<T> = std::result::Result<T, BindError>;
