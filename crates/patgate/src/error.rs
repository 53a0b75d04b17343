//! Error types for patgate

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be loaded or are invalid
    #[error("Configuration error: {0}")]
    Config(#[from] patgate_common::ConfigurationError),

    /// Invalid command-line input
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Stable code for logs and exit reporting
    pub fn error_code(&self) -> &'static str {
        use patgate_common::ConfigurationError as C;

        match self {
            Error::Config(C::MissingSecret { .. }) => "PATGATE_MISSING_SECRET",
            Error::Config(C::FileNotFound { .. }) => "PATGATE_CONFIG_NOT_FOUND",
            Error::Config(_) => "PATGATE_CONFIG_ERROR",
            Error::InvalidArgument { .. } => "PATGATE_INVALID_ARGUMENT",
            Error::Other(_) => "PATGATE_INTERNAL_ERROR",
        }
    }
}
