//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling application settings.
///
/// None of these are recovered locally. They surface at startup so the
/// operator fixes the deployment before any request is served. No variant
/// ever carries the value of a secret.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A mandatory secret was not supplied by any accepted source
    #[error("Client secret is missing: set the {env_var} environment variable ({policy} policy)")]
    MissingSecret {
        env_var: &'static str,
        policy: String,
    },

    /// A setting is present but violates its constraint
    #[error("Invalid value for '{key}': {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// An explicitly requested settings file does not exist
    #[error("Configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Settings could not be extracted or serialized
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },
}

impl ConfigurationError {
    /// Shorthand for an [`ConfigurationError::InvalidValue`]
    pub fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// True when the error is the fail-fast missing secret case
    pub fn is_missing_secret(&self) -> bool {
        matches!(self, Self::MissingSecret { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_message_names_variable() {
        let err = ConfigurationError::MissingSecret {
            env_var: "CLIENT_SECRET",
            policy: "prefer-env".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("CLIENT_SECRET"));
        assert!(message.contains("prefer-env"));
        assert!(err.is_missing_secret());
    }

    #[test]
    fn test_invalid_value_helper() {
        let err = ConfigurationError::invalid("redirect_path", "getAToken", "must start with '/'");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'redirect_path': getAToken (must start with '/')"
        );
        assert!(!err.is_missing_secret());
    }
}
