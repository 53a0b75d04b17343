//! Client secret handling and the policy deciding where it may come from

use once_cell::sync::Lazy;
use patgate_common::ConfigurationError;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Environment variable that overrides the configured client secret
pub const CLIENT_SECRET_ENV: &str = "CLIENT_SECRET";

/// Literal shipped in place of a real secret
pub const CLIENT_SECRET_PLACEHOLDER: &str = "{CLIENT_SECRET_HERE}";

/// Written wherever a real secret would otherwise be printed or serialized
pub const REDACTED: &str = "[REDACTED]";

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[A-Za-z][A-Za-z0-9_]*\}").expect("placeholder pattern is valid")
});

/// True when `value` still contains an unfilled `{NAME}` template marker.
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_RE.is_match(value)
}

/// OAuth client secret.
///
/// `Debug`, `Display` and `Serialize` never emit a real value and the buffer
/// is wiped on drop. An unset secret (the placeholder) serializes as-is so the
/// defaults can still seed figment and the example file.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw secret, for handing to the OAuth client only
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Empty, whitespace, still the shipped placeholder, or a redacted dump
    pub fn is_unset(&self) -> bool {
        let trimmed = self.0.trim();
        trimmed.is_empty() || trimmed == REDACTED || is_placeholder(trimmed)
    }
}

impl Serialize for ClientSecret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_unset() {
            serializer.serialize_str(&self.0)
        } else {
            serializer.serialize_str(REDACTED)
        }
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientSecret({REDACTED})")
    }
}

impl fmt::Display for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Where the client secret is allowed to come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecretPolicy {
    /// `CLIENT_SECRET` wins, otherwise a filled-in literal is accepted
    #[default]
    PreferEnv,
    /// Only `CLIENT_SECRET` is accepted
    RequireEnv,
}

impl fmt::Display for SecretPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretPolicy::PreferEnv => f.write_str("prefer-env"),
            SecretPolicy::RequireEnv => f.write_str("require-env"),
        }
    }
}

/// Where the resolved secret came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Environment,
    Literal,
}

impl SecretPolicy {
    /// Pick the effective secret from the environment override and the
    /// configured literal.
    ///
    /// An empty or whitespace environment value counts as unset.
    pub fn resolve(
        self,
        env_value: Option<String>,
        literal: &ClientSecret,
    ) -> Result<(ClientSecret, SecretSource), ConfigurationError> {
        if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
            return Ok((ClientSecret::new(value), SecretSource::Environment));
        }

        match self {
            SecretPolicy::PreferEnv if !literal.is_unset() => {
                Ok((literal.clone(), SecretSource::Literal))
            }
            _ => Err(ConfigurationError::MissingSecret {
                env_var: CLIENT_SECRET_ENV,
                policy: self.to_string(),
            }),
        }
    }
}
