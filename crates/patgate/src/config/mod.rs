//! Application settings
//!
//! Settings are assembled once at startup from these layers, later ones
//! winning:
//!
//! 1. compiled-in defaults (placeholders for everything tenant specific)
//! 2. `patgate.toml` in the working directory, or the file passed explicitly
//! 3. `PATGATE_*` environment variables, e.g. `PATGATE_CLIENT_ID`
//! 4. `CLIENT_SECRET`, for the client secret only
//!
//! The result is validated and then handed by reference to every consumer.

mod oauth;
mod secret;
mod session;

pub use oauth::{
    authority_for_tenant, OAuthClientConfig, MICROSOFT_LOGIN_HOST, ORGANIZATION_PLACEHOLDER,
};
pub use secret::{
    is_placeholder, ClientSecret, SecretPolicy, SecretSource, CLIENT_SECRET_ENV,
    CLIENT_SECRET_PLACEHOLDER,
};
pub use session::SessionType;

use figment::{
    error::Kind,
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use patgate_common::{ConfigLoader, ConfigurationError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

/// Settings file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "patgate.toml";

/// Prefix for per-field environment overrides
pub const ENV_PREFIX: &str = "PATGATE_";

pub const CLIENT_ID_PLACEHOLDER: &str = "{APPLICATION_ID}";

/// Multi-tenant authority; replace `{tenant_id}` or use [`authority_for_tenant`]
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/{tenant_id}";

pub const DEFAULT_REDIRECT_PATH: &str = "/getAToken";

/// Azure DevOps personal access token lifecycle API
pub const DEFAULT_ENDPOINT: &str =
    "https://vssps.dev.azure.com/{organization_name}/_apis/Tokens/Pats?api-version=7.2-preview.1";

/// All scopes of the Azure DevOps API resource
pub const AZURE_DEVOPS_DEFAULT_SCOPE: &str = "499b84ac-1321-427f-aa17-267ca6975798/.default";

/// Identity-provider registration and API settings.
///
/// Built by [`AppSettings::load`] and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Application (client) ID of the app registration
    client_id: String,

    /// Client secret of the app registration
    client_secret: ClientSecret,

    /// Accepted sources for `client_secret`
    secret_policy: SecretPolicy,

    /// Identity provider tenant endpoint
    authority: String,

    /// Path of the redirect URI registered with the identity provider
    redirect_path: String,

    /// REST endpoint, may contain `{organization_name}`
    endpoint: String,

    /// Scopes requested when acquiring a token
    scope: Vec<String>,

    /// Where sessions (and the token cache inside them) are stored
    session_type: SessionType,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            client_id: CLIENT_ID_PLACEHOLDER.to_string(),
            client_secret: ClientSecret::new(CLIENT_SECRET_PLACEHOLDER),
            secret_policy: SecretPolicy::default(),
            authority: DEFAULT_AUTHORITY.to_string(),
            redirect_path: DEFAULT_REDIRECT_PATH.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            scope: vec![AZURE_DEVOPS_DEFAULT_SCOPE.to_string()],
            session_type: SessionType::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default layers, or from `config_path` which
    /// must then exist.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigurationError> {
        match config_path {
            Some(path) => <AppSettings as ConfigLoader<AppSettings>>::load_from_file(path),
            None => <AppSettings as ConfigLoader<AppSettings>>::load(None),
        }
    }

    /// Provider chain without the `CLIENT_SECRET` override.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let file = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(AppSettings::default()))
            .merge(Toml::file(file))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .ignore(&["client_secret"])
                    .split("__"),
            )
    }

    /// Extract from `figment`, apply `CLIENT_SECRET` and validate.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigurationError> {
        Self::resolve(figment, Env::var(CLIENT_SECRET_ENV))
    }

    fn resolve(figment: Figment, env_secret: Option<String>) -> Result<Self, ConfigurationError> {
        let mut settings: AppSettings = figment.extract().map_err(extraction_error)?;

        let (secret, source) = settings
            .secret_policy
            .resolve(env_secret, &settings.client_secret)?;
        settings.client_secret = secret;

        match source {
            SecretSource::Environment => {
                debug!("Client secret taken from {}", CLIENT_SECRET_ENV);
            }
            SecretSource::Literal => {
                warn!(
                    "Client secret read from a configuration literal; set {} in production",
                    CLIENT_SECRET_ENV
                );
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Check every field constraint.
    ///
    /// Unfilled placeholders in `client_id` and `authority` only warn, the
    /// identity provider rejects them on first use. An unfilled secret fails.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigurationError::invalid(
                "client_id",
                &self.client_id,
                "must not be empty",
            ));
        }
        if is_placeholder(&self.client_id) {
            warn!("client_id is still the placeholder {}", self.client_id);
        }

        if self.client_secret.is_unset() {
            return Err(ConfigurationError::MissingSecret {
                env_var: CLIENT_SECRET_ENV,
                policy: self.secret_policy.to_string(),
            });
        }

        oauth::parse_https("authority", &self.authority)?;
        if is_placeholder(&self.authority) {
            warn!("authority still contains a placeholder: {}", self.authority);
        }

        if !self.redirect_path.starts_with('/') {
            return Err(ConfigurationError::invalid(
                "redirect_path",
                &self.redirect_path,
                "must start with '/'",
            ));
        }
        if self.redirect_path.starts_with("//")
            || self
                .redirect_path
                .chars()
                .any(|c| matches!(c, '?' | '#' | '\\') || c.is_whitespace())
        {
            return Err(ConfigurationError::invalid(
                "redirect_path",
                &self.redirect_path,
                "must be a plain path",
            ));
        }

        oauth::parse_https("endpoint", &self.endpoint)?;

        if self.scope.is_empty() {
            return Err(ConfigurationError::invalid(
                "scope",
                "[]",
                "at least one scope is required",
            ));
        }
        if let Some(blank) = self.scope.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigurationError::invalid(
                "scope",
                blank,
                "scopes must not be blank",
            ));
        }

        Ok(())
    }

    /// Example settings file with every default filled in
    pub fn generate_example() -> Result<String, ConfigurationError> {
        toml::to_string_pretty(&Self::default()).map_err(|e| ConfigurationError::ParseError {
            details: format!("Failed to serialize settings: {e}"),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    pub fn secret_policy(&self) -> SecretPolicy {
        self.secret_policy
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn redirect_path(&self) -> &str {
        &self.redirect_path
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn authority_url(&self) -> Result<Url, ConfigurationError> {
        oauth::parse_https("authority", &self.authority)
    }

    pub fn authorize_endpoint(&self) -> Result<Url, ConfigurationError> {
        oauth::authority_endpoint(&self.authority, "authorize")
    }

    pub fn token_endpoint(&self) -> Result<Url, ConfigurationError> {
        oauth::authority_endpoint(&self.authority, "token")
    }

    /// True for the `common`, `organizations` and `consumers` authorities
    pub fn is_multi_tenant(&self) -> bool {
        oauth::is_multi_tenant(&self.authority)
    }

    /// API endpoint for one organization (Azure DevOps collection).
    pub fn endpoint_for(&self, organization: &str) -> Result<Url, ConfigurationError> {
        oauth::render_endpoint(&self.endpoint, organization)
    }

    /// Absolute redirect URI under the app's public `base_url`.
    pub fn redirect_uri(&self, base_url: &Url) -> Result<Url, ConfigurationError> {
        oauth::join_redirect(base_url, &self.redirect_path)
    }

    pub fn oauth_client_config(
        &self,
        base_url: &Url,
    ) -> Result<OAuthClientConfig, ConfigurationError> {
        Ok(OAuthClientConfig {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            authorize_endpoint: self.authorize_endpoint()?,
            token_endpoint: self.token_endpoint()?,
            redirect_uri: self.redirect_uri(base_url)?,
            scopes: self.scope.clone(),
        })
    }
}

impl ConfigLoader<AppSettings> for AppSettings {
    fn load(path: Option<PathBuf>) -> Result<AppSettings, ConfigurationError> {
        debug!(
            "Loading settings from {}",
            path.as_deref()
                .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE))
                .display()
        );
        Self::from_figment(Self::figment(path.as_deref()))
    }

    fn load_from_file(path: &Path) -> Result<AppSettings, ConfigurationError> {
        if !path.is_file() {
            return Err(ConfigurationError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        debug!("Loading settings from {}", path.display());
        Self::from_figment(Self::figment(Some(path)))
    }
}

fn extraction_error(err: figment::Error) -> ConfigurationError {
    match &err.kind {
        Kind::UnknownVariant(value, expected) => ConfigurationError::invalid(
            err.path.join("."),
            value.clone(),
            format!("expected one of: {}", expected.join(", ")),
        ),
        _ => ConfigurationError::ParseError {
            details: err.to_string(),
        },
    }
}
