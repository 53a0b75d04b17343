//! Views of the settings shaped for the OAuth client and the API caller

use super::secret::ClientSecret;
use patgate_common::ConfigurationError;
use url::Url;

/// Microsoft identity platform login host
pub const MICROSOFT_LOGIN_HOST: &str = "https://login.microsoftonline.com";

/// Marker in the endpoint template replaced by the organization name
pub const ORGANIZATION_PLACEHOLDER: &str = "{organization_name}";

/// Tenant segments that accept accounts from more than one directory
const MULTI_TENANT_SEGMENTS: [&str; 3] = ["common", "organizations", "consumers"];

/// Authority for a single-tenant app, from a tenant ID or a domain name
/// such as `contoso.onmicrosoft.com`.
pub fn authority_for_tenant(tenant: &str) -> String {
    format!("{}/{}", MICROSOFT_LOGIN_HOST, tenant.trim().trim_matches('/'))
}

/// Everything an authorization-code or client-credentials client needs.
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: ClientSecret,
    pub authorize_endpoint: Url,
    pub token_endpoint: Url,
    pub redirect_uri: Url,
    pub scopes: Vec<String>,
}

impl OAuthClientConfig {
    /// Scopes in the space-separated form used on the wire
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

pub(crate) fn parse_https(key: &str, value: &str) -> Result<Url, ConfigurationError> {
    if !value.starts_with("https://") {
        return Err(ConfigurationError::invalid(key, value, "must use https"));
    }

    let url = Url::parse(value)
        .map_err(|e| ConfigurationError::invalid(key, value, e.to_string()))?;

    if url.host_str().is_none() {
        return Err(ConfigurationError::invalid(key, value, "must include a host"));
    }

    Ok(url)
}

/// `<authority>/oauth2/v2.0/<action>`
pub(crate) fn authority_endpoint(
    authority: &str,
    action: &str,
) -> Result<Url, ConfigurationError> {
    let base = authority.trim_end_matches('/');
    parse_https("authority", &format!("{base}/oauth2/v2.0/{action}"))
}

pub(crate) fn is_multi_tenant(authority: &str) -> bool {
    Url::parse(authority)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next().map(str::to_ascii_lowercase))
        })
        .map(|tenant| MULTI_TENANT_SEGMENTS.contains(&tenant.as_str()))
        .unwrap_or(false)
}

/// Substitute the organization into the endpoint template.
///
/// An endpoint without the marker is returned as configured.
pub(crate) fn render_endpoint(
    template: &str,
    organization: &str,
) -> Result<Url, ConfigurationError> {
    let organization = organization.trim();
    if organization.is_empty() {
        return Err(ConfigurationError::invalid(
            "organization",
            organization,
            "must not be empty",
        ));
    }
    if organization
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%' | '{' | '}') || c.is_whitespace())
        || matches!(organization, "." | "..")
    {
        return Err(ConfigurationError::invalid(
            "organization",
            organization,
            "must be a single path segment",
        ));
    }

    parse_https(
        "endpoint",
        &template.replace(ORGANIZATION_PLACEHOLDER, organization),
    )
}

/// Absolute redirect URI; `path` replaces any path on `base`.
pub(crate) fn join_redirect(base: &Url, path: &str) -> Result<Url, ConfigurationError> {
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ConfigurationError::invalid(
            "base_url",
            base.as_str(),
            "must be an http or https URL",
        ));
    }

    let joined = base
        .join(path)
        .map_err(|e| ConfigurationError::invalid("redirect_path", path, e.to_string()))?;

    if joined.origin() != base.origin() {
        return Err(ConfigurationError::invalid(
            "redirect_path",
            path,
            "must resolve on the app's own host",
        ));
    }

    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_for_tenant() {
        assert_eq!(
            authority_for_tenant("contoso.onmicrosoft.com"),
            "https://login.microsoftonline.com/contoso.onmicrosoft.com"
        );
        assert_eq!(
            authority_for_tenant(" /common/ "),
            "https://login.microsoftonline.com/common"
        );
    }

    #[test]
    fn test_parse_https_rejects_http() {
        let err = parse_https("authority", "http://login.example.com/tenant").unwrap_err();
        assert!(err.to_string().contains("must use https"));
    }

    #[test]
    fn test_authority_endpoint_trims_slash() {
        let url = authority_endpoint("https://login.microsoftonline.com/common/", "token").unwrap();
        assert_eq!(
            url.as_str(),
            "https://login.microsoftonline.com/common/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_multi_tenant_segments() {
        assert!(is_multi_tenant("https://login.microsoftonline.com/common"));
        assert!(is_multi_tenant("https://login.microsoftonline.com/Organizations/"));
        assert!(!is_multi_tenant(
            "https://login.microsoftonline.com/72f988bf-86f1-41af-91ab-2d7cd011db47"
        ));
        assert!(!is_multi_tenant("not a url"));
    }

    #[test]
    fn test_render_endpoint_rejects_bad_organization() {
        let template = "https://dev.azure.com/{organization_name}/_apis/projects";
        assert!(render_endpoint(template, "").is_err());
        assert!(render_endpoint(template, "a/b").is_err());
        assert!(render_endpoint(template, "a b").is_err());
        assert!(render_endpoint(template, ".").is_err());
        assert!(render_endpoint(template, "..").is_err());
        assert!(render_endpoint(template, "%2e%2e").is_err());
        assert!(render_endpoint(template, "a\\b").is_err());
        assert_eq!(
            render_endpoint(template, "fabrikam.eu").unwrap().as_str(),
            "https://dev.azure.com/fabrikam.eu/_apis/projects"
        );
        assert_eq!(
            render_endpoint(template, "fabrikam").unwrap().as_str(),
            "https://dev.azure.com/fabrikam/_apis/projects"
        );
    }

    #[test]
    fn test_join_redirect_replaces_path() {
        let base = Url::parse("https://app.example.com/ignored/").unwrap();
        let uri = join_redirect(&base, "/getAToken").unwrap();
        assert_eq!(uri.as_str(), "https://app.example.com/getAToken");

        let err = join_redirect(&base, "//evil.example/cb").unwrap_err();
        assert!(err.to_string().contains("own host"));

        let ftp = Url::parse("ftp://files.example.com").unwrap();
        assert!(join_redirect(&ftp, "/getAToken").is_err());
    }
}
