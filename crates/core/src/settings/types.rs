use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{Oauth2Error, Result};

/// PKCE code challenge methods understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeChallengeMethod {
    Plain,
    S256,
}

impl CodeChallengeMethod {
    /// Value sent as the `code_challenge_method` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::S256 => "S256",
        }
    }
}

impl FromStr for CodeChallengeMethod {
    type Err = Oauth2Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("plain") {
            Ok(Self::Plain)
        } else if s.eq_ignore_ascii_case("s256") {
            Ok(Self::S256)
        } else {
            Err(Oauth2Error::UnsupportedCodeChallengeMethod(s.to_string()))
        }
    }
}

impl std::fmt::Display for CodeChallengeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity provider endpoints derived from `BASE_URL` and the path settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Configuration,
    Authorization,
    Token,
    Userinfo,
    Logout,
    Jwks,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Authorization => write!(f, "authorization"),
            Self::Token => write!(f, "token"),
            Self::Userinfo => write!(f, "userinfo"),
            Self::Logout => write!(f, "logout"),
            Self::Jwks => write!(f, "jwks"),
        }
    }
}

/// Settings for a single OAuth2/OIDC provider, keyed by alias in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub alias: String,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub base_url: Url,
    pub redirect_uri: Url,
    pub post_logout_redirect_uri: Option<Url>,
    pub use_pkce: bool,
    /// Raw `CODE_CHALLENGE_METHOD`; validated by [`ProviderSettings::code_challenge_method`].
    pub code_challenge_method: String,
    pub scope: String,
    pub authorization_extra_parameters: BTreeMap<String, String>,
    pub configuration_path: String,
    pub authorization_path: String,
    pub token_path: String,
    pub userinfo_path: String,
    pub logout_path: String,
    pub jwks_path: String,
    pub timeout: Duration,
}

/// Wire shape of a provider's settings map.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
struct RawProviderSettings {
    client_id: String,
    #[serde(default)]
    client_secret: Option<String>,
    base_url: Url,
    redirect_uri: Url,
    #[serde(default)]
    post_logout_redirect_uri: Option<Url>,
    #[serde(default = "default_use_pkce")]
    use_pkce: bool,
    #[serde(default = "default_code_challenge_method")]
    code_challenge_method: String,
    #[serde(default = "default_scope")]
    scope: String,
    #[serde(default)]
    authorization_extra_parameters: BTreeMap<String, String>,
    #[serde(default = "default_configuration_path")]
    configuration_path: String,
    #[serde(default = "default_authorization_path")]
    authorization_path: String,
    #[serde(default = "default_token_path")]
    token_path: String,
    #[serde(default = "default_userinfo_path")]
    userinfo_path: String,
    #[serde(default = "default_logout_path")]
    logout_path: String,
    #[serde(default = "default_jwks_path")]
    jwks_path: String,
    #[serde(default = "default_timeout")]
    timeout: u64,
}

fn default_use_pkce() -> bool {
    true
}

fn default_code_challenge_method() -> String {
    "S256".to_string()
}

fn default_scope() -> String {
    "openid email profile".to_string()
}

fn default_configuration_path() -> String {
    "/.well-known/openid-configuration".to_string()
}

fn default_authorization_path() -> String {
    "/authorize".to_string()
}

fn default_token_path() -> String {
    "/token".to_string()
}

fn default_userinfo_path() -> String {
    "/userinfo".to_string()
}

fn default_logout_path() -> String {
    "/logout".to_string()
}

fn default_jwks_path() -> String {
    "/.well-known/jwks.json".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl ProviderSettings {
    /// Build settings for `alias` from its raw string-keyed map.
    ///
    /// # Errors
    ///
    /// Returns `Oauth2Error::Settings` if:
    /// - A required key (`CLIENT_ID`, `BASE_URL`, `REDIRECT_URI`) is missing
    /// - A URL is malformed or an unknown key is present
    /// - An endpoint path does not start with `/`
    ///
    /// An unsupported `CODE_CHALLENGE_METHOD` is accepted here and only
    /// rejected by [`ProviderSettings::code_challenge_method`].
    pub fn from_raw(alias: &str, raw: &serde_json::Value) -> Result<Self> {
        let settings_error = |message: String| Oauth2Error::Settings {
            alias: alias.to_string(),
            message,
        };

        let raw: RawProviderSettings =
            serde_json::from_value(raw.clone()).map_err(|e| settings_error(e.to_string()))?;

        for (key, path) in [
            ("CONFIGURATION_PATH", &raw.configuration_path),
            ("AUTHORIZATION_PATH", &raw.authorization_path),
            ("TOKEN_PATH", &raw.token_path),
            ("USERINFO_PATH", &raw.userinfo_path),
            ("LOGOUT_PATH", &raw.logout_path),
            ("JWKS_PATH", &raw.jwks_path),
        ] {
            if !path.starts_with('/') {
                return Err(settings_error(format!(
                    "{key} must start with '/', got '{path}'"
                )));
            }
        }

        Ok(Self {
            alias: alias.to_string(),
            client_id: raw.client_id,
            client_secret: raw.client_secret,
            base_url: raw.base_url,
            redirect_uri: raw.redirect_uri,
            post_logout_redirect_uri: raw.post_logout_redirect_uri,
            use_pkce: raw.use_pkce,
            code_challenge_method: raw.code_challenge_method,
            scope: raw.scope,
            authorization_extra_parameters: raw.authorization_extra_parameters,
            configuration_path: raw.configuration_path,
            authorization_path: raw.authorization_path,
            token_path: raw.token_path,
            userinfo_path: raw.userinfo_path,
            logout_path: raw.logout_path,
            jwks_path: raw.jwks_path,
            timeout: Duration::from_secs(raw.timeout),
        })
    }

    /// Absolute URL of an endpoint: `BASE_URL` with the endpoint's path appended.
    ///
    /// A path already present on `BASE_URL` is kept, so `https://idp/realm`
    /// resolves the token endpoint to `https://idp/realm/token`.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url> {
        let path = match endpoint {
            Endpoint::Configuration => &self.configuration_path,
            Endpoint::Authorization => &self.authorization_path,
            Endpoint::Token => &self.token_path,
            Endpoint::Userinfo => &self.userinfo_path,
            Endpoint::Logout => &self.logout_path,
            Endpoint::Jwks => &self.jwks_path,
        };

        if self.base_url.cannot_be_a_base() {
            return Err(Oauth2Error::InvalidUrl(format!(
                "BASE_URL of '{}' cannot be a base: {}",
                self.alias, self.base_url
            )));
        }

        let mut url = self.base_url.clone();
        let joined = format!("{}{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    /// PKCE method to use, or `None` when PKCE is disabled.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCodeChallengeMethod` if PKCE is enabled and the
    /// configured method is neither `plain` nor `S256`.
    pub fn code_challenge_method(&self) -> Result<Option<CodeChallengeMethod>> {
        if !self.use_pkce {
            return Ok(None);
        }
        self.code_challenge_method.parse().map(Some)
    }
}
