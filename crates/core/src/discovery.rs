//! OIDC discovery document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::{self, Method};
use crate::settings::{Endpoint, ProviderSettings};

/// Provider metadata served at the `.well-known/openid-configuration` path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
    pub jwks_uri: String,
    pub end_session_endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_endpoint: Option<String>,
    #[serde(default)]
    pub id_token_signing_alg_values_supported: Vec<String>,
    /// Fields this type does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProviderMetadata {
    /// Whether the provider advertises `alg` for ID token signatures.
    pub fn supports_signing_alg(&self, alg: &str) -> bool {
        self.id_token_signing_alg_values_supported
            .iter()
            .any(|supported| supported == alg)
    }
}

/// Fetch the discovery document for `settings` through the HTTP call site.
///
/// # Errors
///
/// Returns `Request` if the provider answers with a non-success status and
/// `Json` if the document cannot be decoded.
pub async fn fetch_provider_metadata(settings: &ProviderSettings) -> Result<ProviderMetadata> {
    let url = settings.endpoint_url(Endpoint::Configuration)?;

    let response =
        http::request_with_timeout(Method::Get, url.as_str(), None, Some(settings.timeout))
            .await?
            .error_for_status()?;
    let metadata: ProviderMetadata = response.json()?;

    tracing::debug!(
        provider = %settings.alias,
        token_endpoint = %metadata.token_endpoint,
        "Discovered provider metadata"
    );

    Ok(metadata)
}
