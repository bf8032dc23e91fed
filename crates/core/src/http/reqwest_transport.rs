use std::time::Duration;

use async_trait::async_trait;

use super::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::error::{Oauth2Error, Result};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// `HttpTransport` backed by a real `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport that does not follow redirects.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the underlying client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        // Build HTTP client without redirect following (security requirement)
        let client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Oauth2Error::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            Self::with_client(reqwest::Client::new(), DEFAULT_TIMEOUT)
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        let builder = match &request.form {
            Some(form) => builder.form(form),
            None => builder,
        };

        let timeout = request.timeout.unwrap_or(self.timeout);
        let response = builder.timeout(timeout).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = status.as_u16(),
            "Provider responded"
        );

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
