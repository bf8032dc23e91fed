use async_trait::async_trait;

use super::{HttpRequest, HttpResponse};
use crate::error::Result;

/// Abstraction over the HTTP client used to reach identity providers.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and return the provider's response.
    ///
    /// Non-success statuses from a provider are returned as responses.
    /// Transports fail when no response was produced, and may also fail
    /// with a synthetic `Oauth2Error::Request` for requests they refuse
    /// to answer.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
