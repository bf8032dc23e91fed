//! HTTP call site used for every request to an identity provider.
//!
//! All provider traffic goes through [`request`], which dispatches to the
//! currently installed [`HttpTransport`]. Tests swap the transport with
//! [`replace_transport`] to answer requests from canned responses.

mod reqwest_transport;
mod traits;
mod types;

use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use std::time::Duration;

pub use reqwest_transport::ReqwestTransport;
pub use traits::HttpTransport;
pub use types::{Form, HttpRequest, HttpResponse, Method};

use crate::error::Result;

static TRANSPORT: LazyLock<RwLock<Arc<dyn HttpTransport>>> =
    LazyLock::new(|| RwLock::new(Arc::new(ReqwestTransport::default())));

/// Transport currently behind [`request`].
pub fn current_transport() -> Arc<dyn HttpTransport> {
    TRANSPORT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Install `transport` behind [`request`], returning the previous one.
pub fn replace_transport(transport: Arc<dyn HttpTransport>) -> Arc<dyn HttpTransport> {
    let mut current = TRANSPORT.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *current, transport)
}

/// Send a request through the current transport.
///
/// `form` is sent as an `application/x-www-form-urlencoded` body.
pub async fn request(method: Method, url: &str, form: Option<Form>) -> Result<HttpResponse> {
    request_with_timeout(method, url, form, None).await
}

/// Like [`request`], with `timeout` replacing the transport's own when set.
pub async fn request_with_timeout(
    method: Method,
    url: &str,
    form: Option<Form>,
    timeout: Option<Duration>,
) -> Result<HttpResponse> {
    let transport = current_transport();
    tracing::debug!(%method, url, ?timeout, "Sending provider request");

    transport
        .send(HttpRequest {
            method,
            url: url.to_string(),
            form,
            timeout,
        })
        .await
}
