//! Mock IdP server for development and testing.
//!
//! Every request is answered from the same table as `MockTransport`: the
//! request path and query are resolved against the fixture base URL, so the
//! server behaves the same whatever host or port it is reached on.

use axum::{
    extract::rejection::FormRejection,
    http::{header, Method as HttpMethod, StatusCode, Uri},
    response::{IntoResponse, Response},
    Form, Json, Router,
};
use serde_json::json;
use simple_oauth2_core::{http::Form as FormFields, HttpRequest, HttpResponse, Method};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::fixtures::BASE_URL;
use crate::transport::lookup;

/// Mock IdP server that simulates OIDC discovery, token and userinfo endpoints.
pub struct MockIdpServer {
    addr: SocketAddr,
}

impl MockIdpServer {
    /// Create a new Mock IdP server.
    ///
    /// # Arguments
    /// * `addr` - The address to listen on (typically 127.0.0.1:3001)
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Run the Mock IdP server.
    ///
    /// This starts an HTTP server that handles:
    /// - `GET /.well-known/openid-configuration` - Discovery document
    /// - `POST /token` - Token response with a signed ID token
    /// - `GET /userinfo` - User claims
    ///
    /// Anything else answers `404` with a JSON `detail` field.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        Self::serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(listener: TcpListener) -> Result<(), std::io::Error> {
        tracing::info!("Mock IdP server listening on http://{}", listener.local_addr()?);
        axum::serve(listener, router()).await
    }
}

/// Router answering every request from the mocked response table.
pub fn router() -> Router {
    Router::new().fallback(dispatch)
}

async fn dispatch(
    method: HttpMethod,
    uri: Uri,
    form: Result<Form<FormFields>, FormRejection>,
) -> Response {
    let method = match method.as_str().parse::<Method>() {
        Ok(method) => method,
        Err(_) => return not_found(),
    };

    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let request = HttpRequest {
        method,
        url: format!("{}{}", BASE_URL, path_and_query),
        form: form.ok().map(|Form(fields)| fields),
        timeout: None,
    };
    tracing::debug!(method = %request.method, url = %request.url, "Mock IdP request");

    match lookup(&request) {
        Some(Ok(response)) => json_response(response),
        Some(Err(e)) => {
            tracing::error!("Mock IdP error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": e.to_string()})),
            )
                .into_response()
        }
        None => not_found(),
    }
}

fn json_response(response: HttpResponse) -> Response {
    (
        response.status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
}
