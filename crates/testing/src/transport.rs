//! Mocked identity provider transport.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use simple_oauth2_core::{HttpRequest, HttpResponse, HttpTransport, Method, Oauth2Error, Result};

use crate::fixtures::{
    configuration_response, token_response, userinfo_response, CONFIGURATION_URL, TOKEN_URL,
    USERINFO_URL,
};

type RequestLog = Arc<Mutex<Vec<HttpRequest>>>;

/// Answer `request` from the canned responses.
///
/// Returns `None` when no canned response matches the method and URL.
pub fn lookup(request: &HttpRequest) -> Option<Result<HttpResponse>> {
    match (request.method, request.url.as_str()) {
        (Method::Get, CONFIGURATION_URL) => Some(Ok(HttpResponse::json_body(
            StatusCode::OK,
            &configuration_response(),
        ))),
        (Method::Post, TOKEN_URL) => Some(match request.form_value("code") {
            Some(code) => {
                token_response(code).map(|body| HttpResponse::json_body(StatusCode::OK, &body))
            }
            None => Ok(HttpResponse::json_body(
                StatusCode::BAD_REQUEST,
                &json!({"detail": "Missing code."}),
            )),
        }),
        (Method::Get, USERINFO_URL) => Some(Ok(HttpResponse::json_body(
            StatusCode::OK,
            &userinfo_response(),
        ))),
        _ => None,
    }
}

/// Failure raised for requests the mock does not serve.
pub fn request_exception() -> Oauth2Error {
    Oauth2Error::Request {
        status: StatusCode::NOT_FOUND,
        body: br#"{"detail": "error"}"#.to_vec(),
    }
}

/// Mocked replacement for the HTTP call site.
///
/// Unmatched requests fail immediately with [`request_exception`].
pub fn mocked_requests(request: &HttpRequest) -> Result<HttpResponse> {
    lookup(request).unwrap_or_else(|| {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            "No mocked response, failing request"
        );
        Err(request_exception())
    })
}

/// `HttpTransport` answering from [`mocked_requests`] and recording every request.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    requests: RequestLog,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests sent to `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|request| request.url == url)
            .count()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = mocked_requests(&request);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        response
    }
}
