use reqwest::StatusCode;
use thiserror::Error;

/// Result type for simple-oauth2 operations.
pub type Result<T> = std::result::Result<T, Oauth2Error>;

#[derive(Debug, Error)]
pub enum Oauth2Error {
    /// A provider's raw settings could not be turned into `ProviderSettings`.
    #[error("invalid settings for provider '{alias}': {message}")]
    Settings { alias: String, message: String },

    #[error("provider not configured: {0}")]
    UnknownProvider(String),

    #[error("unsupported code challenge method: {0}")]
    UnsupportedCodeChallengeMethod(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("failed to sign token: {0}")]
    Signing(String),

    /// The identity provider answered with a non-success status.
    #[error("request failed with status {status}")]
    Request { status: StatusCode, body: Vec<u8> },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Oauth2Error {
    /// Status carried by a request failure, if this is one.
    pub fn request_status(&self) -> Option<StatusCode> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Body of a request failure decoded as JSON.
    ///
    /// Returns `None` for other variants or when the body is not JSON.
    pub fn request_body_json(&self) -> Option<serde_json::Value> {
        match self {
            Self::Request { body, .. } => serde_json::from_slice(body).ok(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Oauth2Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failure_exposes_status_and_json_body() {
        let err = Oauth2Error::Request {
            status: StatusCode::NOT_FOUND,
            body: br#"{"detail": "error"}"#.to_vec(),
        };

        assert_eq!(err.request_status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(
            err.request_body_json(),
            Some(serde_json::json!({"detail": "error"}))
        );
        assert_eq!(err.to_string(), "request failed with status 404 Not Found");
    }

    #[test]
    fn non_request_errors_have_no_status() {
        let err = Oauth2Error::UnknownProvider("missing".to_string());
        assert_eq!(err.request_status(), None);
        assert_eq!(err.request_body_json(), None);
    }

    #[test]
    fn request_failure_with_non_json_body() {
        let err = Oauth2Error::Request {
            status: StatusCode::BAD_GATEWAY,
            body: b"<html>".to_vec(),
        };
        assert_eq!(err.request_body_json(), None);
    }
}
