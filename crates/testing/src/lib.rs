//! Test fixtures for the simple-oauth2 client.
//!
//! This crate provides:
//! - Sample provider settings and canned identity provider responses
//! - `MockTransport`, an `HttpTransport` answering from those responses
//! - `override_oauth2_settings`, which installs both for the duration of a test
//! - A mock IdP HTTP server serving the same responses (with `server` feature)

pub mod fixtures;
mod logging;
mod overrides;
mod transport;

pub use fixtures::{configuration_response, simple_oauth2_settings};
pub use logging::init_test_logging;
pub use overrides::{override_oauth2_settings, SettingsOverride};
pub use transport::{lookup, mocked_requests, request_exception, MockTransport};

#[cfg(feature = "server")]
pub mod mock_idp;
