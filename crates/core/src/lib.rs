//! Core building blocks for the simple-oauth2 client.
//!
//! This crate provides:
//! - Provider settings parsed from raw string-keyed maps
//! - The process-wide settings registry
//! - The HTTP call site and the `HttpTransport` abstraction behind it
//! - The OIDC discovery document

pub mod discovery;
mod error;
pub mod http;
pub mod settings;

pub use discovery::{fetch_provider_metadata, ProviderMetadata};
pub use error::{Oauth2Error, Result};
pub use http::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
pub use settings::{
    oauth2_settings, provider_settings, replace_oauth2_settings, CodeChallengeMethod, Endpoint,
    ProviderSettings, RawSettingsTable, SettingsRegistry,
};
