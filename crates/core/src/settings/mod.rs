//! Provider settings and the process-wide settings registry.

mod registry;
mod types;

pub use registry::{
    oauth2_settings, provider_settings, replace_oauth2_settings, RawSettingsTable,
    SettingsRegistry, SETTINGS_ENV_VAR, SETTINGS_FILE_ENV_VAR,
};
pub use types::{CodeChallengeMethod, Endpoint, ProviderSettings};
