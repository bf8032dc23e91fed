use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::ProviderSettings;
use crate::error::{Oauth2Error, Result};

/// Raw settings table: provider alias to its string-keyed settings map.
pub type RawSettingsTable = BTreeMap<String, serde_json::Value>;

/// Inline JSON settings table.
pub const SETTINGS_ENV_VAR: &str = "SIMPLE_OAUTH2_SETTINGS";

/// Path to a JSON file holding the settings table.
pub const SETTINGS_FILE_ENV_VAR: &str = "SIMPLE_OAUTH2_SETTINGS_FILE";

static OAUTH2_SETTINGS: LazyLock<RwLock<Arc<SettingsRegistry>>> = LazyLock::new(|| {
    let registry = initial_registry(|key| std::env::var(key).ok());
    RwLock::new(Arc::new(registry))
});

/// Registry the process starts with; invalid settings leave it empty.
fn initial_registry(lookup: impl Fn(&str) -> Option<String>) -> SettingsRegistry {
    SettingsRegistry::from_lookup(lookup).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring invalid OAuth2 settings from environment");
        SettingsRegistry::default()
    })
}

/// Configured providers, keyed by alias.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsRegistry {
    providers: BTreeMap<String, ProviderSettings>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a raw settings table.
    ///
    /// # Errors
    ///
    /// Returns the first `Oauth2Error::Settings` raised by an entry.
    pub fn from_raw(table: &RawSettingsTable) -> Result<Self> {
        let providers = table
            .iter()
            .map(|(alias, raw)| -> Result<(String, ProviderSettings)> {
                Ok((alias.clone(), ProviderSettings::from_raw(alias, raw)?))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Self { providers })
    }

    /// Build a registry from a JSON object of alias to settings map.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: RawSettingsTable = serde_json::from_str(json)?;
        Self::from_raw(&table)
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SIMPLE_OAUTH2_SETTINGS`: inline JSON settings table
    /// - `SIMPLE_OAUTH2_SETTINGS_FILE`: path to a JSON settings table, read
    ///   when `SIMPLE_OAUTH2_SETTINGS` is unset
    ///
    /// With neither set the registry is empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(json) = lookup(SETTINGS_ENV_VAR) {
            return Self::from_json(&json);
        }

        match lookup(SETTINGS_FILE_ENV_VAR) {
            Some(path) => {
                let json = std::fs::read_to_string(&path)?;
                tracing::debug!(path = %path, "Loaded OAuth2 settings file");
                Self::from_json(&json)
            }
            None => Ok(Self::default()),
        }
    }

    /// Add or replace a provider, returning the previous entry for its alias.
    pub fn insert(&mut self, settings: ProviderSettings) -> Option<ProviderSettings> {
        self.providers.insert(settings.alias.clone(), settings)
    }

    /// Settings for `alias`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` if no provider is configured under `alias`.
    pub fn get(&self, alias: &str) -> Result<&ProviderSettings> {
        self.providers
            .get(alias)
            .ok_or_else(|| Oauth2Error::UnknownProvider(alias.to_string()))
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderSettings> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Snapshot of the process-wide settings registry.
pub fn oauth2_settings() -> Arc<SettingsRegistry> {
    OAUTH2_SETTINGS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Settings for `alias` from the process-wide registry.
pub fn provider_settings(alias: &str) -> Result<ProviderSettings> {
    oauth2_settings().get(alias).cloned()
}

/// Replace the whole process-wide registry, returning the previous one.
///
/// Aliases missing from `registry` are no longer configured afterwards.
pub fn replace_oauth2_settings(
    registry: impl Into<Arc<SettingsRegistry>>,
) -> Arc<SettingsRegistry> {
    let registry = registry.into();
    tracing::debug!(providers = registry.len(), "Replacing OAuth2 settings");

    let mut current = OAUTH2_SETTINGS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *current, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> RawSettingsTable {
        let mut table = RawSettingsTable::new();
        table.insert(
            "b-provider".to_string(),
            json!({
                "CLIENT_ID": "b",
                "BASE_URL": "https://b.example.com",
                "REDIRECT_URI": "https://app.example.com/callback",
            }),
        );
        table.insert(
            "a-provider".to_string(),
            json!({
                "CLIENT_ID": "a",
                "BASE_URL": "https://a.example.com",
                "REDIRECT_URI": "https://app.example.com/callback",
            }),
        );
        table
    }

    #[test]
    fn from_raw_builds_every_alias_in_order() {
        let registry = SettingsRegistry::from_raw(&table()).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.aliases().collect::<Vec<_>>(),
            vec!["a-provider", "b-provider"]
        );
        assert_eq!(registry.get("b-provider").unwrap().client_id, "b");
    }

    #[test]
    fn from_raw_fails_on_first_invalid_entry() {
        let mut table = table();
        table.insert("broken".to_string(), json!({"CLIENT_ID": "x"}));

        let err = SettingsRegistry::from_raw(&table).unwrap_err();
        assert!(matches!(err, Oauth2Error::Settings { ref alias, .. } if alias == "broken"));
    }

    #[test]
    fn get_unknown_alias() {
        let registry = SettingsRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.get("nope"),
            Err(Oauth2Error::UnknownProvider(ref alias)) if alias == "nope"
        ));
    }

    #[test]
    fn from_json_rejects_non_object() {
        assert!(matches!(
            SettingsRegistry::from_json("[]"),
            Err(Oauth2Error::Json(_))
        ));
    }

    #[test]
    fn from_lookup_prefers_inline_json() {
        let json = serde_json::to_string(&table()).unwrap();
        let registry = SettingsRegistry::from_lookup(|key| match key {
            SETTINGS_ENV_VAR => Some(json.clone()),
            SETTINGS_FILE_ENV_VAR => Some("/does/not/exist.json".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn from_lookup_reads_settings_file() {
        let path = std::env::temp_dir().join(format!(
            "simple-oauth2-settings-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, serde_json::to_string(&table()).unwrap()).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let registry = SettingsRegistry::from_lookup(|key| {
            (key == SETTINGS_FILE_ENV_VAR).then(|| path_str.clone())
        })
        .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(registry.get("a-provider").unwrap().client_id, "a");
    }

    #[test]
    fn from_lookup_missing_file_is_io_error() {
        let result = SettingsRegistry::from_lookup(|key| {
            (key == SETTINGS_FILE_ENV_VAR).then(|| "/does/not/exist.json".to_string())
        });
        assert!(matches!(result, Err(Oauth2Error::Io(_))));
    }

    #[test]
    fn from_lookup_defaults_to_empty() {
        let registry = SettingsRegistry::from_lookup(|_| None).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn initial_registry_falls_back_to_empty_on_invalid_json() {
        let registry =
            initial_registry(|key| (key == SETTINGS_ENV_VAR).then(|| "{not json".to_string()));
        assert!(registry.is_empty());
    }

    #[test]
    fn initial_registry_falls_back_to_empty_on_invalid_provider() {
        let registry = initial_registry(|key| {
            (key == SETTINGS_ENV_VAR).then(|| r#"{"broken": {"CLIENT_ID": "x"}}"#.to_string())
        });
        assert!(registry.is_empty());
    }

    #[test]
    fn initial_registry_loads_valid_settings() {
        let json = serde_json::to_string(&table()).unwrap();
        let registry = initial_registry(|key| (key == SETTINGS_ENV_VAR).then(|| json.clone()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn replace_swaps_global_registry_and_returns_previous() {
        let replacement = SettingsRegistry::from_raw(&table()).unwrap();

        let previous = replace_oauth2_settings(replacement);
        assert_eq!(provider_settings("a-provider").unwrap().client_id, "a");
        assert_eq!(oauth2_settings().len(), 2);

        let replaced = replace_oauth2_settings(previous.clone());
        assert_eq!(replaced.len(), 2);
        assert_eq!(oauth2_settings(), previous);
    }
}
