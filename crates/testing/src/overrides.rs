//! Scoped substitution of the settings registry and the HTTP call site.

use std::future::Future;
use std::sync::Arc;

use simple_oauth2_core::http::{replace_transport, HttpTransport};
use simple_oauth2_core::{replace_oauth2_settings, RawSettingsTable, Result, SettingsRegistry};
use tokio::sync::{Mutex, MutexGuard};

use crate::transport::MockTransport;

/// Serializes overrides across concurrently running tests.
static OVERRIDE_LOCK: Mutex<()> = Mutex::const_new(());

/// Installs mocked settings and the mocked transport until dropped.
///
/// Overrides are exclusive: a second `install` waits until the first
/// override is dropped, so installing one inside another deadlocks.
#[must_use = "the previous settings are restored as soon as the override is dropped"]
pub struct SettingsOverride {
    transport: MockTransport,
    previous_settings: Option<Arc<SettingsRegistry>>,
    previous_transport: Option<Arc<dyn HttpTransport>>,
    _lock: MutexGuard<'static, ()>,
}

impl SettingsOverride {
    /// Replace the settings registry with `table` and the HTTP call site
    /// with a fresh [`MockTransport`].
    ///
    /// # Errors
    ///
    /// Returns `Settings` if an entry of `table` is invalid. Nothing is
    /// replaced in that case.
    pub async fn install(table: &RawSettingsTable) -> Result<Self> {
        let lock = OVERRIDE_LOCK.lock().await;
        let registry = SettingsRegistry::from_raw(table)?;
        let transport = MockTransport::new();

        let previous_settings = replace_oauth2_settings(registry);
        let previous_transport = replace_transport(Arc::new(transport.clone()));
        tracing::debug!(providers = table.len(), "Installed OAuth2 settings override");

        Ok(Self {
            transport,
            previous_settings: Some(previous_settings),
            previous_transport: Some(previous_transport),
            _lock: lock,
        })
    }

    /// The mocked transport installed by this override.
    pub fn transport(&self) -> &MockTransport {
        &self.transport
    }
}

impl Drop for SettingsOverride {
    fn drop(&mut self) {
        if let Some(settings) = self.previous_settings.take() {
            replace_oauth2_settings(settings);
        }
        if let Some(transport) = self.previous_transport.take() {
            replace_transport(transport);
        }
        tracing::debug!("Restored OAuth2 settings");
    }
}

/// Run `test` with `table` as the OAuth2 settings and requests answered by
/// [`MockTransport`], restoring both afterwards.
///
/// ```no_run
/// use simple_oauth2_core::provider_settings;
/// use simple_oauth2_testing::{override_oauth2_settings, simple_oauth2_settings};
///
/// # async fn example() -> simple_oauth2_core::Result<()> {
/// override_oauth2_settings(&simple_oauth2_settings(), || async {
///     let settings = provider_settings("pkce-s256").unwrap();
///     assert_eq!(settings.client_id, "pkce-s256");
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn override_oauth2_settings<F, Fut, T>(table: &RawSettingsTable, test: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let _guard = SettingsOverride::install(table).await?;
    Ok(test().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::simple_oauth2_settings;
    use simple_oauth2_core::{oauth2_settings, provider_settings, Oauth2Error};

    #[tokio::test]
    async fn settings_are_visible_inside_the_scope() {
        let aliases = override_oauth2_settings(&simple_oauth2_settings(), || async {
            oauth2_settings()
                .aliases()
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .await
        .unwrap();

        assert_eq!(aliases.len(), 7);
        assert!(aliases.contains(&"pkce-plain".to_string()));
    }

    #[tokio::test]
    async fn override_replaces_registry_wholesale() {
        let mut table = RawSettingsTable::new();
        table.insert(
            "only".to_string(),
            serde_json::json!({
                "CLIENT_ID": "only",
                "BASE_URL": "https://example.com",
                "REDIRECT_URI": "https://example.com/callback",
            }),
        );

        override_oauth2_settings(&table, || async {
            assert_eq!(oauth2_settings().len(), 1);
            assert!(matches!(
                provider_settings("pkce-plain"),
                Err(Oauth2Error::UnknownProvider(_))
            ));
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn invalid_table_is_rejected() {
        let mut table = RawSettingsTable::new();
        table.insert("broken".to_string(), serde_json::json!({}));

        let result = override_oauth2_settings(&table, || async {
            panic!("test body must not run");
        })
        .await;

        assert!(matches!(result, Err(Oauth2Error::Settings { .. })));
    }

    #[tokio::test]
    async fn guard_exposes_installed_transport() {
        let guard = SettingsOverride::install(&simple_oauth2_settings())
            .await
            .unwrap();

        simple_oauth2_core::http::request(
            simple_oauth2_core::Method::Get,
            "https://example.com/userinfo",
            None,
        )
        .await
        .unwrap();

        assert_eq!(
            guard.transport().request_count("https://example.com/userinfo"),
            1
        );
    }
}
