//! Persisted authority preferences.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use tourguard_core::{AppError, AppResult};
use tourguard_domain::{AuthoritySettings, SETTINGS_STORAGE_KEY};

use crate::{AuthorizationService, Session};

/// Key-value port holding serialized settings blobs.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Reads the raw value stored under a key.
    async fn load(&self, key: &str) -> AppResult<Option<String>>;

    /// Writes the raw value for a key, replacing any previous value.
    async fn save(&self, key: &str, value: String) -> AppResult<()>;

    /// Removes a key. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> AppResult<()>;
}

/// Application service for the settings page.
#[derive(Clone)]
pub struct SettingsService {
    authorization_service: AuthorizationService,
    store: Arc<dyn SettingsStore>,
}

impl SettingsService {
    /// Creates a settings service.
    #[must_use]
    pub fn new(authorization_service: AuthorizationService, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            authorization_service,
            store,
        }
    }

    /// Returns the stored settings, or defaults when none are stored.
    ///
    /// A blob that no longer parses is ignored in favour of defaults.
    pub async fn load(&self, session: &Session) -> AppResult<AuthoritySettings> {
        self.authorization_service.require_authenticated(session)?;

        let Some(raw) = self.store.load(SETTINGS_STORAGE_KEY).await? else {
            return Ok(AuthoritySettings::default());
        };

        match serde_json::from_str(raw.as_str()) {
            Ok(settings) => Ok(settings),
            Err(error) => {
                warn!(error = %error, "stored settings are unreadable, using defaults");
                Ok(AuthoritySettings::default())
            }
        }
    }

    /// Persists the whole settings blob and applies the mock-mode toggle.
    pub async fn save(
        &self,
        session: &mut Session,
        settings: &AuthoritySettings,
        mock_mode: bool,
    ) -> AppResult<()> {
        self.authorization_service.require_authenticated(session)?;

        let encoded = serde_json::to_string(settings).map_err(|error| {
            AppError::Internal(format!("failed to serialize settings: {error}"))
        })?;
        self.store.save(SETTINGS_STORAGE_KEY, encoded).await?;
        session.set_mock_mode(mock_mode);

        info!(mock_mode, "settings saved");
        Ok(())
    }

    /// Removes stored settings and restores defaults, including mock mode.
    pub async fn reset(&self, session: &mut Session) -> AppResult<AuthoritySettings> {
        self.authorization_service.require_authenticated(session)?;

        self.store.remove(SETTINGS_STORAGE_KEY).await?;
        session.set_mock_mode(true);

        info!("settings reset to defaults");
        Ok(AuthoritySettings::default())
    }
}
