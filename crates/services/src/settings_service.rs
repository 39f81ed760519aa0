use std::sync::Arc;

use gateway::SettingsGateway;
use quiz_core::model::NotificationSettings;

use crate::error::SettingsError;

/// Loads and saves the user's email reminder preferences.
#[derive(Clone)]
pub struct SettingsService {
    gateway: Arc<dyn SettingsGateway>,
}

impl SettingsService {
    #[must_use]
    pub fn new(gateway: Arc<dyn SettingsGateway>) -> Self {
        Self { gateway }
    }

    /// Stored preferences, or the defaults when they cannot be fetched.
    pub async fn load(&self) -> NotificationSettings {
        match self.gateway.notification_settings().await {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, "could not load notification settings, using defaults");
                NotificationSettings::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns `SettingsError::Gateway` if the server does not store them.
    pub async fn save(&self, settings: &NotificationSettings) -> Result<String, SettingsError> {
        let message = self.gateway.save_notification_settings(settings).await?;
        tracing::info!(reminder_time = %settings.reminder_time, "notification settings saved");
        Ok(message)
    }
}
