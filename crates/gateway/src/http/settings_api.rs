use async_trait::async_trait;
use quiz_core::model::NotificationSettings;

use super::HttpGateway;
use super::mapping::{SavedBody, SettingsBody, decode, read_json};
use crate::api::{GatewayError, SettingsGateway};

#[async_trait]
impl SettingsGateway for HttpGateway {
    async fn notification_settings(&self) -> Result<NotificationSettings, GatewayError> {
        let url = self.endpoint("user/notification_settings")?;
        let response = self.client.get(url).send().await?;
        let body = read_json(response).await?;
        Ok(decode::<SettingsBody>(body)?.into_settings())
    }

    async fn save_notification_settings(
        &self,
        settings: &NotificationSettings,
    ) -> Result<String, GatewayError> {
        let url = self.endpoint("user/notification_settings")?;
        tracing::debug!(
            daily = settings.daily_reminder,
            at = %settings.reminder_time,
            "saving notification settings"
        );

        let response = self.client.post(url).json(settings).send().await?;
        let body = read_json(response).await?;
        Ok(decode::<SavedBody>(body)?.into_message())
    }
}
