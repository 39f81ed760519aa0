use std::sync::Arc;

use gateway::Gateway;

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::config::ClientConfig;
use crate::error::AppServicesError;
use crate::sessions::TakeQuizService;
use crate::settings_service::SettingsService;
use crate::tasks::TaskService;

/// Assembles app-facing services over one gateway.
#[derive(Clone)]
pub struct AppServices {
    config: ClientConfig,
    take_quiz: Arc<TakeQuizService>,
    tasks: Arc<TaskService>,
    catalog: Arc<CatalogService>,
    settings: Arc<SettingsService>,
}

impl AppServices {
    /// Build services talking HTTP to `config.api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Gateway` if the base URL is unusable.
    pub fn from_config(config: ClientConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let gateway = Gateway::http(&config.api_base_url)?;
        tracing::info!(api = %config.api_base_url, "quiz server configured");
        Ok(Self::with_gateway(gateway, config, clock))
    }

    /// Build services over any gateway, e.g. the in-memory one in tests.
    #[must_use]
    pub fn with_gateway(gateway: Gateway, config: ClientConfig, clock: Clock) -> Self {
        let take_quiz = Arc::new(TakeQuizService::new(
            Arc::clone(&gateway.sessions),
            config.tick_period,
        ));
        let tasks = Arc::new(TaskService::new(
            Arc::clone(&gateway.tasks),
            config.poll,
            config.download_dir.clone(),
            clock,
        ));
        let catalog = Arc::new(CatalogService::new(Arc::clone(&gateway.catalog)));
        let settings = Arc::new(SettingsService::new(Arc::clone(&gateway.settings)));

        Self {
            config,
            take_quiz,
            tasks,
            catalog,
            settings,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn take_quiz(&self) -> Arc<TakeQuizService> {
        Arc::clone(&self.take_quiz)
    }

    #[must_use]
    pub fn tasks(&self) -> Arc<TaskService> {
        Arc::clone(&self.tasks)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings)
    }
}
