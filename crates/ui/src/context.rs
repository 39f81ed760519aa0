use std::sync::{Arc, Mutex, PoisonError};

use services::{CatalogService, SettingsService, TakeQuizService, TaskService};

pub trait UiApp: Send + Sync {
    fn app_name(&self) -> &str;
    /// Quiz to open straight away instead of the catalogue.
    fn launch_quiz(&self) -> Option<String>;

    fn take_quiz(&self) -> Arc<TakeQuizService>;
    fn tasks(&self) -> Arc<TaskService>;
    fn catalog(&self) -> Arc<CatalogService>;
    fn settings(&self) -> Arc<SettingsService>;
}

#[derive(Clone)]
pub struct AppContext {
    app_name: String,
    launch_quiz: Arc<Mutex<Option<String>>>,
    flash: Arc<Mutex<Option<String>>>,

    take_quiz: Arc<TakeQuizService>,
    tasks: Arc<TaskService>,
    catalog: Arc<CatalogService>,
    settings: Arc<SettingsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app_name: app.app_name().to_string(),
            launch_quiz: Arc::new(Mutex::new(app.launch_quiz())),
            flash: Arc::new(Mutex::new(None)),
            take_quiz: app.take_quiz(),
            tasks: app.tasks(),
            catalog: app.catalog(),
            settings: app.settings(),
        }
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// The quiz requested at launch. Only the first caller gets it.
    #[must_use]
    pub fn take_launch_quiz(&self) -> Option<String> {
        self.launch_quiz
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Leave a one-shot message for the next page (e.g. the submit reply).
    pub fn set_flash(&self, message: impl Into<String>) {
        *self.flash.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    /// Take the pending one-shot message, if any.
    #[must_use]
    pub fn take_flash(&self) -> Option<String> {
        self.flash
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
