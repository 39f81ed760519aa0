#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod config;
pub mod error;
pub mod sessions;
pub mod settings_service;
pub mod tasks;
pub mod timer;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::CatalogService;
pub use config::ClientConfig;
pub use error::{
    AppServicesError, CatalogError, ConfigError, SessionError, SettingsError, TaskError,
};
pub use sessions::{
    AnswerStore, Destination, NavigationCursor, QuizRunner, QuizSession, SessionModal,
    SessionPhase, SubmissionRequest, SubmitOutcome, SubmitSummary, SubmitTrigger,
    TakeQuizService,
};
pub use settings_service::SettingsService;
pub use tasks::{ExportStatus, PollHandle, PollOutcome, PollSettings, TaskNotice, TaskPoller, TaskService};
pub use timer::TimerHandle;
