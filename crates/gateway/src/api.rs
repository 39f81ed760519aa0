use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{
    AnswerMap, AttemptReview, ChapterFilter, ChapterQuizzes, NotificationSettings, Question, Quiz,
    QuizId, QuizListing, ReportFormat, ScoreRecord, SearchResults, TaskId, TaskStatus,
};
use serde_json::Value;
use thiserror::Error;

use crate::http::HttpGateway;

/// Errors surfaced by gateway adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GatewayError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a failure; `message` is shown to the user as-is.
    #[error("{message}")]
    Server {
        status: Option<u16>,
        message: String,
    },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

impl GatewayError {
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            status: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Everything needed to start or resume an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSessionData {
    pub quiz: Quiz,
    pub questions: Vec<Question>,
    /// Answers recorded earlier in the same server session.
    pub prior_answers: AnswerMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub message: String,
}

/// Reply to a background-task kickoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTicket {
    pub task_id: TaskId,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatusReport {
    pub status: TaskStatus,
    /// Object on success, error text on failure, absent while running.
    pub result: Option<Value>,
}

impl TaskStatusReport {
    #[must_use]
    pub fn pending() -> Self {
        Self {
            status: TaskStatus::Pending,
            result: None,
        }
    }

    #[must_use]
    pub fn success(result: Value) -> Self {
        Self {
            status: TaskStatus::Success,
            result: Some(result),
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failure,
            result: Some(Value::String(message.into())),
        }
    }
}

/// Quiz-taking endpoints.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Fetch quiz metadata, questions, remaining time and prior answers.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or when the server rejects the id.
    async fn load_quiz_session(&self, quiz_id: QuizId) -> Result<QuizSessionData, GatewayError>;

    /// Submit the full answer map for grading.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or when the server refuses the attempt.
    async fn submit_quiz(
        &self,
        quiz_id: QuizId,
        answers: &AnswerMap,
    ) -> Result<SubmitReceipt, GatewayError>;
}

/// Background export/report endpoints.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `GatewayError` if the export cannot be queued.
    async fn start_export(&self) -> Result<TaskTicket, GatewayError>;

    /// Queue a monthly report. `None` when the server accepted without a task id.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the report cannot be requested.
    async fn request_monthly_report(
        &self,
        format: ReportFormat,
    ) -> Result<Option<TaskTicket>, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError` if the status cannot be fetched.
    async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatusReport, GatewayError>;

    /// Fetch an export file by its server-side name.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the file is missing or not accessible.
    async fn download_export(&self, filename: &str) -> Result<Vec<u8>, GatewayError>;
}

/// Read-only listings.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `GatewayError` on transport or server failure.
    async fn list_quizzes(&self) -> Result<Vec<QuizListing>, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError` on transport or server failure.
    async fn quiz_scores(&self) -> Result<Vec<ScoreRecord>, GatewayError>;

    /// Questions of a quiz with the correct options and the user's latest answers.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or when no attempt is on record.
    async fn quiz_details(&self, quiz_name: &str) -> Result<AttemptReview, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError` on transport or server failure.
    async fn chapter_quizzes(
        &self,
        filter: &ChapterFilter,
    ) -> Result<ChapterQuizzes, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError` on transport or server failure.
    async fn search(&self, query: &str) -> Result<SearchResults, GatewayError>;
}

/// Email reminder preferences.
#[async_trait]
pub trait SettingsGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `GatewayError` on transport or server failure.
    async fn notification_settings(&self) -> Result<NotificationSettings, GatewayError>;

    /// Store the preferences and return the server's confirmation.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or when the server refuses them.
    async fn save_notification_settings(
        &self,
        settings: &NotificationSettings,
    ) -> Result<String, GatewayError>;
}

/// Aggregates the gateway traits behind trait objects so the backend can be swapped.
#[derive(Clone)]
pub struct Gateway {
    pub sessions: Arc<dyn SessionGateway>,
    pub tasks: Arc<dyn TaskGateway>,
    pub catalog: Arc<dyn CatalogGateway>,
    pub settings: Arc<dyn SettingsGateway>,
}

impl Gateway {
    /// Gateway talking to the quiz server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Endpoint` if the URL cannot be parsed.
    pub fn http(base_url: &str) -> Result<Self, GatewayError> {
        Ok(Self::from_shared(HttpGateway::new(base_url)?))
    }

    /// Serve every role from one implementation.
    #[must_use]
    pub fn from_shared<G>(gateway: G) -> Self
    where
        G: SessionGateway + TaskGateway + CatalogGateway + SettingsGateway + 'static,
    {
        let shared = Arc::new(gateway);
        let sessions: Arc<dyn SessionGateway> = shared.clone();
        let tasks: Arc<dyn TaskGateway> = shared.clone();
        let catalog: Arc<dyn CatalogGateway> = shared.clone();
        let settings: Arc<dyn SettingsGateway> = shared;
        Self {
            sessions,
            tasks,
            catalog,
            settings,
        }
    }
}
