//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use gateway::GatewayError;
use quiz_core::model::ParseIdError;

const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";

fn gateway_message(err: &GatewayError) -> String {
    if err.is_transport() {
        NETWORK_MESSAGE.to_string()
    } else {
        err.to_string()
    }
}

/// Errors emitted by the quiz-taking session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    InvalidQuizId(#[from] ParseIdError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("the quiz has not started")]
    NotStarted,
    #[error("answers can no longer be changed")]
    AnswersLocked,
    #[error("there is nothing to confirm")]
    NoPendingConfirmation,
    #[error("a submission is already in progress")]
    SubmissionInFlight,
    #[error("the quiz is already finished")]
    AlreadyFinished,
    #[error("question {index} is out of range (quiz has {total})")]
    QuestionOutOfRange { index: usize, total: usize },
}

impl SessionError {
    /// Text for the user: server messages verbatim, a generic line for network trouble.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(err) => gateway_message(err),
            Self::InvalidQuizId(_) => "Invalid quiz ID".to_string(),
            other => other.to_string(),
        }
    }
}

/// Errors emitted by `TaskService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaskError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("refusing to save export as {0:?}")]
    InvalidFilename(String),
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TaskError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(err) => gateway_message(err),
            other => other.to_string(),
        }
    }
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Quiz name is required")]
    MissingQuizName,
}

impl CatalogError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(err) => gateway_message(err),
            other => other.to_string(),
        }
    }
}

/// Errors emitted by `SettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl SettingsError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(err) => format!("Error saving settings: {}", gateway_message(err)),
        }
    }
}

/// Errors raised while reading client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} must be a whole number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be at least {min}")]
    TooSmall { var: &'static str, min: u64 },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
