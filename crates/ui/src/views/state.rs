use dioxus::prelude::*;
use services::{CatalogError, SessionError, TaskError};

/// User-facing failure of a view action. The message is shown as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewError {
    message: String,
}

impl ViewError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self::new("Something went wrong. Please try again.")
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SessionError> for ViewError {
    fn from(err: SessionError) -> Self {
        Self::new(err.user_message())
    }
}

impl From<CatalogError> for ViewError {
    fn from(err: CatalogError) -> Self {
        Self::new(err.user_message())
    }
}

impl From<TaskError> for ViewError {
    fn from(err: TaskError) -> Self {
        Self::new(err.user_message())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::unknown()),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
