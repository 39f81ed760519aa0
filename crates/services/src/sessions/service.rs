use std::sync::Arc;
use std::time::Duration;

use gateway::SessionGateway;
use quiz_core::model::QuizId;

use super::runner::QuizRunner;
use super::state::QuizSession;
use crate::error::SessionError;

/// Loads quiz attempts and hands out runners for them.
#[derive(Clone)]
pub struct TakeQuizService {
    gateway: Arc<dyn SessionGateway>,
    tick_period: Duration,
}

impl TakeQuizService {
    #[must_use]
    pub fn new(gateway: Arc<dyn SessionGateway>, tick_period: Duration) -> Self {
        Self {
            gateway,
            tick_period,
        }
    }

    /// Start an attempt from a raw route parameter.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidQuizId` before any request for ids that are
    /// empty, `null` or not a positive integer, otherwise as `start_quiz`.
    pub async fn start(&self, raw_quiz_id: &str) -> Result<Arc<QuizRunner>, SessionError> {
        let quiz_id: QuizId = raw_quiz_id.parse()?;
        self.start_quiz(quiz_id).await
    }

    /// Load the quiz (with any resume data) and begin the attempt. No timer runs
    /// when loading fails.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Gateway` when the session cannot be loaded.
    pub async fn start_quiz(&self, quiz_id: QuizId) -> Result<Arc<QuizRunner>, SessionError> {
        let data = self
            .gateway
            .load_quiz_session(quiz_id)
            .await
            .inspect_err(|err| tracing::warn!(%quiz_id, error = %err, "quiz failed to load"))?;
        tracing::debug!(
            %quiz_id,
            questions = data.questions.len(),
            remaining = data.quiz.remaining_secs(),
            resumed = data.prior_answers.len(),
            "quiz loaded"
        );

        let runner = Arc::new(QuizRunner::new(
            QuizSession::new(data),
            Arc::clone(&self.gateway),
            self.tick_period,
        ));
        runner.begin().await?;
        Ok(runner)
    }
}
