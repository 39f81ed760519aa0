use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use gateway::{SessionGateway, SubmitReceipt};
use quiz_core::model::{OptionChoice, QuestionId};
use tokio::sync::watch;

use super::state::{QuizSession, StartAction, SubmissionRequest, TickOutcome};
use crate::error::SessionError;
use crate::timer::TimerHandle;

/// Where the view should go once an attempt is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Home,
    Scores,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub message: String,
    pub destination: Destination,
}

/// Apply `f` under the channel lock and hand its result back.
fn update<R>(state: &watch::Sender<QuizSession>, f: impl FnOnce(&mut QuizSession) -> R) -> R {
    let mut output = None;
    state.send_modify(|session| output = Some(f(session)));
    match output {
        Some(output) => output,
        None => unreachable!("send_modify runs its closure exactly once"),
    }
}

/// Send a submission and record the reply. Both the timer and the user go through here.
async fn deliver(
    state: &watch::Sender<QuizSession>,
    gateway: &dyn SessionGateway,
    request: SubmissionRequest,
) -> Result<SubmitReceipt, SessionError> {
    tracing::info!(
        quiz_id = %request.quiz_id,
        trigger = ?request.trigger,
        answered = request.answers.len(),
        "submitting quiz"
    );
    match gateway.submit_quiz(request.quiz_id, &request.answers).await {
        Ok(receipt) => {
            update(state, |session| {
                session.complete_submission(Ok(receipt.message.clone()))
            });
            Ok(receipt)
        }
        Err(err) => {
            let err = SessionError::from(err);
            tracing::warn!(quiz_id = %request.quiz_id, error = %err, "submission failed");
            let message = err.user_message();
            update(state, |session| session.complete_submission(Err(message)));
            Err(err)
        }
    }
}

/// Drives one quiz attempt: owns the countdown and funnels every submission
/// through a single path. Views observe it through `subscribe`.
pub struct QuizRunner {
    state: Arc<watch::Sender<QuizSession>>,
    gateway: Arc<dyn SessionGateway>,
    timer: Mutex<Option<TimerHandle>>,
    tick_period: Duration,
}

impl QuizRunner {
    #[must_use]
    pub fn new(
        session: QuizSession,
        gateway: Arc<dyn SessionGateway>,
        tick_period: Duration,
    ) -> Self {
        let (state, _) = watch::channel(session);
        Self {
            state: Arc::new(state),
            gateway,
            timer: Mutex::new(None),
            tick_period,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizSession> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSession {
        self.state.borrow().clone()
    }

    fn timer_slot(&self) -> MutexGuard<'_, Option<TimerHandle>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer_slot().as_ref().is_some_and(TimerHandle::is_running)
    }

    fn stop_timer(&self) {
        if let Some(mut timer) = self.timer_slot().take() {
            timer.cancel();
        }
    }

    /// Start the attempt: either arm the countdown or, when no time is left,
    /// submit straight away. A failed forced submission is recorded in the state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the attempt was already started.
    pub async fn begin(&self) -> Result<(), SessionError> {
        match update(&self.state, QuizSession::begin)? {
            StartAction::StartTimer => {
                self.start_timer();
                Ok(())
            }
            StartAction::ForceSubmit(request) => {
                tracing::info!(quiz_id = %request.quiz_id, "no time left on resume");
                let _ = deliver(&self.state, self.gateway.as_ref(), request).await;
                Ok(())
            }
        }
    }

    fn start_timer(&self) {
        let state = Arc::clone(&self.state);
        let gateway = Arc::clone(&self.gateway);
        let handle = TimerHandle::start(self.tick_period, move || {
            let state = Arc::clone(&state);
            let gateway = Arc::clone(&gateway);
            async move {
                match update(&state, QuizSession::tick) {
                    TickOutcome::Continue(_) => ControlFlow::Continue(()),
                    TickOutcome::Stopped => ControlFlow::Break(()),
                    TickOutcome::Expired(request) => {
                        tracing::info!(quiz_id = %request.quiz_id, "time is up");
                        let _ = deliver(&state, gateway.as_ref(), request).await;
                        ControlFlow::Break(())
                    }
                }
            }
        });
        *self.timer_slot() = Some(handle);
    }

    /// # Errors
    ///
    /// Returns `SessionError` when answers are no longer accepted.
    pub fn select_answer(
        &self,
        question: QuestionId,
        choice: OptionChoice,
    ) -> Result<(), SessionError> {
        update(&self.state, |session| session.select_answer(question, choice))
    }

    pub fn next(&self) -> bool {
        update(&self.state, QuizSession::next)
    }

    pub fn prev(&self) -> bool {
        update(&self.state, QuizSession::prev)
    }

    /// # Errors
    ///
    /// Returns `SessionError::QuestionOutOfRange` for an invalid index.
    pub fn jump_to(&self, index: usize) -> Result<(), SessionError> {
        update(&self.state, |session| session.jump_to(index))
    }

    /// # Errors
    ///
    /// Returns `SessionError` when the attempt cannot be left right now.
    pub fn request_cancel(&self) -> Result<(), SessionError> {
        update(&self.state, QuizSession::request_cancel)
    }

    /// # Errors
    ///
    /// Returns `SessionError` when the attempt cannot be submitted right now.
    pub fn request_submit(&self) -> Result<(), SessionError> {
        update(&self.state, QuizSession::request_submit)
    }

    pub fn dismiss_modal(&self) {
        update(&self.state, QuizSession::dismiss_modal);
    }

    /// Abandon the attempt. Nothing is sent to the server.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPendingConfirmation` unless the cancel dialog is open.
    pub fn confirm_cancel(&self) -> Result<Destination, SessionError> {
        update(&self.state, QuizSession::confirm_cancel)?;
        self.stop_timer();
        tracing::info!(quiz_id = %self.state.borrow().quiz().id(), "quiz abandoned");
        Ok(Destination::Home)
    }

    /// Stop the countdown, then submit the answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPendingConfirmation` unless the submit dialog is open,
    /// or the gateway error when the server refuses or cannot be reached.
    pub async fn confirm_submit(&self) -> Result<SubmitOutcome, SessionError> {
        let request = update(&self.state, QuizSession::confirm_submit)?;
        self.stop_timer();
        let receipt = deliver(&self.state, self.gateway.as_ref(), request).await?;
        Ok(SubmitOutcome {
            message: receipt.message,
            destination: Destination::Scores,
        })
    }
}

impl Drop for QuizRunner {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
