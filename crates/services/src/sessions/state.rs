use gateway::QuizSessionData;
use quiz_core::model::{AnswerMap, OptionChoice, Question, QuestionId, Quiz, QuizId};

use super::answers::AnswerStore;
use super::cursor::NavigationCursor;
use super::progress::SubmitSummary;
use crate::error::SessionError;

/// Lifecycle of one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Running,
    /// A submission is on the wire; answers and timer are frozen.
    Submitting,
    /// The last submission failed. The user may retry or leave.
    SubmitFailed,
    Submitted,
    Abandoned,
}

impl SessionPhase {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Submitted | Self::Abandoned)
    }
}

/// Confirmation dialog currently on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionModal {
    #[default]
    None,
    ConfirmCancel,
    ConfirmSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    User,
    Timer,
}

/// Payload for the single submission entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub quiz_id: QuizId,
    pub answers: AnswerMap,
    pub trigger: SubmitTrigger,
}

/// What the caller must do after `begin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartAction {
    StartTimer,
    /// Time ran out before the attempt was reopened.
    ForceSubmit(SubmissionRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Continue(u32),
    Expired(SubmissionRequest),
    /// The session left `Running`; the timer should end.
    Stopped,
}

/// Pure state of a quiz attempt. Every transition is a method; none of them do I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    quiz: Quiz,
    questions: Vec<Question>,
    answers: AnswerStore,
    cursor: NavigationCursor,
    remaining_secs: u32,
    phase: SessionPhase,
    modal: SessionModal,
    submit_attempts: u32,
    notice: Option<String>,
    last_error: Option<String>,
}

impl QuizSession {
    #[must_use]
    pub fn new(data: QuizSessionData) -> Self {
        let QuizSessionData {
            quiz,
            questions,
            prior_answers,
        } = data;
        Self {
            answers: AnswerStore::new(&questions, prior_answers),
            cursor: NavigationCursor::new(questions.len()),
            remaining_secs: quiz.remaining_secs(),
            quiz,
            questions,
            phase: SessionPhase::NotStarted,
            modal: SessionModal::None,
            submit_attempts: 0,
            notice: None,
            last_error: None,
        }
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, question: QuestionId) -> Option<OptionChoice> {
        self.answers.answer(question)
    }

    #[must_use]
    pub fn cursor(&self) -> NavigationCursor {
        self.cursor
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.cursor.index().and_then(|index| self.questions.get(index))
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn modal(&self) -> SessionModal {
        self.modal
    }

    #[must_use]
    pub fn submit_attempts(&self) -> u32 {
        self.submit_attempts
    }

    /// Server message of a successful submission.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Message of the last failed submission.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.answered_count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.answers.unanswered_count()
    }

    #[must_use]
    pub fn summary(&self) -> SubmitSummary {
        SubmitSummary {
            answered: self.answered_count(),
            unanswered: self.unanswered_count(),
            total: self.answers.total(),
            remaining_secs: self.remaining_secs,
        }
    }

    //
    // ─── LIFECYCLE ─────────────────────────────────────────────────────────────
    //

    /// Leave `NotStarted`. A session loaded with no time left goes straight to
    /// a timer-triggered submission.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyFinished` if the session was already started.
    pub fn begin(&mut self) -> Result<StartAction, SessionError> {
        if self.phase != SessionPhase::NotStarted {
            return Err(SessionError::AlreadyFinished);
        }
        if self.remaining_secs == 0 {
            return Ok(StartAction::ForceSubmit(
                self.start_submission(SubmitTrigger::Timer),
            ));
        }
        self.phase = SessionPhase::Running;
        Ok(StartAction::StartTimer)
    }

    /// One countdown step.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Stopped;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return TickOutcome::Continue(self.remaining_secs);
        }
        TickOutcome::Expired(self.start_submission(SubmitTrigger::Timer))
    }

    fn start_submission(&mut self, trigger: SubmitTrigger) -> SubmissionRequest {
        self.phase = SessionPhase::Submitting;
        self.modal = SessionModal::None;
        self.submit_attempts += 1;
        self.last_error = None;
        SubmissionRequest {
            quiz_id: self.quiz.id(),
            answers: self.answers.answers().clone(),
            trigger,
        }
    }

    /// Record the server's reply. Ignored unless a submission is in flight.
    pub fn complete_submission(&mut self, result: Result<String, String>) -> bool {
        if self.phase != SessionPhase::Submitting {
            return false;
        }
        match result {
            Ok(message) => {
                self.phase = SessionPhase::Submitted;
                self.notice = Some(message);
            }
            Err(message) => {
                self.phase = SessionPhase::SubmitFailed;
                self.last_error = Some(message);
            }
        }
        true
    }

    //
    // ─── ANSWERS & NAVIGATION ──────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `begin` and
    /// `SessionError::AnswersLocked` once a submission has been attempted.
    pub fn select_answer(
        &mut self,
        question: QuestionId,
        choice: OptionChoice,
    ) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Running => {
                self.answers.set_answer(question, choice);
                Ok(())
            }
            SessionPhase::NotStarted => Err(SessionError::NotStarted),
            _ => Err(SessionError::AnswersLocked),
        }
    }

    pub fn next(&mut self) -> bool {
        self.cursor.next()
    }

    pub fn prev(&mut self) -> bool {
        self.cursor.prev()
    }

    /// # Errors
    ///
    /// Returns `SessionError::QuestionOutOfRange` for an invalid index.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.cursor.jump_to(index)
    }

    //
    // ─── MODALS ────────────────────────────────────────────────────────────────
    //

    fn ensure_can_confirm(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Running | SessionPhase::SubmitFailed => Ok(()),
            SessionPhase::NotStarted => Err(SessionError::NotStarted),
            SessionPhase::Submitting => Err(SessionError::SubmissionInFlight),
            SessionPhase::Submitted | SessionPhase::Abandoned => {
                Err(SessionError::AlreadyFinished)
            }
        }
    }

    /// # Errors
    ///
    /// Returns a `SessionError` if the attempt is not in a state that can be left.
    pub fn request_cancel(&mut self) -> Result<(), SessionError> {
        self.ensure_can_confirm()?;
        self.modal = SessionModal::ConfirmCancel;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a `SessionError` if the attempt cannot be submitted right now.
    pub fn request_submit(&mut self) -> Result<(), SessionError> {
        self.ensure_can_confirm()?;
        self.modal = SessionModal::ConfirmSubmit;
        Ok(())
    }

    pub fn dismiss_modal(&mut self) {
        self.modal = SessionModal::None;
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoPendingConfirmation` unless the cancel dialog is open.
    pub fn confirm_cancel(&mut self) -> Result<(), SessionError> {
        if self.modal != SessionModal::ConfirmCancel {
            return Err(SessionError::NoPendingConfirmation);
        }
        self.ensure_can_confirm()?;
        self.modal = SessionModal::None;
        self.phase = SessionPhase::Abandoned;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoPendingConfirmation` unless the submit dialog is open.
    pub fn confirm_submit(&mut self) -> Result<SubmissionRequest, SessionError> {
        if self.modal != SessionModal::ConfirmSubmit {
            return Err(SessionError::NoPendingConfirmation);
        }
        self.ensure_can_confirm()?;
        Ok(self.start_submission(SubmitTrigger::User))
    }
}
