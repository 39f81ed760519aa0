use quiz_core::model::{OptionChoice, QuestionId};
use services::{
    Destination, QuizRunner, QuizSession, SessionModal, SessionPhase, SubmitSummary,
};

use crate::views::ViewError;
use crate::vm::time_fmt::format_countdown;

/// Below this many seconds the countdown is shown as urgent.
const URGENT_SECS: u32 = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(QuestionId, OptionChoice),
    Next,
    Prev,
    JumpTo(usize),
    RequestCancel,
    RequestSubmit,
    DismissModal,
    ConfirmCancel,
    ConfirmSubmit,
}

/// Where to go after an intent ended the attempt, and what to tell the user there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizExit {
    pub destination: Destination,
    pub flash: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub choice: OptionChoice,
    pub letter: char,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteItemVm {
    pub index: usize,
    pub label: String,
    pub answered: bool,
    pub current: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub position_label: String,
    pub text: String,
    pub options: Vec<OptionVm>,
}

/// Everything the take-quiz page renders, derived from one session snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TakeQuizVm {
    pub quiz_name: String,
    pub timer_label: String,
    pub timer_urgent: bool,
    pub question: Option<QuestionVm>,
    pub palette: Vec<PaletteItemVm>,
    pub can_prev: bool,
    pub can_next: bool,
    pub answers_locked: bool,
    pub progress_label: String,
    pub phase: SessionPhase,
    pub modal: SessionModal,
    pub summary: SubmitSummary,
    pub submit_error: Option<String>,
}

impl TakeQuizVm {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        let cursor = session.cursor();
        let current_index = cursor.index();
        let answers_locked = session.phase() != SessionPhase::Running;

        let question = current_index.zip(session.current_question()).map(|(index, q)| {
            let picked = session.answer_for(q.id());
            QuestionVm {
                id: q.id(),
                position_label: format!("Question {} of {}", index + 1, cursor.len()),
                text: q.text().to_string(),
                options: q
                    .choices()
                    .map(|(choice, text)| OptionVm {
                        choice,
                        letter: choice.letter().unwrap_or('?'),
                        text: text.to_string(),
                        selected: picked == Some(choice),
                    })
                    .collect(),
            }
        });

        let palette = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, q)| PaletteItemVm {
                index,
                label: (index + 1).to_string(),
                answered: session.answer_for(q.id()).is_some(),
                current: current_index == Some(index),
            })
            .collect();

        let summary = session.summary();
        Self {
            quiz_name: session.quiz().name().to_string(),
            timer_label: format_countdown(session.remaining_secs()),
            timer_urgent: session.remaining_secs() <= URGENT_SECS,
            question,
            palette,
            can_prev: !cursor.is_empty() && !cursor.is_first(),
            can_next: !cursor.is_empty() && !cursor.is_last(),
            answers_locked,
            progress_label: format!("{} of {} answered", summary.answered, summary.total),
            phase: session.phase(),
            modal: session.modal(),
            summary,
            submit_error: session.last_error().map(ToString::to_string),
        }
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == SessionPhase::Submitting
    }
}

/// Where a finished session should send the user, for completions the view
/// did not trigger itself (the countdown running out).
#[must_use]
pub fn exit_for(session: &QuizSession) -> Option<QuizExit> {
    match session.phase() {
        SessionPhase::Submitted => Some(QuizExit {
            destination: Destination::Scores,
            flash: session.notice().map(ToString::to_string),
        }),
        SessionPhase::Abandoned => Some(QuizExit {
            destination: Destination::Home,
            flash: None,
        }),
        _ => None,
    }
}

/// Apply an intent to the running attempt.
///
/// # Errors
///
/// Returns a `ViewError` carrying the user-facing message of the refused action.
pub async fn apply_intent(
    runner: &QuizRunner,
    intent: QuizIntent,
) -> Result<Option<QuizExit>, ViewError> {
    match intent {
        QuizIntent::Select(question, choice) => runner.select_answer(question, choice)?,
        QuizIntent::Next => {
            runner.next();
        }
        QuizIntent::Prev => {
            runner.prev();
        }
        QuizIntent::JumpTo(index) => runner.jump_to(index)?,
        QuizIntent::RequestCancel => runner.request_cancel()?,
        QuizIntent::RequestSubmit => runner.request_submit()?,
        QuizIntent::DismissModal => runner.dismiss_modal(),
        QuizIntent::ConfirmCancel => {
            let destination = runner.confirm_cancel()?;
            return Ok(Some(QuizExit {
                destination,
                flash: None,
            }));
        }
        QuizIntent::ConfirmSubmit => {
            let outcome = runner.confirm_submit().await?;
            return Ok(Some(QuizExit {
                destination: outcome.destination,
                flash: Some(outcome.message),
            }));
        }
    }
    Ok(None)
}
