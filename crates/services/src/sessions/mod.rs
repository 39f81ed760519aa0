mod answers;
mod cursor;
mod progress;
mod runner;
mod service;
mod state;

// Public API of the quiz-taking subsystem.
pub use crate::error::SessionError;
pub use answers::AnswerStore;
pub use cursor::NavigationCursor;
pub use progress::SubmitSummary;
pub use runner::{Destination, QuizRunner, SubmitOutcome};
pub use service::TakeQuizService;
pub use state::{
    QuizSession, SessionModal, SessionPhase, StartAction, SubmissionRequest, SubmitTrigger,
    TickOutcome,
};
