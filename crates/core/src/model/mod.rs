mod answers;
mod browse;
mod ids;
mod quiz;
mod review;
mod settings;
mod task;

pub use answers::{AnswerMap, OptionChoice};
pub use browse::{
    ChapterFilter, ChapterHit, ChapterQuizzes, ChapterSummary, QuizHit, SearchResults, SubjectHit,
};
pub use ids::{ParseIdError, QuestionId, QuizId, TaskId};

pub use quiz::{Question, Quiz, QuizError, QuizListing, ScoreRecord};
pub use review::{AttemptReview, ReviewedQuestion, Verdict};
pub use settings::{NotificationSettings, ParseReminderTimeError, ReminderTime};
pub use task::{ExportResult, ReportFormat, TaskKind, TaskRecord, TaskStatus};
