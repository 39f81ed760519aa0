mod browse_vm;
mod catalog_vm;
mod review_vm;
mod take_quiz_vm;
mod task_vm;
mod time_fmt;

pub use browse_vm::{
    ChapterLinkVm, ChapterPageVm, SearchHitVm, SearchSectionVm, SearchVm, map_chapter_page,
    map_search,
};
pub use catalog_vm::{QuizCardVm, ScoreRowVm, map_quiz_cards, map_score_rows};
pub use review_vm::{AttemptReviewVm, ReviewOptionVm, ReviewQuestionVm, map_attempt_review};
pub use take_quiz_vm::{
    OptionVm, PaletteItemVm, QuestionVm, QuizExit, QuizIntent, TakeQuizVm, apply_intent,
    exit_for,
};
pub use task_vm::{NoticeVm, TaskRowVm, last_export_label, map_task_rows};
pub use time_fmt::{format_countdown, format_datetime};
