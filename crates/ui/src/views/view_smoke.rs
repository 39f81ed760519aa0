use std::sync::Arc;

use gateway::{CatalogGateway, GatewayError, InMemoryGateway, QuizSessionData};
use quiz_core::model::{
    AnswerMap, AttemptReview, ChapterFilter, ChapterQuizzes, ChapterSummary, NotificationSettings,
    OptionChoice, Question, QuestionId, Quiz, QuizId, QuizListing, ReminderTime, ScoreRecord,
    SearchResults,
};
use services::{SessionModal, SessionPhase};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_catalog};
use crate::vm::QuizIntent;

fn ownership_quiz(remaining: u32) -> QuizSessionData {
    QuizSessionData {
        quiz: Quiz::new(QuizId::new(7), "Ownership", 600, remaining).unwrap(),
        questions: vec![
            Question::new(
                QuestionId::new(1),
                "Which keyword moves a value into a closure?",
                ["ref".into(), "mut".into(), "move".into(), "static".into()],
            ),
            Question::new(
                QuestionId::new(2),
                "What does & create?",
                ["a copy".into(), "a borrow".into(), "a box".into(), "a clone".into()],
            ),
        ],
        prior_answers: AnswerMap::new(),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_quizzes() {
    let gateway = InMemoryGateway::new();
    gateway.set_quizzes(vec![QuizListing {
        id: QuizId::new(7),
        name: "Ownership".into(),
        date_label: "2025-03-01".into(),
        chapter: "Borrowing".into(),
        subject: "Rust".into(),
        description: Some("Moves and borrows".into()),
    }]);
    let mut harness = setup_view_harness(ViewKind::Home, gateway);

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Ownership"), "missing quiz name in {html}");
    assert!(html.contains("Rust · Borrowing"), "missing meta in {html}");
    assert!(html.contains("Start Quiz"), "missing start link in {html}");
}

struct FailingCatalog;

#[async_trait::async_trait]
impl CatalogGateway for FailingCatalog {
    async fn list_quizzes(&self) -> Result<Vec<QuizListing>, GatewayError> {
        Err(GatewayError::Transport("connection refused".into()))
    }

    async fn quiz_scores(&self) -> Result<Vec<ScoreRecord>, GatewayError> {
        Err(GatewayError::server("Please log in"))
    }

    async fn quiz_details(&self, _quiz_name: &str) -> Result<AttemptReview, GatewayError> {
        Err(GatewayError::server("No score record found"))
    }

    async fn chapter_quizzes(
        &self,
        _filter: &ChapterFilter,
    ) -> Result<ChapterQuizzes, GatewayError> {
        Err(GatewayError::Transport("connection refused".into()))
    }

    async fn search(&self, _query: &str) -> Result<SearchResults, GatewayError> {
        Err(GatewayError::Transport("connection refused".into()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with_catalog(
        ViewKind::Home,
        InMemoryGateway::new(),
        Arc::new(FailingCatalog),
    );

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Network error"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn scores_view_smoke_shows_server_message_on_failure() {
    let mut harness = setup_view_harness_with_catalog(
        ViewKind::Scores,
        InMemoryGateway::new(),
        Arc::new(FailingCatalog),
    );

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Please log in"), "missing message in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn scores_view_smoke_renders_rows() {
    let gateway = InMemoryGateway::new();
    gateway.set_scores(vec![ScoreRecord {
        quiz_name: "Ownership".into(),
        correct: 3,
        attempted: 4,
        percentage: 75.0,
        attempted_at: "2025-03-01 10:00".into(),
    }]);
    let mut harness = setup_view_harness(ViewKind::Scores, gateway);
    harness.context.set_flash("Quiz submitted successfully!");

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Quiz submitted successfully!"), "missing flash in {html}");
    assert!(html.contains("3/4"), "missing score in {html}");
    assert!(html.contains("75.0%"), "missing percentage in {html}");
    assert!(html.contains("View details"), "missing details link in {html}");
}

fn ownership_listing(id: u64, name: &str, chapter: &str) -> QuizListing {
    QuizListing {
        id: QuizId::new(id),
        name: name.into(),
        date_label: "2025-03-01".into(),
        chapter: chapter.into(),
        subject: "Rust".into(),
        description: None,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn review_view_smoke_marks_answers_against_the_key() {
    let gateway = InMemoryGateway::new();
    let quiz = ownership_quiz(0);
    let answers: AnswerMap = [(QuestionId::new(1), OptionChoice::new(3))]
        .into_iter()
        .collect();
    gateway.add_review(AttemptReview::from_answers(
        "Ownership",
        vec![
            (quiz.questions[0].clone(), Some(OptionChoice::new(3))),
            (quiz.questions[1].clone(), Some(OptionChoice::new(2))),
        ],
        &answers,
    ));
    let mut harness = setup_view_harness(ViewKind::ScoreDetails("Ownership".into()), gateway);

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("1 correct, 0 wrong, 1 unanswered"), "missing summary in {html}");
    assert!(html.contains("option--correct"), "missing key marker in {html}");
    assert!(
        html.contains("Your answer: Not answered | Correct answer: B"),
        "missing answer line in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn review_view_smoke_reports_missing_attempt() {
    let mut harness = setup_view_harness_with_catalog(
        ViewKind::ScoreDetails("Ownership".into()),
        InMemoryGateway::new(),
        Arc::new(FailingCatalog),
    );

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Error loading quiz details: No score record found"),
        "missing error in {html}"
    );
    assert!(html.contains("Back to scores"), "missing back link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chapter_view_smoke_lists_only_the_selected_chapter() {
    let gateway = InMemoryGateway::new();
    gateway.set_quizzes(vec![
        ownership_listing(7, "Borrowing basics", "Ownership"),
        ownership_listing(8, "Trait objects", "Traits"),
    ]);
    gateway.set_chapters(vec![
        ChapterSummary {
            id: 1,
            name: "Ownership".into(),
        },
        ChapterSummary {
            id: 2,
            name: "Traits".into(),
        },
    ]);
    let mut harness = setup_view_harness(ViewKind::Chapters("Ownership".into()), gateway);

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Chapter: Ownership"), "missing heading in {html}");
    assert!(html.contains("Borrowing basics"), "missing quiz in {html}");
    assert!(!html.contains("Trait objects"), "other chapter leaked into {html}");
    assert!(html.contains("All Chapters"), "missing reset link in {html}");
    assert!(html.contains("chapter-link--active"), "missing active chapter in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn search_view_smoke_shows_hits_and_skips_blank_queries() {
    let gateway = InMemoryGateway::new();
    gateway.set_quizzes(vec![ownership_listing(7, "Borrowing basics", "Ownership")]);
    let mut harness = setup_view_harness(ViewKind::Search("borrow".into()), gateway);

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("1 result for"), "missing summary in {html}");
    assert!(html.contains("Borrowing basics"), "missing hit in {html}");
    assert!(html.contains("Start Quiz"), "missing start link in {html}");
    assert_eq!(harness.gateway.search_queries(), ["borrow"]);

    let mut blank = setup_view_harness(ViewKind::Search("  ".into()), InMemoryGateway::new());
    blank.rebuild();
    blank.settle().await;
    assert!(blank.render().contains("Type something to search"));
    assert!(blank.gateway.search_queries().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn exports_view_smoke_loads_notification_settings() {
    let gateway = InMemoryGateway::new();
    gateway.set_notification_settings(NotificationSettings {
        reminder_time: "20:00".parse::<ReminderTime>().unwrap(),
        ..NotificationSettings::default()
    });
    let mut harness = setup_view_harness(ViewKind::Exports, gateway);

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Notification Preferences"), "missing section in {html}");
    assert!(html.contains("Daily reminder at 8:00 PM"), "missing schedule in {html}");
    assert!(html.contains("Save Preferences"), "missing save button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn take_quiz_view_smoke_answers_and_submits() {
    let gateway = InMemoryGateway::new().with_session(ownership_quiz(120));
    let mut harness = setup_view_harness(ViewKind::TakeQuiz("7".into()), gateway);

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Ownership"), "missing title in {html}");
    assert!(html.contains("Question 1 of 2"), "missing position in {html}");
    assert!(html.contains("Time left: 2:00"), "missing timer in {html}");
    assert!(html.contains("0 of 2 answered"), "missing progress in {html}");

    harness.dispatch(QuizIntent::Select(QuestionId::new(1), OptionChoice::new(3)));
    harness.settle().await;
    assert!(harness.render().contains("1 of 2 answered"));

    harness.dispatch(QuizIntent::RequestSubmit);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Submit quiz?"), "missing modal in {html}");
    assert!(html.contains("Unanswered"), "missing summary in {html}");

    harness.dispatch(QuizIntent::ConfirmSubmit);
    harness.settle().await;
    let submissions = harness.gateway.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0].1.get(QuestionId::new(1)),
        Some(OptionChoice::new(3))
    );
    let session = harness.session().expect("session loaded");
    assert_eq!(session.phase(), SessionPhase::Submitted);
    assert_eq!(
        harness.context.take_flash().as_deref(),
        Some("Quiz submitted successfully!")
    );
}

#[tokio::test(flavor = "current_thread")]
async fn take_quiz_view_smoke_cancel_skips_submission() {
    let gateway = InMemoryGateway::new().with_session(ownership_quiz(120));
    let mut harness = setup_view_harness(ViewKind::TakeQuiz("7".into()), gateway);
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(QuizIntent::RequestCancel);
    harness.settle().await;
    assert!(harness.render().contains("Cancel quiz?"));

    harness.dispatch(QuizIntent::DismissModal);
    harness.settle().await;
    let session = harness.session().expect("session loaded");
    assert_eq!(session.modal(), SessionModal::None);

    harness.dispatch(QuizIntent::RequestCancel);
    harness.settle().await;
    harness.dispatch(QuizIntent::ConfirmCancel);
    harness.settle().await;
    let session = harness.session().expect("session loaded");
    assert_eq!(session.phase(), SessionPhase::Abandoned);
    assert_eq!(harness.gateway.submit_calls(), 0);
    assert_eq!(harness.context.take_flash(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn take_quiz_view_smoke_rejects_invalid_id() {
    let mut harness = setup_view_harness(ViewKind::TakeQuiz("abc".into()), InMemoryGateway::new());

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Invalid quiz ID"), "missing error in {html}");
    assert!(html.contains("Back to quizzes"), "missing home link in {html}");
    assert_eq!(harness.gateway.load_calls(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn exports_view_smoke_lists_active_tasks() {
    let mut harness = setup_view_harness(ViewKind::Exports, InMemoryGateway::new());
    harness
        .context
        .tasks()
        .start_export()
        .await
        .expect("start export");

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("CSV Export"), "missing task kind in {html}");
    assert!(html.contains("PENDING"), "missing status in {html}");
    assert!(html.contains("No export yet this session."), "missing label in {html}");
    assert!(html.contains("Monthly Report (PDF)"), "missing report button in {html}");
}
