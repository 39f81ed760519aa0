use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use quiz_core::model::{
    AnswerMap, AttemptReview, ChapterFilter, ChapterHit, ChapterQuizzes, ChapterSummary,
    NotificationSettings, QuizHit, QuizId, QuizListing, ReportFormat, ScoreRecord, SearchResults,
    TaskId,
};

use crate::api::{
    CatalogGateway, GatewayError, QuizSessionData, SessionGateway, SettingsGateway, SubmitReceipt,
    TaskGateway, TaskStatusReport, TaskTicket,
};

/// Scriptable in-memory gateway for tests and offline prototyping.
///
/// Task statuses are served from a per-task script; once a script is down to its
/// last entry that entry repeats. Tasks without a script stay `PENDING`.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    offline: bool,
    sessions: HashMap<QuizId, QuizSessionData>,
    load_calls: usize,
    submissions: Vec<(QuizId, AnswerMap)>,
    submit_failures: VecDeque<GatewayError>,
    next_task: u64,
    queued_scripts: VecDeque<Vec<TaskStatusReport>>,
    task_scripts: HashMap<TaskId, VecDeque<TaskStatusReport>>,
    status_calls: HashMap<TaskId, usize>,
    started_tasks: Vec<TaskId>,
    report_without_ticket: bool,
    exports: HashMap<String, Vec<u8>>,
    quizzes: Vec<QuizListing>,
    scores: Vec<ScoreRecord>,
    reviews: HashMap<String, AttemptReview>,
    chapters: Vec<ChapterSummary>,
    search_queries: Vec<String>,
    notification_settings: NotificationSettings,
    saved_settings: Vec<NotificationSettings>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, GatewayError> {
        self.state
            .lock()
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    /// Lock for the fake's own bookkeeping; a poisoned lock only means a test panicked.
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn online(&self) -> Result<MutexGuard<'_, MemoryState>, GatewayError> {
        let guard = self.lock()?;
        if guard.offline {
            return Err(GatewayError::Transport("connection refused".into()));
        }
        Ok(guard)
    }

    /// Make every call fail with a transport error until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    #[must_use]
    pub fn with_session(self, data: QuizSessionData) -> Self {
        self.insert_session(data);
        self
    }

    pub fn insert_session(&self, data: QuizSessionData) {
        self.state().sessions.insert(data.quiz.id(), data);
    }

    /// Fail the next submit with `error`. Queued failures are consumed in order.
    pub fn fail_next_submit(&self, error: GatewayError) {
        self.state().submit_failures.push_back(error);
    }

    #[must_use]
    pub fn load_calls(&self) -> usize {
        self.state().load_calls
    }

    /// Every submit that reached the gateway, failed ones included.
    #[must_use]
    pub fn submissions(&self) -> Vec<(QuizId, AnswerMap)> {
        self.state().submissions.clone()
    }

    #[must_use]
    pub fn submit_calls(&self) -> usize {
        self.state().submissions.len()
    }

    /// Status script for a known task id.
    pub fn script_task(&self, task_id: &TaskId, statuses: Vec<TaskStatusReport>) {
        self.state()
            .task_scripts
            .insert(task_id.clone(), statuses.into());
    }

    /// Status script for the next task this gateway hands out.
    pub fn queue_task_script(&self, statuses: Vec<TaskStatusReport>) {
        self.state().queued_scripts.push_back(statuses);
    }

    /// Acknowledge report requests without a task id.
    pub fn set_report_without_ticket(&self, enabled: bool) {
        self.state().report_without_ticket = enabled;
    }

    #[must_use]
    pub fn status_calls(&self, task_id: &TaskId) -> usize {
        self.state()
            .status_calls
            .get(task_id)
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn started_tasks(&self) -> Vec<TaskId> {
        self.state().started_tasks.clone()
    }

    pub fn add_export_file(&self, filename: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.state()
            .exports
            .insert(filename.into(), contents.into());
    }

    pub fn set_quizzes(&self, quizzes: Vec<QuizListing>) {
        self.state().quizzes = quizzes;
    }

    pub fn set_scores(&self, scores: Vec<ScoreRecord>) {
        self.state().scores = scores;
    }

    /// Review served for `quiz_details` of the review's quiz name.
    pub fn add_review(&self, review: AttemptReview) {
        self.state()
            .reviews
            .insert(review.quiz_name().to_string(), review);
    }

    pub fn set_chapters(&self, chapters: Vec<ChapterSummary>) {
        self.state().chapters = chapters;
    }

    /// Queries that reached `search`, in order.
    #[must_use]
    pub fn search_queries(&self) -> Vec<String> {
        self.state().search_queries.clone()
    }

    pub fn set_notification_settings(&self, settings: NotificationSettings) {
        self.state().notification_settings = settings;
    }

    /// Every settings payload the client saved.
    #[must_use]
    pub fn saved_settings(&self) -> Vec<NotificationSettings> {
        self.state().saved_settings.clone()
    }
}

impl MemoryState {
    fn issue_task(&mut self) -> TaskId {
        self.next_task += 1;
        let task_id = TaskId::new(format!("task-{:04}", self.next_task));
        if let Some(script) = self.queued_scripts.pop_front() {
            self.task_scripts.insert(task_id.clone(), script.into());
        }
        self.started_tasks.push(task_id.clone());
        task_id
    }
}

#[async_trait]
impl SessionGateway for InMemoryGateway {
    async fn load_quiz_session(&self, quiz_id: QuizId) -> Result<QuizSessionData, GatewayError> {
        let mut guard = self.lock()?;
        guard.load_calls += 1;
        if guard.offline {
            return Err(GatewayError::Transport("connection refused".into()));
        }
        guard
            .sessions
            .get(&quiz_id)
            .cloned()
            .ok_or_else(|| GatewayError::Server {
                status: Some(404),
                message: "Quiz not found".into(),
            })
    }

    async fn submit_quiz(
        &self,
        quiz_id: QuizId,
        answers: &AnswerMap,
    ) -> Result<SubmitReceipt, GatewayError> {
        let mut guard = self.online()?;
        guard.submissions.push((quiz_id, answers.clone()));
        if let Some(error) = guard.submit_failures.pop_front() {
            return Err(error);
        }
        Ok(SubmitReceipt {
            message: "Quiz submitted successfully!".into(),
        })
    }
}

#[async_trait]
impl TaskGateway for InMemoryGateway {
    async fn start_export(&self) -> Result<TaskTicket, GatewayError> {
        let mut guard = self.online()?;
        let task_id = guard.issue_task();
        Ok(TaskTicket {
            task_id,
            message: Some("Export started".into()),
        })
    }

    async fn request_monthly_report(
        &self,
        format: ReportFormat,
    ) -> Result<Option<TaskTicket>, GatewayError> {
        let mut guard = self.online()?;
        if guard.report_without_ticket {
            return Ok(None);
        }
        let task_id = guard.issue_task();
        Ok(Some(TaskTicket {
            task_id,
            message: Some(format!("{} report requested", format.as_str())),
        }))
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatusReport, GatewayError> {
        let mut guard = self.lock()?;
        *guard.status_calls.entry(task_id.clone()).or_default() += 1;
        if guard.offline {
            return Err(GatewayError::Transport("connection refused".into()));
        }
        let Some(script) = guard.task_scripts.get_mut(task_id) else {
            return Ok(TaskStatusReport::pending());
        };
        let report = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        Ok(report.unwrap_or_else(TaskStatusReport::pending))
    }

    async fn download_export(&self, filename: &str) -> Result<Vec<u8>, GatewayError> {
        let guard = self.online()?;
        guard
            .exports
            .get(filename)
            .cloned()
            .ok_or_else(|| GatewayError::Server {
                status: Some(404),
                message: "File not found".into(),
            })
    }
}

#[async_trait]
impl CatalogGateway for InMemoryGateway {
    async fn list_quizzes(&self) -> Result<Vec<QuizListing>, GatewayError> {
        Ok(self.online()?.quizzes.clone())
    }

    async fn quiz_scores(&self) -> Result<Vec<ScoreRecord>, GatewayError> {
        Ok(self.online()?.scores.clone())
    }

    async fn quiz_details(&self, quiz_name: &str) -> Result<AttemptReview, GatewayError> {
        self.online()?
            .reviews
            .get(quiz_name)
            .cloned()
            .ok_or_else(|| GatewayError::Server {
                status: Some(404),
                message: "No score record found".into(),
            })
    }

    async fn chapter_quizzes(
        &self,
        filter: &ChapterFilter,
    ) -> Result<ChapterQuizzes, GatewayError> {
        let guard = self.online()?;
        Ok(ChapterQuizzes {
            chapters: guard.chapters.clone(),
            selected: filter.clone(),
            quizzes: guard
                .quizzes
                .iter()
                .filter(|quiz| filter.selects(&quiz.chapter))
                .cloned()
                .collect(),
        })
    }

    /// Case-insensitive substring match over quiz and chapter names.
    async fn search(&self, query: &str) -> Result<SearchResults, GatewayError> {
        let mut guard = self.online()?;
        guard.search_queries.push(query.to_string());
        let needle = query.trim().to_lowercase();
        let mut results = SearchResults::empty(query);
        results.chapters = guard
            .chapters
            .iter()
            .filter(|chapter| chapter.name.to_lowercase().contains(&needle))
            .map(|chapter| ChapterHit {
                id: chapter.id,
                name: chapter.name.clone(),
                description: String::new(),
                subject_id: None,
            })
            .collect();
        results.quizzes = guard
            .quizzes
            .iter()
            .filter(|quiz| {
                quiz.name.to_lowercase().contains(&needle)
                    || quiz
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .map(|quiz| QuizHit {
                id: quiz.id,
                name: quiz.name.clone(),
                description: quiz.description.clone().unwrap_or_default(),
                date: Some(quiz.date_label.clone()),
            })
            .collect();
        Ok(results)
    }
}

#[async_trait]
impl SettingsGateway for InMemoryGateway {
    async fn notification_settings(&self) -> Result<NotificationSettings, GatewayError> {
        Ok(self.online()?.notification_settings)
    }

    async fn save_notification_settings(
        &self,
        settings: &NotificationSettings,
    ) -> Result<String, GatewayError> {
        let mut guard = self.online()?;
        guard.notification_settings = *settings;
        guard.saved_settings.push(*settings);
        Ok("Settings saved successfully!".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{OptionChoice, QuestionId, Quiz};
    use serde_json::json;

    fn session(id: u64) -> QuizSessionData {
        QuizSessionData {
            quiz: Quiz::new(QuizId::new(id), "Quiz", 60, 60).unwrap(),
            questions: Vec::new(),
            prior_answers: AnswerMap::new(),
        }
    }

    #[tokio::test]
    async fn unknown_quiz_is_a_server_error() {
        let gateway = InMemoryGateway::new().with_session(session(1));
        assert!(gateway.load_quiz_session(QuizId::new(1)).await.is_ok());

        let err = gateway.load_quiz_session(QuizId::new(2)).await.unwrap_err();
        assert_eq!(err.to_string(), "Quiz not found");
        assert_eq!(gateway.load_calls(), 2);
    }

    #[tokio::test]
    async fn queued_submit_failure_is_consumed_once() {
        let gateway = InMemoryGateway::new();
        gateway.fail_next_submit(GatewayError::server("Quiz already submitted"));
        let answers: AnswerMap = [(QuestionId::new(1), OptionChoice::new(2))]
            .into_iter()
            .collect();

        assert!(gateway.submit_quiz(QuizId::new(1), &answers).await.is_err());
        assert!(gateway.submit_quiz(QuizId::new(1), &answers).await.is_ok());
        assert_eq!(gateway.submit_calls(), 2);
        assert_eq!(gateway.submissions()[1].1, answers);
    }

    #[tokio::test]
    async fn status_script_repeats_last_entry() {
        let gateway = InMemoryGateway::new();
        gateway.queue_task_script(vec![
            TaskStatusReport::pending(),
            TaskStatusReport::success(json!({ "filename": "out.csv" })),
        ]);
        let ticket = gateway.start_export().await.unwrap();

        let first = gateway.task_status(&ticket.task_id).await.unwrap();
        let second = gateway.task_status(&ticket.task_id).await.unwrap();
        let third = gateway.task_status(&ticket.task_id).await.unwrap();

        assert_eq!(first, TaskStatusReport::pending());
        assert!(second.status.is_terminal());
        assert_eq!(second, third);
        assert_eq!(gateway.status_calls(&ticket.task_id), 3);
    }

    fn listing(id: u64, name: &str, chapter: &str) -> QuizListing {
        QuizListing {
            id: QuizId::new(id),
            name: name.into(),
            date_label: "05 Jan 2025".into(),
            chapter: chapter.into(),
            subject: "Rust".into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn chapter_filter_and_search_read_the_catalogue() {
        let gateway = InMemoryGateway::new();
        gateway.set_quizzes(vec![
            listing(1, "Borrowing", "Ownership"),
            listing(2, "Generics", "Traits"),
        ]);
        gateway.set_chapters(vec![ChapterSummary {
            id: 1,
            name: "Ownership".into(),
        }]);

        let owned = gateway
            .chapter_quizzes(&ChapterFilter::parse("Ownership"))
            .await
            .unwrap();
        assert_eq!(owned.quizzes.len(), 1);
        let all = gateway.chapter_quizzes(&ChapterFilter::All).await.unwrap();
        assert_eq!(all.quizzes.len(), 2);

        let results = gateway.search("OWN").await.unwrap();
        assert_eq!(results.chapters.len(), 1);
        assert!(results.quizzes.is_empty());
        assert_eq!(gateway.search_queries(), ["OWN"]);
    }

    #[tokio::test]
    async fn missing_review_is_a_server_error() {
        let gateway = InMemoryGateway::new();
        let err = gateway.quiz_details("Unknown").await.unwrap_err();
        assert_eq!(err.to_string(), "No score record found");
    }

    #[tokio::test]
    async fn saved_settings_are_served_back() {
        let gateway = InMemoryGateway::new();
        let settings = NotificationSettings {
            weekly_report: true,
            ..NotificationSettings::default()
        };
        let message = gateway.save_notification_settings(&settings).await.unwrap();
        assert_eq!(message, "Settings saved successfully!");
        assert_eq!(gateway.notification_settings().await.unwrap(), settings);
        assert_eq!(gateway.saved_settings(), [settings]);
    }

    #[tokio::test]
    async fn offline_gateway_reports_transport_errors() {
        let gateway = InMemoryGateway::new();
        gateway.set_offline(true);
        let err = gateway.list_quizzes().await.unwrap_err();
        assert!(err.is_transport());

        let task = TaskId::new("abc");
        assert!(gateway.task_status(&task).await.unwrap_err().is_transport());
        assert_eq!(gateway.status_calls(&task), 1);
    }
}
