use std::collections::BTreeMap;

use quiz_core::model::{
    AnswerMap, AttemptReview, ChapterFilter, ChapterHit, ChapterQuizzes, ChapterSummary,
    NotificationSettings, OptionChoice, Question, QuestionId, Quiz, QuizHit, QuizId, QuizListing,
    ScoreRecord, SearchResults, SubjectHit, TaskId, TaskStatus,
};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{GatewayError, QuizSessionData, SubmitReceipt, TaskStatusReport, TaskTicket};

fn decode_err<E: core::fmt::Display>(e: E) -> GatewayError {
    GatewayError::Decode(e.to_string())
}

fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToString::to_string)
}

/// Check an envelope for `"success": false` and lift its message.
pub(crate) fn check_envelope(status: u16, body: Value) -> Result<Value, GatewayError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = message_of(&body).unwrap_or_else(|| "request failed".to_string());
        return Err(GatewayError::Server {
            status: Some(status),
            message,
        });
    }
    Ok(body)
}

/// Read a JSON envelope, turning HTTP and logical failures into `GatewayError::Server`.
pub(crate) async fn read_json(response: Response) -> Result<Value, GatewayError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let body: Option<Value> = serde_json::from_slice(&bytes).ok();

    if !status.is_success() {
        let message = body
            .as_ref()
            .and_then(message_of)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return Err(GatewayError::Server {
            status: Some(status.as_u16()),
            message,
        });
    }

    let body = body.ok_or_else(|| GatewayError::Decode("response body is not JSON".into()))?;
    check_envelope(status.as_u16(), body)
}

pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T, GatewayError> {
    serde_json::from_value(body).map_err(decode_err)
}

//
// ─── QUIZ SESSION ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct SessionBody {
    quiz: QuizBody,
    #[serde(default)]
    questions: Vec<QuestionBody>,
    #[serde(default)]
    total_questions: Option<usize>,
    #[serde(default)]
    quiz_answers: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct QuizBody {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    time_duration: i64,
    #[serde(default)]
    remaining_time: i64,
}

#[derive(Debug, Deserialize)]
struct QuestionBody {
    id: u64,
    #[serde(default)]
    question: String,
    #[serde(default)]
    option1: Option<String>,
    #[serde(default)]
    option2: Option<String>,
    #[serde(default)]
    option3: Option<String>,
    #[serde(default)]
    option4: Option<String>,
    /// Only sent once the attempt is over.
    #[serde(default)]
    correct_option: Option<Value>,
}

impl QuestionBody {
    fn into_question(self) -> (Question, Option<OptionChoice>) {
        let correct = self
            .correct_option
            .as_ref()
            .and_then(option_value)
            .map(OptionChoice::new);
        let question = Question::new(
            QuestionId::new(self.id),
            self.question,
            [
                self.option1.unwrap_or_default(),
                self.option2.unwrap_or_default(),
                self.option3.unwrap_or_default(),
                self.option4.unwrap_or_default(),
            ],
        );
        (question, correct)
    }
}

fn clamp_secs(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

impl SessionBody {
    pub(crate) fn into_session_data(self) -> Result<QuizSessionData, GatewayError> {
        let duration = clamp_secs(self.quiz.time_duration);
        // A duration the server could not express still leaves the countdown usable.
        let duration = duration.max(clamp_secs(self.quiz.remaining_time));
        let quiz = Quiz::new(
            QuizId::new(self.quiz.id),
            self.quiz.name,
            duration,
            clamp_secs(self.quiz.remaining_time),
        )
        .map_err(decode_err)?;

        let questions = self
            .questions
            .into_iter()
            .map(|q| q.into_question().0)
            .collect::<Vec<_>>();
        quiz.check_questions(&questions).map_err(decode_err)?;

        if let Some(total) = self.total_questions {
            if total != questions.len() {
                tracing::debug!(
                    quiz_id = %quiz.id(),
                    total,
                    received = questions.len(),
                    "total_questions disagrees with the question list"
                );
            }
        }

        let prior_answers = parse_prior_answers(self.quiz_answers.unwrap_or_default());

        Ok(QuizSessionData {
            quiz,
            questions,
            prior_answers,
        })
    }
}

/// Options arrive as numbers or numeric strings depending on where the server read them.
fn option_value(value: &Value) -> Option<u8> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<u8>().ok(),
        _ => None,
    }
}

/// Resume data is whatever the server session kept; skip entries that are not
/// a numeric question id mapped to a numeric option.
fn parse_prior_answers(raw: BTreeMap<String, Value>) -> AnswerMap {
    let mut answers = AnswerMap::new();
    for (key, value) in raw {
        let Ok(question) = key.parse::<QuestionId>() else {
            tracing::warn!(key = %key, "skipping prior answer with a non-numeric key");
            continue;
        };
        match option_value(&value) {
            Some(choice) => answers.set(question, OptionChoice::new(choice)),
            None => tracing::warn!(%question, %value, "skipping prior answer with a non-numeric option"),
        }
    }
    answers
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest<'a> {
    pub quiz_id: QuizId,
    pub answers: &'a AnswerMap,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitBody {
    #[serde(default)]
    message: Option<String>,
}

impl From<SubmitBody> for SubmitReceipt {
    fn from(body: SubmitBody) -> Self {
        Self {
            message: body
                .message
                .unwrap_or_else(|| "Quiz submitted successfully!".to_string()),
        }
    }
}

//
// ─── TASKS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct TicketBody {
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl TicketBody {
    pub(crate) fn into_ticket(self) -> Option<TaskTicket> {
        let task_id = self.task_id.filter(|id| !id.trim().is_empty())?;
        Some(TaskTicket {
            task_id: TaskId::new(task_id),
            message: self.message,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    status: TaskStatus,
    #[serde(default)]
    result: Option<Value>,
}

impl From<StatusBody> for TaskStatusReport {
    fn from(body: StatusBody) -> Self {
        Self {
            status: body.status,
            result: body.result.filter(|value| !value.is_null()),
        }
    }
}

//
// ─── CATALOGUE ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogBody {
    #[serde(default)]
    quizzes: Vec<ListingBody>,
}

#[derive(Debug, Deserialize)]
struct ListingBody {
    id: u64,
    name: String,
    #[serde(default)]
    date_of_quiz: Option<String>,
    #[serde(default)]
    chapter_name: Option<String>,
    #[serde(default)]
    subject_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

impl ListingBody {
    fn into_listing(self) -> QuizListing {
        QuizListing {
            id: QuizId::new(self.id),
            name: self.name,
            date_label: self.date_of_quiz.unwrap_or_else(|| "No date".to_string()),
            chapter: or_unknown(self.chapter_name),
            subject: or_unknown(self.subject_name),
            description: self.description.filter(|d| !d.trim().is_empty()),
        }
    }
}

impl CatalogBody {
    pub(crate) fn into_listings(self) -> Vec<QuizListing> {
        self.quizzes
            .into_iter()
            .map(ListingBody::into_listing)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChapterQuizzesBody {
    #[serde(default)]
    quizzes: Vec<ListingBody>,
    #[serde(default)]
    chapters: Vec<ChapterBody>,
    #[serde(default)]
    selected_chapter: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChapterBody {
    id: u64,
    name: String,
}

impl ChapterQuizzesBody {
    /// Quizzes listed per chapter omit their chapter name; the selection supplies it.
    pub(crate) fn into_chapter_quizzes(self, requested: &ChapterFilter) -> ChapterQuizzes {
        let selected = self
            .selected_chapter
            .as_ref()
            .and_then(|chapter| chapter.get("name"))
            .and_then(Value::as_str)
            .map_or_else(|| requested.clone(), ChapterFilter::parse);
        let quizzes = self
            .quizzes
            .into_iter()
            .map(|mut item| {
                if let ChapterFilter::Chapter(name) = &selected {
                    item.chapter_name.get_or_insert_with(|| name.clone());
                }
                item.into_listing()
            })
            .collect();
        ChapterQuizzes {
            chapters: self
                .chapters
                .into_iter()
                .map(|c| ChapterSummary {
                    id: c.id,
                    name: c.name,
                })
                .collect(),
            selected,
            quizzes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoresBody {
    #[serde(default)]
    user_scores: Vec<ScoreBody>,
}

#[derive(Debug, Deserialize)]
struct ScoreBody {
    quiz_name: String,
    #[serde(default)]
    correct: u32,
    #[serde(default)]
    attempted: u32,
    #[serde(default)]
    percentage: f64,
    #[serde(default)]
    time: String,
}

impl ScoresBody {
    pub(crate) fn into_records(self) -> Vec<ScoreRecord> {
        self.user_scores
            .into_iter()
            .map(|s| ScoreRecord {
                quiz_name: s.quiz_name,
                correct: s.correct,
                attempted: s.attempted,
                percentage: s.percentage,
                attempted_at: s.time,
            })
            .collect()
    }
}

//
// ─── ATTEMPT REVIEW ───────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsBody {
    #[serde(default)]
    questions: Vec<QuestionBody>,
    #[serde(default)]
    user_answers: Option<BTreeMap<String, Value>>,
}

impl DetailsBody {
    pub(crate) fn into_review(self, quiz_name: &str) -> AttemptReview {
        let answers = parse_prior_answers(self.user_answers.unwrap_or_default());
        let questions = self
            .questions
            .into_iter()
            .map(QuestionBody::into_question)
            .collect();
        AttemptReview::from_answers(quiz_name, questions, &answers)
    }
}

//
// ─── SEARCH ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct SearchBody {
    #[serde(default)]
    results: SearchHitsBody,
    #[serde(default)]
    total_results: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchHitsBody {
    #[serde(default)]
    subjects: Vec<SubjectHitBody>,
    #[serde(default)]
    chapters: Vec<ChapterHitBody>,
    #[serde(default)]
    quizzes: Vec<QuizHitBody>,
}

#[derive(Debug, Deserialize)]
struct SubjectHitBody {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChapterHitBody {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    subject_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct QuizHitBody {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date_of_quiz: Option<String>,
}

impl SearchBody {
    pub(crate) fn into_results(self, query: &str) -> SearchResults {
        let hits = self.results;
        let results = SearchResults {
            query: query.to_string(),
            subjects: hits
                .subjects
                .into_iter()
                .map(|s| SubjectHit {
                    id: s.id,
                    name: s.name,
                    description: s.description.unwrap_or_default(),
                })
                .collect(),
            chapters: hits
                .chapters
                .into_iter()
                .map(|c| ChapterHit {
                    id: c.id,
                    name: c.name,
                    description: c.description.unwrap_or_default(),
                    subject_id: c.subject_id,
                })
                .collect(),
            quizzes: hits
                .quizzes
                .into_iter()
                .map(|q| QuizHit {
                    id: QuizId::new(q.id),
                    name: q.name,
                    description: q.description.unwrap_or_default(),
                    date: q.date_of_quiz.filter(|d| !d.trim().is_empty()),
                })
                .collect(),
        };
        if let Some(total) = self.total_results {
            if total != results.total() {
                tracing::debug!(
                    total,
                    received = results.total(),
                    "total_results disagrees with the hits"
                );
            }
        }
        results
    }
}

//
// ─── NOTIFICATION SETTINGS ────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsBody {
    #[serde(default)]
    settings: Option<NotificationSettings>,
}

impl SettingsBody {
    pub(crate) fn into_settings(self) -> NotificationSettings {
        self.settings.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SavedBody {
    #[serde(default)]
    message: Option<String>,
}

impl SavedBody {
    pub(crate) fn into_message(self) -> String {
        self.message
            .unwrap_or_else(|| "Settings saved successfully!".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Verdict;
    use serde_json::json;

    #[test]
    fn session_body_maps_quiz_questions_and_resume_answers() {
        let body = json!({
            "success": true,
            "quiz": { "id": 7, "name": "Rust basics", "time_duration": 600, "remaining_time": 420 },
            "questions": [
                { "id": 1, "question": "Q1", "option1": "a", "option2": "b", "option3": "c", "option4": "d" },
                { "id": 2, "question": "Q2", "option1": "a", "option2": null, "option3": "c", "option4": "d" }
            ],
            "total_questions": 2,
            "quiz_answers": { "1": 3, "2": "4", "x": 1, "9": "none" }
        });

        let data = decode::<SessionBody>(body)
            .unwrap()
            .into_session_data()
            .unwrap();

        assert_eq!(data.quiz.id(), QuizId::new(7));
        assert_eq!(data.quiz.remaining_secs(), 420);
        assert_eq!(data.questions.len(), 2);
        assert_eq!(data.questions[1].options()[1], "");
        assert_eq!(data.prior_answers.len(), 2);
        assert_eq!(
            data.prior_answers.get(QuestionId::new(1)),
            Some(OptionChoice::new(3))
        );
        assert_eq!(
            data.prior_answers.get(QuestionId::new(2)),
            Some(OptionChoice::new(4))
        );
    }

    #[test]
    fn negative_remaining_time_clamps_to_zero() {
        let body = json!({
            "quiz": { "id": 1, "name": "Q", "time_duration": 60, "remaining_time": -5 },
            "questions": []
        });
        let data = decode::<SessionBody>(body)
            .unwrap()
            .into_session_data()
            .unwrap();
        assert_eq!(data.quiz.remaining_secs(), 0);
        assert!(data.prior_answers.is_empty());
    }

    #[test]
    fn duplicate_question_ids_fail_to_decode() {
        let body = json!({
            "quiz": { "id": 1, "name": "Q", "time_duration": 60, "remaining_time": 60 },
            "questions": [ { "id": 4, "question": "a" }, { "id": 4, "question": "b" } ]
        });
        let err = decode::<SessionBody>(body)
            .unwrap()
            .into_session_data()
            .unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn envelope_failure_surfaces_message_verbatim() {
        let err = check_envelope(404, json!({ "success": false, "message": "Quiz not found" }))
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Server {
                status: Some(404),
                message: "Quiz not found".to_string()
            }
        );
        assert_eq!(err.to_string(), "Quiz not found");
    }

    #[test]
    fn submit_request_serializes_answer_map() {
        let answers: AnswerMap = [(QuestionId::new(1), OptionChoice::new(3))]
            .into_iter()
            .collect();
        let request = SubmitRequest {
            quiz_id: QuizId::new(7),
            answers: &answers,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "quiz_id": 7, "answers": { "1": 3 } })
        );
    }

    #[test]
    fn ticket_without_task_id_is_none() {
        let body: TicketBody = decode(json!({ "success": true, "message": "ok" })).unwrap();
        assert!(body.into_ticket().is_none());
    }

    #[test]
    fn submit_body_keeps_only_the_message() {
        let body: SubmitBody = decode(json!({
            "success": true,
            "message": "Quiz submitted successfully!",
            "redirect": "/user/scores"
        }))
        .unwrap();
        let receipt = SubmitReceipt::from(body);
        assert_eq!(receipt.message, "Quiz submitted successfully!");

        let body: SubmitBody = decode(json!({ "success": true })).unwrap();
        assert_eq!(SubmitReceipt::from(body).message, "Quiz submitted successfully!");
    }

    #[test]
    fn details_body_pairs_correct_options_with_user_answers() {
        let body: DetailsBody = decode(json!({
            "success": true,
            "questions": [
                { "id": 1, "question": "Q1", "option1": "a", "option2": "b", "option3": "c", "option4": "d", "correct_option": 2 },
                { "id": 2, "question": "Q2", "option1": "a", "option2": "b", "option3": "c", "option4": "d", "correct_option": "3" },
                { "id": 3, "question": "Q3", "option1": "a", "option2": "b", "option3": "c", "option4": "d", "correct_option": 1 }
            ],
            "user_answers": { "1": 2, "2": "4" }
        }))
        .unwrap();

        let review = body.into_review("Rust basics");

        assert_eq!(review.quiz_name(), "Rust basics");
        let verdicts: Vec<_> = review.questions().iter().map(|q| q.verdict()).collect();
        assert_eq!(
            verdicts,
            [Verdict::Correct, Verdict::Wrong, Verdict::Unanswered]
        );
        assert_eq!(review.questions()[1].correct(), Some(OptionChoice::new(3)));
    }

    #[test]
    fn chapter_listing_takes_the_selected_chapter_name() {
        let body: ChapterQuizzesBody = decode(json!({
            "success": true,
            "quizzes": [ { "id": 4, "name": "Borrowing", "date_of_quiz": "2025-01-05", "description": "" } ],
            "chapters": [ { "id": 1, "name": "Ownership" }, { "id": 2, "name": "Traits" } ],
            "selected_chapter": { "id": 1, "name": "Ownership" }
        }))
        .unwrap();

        let listing = body.into_chapter_quizzes(&ChapterFilter::parse("Ownership"));

        assert_eq!(listing.selected, ChapterFilter::Chapter("Ownership".into()));
        assert_eq!(listing.chapters.len(), 2);
        assert_eq!(listing.quizzes[0].chapter, "Ownership");
        assert_eq!(listing.quizzes[0].description, None);
    }

    #[test]
    fn empty_selection_keeps_the_requested_filter() {
        let body: ChapterQuizzesBody =
            decode(json!({ "success": true, "quizzes": [], "selected_chapter": {} })).unwrap();
        let listing = body.into_chapter_quizzes(&ChapterFilter::All);
        assert!(listing.selected.is_all());
        assert!(listing.quizzes.is_empty());
    }

    #[test]
    fn search_body_maps_every_hit_kind() {
        let body: SearchBody = decode(json!({
            "success": true,
            "query": "own",
            "results": {
                "subjects": [ { "id": 1, "name": "Rust", "description": "Systems" } ],
                "chapters": [ { "id": 2, "name": "Ownership", "description": null, "subject_id": 1 } ],
                "quizzes": [ { "id": 3, "name": "Ownership quiz", "description": "", "date_of_quiz": null } ]
            },
            "total_results": 3
        }))
        .unwrap();

        let results = body.into_results("own");

        assert_eq!(results.total(), 3);
        assert_eq!(results.chapters[0].subject_id, Some(1));
        assert_eq!(results.chapters[0].description, "");
        assert_eq!(results.quizzes[0].id, QuizId::new(3));
        assert_eq!(results.quizzes[0].date, None);
    }

    #[test]
    fn settings_body_falls_back_to_defaults() {
        let body: SettingsBody = decode(json!({ "success": true })).unwrap();
        assert_eq!(body.into_settings(), NotificationSettings::default());

        let body: SettingsBody = decode(json!({
            "success": true,
            "settings": { "dailyRem": false, "reminderTime": "09:00", "emailNoti": true, "weeklyReport": true }
        }))
        .unwrap();
        let settings = body.into_settings();
        assert!(!settings.daily_reminder);
        assert!(settings.weekly_report);
        assert_eq!(settings.reminder_time.label(), "9:00 AM");
    }

    #[test]
    fn status_body_drops_null_result() {
        let body: StatusBody =
            decode(json!({ "success": true, "status": "PENDING", "result": null })).unwrap();
        let report = TaskStatusReport::from(body);
        assert_eq!(report, TaskStatusReport::pending());
    }
}
