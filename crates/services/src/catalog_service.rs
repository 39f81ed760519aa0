use std::sync::Arc;

use gateway::CatalogGateway;
use quiz_core::model::{
    AttemptReview, ChapterFilter, ChapterQuizzes, QuizListing, ScoreRecord, SearchResults,
};

use crate::error::CatalogError;

/// Read-only access to the quiz catalogue and the user's score history.
#[derive(Clone)]
pub struct CatalogService {
    gateway: Arc<dyn CatalogGateway>,
}

impl CatalogService {
    #[must_use]
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self { gateway }
    }

    /// # Errors
    ///
    /// Returns `CatalogError` if the catalogue cannot be fetched.
    pub async fn list_quizzes(&self) -> Result<Vec<QuizListing>, CatalogError> {
        Ok(self.gateway.list_quizzes().await?)
    }

    /// Past attempts, newest first as the server sends them.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the history cannot be fetched.
    pub async fn scores(&self) -> Result<Vec<ScoreRecord>, CatalogError> {
        Ok(self.gateway.quiz_scores().await?)
    }

    /// Question-by-question review of the latest attempt at `quiz_name`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingQuizName` for a blank name, otherwise
    /// gateway failures such as a quiz with no recorded attempt.
    pub async fn attempt_review(&self, quiz_name: &str) -> Result<AttemptReview, CatalogError> {
        let quiz_name = quiz_name.trim();
        if quiz_name.is_empty() {
            return Err(CatalogError::MissingQuizName);
        }
        Ok(self.gateway.quiz_details(quiz_name).await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError` if the chapter listing cannot be fetched.
    pub async fn chapter_quizzes(
        &self,
        filter: &ChapterFilter,
    ) -> Result<ChapterQuizzes, CatalogError> {
        Ok(self.gateway.chapter_quizzes(filter).await?)
    }

    /// Search subjects, chapters and quizzes. A blank query matches nothing and
    /// never reaches the server.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the search request fails.
    pub async fn search(&self, query: &str) -> Result<SearchResults, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::empty(query));
        }
        Ok(self.gateway.search(query).await?)
    }
}
