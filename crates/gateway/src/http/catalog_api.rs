use async_trait::async_trait;
use quiz_core::model::{
    AttemptReview, ChapterFilter, ChapterQuizzes, QuizListing, ScoreRecord, SearchResults,
};

use super::HttpGateway;
use super::mapping::{
    CatalogBody, ChapterQuizzesBody, DetailsBody, ScoresBody, SearchBody, decode, read_json,
};
use crate::api::{CatalogGateway, GatewayError};

#[async_trait]
impl CatalogGateway for HttpGateway {
    async fn list_quizzes(&self) -> Result<Vec<QuizListing>, GatewayError> {
        let url = self.endpoint("user/page")?;
        let response = self.client.get(url).send().await?;
        let body = read_json(response).await?;
        Ok(decode::<CatalogBody>(body)?.into_listings())
    }

    async fn quiz_scores(&self) -> Result<Vec<ScoreRecord>, GatewayError> {
        let url = self.endpoint("user/quiz_scores")?;
        let response = self.client.get(url).send().await?;
        let body = read_json(response).await?;
        Ok(decode::<ScoresBody>(body)?.into_records())
    }

    async fn quiz_details(&self, quiz_name: &str) -> Result<AttemptReview, GatewayError> {
        let mut url = self.endpoint("user/quiz_details")?;
        url.query_pairs_mut().append_pair("quiz_name", quiz_name);
        tracing::debug!(quiz_name, "loading attempt review");

        let response = self.client.get(url).send().await?;
        let body = read_json(response).await?;
        Ok(decode::<DetailsBody>(body)?.into_review(quiz_name))
    }

    async fn chapter_quizzes(
        &self,
        filter: &ChapterFilter,
    ) -> Result<ChapterQuizzes, GatewayError> {
        let mut url = self.endpoint("user/select_quiz")?;
        url.query_pairs_mut()
            .append_pair("chapter_name", filter.as_query());

        let response = self.client.get(url).send().await?;
        let body = read_json(response).await?;
        Ok(decode::<ChapterQuizzesBody>(body)?.into_chapter_quizzes(filter))
    }

    async fn search(&self, query: &str) -> Result<SearchResults, GatewayError> {
        let mut url = self.endpoint("user/page/search")?;
        url.query_pairs_mut().append_pair("q", query);
        tracing::debug!(query, "searching");

        let response = self.client.get(url).send().await?;
        let body = read_json(response).await?;
        Ok(decode::<SearchBody>(body)?.into_results(query))
    }
}
