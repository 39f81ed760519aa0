use async_trait::async_trait;
use quiz_core::model::{AnswerMap, QuizId};

use super::HttpGateway;
use super::mapping::{SessionBody, SubmitBody, SubmitRequest, decode, read_json};
use crate::api::{GatewayError, QuizSessionData, SessionGateway, SubmitReceipt};

#[async_trait]
impl SessionGateway for HttpGateway {
    async fn load_quiz_session(&self, quiz_id: QuizId) -> Result<QuizSessionData, GatewayError> {
        let mut url = self.endpoint("user/take_quiz")?;
        url.query_pairs_mut()
            .append_pair("quiz_id", &quiz_id.to_string());
        tracing::debug!(%quiz_id, "loading quiz session");

        let response = self.client.get(url).send().await?;
        let body = read_json(response).await?;
        decode::<SessionBody>(body)?.into_session_data()
    }

    async fn submit_quiz(
        &self,
        quiz_id: QuizId,
        answers: &AnswerMap,
    ) -> Result<SubmitReceipt, GatewayError> {
        let url = self.endpoint("user/take_quiz")?;
        tracing::debug!(%quiz_id, answered = answers.len(), "submitting quiz");

        let response = self
            .client
            .post(url)
            .json(&SubmitRequest { quiz_id, answers })
            .send()
            .await?;
        let body = read_json(response).await?;
        Ok(decode::<SubmitBody>(body)?.into())
    }
}
