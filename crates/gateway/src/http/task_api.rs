use async_trait::async_trait;
use quiz_core::model::{ReportFormat, TaskId};

use super::HttpGateway;
use super::mapping::{StatusBody, TicketBody, decode, read_json};
use crate::api::{GatewayError, TaskGateway, TaskStatusReport, TaskTicket};

#[async_trait]
impl TaskGateway for HttpGateway {
    async fn start_export(&self) -> Result<TaskTicket, GatewayError> {
        let url = self.endpoint("user/export_quiz_data")?;
        let response = self.client.post(url).send().await?;
        let body = read_json(response).await?;
        let ticket = decode::<TicketBody>(body)?
            .into_ticket()
            .ok_or_else(|| GatewayError::Decode("export started without a task id".into()))?;
        tracing::info!(task_id = %ticket.task_id, "export queued");
        Ok(ticket)
    }

    async fn request_monthly_report(
        &self,
        format: ReportFormat,
    ) -> Result<Option<TaskTicket>, GatewayError> {
        let mut url = self.endpoint("user/request_monthly_report")?;
        url.query_pairs_mut().append_pair("format", format.as_str());
        let response = self.client.get(url).send().await?;
        let body = read_json(response).await?;
        let ticket = decode::<TicketBody>(body)?.into_ticket();
        match &ticket {
            Some(ticket) => tracing::info!(task_id = %ticket.task_id, "report queued"),
            None => tracing::info!("report accepted without a task id"),
        }
        Ok(ticket)
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatusReport, GatewayError> {
        let url = self.endpoint_with_segment("user/task_status/", task_id.as_str())?;
        let response = self.client.get(url).send().await?;
        let body = read_json(response).await?;
        let report: TaskStatusReport = decode::<StatusBody>(body)?.into();
        tracing::debug!(%task_id, status = report.status.label(), "task status");
        Ok(report)
    }

    async fn download_export(&self, filename: &str) -> Result<Vec<u8>, GatewayError> {
        let url = self.endpoint_with_segment("user/download_export/", filename)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            // Error bodies are JSON envelopes; read_json lifts their message.
            read_json(response).await?;
            return Err(GatewayError::server("download failed"));
        }
        let bytes = response.bytes().await?;
        tracing::debug!(filename, size = bytes.len(), "export downloaded");
        Ok(bytes.to_vec())
    }
}
