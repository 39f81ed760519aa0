use std::sync::Arc;
use std::time::Duration;

use gateway::TaskGateway;
use quiz_core::model::{TaskId, TaskStatus};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Fixed-interval polling with a hard attempt bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Succeeded(Option<Value>),
    Failed(String),
    /// The attempt bound was reached while the task was still going. Not a failure.
    StillRunning { attempts: u32 },
    Cancelled,
}

fn failure_message(status: TaskStatus, result: Option<&Value>) -> String {
    match result {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::Object(map)) => map
            .get("error")
            .or_else(|| map.get("message"))
            .and_then(Value::as_str)
            .map_or_else(|| "task failed".to_string(), ToString::to_string),
        _ if status == TaskStatus::Revoked => "task was revoked".to_string(),
        _ => "task failed".to_string(),
    }
}

/// Starts polling loops for background tasks.
pub struct TaskPoller;

impl TaskPoller {
    /// Poll `task_id` every `settings.interval`, first after one interval, until
    /// it finishes or `settings.max_attempts` polls were made. A transport error
    /// uses up an attempt and polling goes on.
    #[must_use]
    pub fn start(
        gateway: Arc<dyn TaskGateway>,
        task_id: TaskId,
        settings: PollSettings,
    ) -> PollHandle {
        let (status_tx, status_rx) = watch::channel(TaskStatus::Pending);
        let max_attempts = settings.max_attempts.max(1);
        let interval = settings.interval.max(Duration::from_millis(1));
        let task = tokio::spawn(async move {
            tracing::debug!(%task_id, max_attempts, "polling task");
            let mut ticks = time::interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for attempt in 1..=max_attempts {
                ticks.tick().await;
                match gateway.task_status(&task_id).await {
                    Ok(report) => {
                        tracing::debug!(%task_id, attempt, status = report.status.label(), "poll");
                        status_tx.send_replace(report.status);
                        if report.status == TaskStatus::Success {
                            return PollOutcome::Succeeded(report.result);
                        }
                        if report.status.is_failure() {
                            return PollOutcome::Failed(failure_message(
                                report.status,
                                report.result.as_ref(),
                            ));
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%task_id, attempt, error = %err, "poll failed");
                    }
                }
            }

            tracing::warn!(%task_id, attempts = max_attempts, "task still running after last poll");
            PollOutcome::StillRunning {
                attempts: max_attempts,
            }
        });

        PollHandle {
            task: Some(task),
            status: status_rx,
        }
    }
}

/// Owned polling loop. Dropping it cancels polling.
#[derive(Debug)]
pub struct PollHandle {
    task: Option<JoinHandle<PollOutcome>>,
    status: watch::Receiver<TaskStatus>,
}

impl PollHandle {
    /// Latest status seen by the loop.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<TaskStatus> {
        self.status.clone()
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.as_ref() {
            task.abort();
        }
    }

    /// Wait for the loop to end. Dropping the returned future before it
    /// resolves still cancels polling.
    pub async fn outcome(mut self) -> PollOutcome {
        let Some(task) = self.task.as_mut() else {
            return PollOutcome::Cancelled;
        };
        let joined = task.await;
        self.task = None;
        match joined {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => PollOutcome::Cancelled,
            Err(err) => PollOutcome::Failed(err.to_string()),
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_prefers_worker_text() {
        assert_eq!(
            failure_message(TaskStatus::Failure, Some(&Value::String("disk full".into()))),
            "disk full"
        );
        assert_eq!(
            failure_message(
                TaskStatus::Failure,
                Some(&serde_json::json!({ "error": "no attempts" }))
            ),
            "no attempts"
        );
        assert_eq!(failure_message(TaskStatus::Revoked, None), "task was revoked");
    }
}
