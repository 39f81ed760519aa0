use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gateway::TaskGateway;
use quiz_core::model::{ExportResult, ReportFormat, TaskId, TaskKind, TaskRecord, TaskStatus};
use serde_json::Value;
use tokio::sync::watch;

use super::download::{local_file_name, save_export};
use super::poller::{PollHandle, PollOutcome, PollSettings, TaskPoller};
use crate::Clock;
use crate::error::TaskError;

/// How a followed task ended, phrased for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskNotice {
    ExportSaved {
        path: PathBuf,
        records_exported: Option<u64>,
        email_sent: bool,
    },
    /// The export finished but named no file to fetch.
    ExportCompleted,
    ExportDownloadFailed {
        message: String,
    },
    ReportDelivered,
    StillRunning,
    Failed {
        message: String,
    },
    Cancelled,
}

impl TaskNotice {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::ExportSaved {
                path,
                records_exported,
                email_sent,
            } => {
                let records = records_exported.map_or_else(|| "N/A".to_string(), |n| n.to_string());
                let email = if *email_sent { "Yes" } else { "No" };
                format!(
                    "CSV export completed. Records exported: {records}. Saved to {}. Email sent: {email}.",
                    path.display()
                )
            }
            Self::ExportCompleted => {
                "CSV export completed. Check your email for the download link.".to_string()
            }
            Self::ExportDownloadFailed { message } => format!(
                "CSV export completed but the download failed: {message}. Please check your email for the download link."
            ),
            Self::ReportDelivered => {
                "Monthly report has been sent to your email successfully!".to_string()
            }
            Self::StillRunning => {
                "Task is taking longer than expected. You will be notified via email when complete."
                    .to_string()
            }
            Self::Failed { message } => format!("Task failed: {message}"),
            Self::Cancelled => "Stopped following the task.".to_string(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::ExportDownloadFailed { .. })
    }
}

/// Outcome of the most recent CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportStatus {
    pub succeeded: bool,
    pub finished_at: DateTime<Utc>,
}

/// Removes a followed task from the active list when it goes out of scope.
struct Tracked<'a> {
    service: &'a TaskService,
    task_id: &'a TaskId,
}

impl Drop for Tracked<'_> {
    fn drop(&mut self) {
        self.service.untrack(self.task_id);
    }
}

/// Kicks off exports and reports, tracks them while they run, and settles them.
#[derive(Clone)]
pub struct TaskService {
    gateway: Arc<dyn TaskGateway>,
    settings: PollSettings,
    download_dir: PathBuf,
    clock: Clock,
    active: Arc<watch::Sender<Vec<TaskRecord>>>,
    last_export: Arc<watch::Sender<Option<ExportStatus>>>,
}

impl TaskService {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn TaskGateway>,
        settings: PollSettings,
        download_dir: impl Into<PathBuf>,
        clock: Clock,
    ) -> Self {
        Self {
            gateway,
            settings,
            download_dir: download_dir.into(),
            clock,
            active: Arc::new(watch::Sender::new(Vec::new())),
            last_export: Arc::new(watch::Sender::new(None)),
        }
    }

    #[must_use]
    pub fn active_tasks(&self) -> Vec<TaskRecord> {
        self.active.borrow().clone()
    }

    #[must_use]
    pub fn subscribe_active(&self) -> watch::Receiver<Vec<TaskRecord>> {
        self.active.subscribe()
    }

    #[must_use]
    pub fn last_export(&self) -> Option<ExportStatus> {
        *self.last_export.borrow()
    }

    fn track(&self, record: &TaskRecord) {
        self.active
            .send_modify(|tasks| tasks.push(record.clone()));
    }

    fn untrack(&self, task_id: &TaskId) {
        self.active.send_if_modified(|tasks| {
            let before = tasks.len();
            tasks.retain(|task| task.id() != task_id);
            tasks.len() != before
        });
    }

    fn set_status(&self, task_id: &TaskId, status: TaskStatus) {
        self.active.send_if_modified(|tasks| {
            match tasks.iter_mut().find(|task| task.id() == task_id) {
                Some(task) if task.status() != status => {
                    task.set_status(status);
                    true
                }
                _ => false,
            }
        });
    }

    fn record_export(&self, succeeded: bool) {
        self.last_export.send_replace(Some(ExportStatus {
            succeeded,
            finished_at: self.clock.now(),
        }));
    }

    /// Queue a CSV export and start tracking it.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::Gateway` if the server does not accept the request.
    pub async fn start_export(&self) -> Result<TaskRecord, TaskError> {
        let ticket = self.gateway.start_export().await?;
        let record = TaskRecord::pending(ticket.task_id, TaskKind::CsvExport, self.clock.now());
        self.track(&record);
        Ok(record)
    }

    /// Ask for a monthly report. `None` when the server only acknowledged the
    /// request; the report then arrives by email without a task to follow.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::Gateway` if the server does not accept the request.
    pub async fn request_monthly_report(
        &self,
        format: ReportFormat,
    ) -> Result<Option<TaskRecord>, TaskError> {
        let Some(ticket) = self.gateway.request_monthly_report(format).await? else {
            return Ok(None);
        };
        let record =
            TaskRecord::pending(ticket.task_id, TaskKind::MonthlyReport, self.clock.now());
        self.track(&record);
        Ok(Some(record))
    }

    /// Begin polling a tracked task.
    #[must_use]
    pub fn poll(&self, record: &TaskRecord) -> PollHandle {
        TaskPoller::start(Arc::clone(&self.gateway), record.id().clone(), self.settings)
    }

    /// Poll `record` to the end and settle it. The record leaves the active
    /// list however this ends, including when the future is dropped.
    pub async fn follow(&self, record: &TaskRecord) -> TaskNotice {
        let _tracked = Tracked {
            service: self,
            task_id: record.id(),
        };
        let handle = self.poll(record);
        let mut status = handle.status();
        let outcome = handle.outcome();
        tokio::pin!(outcome);
        let mut watching = true;
        let outcome = loop {
            tokio::select! {
                outcome = &mut outcome => break outcome,
                changed = status.changed(), if watching => {
                    if changed.is_ok() {
                        let latest = *status.borrow_and_update();
                        self.set_status(record.id(), latest);
                    } else {
                        watching = false;
                    }
                }
            }
        };
        self.settle(record, outcome).await
    }

    /// Turn a poll outcome into a notice: exports are downloaded, reports just
    /// acknowledged. Every outcome drops the task from the active list since
    /// nothing polls it afterwards.
    pub async fn settle(&self, record: &TaskRecord, outcome: PollOutcome) -> TaskNotice {
        self.untrack(record.id());
        match outcome {
            PollOutcome::Succeeded(result) => match record.kind() {
                TaskKind::CsvExport => {
                    self.record_export(true);
                    self.finish_export(record.id(), result).await
                }
                TaskKind::MonthlyReport => {
                    tracing::info!(task_id = %record.id(), "monthly report delivered");
                    TaskNotice::ReportDelivered
                }
            },
            PollOutcome::Failed(message) => {
                tracing::warn!(task_id = %record.id(), kind = record.kind().label(), %message, "task failed");
                if record.kind() == TaskKind::CsvExport {
                    self.record_export(false);
                }
                TaskNotice::Failed { message }
            }
            PollOutcome::StillRunning { .. } => {
                tracing::info!(task_id = %record.id(), "stopped polling at the attempt bound");
                TaskNotice::StillRunning
            }
            PollOutcome::Cancelled => TaskNotice::Cancelled,
        }
    }

    async fn finish_export(&self, task_id: &TaskId, result: Option<Value>) -> TaskNotice {
        let export = result
            .and_then(|value| serde_json::from_value::<ExportResult>(value).ok())
            .unwrap_or_default();
        let Some(name) = export.download_name() else {
            tracing::info!(%task_id, "export finished without a file name");
            return TaskNotice::ExportCompleted;
        };
        match self.download(name).await {
            Ok(path) => {
                tracing::info!(%task_id, path = %path.display(), "export saved");
                TaskNotice::ExportSaved {
                    path,
                    records_exported: export.records_exported,
                    email_sent: export.email_sent,
                }
            }
            Err(err) => {
                tracing::warn!(%task_id, error = %err, "export download failed");
                TaskNotice::ExportDownloadFailed {
                    message: err.user_message(),
                }
            }
        }
    }

    /// Fetch a server export into the download directory.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::InvalidFilename` for names that would leave the
    /// download directory, otherwise gateway or I/O failures.
    pub async fn download(&self, server_name: &str) -> Result<PathBuf, TaskError> {
        let local = local_file_name(server_name)?;
        let bytes = self.gateway.download_export(server_name).await?;
        save_export(&self.download_dir, local, &bytes).await
    }
}
