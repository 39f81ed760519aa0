use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::TaskId;

//
// ─── TASK STATUS ──────────────────────────────────────────────────────────────
//

/// Status of a background task as reported by the worker queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Pending,
    Started,
    Retry,
    Success,
    Failure,
    Revoked,
    /// Any status string this client does not know. Treated as still running.
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure | Self::Revoked)
    }

    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failure | Self::Revoked)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Started => "STARTED",
            Self::Retry => "RETRY",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Revoked => "REVOKED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

//
// ─── TASK KIND ────────────────────────────────────────────────────────────────
//

/// What a background task produces; decides what happens on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// CSV export of the user's attempts, downloaded when ready.
    CsvExport,
    /// Monthly report, delivered out of band by email.
    MonthlyReport,
}

impl TaskKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CsvExport => "CSV Export",
            Self::MonthlyReport => "Monthly Report",
        }
    }
}

/// Output format of a monthly report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Pdf,
}

impl ReportFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }
}

//
// ─── TASK RECORD ──────────────────────────────────────────────────────────────
//

/// A task the client has kicked off and is tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    id: TaskId,
    kind: TaskKind,
    status: TaskStatus,
    created_at: DateTime<Utc>,
}

impl TaskRecord {
    #[must_use]
    pub fn pending(id: TaskId, kind: TaskKind, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind,
            status: TaskStatus::Pending,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    #[must_use]
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }
}

/// Result payload of a finished CSV export.
///
/// Older workers reported the file under `file` instead of `filename`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResult {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub records_exported: Option<u64>,
    #[serde(default)]
    pub email_sent: bool,
}

impl ExportResult {
    /// Server-side name of the file to download, if any.
    #[must_use]
    pub fn download_name(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .or(self.file.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}
