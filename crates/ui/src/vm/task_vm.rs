use quiz_core::model::TaskRecord;
use services::{ExportStatus, TaskNotice};

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRowVm {
    pub kind: &'static str,
    pub short_id: String,
    pub status: &'static str,
    pub started_at: String,
}

#[must_use]
pub fn map_task_rows(records: &[TaskRecord]) -> Vec<TaskRowVm> {
    records
        .iter()
        .map(|record| TaskRowVm {
            kind: record.kind().label(),
            short_id: record.id().short().to_string(),
            status: record.status().label(),
            started_at: format_datetime(record.created_at()),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeVm {
    pub text: String,
    pub is_error: bool,
}

impl From<&TaskNotice> for NoticeVm {
    fn from(notice: &TaskNotice) -> Self {
        Self {
            text: notice.message(),
            is_error: notice.is_error(),
        }
    }
}

#[must_use]
pub fn last_export_label(status: Option<ExportStatus>) -> String {
    match status {
        None => "No export yet this session.".to_string(),
        Some(status) => format!(
            "Last export {} at {}",
            if status.succeeded { "succeeded" } else { "failed" },
            format_datetime(status.finished_at)
        ),
    }
}
