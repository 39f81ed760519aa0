use std::sync::Arc;

use dioxus::prelude::*;
use quiz_core::model::{ReportFormat, TaskRecord};
use services::TaskService;

use crate::context::AppContext;
use crate::views::{NotificationSettingsPanel, ViewError};
use crate::vm::{NoticeVm, TaskRowVm, last_export_label, map_task_rows};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaskRequest {
    Export,
    Report(ReportFormat),
}

fn started_notice(record: &TaskRecord) -> NoticeVm {
    NoticeVm {
        text: format!(
            "{} started (task {}).",
            record.kind().label(),
            record.id().short()
        ),
        is_error: false,
    }
}

async fn kick_off(tasks: &TaskService, request: TaskRequest) -> Result<Option<TaskRecord>, ViewError> {
    match request {
        TaskRequest::Export => Ok(Some(tasks.start_export().await?)),
        TaskRequest::Report(format) => Ok(tasks.request_monthly_report(format).await?),
    }
}

#[component]
pub fn ExportsView() -> Element {
    let ctx = use_context::<AppContext>();
    let tasks = ctx.tasks();

    let mut rows = use_signal(|| map_task_rows(&tasks.active_tasks()));
    let notices = use_signal(Vec::<NoticeVm>::new);
    let last_export = use_signal(|| last_export_label(tasks.last_export()));

    {
        let tasks = Arc::clone(&tasks);
        use_future(move || {
            let mut updates = tasks.subscribe_active();
            async move {
                while updates.changed().await.is_ok() {
                    let snapshot = map_task_rows(&updates.borrow_and_update());
                    rows.set(snapshot);
                }
            }
        });
    }

    let on_request = use_callback(move |request: TaskRequest| {
        let tasks = Arc::clone(&tasks);
        let mut notices = notices;
        let mut last_export = last_export;
        spawn(async move {
            let record = match kick_off(&tasks, request).await {
                Ok(Some(record)) => record,
                Ok(None) => {
                    notices.write().push(NoticeVm {
                        text: "Monthly report requested. It will be sent to your email.".into(),
                        is_error: false,
                    });
                    return;
                }
                Err(err) => {
                    tracing::warn!(?request, error = err.message(), "task request failed");
                    notices.write().push(NoticeVm {
                        text: err.message().to_string(),
                        is_error: true,
                    });
                    return;
                }
            };
            notices.write().push(started_notice(&record));
            let notice = tasks.follow(&record).await;
            notices.write().push(NoticeVm::from(&notice));
            last_export.set(last_export_label(tasks.last_export()));
        });
    });

    let rows_now = rows();
    let last_export_now = last_export();
    let notices_now: Vec<(&'static str, String)> = notices
        .read()
        .iter()
        .map(|notice| {
            let class = if notice.is_error {
                "notice notice--error"
            } else {
                "notice"
            };
            (class, notice.text.clone())
        })
        .collect();

    rsx! {
        div { class: "page",
            h2 { "Exports & Reports" }

            NotificationSettingsPanel {}

            div { class: "task-actions",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_request.call(TaskRequest::Export),
                    "Export Quiz Data (CSV)"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_request.call(TaskRequest::Report(ReportFormat::Html)),
                    "Monthly Report (HTML)"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_request.call(TaskRequest::Report(ReportFormat::Pdf)),
                    "Monthly Report (PDF)"
                }
            }

            p { class: "task-last-export", "{last_export_now}" }

            for (index, (class, text)) in notices_now.into_iter().enumerate() {
                p { key: "{index}", class: "{class}", "{text}" }
            }

            h3 { "Active tasks" }
            if rows_now.is_empty() {
                p { "No tasks running." }
            } else {
                table { class: "tasks",
                    thead {
                        tr {
                            th { "Task" }
                            th { "ID" }
                            th { "Status" }
                            th { "Started" }
                        }
                    }
                    tbody {
                        for row in rows_now {
                            TaskRow { key: "{row.short_id}", row }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TaskRow(row: TaskRowVm) -> Element {
    rsx! {
        tr {
            td { "{row.kind}" }
            td { "{row.short_id}" }
            td { "{row.status}" }
            td { "{row.started_at}" }
        }
    }
}
