mod download;
mod poller;
mod service;

pub use crate::error::TaskError;
pub use poller::{PollHandle, PollOutcome, PollSettings, TaskPoller};
pub use service::{ExportStatus, TaskNotice, TaskService};
