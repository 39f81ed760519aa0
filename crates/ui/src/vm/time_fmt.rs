use chrono::{DateTime, Utc};

pub use quiz_core::time::format_countdown;

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}
