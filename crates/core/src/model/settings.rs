use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid reminder time {0:?}, expected HH:MM")]
pub struct ParseReminderTimeError(String);

/// Time of day for the daily reminder, sent as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReminderTime {
    hour: u8,
    minute: u8,
}

impl ReminderTime {
    /// Slots offered in the preferences form.
    pub const CHOICES: [ReminderTime; 4] = [
        ReminderTime::at(9, 0),
        ReminderTime::at(12, 0),
        ReminderTime::at(18, 0),
        ReminderTime::at(20, 0),
    ];

    const fn at(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    #[must_use]
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// 12-hour label, e.g. `6:00 PM`.
    #[must_use]
    pub fn label(self) -> String {
        let suffix = if self.hour < 12 { "AM" } else { "PM" };
        let hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{hour}:{:02} {suffix}", self.minute)
    }
}

impl Default for ReminderTime {
    fn default() -> Self {
        Self::at(18, 0)
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ReminderTime {
    type Err = ParseReminderTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseReminderTimeError(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ReminderTime {
    type Error = ParseReminderTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReminderTime> for String {
    fn from(time: ReminderTime) -> Self {
        time.to_string()
    }
}

/// Email reminder preferences. Missing keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    #[serde(rename = "dailyRem")]
    pub daily_reminder: bool,
    #[serde(rename = "reminderTime")]
    pub reminder_time: ReminderTime,
    #[serde(rename = "emailNoti")]
    pub email_notifications: bool,
    #[serde(rename = "weeklyReport")]
    pub weekly_report: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            daily_reminder: true,
            reminder_time: ReminderTime::default(),
            email_notifications: true,
            weekly_report: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reminder_time_parses_and_labels() {
        let time: ReminderTime = "09:00".parse().unwrap();
        assert_eq!(time.label(), "9:00 AM");
        assert_eq!(ReminderTime::default().label(), "6:00 PM");
        assert_eq!(ReminderTime::new(0, 30).unwrap().label(), "12:30 AM");
        assert!("24:00".parse::<ReminderTime>().is_err());
        assert!("18h00".parse::<ReminderTime>().is_err());
    }

    #[test]
    fn settings_use_wire_keys_and_fill_gaps() {
        let settings: NotificationSettings =
            serde_json::from_value(json!({ "weeklyReport": true, "reminderTime": "20:00" })).unwrap();
        assert!(settings.daily_reminder);
        assert!(settings.weekly_report);
        assert_eq!(settings.reminder_time.to_string(), "20:00");

        assert_eq!(
            serde_json::to_value(NotificationSettings::default()).unwrap(),
            json!({
                "dailyRem": true,
                "reminderTime": "18:00",
                "emailNoti": true,
                "weeklyReport": false
            })
        );
    }
}
