use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::tasks::PollSettings;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";

/// Client settings read from `QUIZ_*` environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub poll: PollSettings,
    pub download_dir: PathBuf,
    /// Countdown period; one second outside of tests.
    pub tick_period: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            poll: PollSettings::default(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            tick_period: Duration::from_secs(1),
        }
    }
}

impl ClientConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` when a numeric variable does not parse or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a numeric variable does not parse or is out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let api_base_url = get("QUIZ_API_BASE_URL").unwrap_or(defaults.api_base_url);
        let download_dir = get("QUIZ_DOWNLOAD_DIR").map_or(defaults.download_dir, PathBuf::from);

        let interval_secs = number(
            "QUIZ_POLL_INTERVAL_SECS",
            get("QUIZ_POLL_INTERVAL_SECS"),
            defaults.poll.interval.as_secs(),
            1,
        )?;
        let max_attempts = number(
            "QUIZ_POLL_MAX_ATTEMPTS",
            get("QUIZ_POLL_MAX_ATTEMPTS"),
            u64::from(defaults.poll.max_attempts),
            1,
        )?;
        let tick_millis = number(
            "QUIZ_TICK_MILLIS",
            get("QUIZ_TICK_MILLIS"),
            1000,
            1,
        )?;

        Ok(Self {
            api_base_url,
            poll: PollSettings {
                interval: Duration::from_secs(interval_secs),
                max_attempts: u32::try_from(max_attempts).unwrap_or(u32::MAX),
            },
            download_dir,
            tick_period: Duration::from_millis(tick_millis),
        })
    }
}

fn number(
    var: &'static str,
    raw: Option<String>,
    default: u64,
    min: u64,
) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: raw.clone(),
        })?;
    if value < min {
        return Err(ConfigError::TooSmall { var, min });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.poll.interval, Duration::from_secs(10));
        assert_eq!(config.poll.max_attempts, 30);
    }

    #[test]
    fn reads_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("QUIZ_API_BASE_URL", "https://quiz.example.com"),
            ("QUIZ_POLL_INTERVAL_SECS", "2"),
            ("QUIZ_POLL_MAX_ATTEMPTS", "5"),
            ("QUIZ_DOWNLOAD_DIR", "/tmp/exports"),
            ("QUIZ_TICK_MILLIS", " 250 "),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://quiz.example.com");
        assert_eq!(config.poll.interval, Duration::from_secs(2));
        assert_eq!(config.poll.max_attempts, 5);
        assert_eq!(config.download_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.tick_period, Duration::from_millis(250));
    }

    #[test]
    fn rejects_zero_attempts_and_garbage() {
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[("QUIZ_POLL_MAX_ATTEMPTS", "0")])).unwrap_err(),
            ConfigError::TooSmall {
                var: "QUIZ_POLL_MAX_ATTEMPTS",
                min: 1
            }
        );
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("QUIZ_TICK_MILLIS", "fast")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }
}
