use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};

pub const DEFAULT_DATA_FEED: &str = "https://shuttles.rpi.edu/datafeed";
pub const DEFAULT_UPDATE_INTERVAL: &str = "10s";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL of the iTRAK data feed.
    pub data_feed: String,

    /// Time between update cycles.
    pub update_interval: Duration,
}

impl Config {
    /// Create a config, parsing `update_interval` as a duration such as `10s`
    /// or `1m 30s`.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is not a valid, non-zero duration.
    pub fn new(data_feed: impl Into<String>, update_interval: &str) -> Result<Self> {
        let update_interval = humantime::parse_duration(update_interval)
            .with_context(|| format!("parsing update interval `{update_interval}`"))?;
        if update_interval.is_zero() {
            bail!("update interval must be greater than zero");
        }
        Ok(Self { data_feed: data_feed.into(), update_interval })
    }

    /// Read `UPDATER_DATAFEED` and `UPDATER_UPDATE_INTERVAL`, falling back to
    /// defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `UPDATER_UPDATE_INTERVAL` is not a valid duration.
    pub fn from_env() -> Result<Self> {
        let data_feed = env::var("UPDATER_DATAFEED").unwrap_or_else(|_| {
            tracing::trace!("UPDATER_DATAFEED not set, using default: {DEFAULT_DATA_FEED}");
            DEFAULT_DATA_FEED.to_string()
        });
        let update_interval = env::var("UPDATER_UPDATE_INTERVAL").unwrap_or_else(|_| {
            tracing::trace!(
                "UPDATER_UPDATE_INTERVAL not set, using default: {DEFAULT_UPDATE_INTERVAL}"
            );
            DEFAULT_UPDATE_INTERVAL.to_string()
        });
        Self::new(data_feed, &update_interval)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn parses_seconds() {
        let config = Config::new(DEFAULT_DATA_FEED, "10s").unwrap();
        assert_eq!(config.update_interval, Duration::from_secs(10));
        assert_eq!(config.data_feed, DEFAULT_DATA_FEED);
    }

    #[test]
    fn parses_compound() {
        let config = Config::new(DEFAULT_DATA_FEED, "1m 30s").unwrap();
        assert_eq!(config.update_interval, Duration::from_secs(90));
    }

    #[test]
    fn parses_millis() {
        let config = Config::new(DEFAULT_DATA_FEED, "500ms").unwrap();
        assert_eq!(config.update_interval, Duration::from_millis(500));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Config::new(DEFAULT_DATA_FEED, "often").is_err());
    }

    #[test]
    fn rejects_zero() {
        assert!(Config::new(DEFAULT_DATA_FEED, "0s").is_err());
    }
}
