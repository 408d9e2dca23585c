use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::Duration;
use log::{debug, info};
use serde::Deserialize;

use crate::error::Result;

/// Application configuration, loaded from a TOML file. Every field has a
/// default, so running without a config file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory the file store keeps its key files in.
    storage_dir: PathBuf,
    /// Length of the voting window in hours.
    voting_window_hours: u32,
    /// Seconds between re-reads in the CLI watch loop.
    watch_interval_secs: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("electoral_data"),
            voting_window_hours: 24,
            watch_interval_secs: 2,
        }
    }
}

impl Config {
    /// The path checked when none is given on the command line.
    pub const DEFAULT_PATH: &'static str = "electoral.toml";

    /// Load the config from `path`, or from `DEFAULT_PATH` when `path`
    /// is `None`. A missing file at the default path just means
    /// defaults; a missing file at an explicitly given path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(Self::DEFAULT_PATH), false),
        };
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound && !explicit => {
                debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        let config = toml::from_str(&raw)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Length of the voting window.
    pub fn voting_window(&self) -> Duration {
        Duration::hours(self.voting_window_hours.into())
    }

    /// Sleep interval for the CLI watch loop.
    pub fn watch_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.watch_interval_secs.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_window_is_24_hours() {
        let config = Config::default();
        assert_eq!(config.voting_window(), Duration::hours(24));
        assert_eq!(config.watch_interval(), StdDuration::from_secs(2));
        assert_eq!(config.storage_dir(), Path::new("electoral_data"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str("voting_window_hours = 1\n").unwrap();
        assert_eq!(config.voting_window(), Duration::hours(1));
        assert_eq!(config.watch_interval_secs, 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("voting_window = 24\n");
        assert!(result.is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage_dir = \"/tmp/urns\"\nwatch_interval_secs = 5").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.storage_dir(), Path::new("/tmp/urns"));
        assert_eq!(config.watch_interval(), StdDuration::from_secs(5));
        assert_eq!(config.voting_window(), Duration::hours(24));
    }
}
