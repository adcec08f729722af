use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::config::parser::load_config;

pub mod parser;

pub const DEFAULT_AUTHOR: &str = "psdwatcher <https://github.com/alice1017/psdwatcher/>";
pub const DEFAULT_INTERVAL_MS: u64 = 10;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WatcherConfig {
    /// Pause between two watched files, in milliseconds.
    pub interval_ms: u64,
    /// Value passed to `git commit --author`.
    pub author: String,
    pub git_program: String,
    /// Treat any stderr output from git as a failure, even on a zero exit code.
    pub strict_stderr: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            author: DEFAULT_AUTHOR.to_string(),
            git_program: String::from("git"),
            strict_stderr: false,
        }
    }
}

impl WatcherConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// `$PSDWATCHER_CONFIG`, or `~/.psdwatcher.yml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(p) = std::env::var("PSDWATCHER_CONFIG")
            && !p.is_empty()
        {
            return Some(PathBuf::from(p));
        }
        home_dir().map(|h| h.join(".psdwatcher.yml"))
    }

    /// Loads the user config, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => load_config(&path),
            _ => Ok(Self::default()),
        }
    }
}
