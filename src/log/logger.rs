use std::{path::Path, sync::Arc};

use anyhow::Context;
use chrono::Local;
use tokio::{io::AsyncWriteExt, sync::Mutex};

/// Log sink for a watch session.
///
/// Every line goes to the optional log file as plain text and, unless
/// `quiet`, to stdout with a colored level badge.
#[derive(Debug, Clone)]
pub struct Logger {
    file: Option<Arc<Mutex<tokio::fs::File>>>,
    quiet: bool,
    dev: bool,
    color_enable: bool,
}

const RESET: &str = "\x1b[0m";
const BG_BLUE: &str = "\x1b[44m"; // info
const BG_ORANGE: &str = "\x1b[48;5;208m"; // warning
const BG_RED: &str = "\x1b[41m";
const BG_YELLOW: &str = "\x1b[43m"; // change
const BG_GREY: &str = "\x1b[100m"; // dev
const FG_BOLD_WHITE: &str = "\x1b[97;1m";

impl Logger {
    /// Builds a logger. `log_file` must not exist yet.
    pub async fn new(log_file: Option<&Path>, quiet: bool, dev: bool) -> anyhow::Result<Self> {
        let file = match log_file {
            Some(path) => {
                let f = tokio::fs::OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(path)
                    .await
                    .with_context(|| format!("cannot create log file {}", path.display()))?;
                Some(f)
            }
            None => None,
        };
        Ok(Self::from_file(file, quiet, dev))
    }

    /// Builds a logger on an already opened sink.
    pub fn from_file(file: Option<tokio::fs::File>, quiet: bool, dev: bool) -> Self {
        let no_color = std::env::var("PSDWATCHER_NO_COLOR").ok().as_deref() == Some("1");
        Self {
            file: file.map(|f| Arc::new(Mutex::new(f))),
            quiet,
            dev,
            color_enable: !no_color,
        }
    }

    pub fn silent() -> Logger {
        Logger {
            file: None,
            quiet: true,
            dev: false,
            color_enable: false,
        }
    }

    pub fn is_dev(&self) -> bool {
        self.dev
    }

    fn paint_level(&self, level: &str) -> String {
        if !self.color_enable {
            return level.to_string();
        }
        match level {
            "INFO" => format!("{BG_BLUE}{FG_BOLD_WHITE} {level} {RESET}"),
            "WARNING" => format!("{BG_ORANGE}{FG_BOLD_WHITE} {level} {RESET}"),
            "ERROR" => format!("{BG_RED}{FG_BOLD_WHITE} {level} {RESET}"),
            "CHANGE" => format!("{BG_YELLOW}{FG_BOLD_WHITE} {level} {RESET}"),
            "DEV" => format!("{BG_GREY}{FG_BOLD_WHITE} {level} {RESET}"),
            _ => level.to_string(),
        }
    }

    pub async fn log(&self, level: &str, msg: &str) -> anyhow::Result<()> {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S");

        if let Some(file) = &self.file {
            let mut f = file.lock().await;
            let line = format!("[{now}] {level}: {msg}\n");
            f.write_all(line.as_bytes()).await?;
            f.flush().await?;
        }

        if !self.quiet {
            println!("[{now}] {}: {msg}", self.paint_level(level));
        }
        Ok(())
    }

    pub async fn info(&self, msg: &str) -> anyhow::Result<()> {
        self.log("INFO", msg).await
    }

    pub async fn warning(&self, msg: &str) -> anyhow::Result<()> {
        self.log("WARNING", msg).await
    }

    pub async fn error(&self, msg: &str) -> anyhow::Result<()> {
        self.log("ERROR", msg).await
    }

    pub async fn change(&self, msg: &str) -> anyhow::Result<()> {
        self.log("CHANGE", msg).await
    }

    /// Step-by-step tracing, only written with `--dev`.
    pub async fn dev(&self, msg: &str) -> anyhow::Result<()> {
        if !self.dev {
            return Ok(());
        }
        self.log("DEV", msg).await
    }
}

/// Swallows a failed log write, reporting it on stderr instead.
///
/// Used on the watch path, where a broken log sink must not end the session.
pub fn best_effort(result: anyhow::Result<()>) {
    if let Err(e) = result {
        eprintln!("❌ Failed to write log: {e}");
    }
}
