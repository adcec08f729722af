//! Per-file change detection.
//!
//! A file starts in the *baselining* state: its first poll records the
//! modification time and the full content, and reports nothing. From then on
//! the file is *tracked*: a new mtime triggers a content read, and only a
//! byte difference is reported as a change. A touch that leaves the bytes
//! alone is ignored and does not move the baseline.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use tokio::fs;

use crate::{
    core::state::WatchedFile,
    error::{Result, WatcherError},
};

/// File modification time, compared at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(SystemTime);

impl Timestamp {
    pub fn new(time: SystemTime) -> Self {
        Self(time)
    }

    /// Whole seconds since the Unix epoch.
    pub fn unix_secs(&self) -> i64 {
        match self.0.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unix_secs())
    }
}

/// Last observed state of a tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub timestamp: Timestamp,
    pub content: Vec<u8>,
}

/// A confirmed content change, not yet recorded in the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub file: WatchedFile,
    pub old: Timestamp,
    pub new: Timestamp,
    /// Bytes read while confirming the change; they belong to `new`.
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First sighting in this session, the baseline was recorded.
    Baselined,
    /// Same mtime as the baseline.
    Unchanged,
    /// mtime moved but the bytes are identical.
    Touched,
    Changed(ChangeEvent),
}

#[derive(Debug, Default)]
pub struct ChangeDetector {
    snapshots: HashMap<String, Snapshot>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, name: &str) -> Option<&Snapshot> {
        self.snapshots.get(name)
    }

    pub fn is_tracking(&self, name: &str) -> bool {
        self.snapshots.contains_key(name)
    }

    pub async fn poll(&mut self, file: &WatchedFile) -> Result<Observation> {
        let path = Path::new(&file.path);

        let Some(snapshot) = self.snapshots.get(&file.name) else {
            let timestamp = read_timestamp(path).await?;
            let content = read_content(path).await?;
            self.snapshots
                .insert(file.name.clone(), Snapshot { timestamp, content });
            return Ok(Observation::Baselined);
        };

        let now = read_timestamp(path).await?;
        if now == snapshot.timestamp {
            return Ok(Observation::Unchanged);
        }

        let content = read_content(path).await?;
        if content == snapshot.content {
            return Ok(Observation::Touched);
        }

        Ok(Observation::Changed(ChangeEvent {
            file: file.clone(),
            old: snapshot.timestamp,
            new: now,
            content,
        }))
    }

    /// Moves the baseline of `event.file` to the state carried by the event.
    pub fn advance(&mut self, event: &ChangeEvent) {
        self.snapshots.insert(
            event.file.name.clone(),
            Snapshot {
                timestamp: event.new,
                content: event.content.clone(),
            },
        );
    }
}

async fn read_timestamp(path: &Path) -> Result<Timestamp> {
    let meta = fs::metadata(path).await.map_err(|e| access_error(path, e))?;
    let modified = meta.modified().map_err(|e| access_error(path, e))?;
    Ok(Timestamp(modified))
}

async fn read_content(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).await.map_err(|e| access_error(path, e))
}

fn access_error(path: &Path, source: std::io::Error) -> WatcherError {
    WatcherError::FileAccess {
        path: PathBuf::from(path),
        source,
    }
}
