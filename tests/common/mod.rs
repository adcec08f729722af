#![allow(dead_code)]
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use core_lib::{
    core::state::WatchedFile,
    error::{Result, WatcherError},
    git::repo::VersionControl,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub dir: PathBuf,
    pub command: String,
    pub args: Vec<String>,
}

/// Records every invocation instead of spawning git.
#[derive(Debug, Clone)]
pub struct FakeVcs {
    calls: Arc<Mutex<Vec<Call>>>,
    failing_commits: Arc<AtomicUsize>,
    inside_repo: bool,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failing_commits: Arc::new(AtomicUsize::new(0)),
            inside_repo: true,
        }
    }

    pub fn outside_repo() -> Self {
        Self {
            inside_repo: false,
            ..Self::new()
        }
    }

    /// Makes the next `n` commits fail.
    pub fn fail_commits(&self, n: usize) {
        self.failing_commits.store(n, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }

    pub fn commits(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.command == "commit")
            .collect()
    }
}

impl VersionControl for FakeVcs {
    async fn run(&self, dir: &Path, command: &str, args: &[&str]) -> Result<String> {
        self.calls.lock().unwrap().push(Call {
            dir: dir.to_path_buf(),
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        match command {
            "rev-parse" if self.inside_repo => Ok(String::from("true")),
            "rev-parse" => Err(WatcherError::VersionControl {
                command: command.to_string(),
                message: "fatal: not a git repository".into(),
            }),
            "commit" => {
                let pending = self.failing_commits.load(Ordering::SeqCst);
                if pending > 0 {
                    self.failing_commits.store(pending - 1, Ordering::SeqCst);
                    return Err(WatcherError::VersionControl {
                        command: command.to_string(),
                        message: "fatal: unable to write new index file".into(),
                    });
                }
                Ok(String::from("[main abc1234] commit"))
            }
            _ => Ok(String::new()),
        }
    }
}

pub fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Overwrites `path` with `bytes` and pins its mtime.
pub fn write_with_mtime(path: &Path, bytes: &[u8], secs: u64) {
    fs::write(path, bytes).unwrap();
    touch(path, secs);
}

/// Moves the mtime without touching the content.
pub fn touch(path: &Path, secs: u64) {
    let f = File::options().write(true).open(path).unwrap();
    f.set_modified(at(secs)).unwrap();
}

pub fn watched(dir: &Path, name: &str) -> WatchedFile {
    WatchedFile {
        name: name.to_string(),
        dir: dir.to_string_lossy().into_owned(),
        path: dir.join(name).to_string_lossy().into_owned(),
    }
}

/// Replaces `path` through a rename so a concurrent reader never sees a
/// half-written file.
pub fn replace_with_mtime(path: &Path, bytes: &[u8], secs: u64) {
    let tmp = path.with_extension("partial");
    write_with_mtime(&tmp, bytes, secs);
    fs::rename(&tmp, path).unwrap();
}
