//! # psdwatcher
//!
//! Watches a list of PSD files and records every content change as a git
//! commit in the repository that holds the file.
//!
//! ## Modules
//!
//! - [`crate::core::state`]: the persisted watch list (`~/.psdwatcher.rc`).
//! - [`crate::core::watcher`]: per-file change detection. A file is first
//!   baselined, then a new mtime only counts once the bytes differ.
//! - [`crate::core::committer`]: `git add` + `git commit` for a confirmed change.
//! - [`crate::core::manager`]: the polling loop and its shutdown handling.
//! - [`crate::git::repo`]: the `git` process gateway.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod log;
