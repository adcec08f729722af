use std::{path::Path, process::Stdio};

use tokio::process::Command;

use crate::{
    config::WatcherConfig,
    error::{Result, WatcherError},
};

/// Access to the version-control tool, scoped to one working directory per call.
#[allow(async_fn_in_trait)]
pub trait VersionControl {
    /// Runs `<command> <args...>` inside `dir` and returns its stdout,
    /// minus one trailing newline.
    async fn run(&self, dir: &Path, command: &str, args: &[&str]) -> Result<String>;

    /// Whether `dir` lies inside a work tree.
    ///
    /// A failed query (typically "not a git repository") counts as `false`;
    /// failing to launch the tool at all is still an error.
    async fn is_inside_repository(&self, dir: &Path) -> Result<bool> {
        match self
            .run(dir, "rev-parse", &["--is-inside-work-tree"])
            .await
        {
            Ok(out) => Ok(out.trim() == "true"),
            Err(WatcherError::VersionControl { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// [`VersionControl`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    strict_stderr: bool,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: String::from("git"),
            strict_stderr: false,
        }
    }
}

impl GitCli {
    pub fn from_config(config: &WatcherConfig) -> Self {
        Self {
            program: config.git_program.clone(),
            strict_stderr: config.strict_stderr,
        }
    }
}

impl VersionControl for GitCli {
    async fn run(&self, dir: &Path, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(command)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| WatcherError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let status = if output.status.success() {
            None
        } else {
            Some(output.status.to_string())
        };

        interpret_output(command, status, &stdout, &stderr, self.strict_stderr)
    }
}

/// Decides whether a finished invocation succeeded.
///
/// `failed_status` is `Some` when the process exited unsuccessfully. The exit
/// status is authoritative unless `strict_stderr` is set, in which case any
/// stderr output is a failure as well.
pub fn interpret_output(
    command: &str,
    failed_status: Option<String>,
    stdout: &str,
    stderr: &str,
    strict_stderr: bool,
) -> Result<String> {
    let stderr = stderr.trim_end();

    let failure = match failed_status {
        Some(status) if stderr.is_empty() => Some(status),
        Some(_) => Some(stderr.to_string()),
        None if strict_stderr && !stderr.is_empty() => Some(stderr.to_string()),
        None => None,
    };

    match failure {
        Some(message) => Err(WatcherError::VersionControl {
            command: command.to_string(),
            message,
        }),
        None => Ok(strip_trailing_newline(stdout).to_string()),
    }
}

pub fn strip_trailing_newline(s: &str) -> &str {
    s.strip_suffix('\n').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_one_newline() {
        assert_eq!(strip_trailing_newline("true\n"), "true");
        assert_eq!(strip_trailing_newline("a\n\n"), "a\n");
        assert_eq!(strip_trailing_newline("abc"), "abc");
        assert_eq!(strip_trailing_newline(""), "");
    }

    #[test]
    fn zero_exit_with_warning_is_success_by_default() {
        let out = interpret_output("add", None, "", "warning: LF will be replaced\n", false);
        assert_eq!(out.unwrap(), "");
    }

    #[test]
    fn strict_stderr_turns_warning_into_failure() {
        let err = interpret_output("add", None, "", "warning: LF will be replaced\n", true)
            .unwrap_err();
        match err {
            WatcherError::VersionControl { command, message } => {
                assert_eq!(command, "add");
                assert_eq!(message, "warning: LF will be replaced");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failed_exit_reports_stderr_or_status() {
        let err = interpret_output(
            "commit",
            Some("exit status: 1".into()),
            "",
            "fatal: oops\n",
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("fatal: oops"));

        let err = interpret_output("commit", Some("exit status: 1".into()), "", "", false)
            .unwrap_err();
        assert!(err.to_string().contains("exit status: 1"));
    }
}
