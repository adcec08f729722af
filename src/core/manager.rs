use std::time::Duration;

use tokio::{sync::watch, time::sleep};

use crate::{
    config::WatcherConfig,
    core::{
        committer::Committer,
        state::{WatchList, WatchedFile},
        watcher::{ChangeDetector, Observation, Timestamp},
    },
    error::{Result, WatcherError},
    git::repo::VersionControl,
    log::logger::{Logger, best_effort},
};

/// What one poll of one file ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Baselined,
    Unchanged,
    Touched,
    Committed { old: Timestamp, new: Timestamp },
}

/// Polls the watch list in order and commits every content change.
pub struct WatchLoop<V> {
    files: WatchList,
    detector: ChangeDetector,
    committer: Committer<V>,
    logger: Logger,
    interval: Duration,
}

impl<V: VersionControl> WatchLoop<V> {
    pub fn new(files: WatchList, vcs: V, config: &WatcherConfig, logger: Logger) -> Result<Self> {
        if files.is_empty() {
            return Err(WatcherError::NoWatchList);
        }
        let committer = Committer::with_author(vcs, config.author.clone()).logger(logger.clone());
        Ok(Self {
            files,
            detector: ChangeDetector::new(),
            committer,
            logger,
            interval: config.interval(),
        })
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Runs detection, and a commit when the content changed, for one file.
    pub async fn poll_file(&mut self, file: &WatchedFile) -> Result<CycleOutcome> {
        poll_one(file, &mut self.detector, &self.committer, &self.logger).await
    }

    /// Polls every file once, without pausing. Per-file failures are logged
    /// and returned; they never stop the cycle.
    pub async fn run_cycle(&mut self) -> Vec<Result<CycleOutcome>> {
        let mut results = Vec::with_capacity(self.files.len());
        for index in 0..self.files.len() {
            let file = &self.files[index];
            let result = poll_one(file, &mut self.detector, &self.committer, &self.logger).await;
            if let Err(e) = &result {
                self.report(index, e).await;
            }
            results.push(result);
        }
        results
    }

    /// Runs until `shutdown` flips to `true` (or its sender goes away).
    ///
    /// Shutdown is checked before each file and raced against the pause that
    /// follows it; a git call already in flight is allowed to finish.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        loop {
            for index in 0..self.files.len() {
                if *shutdown.borrow() {
                    return Ok(());
                }

                let file = &self.files[index];
                match poll_one(file, &mut self.detector, &self.committer, &self.logger).await {
                    Ok(_) => {}
                    Err(e) if e.is_recoverable() => self.report(index, &e).await,
                    Err(e) => return Err(e),
                }

                tokio::select! {
                    _ = sleep(self.interval) => {}
                    _ = shutdown.changed() => return Ok(()),
                }
            }
        }
    }

    async fn report(&self, index: usize, e: &WatcherError) {
        let name = &self.files[index].name;
        if let Err(log_err) = self.logger.error(&format!("[{name}] {e}")).await {
            eprintln!("[{name}] {e} (log write failed: {log_err})");
        }
    }
}

async fn poll_one<V: VersionControl>(
    file: &WatchedFile,
    detector: &mut ChangeDetector,
    committer: &Committer<V>,
    logger: &Logger,
) -> Result<CycleOutcome> {
    if logger.is_dev() {
        best_effort(logger.dev(&"=".repeat(80)).await);
        best_effort(logger.dev(&format!("Now watching file : {}", file.name)).await);
        best_effort(logger.dev(&format!("Working directory : {}", file.dir)).await);
    }

    let previous = detector.snapshot(&file.name).map(|s| s.timestamp);

    match detector.poll(file).await? {
        Observation::Baselined => {
            if let Some(s) = detector.snapshot(&file.name) {
                best_effort(
                    logger
                        .dev(&format!(
                            "Registered baseline timestamp {} and {} bytes of content",
                            s.timestamp,
                            s.content.len()
                        ))
                        .await,
                );
            }
            Ok(CycleOutcome::Baselined)
        }
        Observation::Unchanged => {
            if let Some(t) = previous {
                best_effort(logger.dev(&format!("Timestamp unchanged: {t}")).await);
            }
            Ok(CycleOutcome::Unchanged)
        }
        Observation::Touched => {
            best_effort(
                logger
                    .dev(&format!(
                        "'{}' was touched but its content is identical",
                        file.name
                    ))
                    .await,
            );
            Ok(CycleOutcome::Touched)
        }
        Observation::Changed(event) => {
            let (old, new) = (event.old, event.new);
            best_effort(
                logger
                    .change(&format!("Catch the '{}' file's change!", file.name))
                    .await,
            );
            best_effort(logger.info(&format!("timestamp : {old} -> {new}")).await);

            committer.on_change(detector, event).await?;
            Ok(CycleOutcome::Committed { old, new })
        }
    }
}
