use std::path::Path;

use crate::{
    core::watcher::{ChangeDetector, ChangeEvent, Timestamp},
    error::Result,
    git::repo::VersionControl,
    log::logger::{Logger, best_effort},
};

pub fn commit_message(file_name: &str, old: Timestamp, new: Timestamp) -> String {
    format!(
        "The '{file_name}' file was changed. This commited by psdwatcher. Timestamp : {old} -> {new}"
    )
}

/// Records confirmed changes as commits.
#[derive(Debug, Clone)]
pub struct Committer<V> {
    vcs: V,
    author: String,
    logger: Logger,
}

impl<V: VersionControl> Committer<V> {
    pub fn with_author(vcs: V, author: impl Into<String>) -> Self {
        Self {
            vcs,
            author: author.into(),
            logger: Logger::silent(),
        }
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub async fn stage(&self, event: &ChangeEvent) -> Result<()> {
        let dir = Path::new(&event.file.dir);
        self.vcs.run(dir, "add", &[event.file.name.as_str()]).await?;
        Ok(())
    }

    pub async fn commit(&self, event: &ChangeEvent) -> Result<String> {
        let dir = Path::new(&event.file.dir);
        let msg = commit_message(&event.file.name, event.old, event.new);
        self.vcs
            .run(dir, "commit", &["--author", self.author.as_str(), "-m", msg.as_str()])
            .await
    }

    /// Stages and commits the file, then advances its baseline.
    ///
    /// On any git failure the baseline is left alone so the same difference
    /// is detected, and retried, on the next cycle. Log writes never fail
    /// this call.
    pub async fn on_change(&self, detector: &mut ChangeDetector, event: ChangeEvent) -> Result<()> {
        best_effort(self.logger.info("Staging using git...").await);
        self.stage(&event).await?;
        best_effort(self.logger.info("Staging using git... done").await);

        best_effort(self.logger.info("Committing using git...").await);
        self.commit(&event).await?;
        detector.advance(&event);
        best_effort(self.logger.info("Committing using git... done").await);

        best_effort(
            self.logger
                .dev(&format!(
                    "Updated '{}' baseline: timestamp {}, {} bytes",
                    event.file.name,
                    event.new,
                    event.content.len()
                ))
                .await,
        );
        Ok(())
    }
}
