use std::path::{Path, PathBuf};

use dirs::home_dir;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{Result, WatcherError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchedFile {
    /// File name, unique within the watch list.
    pub name: String,
    /// Directory that contains the file; git runs from here.
    pub dir: String,
    /// Absolute path of the file.
    pub path: String,
}

impl WatchedFile {
    /// Builds an entry from an absolute path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .ok_or_else(|| WatcherError::Validation(format!("'{}' has no file name", path.display())))?
            .to_string_lossy()
            .into_owned();
        let dir = path
            .parent()
            .ok_or_else(|| {
                WatcherError::Validation(format!("'{}' has no parent directory", path.display()))
            })?
            .to_string_lossy()
            .into_owned();

        Ok(Self {
            name,
            dir,
            path: path.to_string_lossy().into_owned(),
        })
    }
}

pub type WatchList = Vec<WatchedFile>;

/// Persists the watch list as JSON at a fixed location.
#[derive(Debug, Clone)]
pub struct WatchListStore {
    path: PathBuf,
}

impl WatchListStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.psdwatcher.rc`
    pub fn default_location() -> Result<Self> {
        let home = home_dir()
            .ok_or_else(|| WatcherError::Storage("Failed to find HOME directory".into()))?;
        Ok(Self::new(home.join(".psdwatcher.rc")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    pub async fn load(&self) -> Result<WatchList> {
        let data = fs::read_to_string(&self.path)
            .await
            .map_err(|e| storage_error("read", &self.path, e))?;
        let list = serde_json::from_str(&data)
            .map_err(|e| storage_error("parse", &self.path, e))?;
        Ok(list)
    }

    pub async fn save(&self, list: &WatchList) -> Result<()> {
        let json =
            serde_json::to_string_pretty(list).map_err(|e| storage_error("encode", &self.path, e))?;

        // write next to the target, then swap it in
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error("create", parent, e))?;
        }
        fs::write(&tmp, json)
            .await
            .map_err(|e| storage_error("write", &tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage_error("write", &self.path, e))?;
        Ok(())
    }

    /// Appends `file` unless an entry with the same name is already watched.
    pub async fn add(&self, file: WatchedFile) -> Result<()> {
        let mut list = if self.exists().await {
            self.load().await?
        } else {
            WatchList::new()
        };

        if list.iter().any(|w| w.name == file.name) {
            return Err(WatcherError::Duplicate(file.name));
        }

        list.push(file);
        self.save(&list).await
    }
}

fn storage_error(action: &str, path: &Path, e: impl std::fmt::Display) -> WatcherError {
    WatcherError::Storage(format!("failed to {action} {}: {e}", path.display()))
}
