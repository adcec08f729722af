use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::config::WatcherConfig;

pub fn check_config(config: &WatcherConfig) -> Result<()> {
    if config.interval_ms == 0 {
        return Err(anyhow::anyhow!("`interval_ms` must be greater than 0"));
    }
    if config.author.trim().is_empty() {
        return Err(anyhow::anyhow!("`author` cannot be empty"));
    }
    if config.git_program.trim().is_empty() {
        return Err(anyhow::anyhow!("`git_program` cannot be empty"));
    }
    Ok(())
}

pub fn load_config(path: &Path) -> Result<WatcherConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Error reading config file {path:?}"))?;

    // an empty file deserializes to `null`, not to an empty mapping
    let config: WatcherConfig = if content.trim().is_empty() {
        WatcherConfig::default()
    } else {
        serde_yaml::from_str(&content).with_context(|| "Error parsing YAML configuration file")?
    };

    check_config(&config)?;

    Ok(config)
}
