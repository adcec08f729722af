use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use tokio::sync::watch;

use crate::{
    cli::{Cli, Commands},
    config::WatcherConfig,
    core::{
        manager::WatchLoop,
        state::{WatchListStore, WatchedFile},
    },
    error::WatcherError,
    git::repo::{GitCli, VersionControl},
    log::logger::Logger,
};

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Dispatches a parsed command line against the user's watch list and config.
pub async fn handle_command(cli: &Cli) -> Result<()> {
    let store = WatchListStore::default_location()?;
    let config = WatcherConfig::load()?;
    let vcs = GitCli::from_config(&config);

    match &cli.command {
        Commands::Add { psd_file } => {
            let file = add_file(psd_file, &store, &vcs).await?;
            println!("'{}' was added to the watch list.", file.name);
        }
        Commands::Run {
            log_file,
            no_output_log,
            dev,
        } => {
            let logger = Logger::new(log_file.as_deref(), *no_output_log, *dev).await?;
            handle_run(&store, vcs, &config, logger).await?;
        }
        Commands::List => {
            for path in list_paths(&store).await? {
                println!("{path}");
            }
        }
    }
    Ok(())
}

/// Validates `psd_file` and appends it to the watch list.
///
/// The path is resolved against the current directory and normalized.
/// Nothing is written unless the file exists, has a `.psd` extension and
/// sits in a work tree.
pub async fn add_file<V: VersionControl>(
    psd_file: &Path,
    store: &WatchListStore,
    vcs: &V,
) -> Result<WatchedFile, WatcherError> {
    let path = std::path::absolute(psd_file).map_err(|e| {
        WatcherError::Validation(format!("cannot resolve '{}': {e}", psd_file.display()))
    })?;
    let path = normalize(&path);

    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(WatcherError::Validation(format!(
            "{} file was not found.",
            path.display()
        )));
    }

    let file = WatchedFile::from_path(&path)?;

    if path.extension().and_then(|e| e.to_str()) != Some("psd") {
        return Err(WatcherError::Validation(format!(
            "'{}' this file is not PSD file!!",
            file.name
        )));
    }

    if !vcs.is_inside_repository(Path::new(&file.dir)).await? {
        return Err(WatcherError::Validation(String::from(
            "Not a git repository (or any of the parent directories): .git",
        )));
    }

    store.add(file.clone()).await?;
    Ok(file)
}

/// Drops `.` and folds `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Absolute paths of every watched file, in list order.
pub async fn list_paths(store: &WatchListStore) -> Result<Vec<String>, WatcherError> {
    if !store.exists().await {
        return Ok(Vec::new());
    }
    let list = store.load().await?;
    Ok(list.into_iter().map(|f| f.path).collect())
}

/// Loads the watch list and watches it until `shutdown` fires.
pub async fn start_watching<V: VersionControl>(
    store: &WatchListStore,
    vcs: V,
    config: &WatcherConfig,
    logger: Logger,
    shutdown: watch::Receiver<bool>,
) -> Result<(), WatcherError> {
    if !store.exists().await {
        return Err(WatcherError::NoWatchList);
    }
    let files = store.load().await?;
    let mut watch_loop = WatchLoop::new(files, vcs, config, logger)?;
    watch_loop.run(shutdown).await
}

async fn handle_run<V: VersionControl>(
    store: &WatchListStore,
    vcs: V,
    config: &WatcherConfig,
    logger: Logger,
) -> Result<()> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(true);
            }
            Err(e) => {
                eprintln!("failed to listen for Ctrl-C: {e}");
                // keep the sender alive, dropping it would stop the loop
                std::future::pending::<()>().await;
                drop(tx);
            }
        }
    });

    println!("Start watching........");
    start_watching(store, vcs, config, logger, rx).await?;

    println!("\n");
    println!("{YELLOW}Caught KeyboardInterrupt!\npsdwatcher has terminated.{RESET}");
    Ok(())
}
