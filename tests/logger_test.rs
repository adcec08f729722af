use core_lib::log::logger::Logger;
use tempfile::tempdir;
use tokio::fs;

#[tokio::test]
async fn test_log_basic() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("watch.log");
    let logger = Logger::new(Some(file_path.as_path()), true, false).await?;

    logger.info("Hello World").await?;
    let contents = fs::read_to_string(&file_path).await?;
    assert!(contents.contains("INFO: Hello World"));
    assert!(contents.starts_with('['));

    Ok(())
}

#[tokio::test]
async fn test_levels_are_plain_in_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("multi.log");
    let logger = Logger::new(Some(file_path.as_path()), true, false).await?;
    logger.info("test info").await?;
    logger.warning("test warning").await?;
    logger.error("test error").await?;
    logger.change("test change").await?;

    let contents = fs::read_to_string(&file_path).await?;

    assert!(contents.contains("INFO: test info"));
    assert!(contents.contains("WARNING: test warning"));
    assert!(contents.contains("ERROR: test error"));
    assert!(contents.contains("CHANGE: test change"));
    assert!(!contents.contains('\x1b'));
    assert_eq!(contents.lines().count(), 4);
    Ok(())
}

#[tokio::test]
async fn test_dev_lines_need_dev_mode() -> anyhow::Result<()> {
    let dir = tempdir()?;

    let quiet_path = dir.path().join("normal.log");
    let normal = Logger::new(Some(quiet_path.as_path()), true, false).await?;
    normal.dev("hidden step").await?;
    assert!(!normal.is_dev());
    assert!(fs::read_to_string(&quiet_path).await?.is_empty());

    let dev_path = dir.path().join("dev.log");
    let dev = Logger::new(Some(dev_path.as_path()), true, true).await?;
    dev.dev("visible step").await?;
    assert!(fs::read_to_string(&dev_path).await?.contains("DEV: visible step"));
    Ok(())
}

#[tokio::test]
async fn test_existing_log_file_is_refused() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("taken.log");
    fs::write(&file_path, "previous session\n").await?;

    let err = Logger::new(Some(file_path.as_path()), true, false).await.unwrap_err();
    let io = err.downcast_ref::<std::io::Error>().unwrap();
    assert_eq!(io.kind(), std::io::ErrorKind::AlreadyExists);
    assert_eq!(fs::read_to_string(&file_path).await?, "previous session\n");
    Ok(())
}

#[tokio::test]
async fn test_concurent_log_writes() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("multi.log");
    let logger = Logger::new(Some(file_path.as_path()), true, false).await?;

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let logger = logger.clone();
            tokio::spawn(async move {
                logger.info(&format!("message {i}")).await.unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.await?;
    }

    let contents = fs::read_to_string(&file_path).await?;
    for i in 0..10 {
        assert!(contents.contains(&format!("message {i}")));
    }

    Ok(())
}

#[tokio::test]
async fn test_silent_logger_accepts_everything() -> anyhow::Result<()> {
    let logger = Logger::silent();
    logger.info("nothing").await?;
    logger.dev("nothing").await?;
    Ok(())
}
