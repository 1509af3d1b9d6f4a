use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use thesis_logger::{LevelFilter, Logger};

#[test]
fn json_file_logging_writes_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let log_dir = tmp.path().join("logs");

    let logger = Logger::builder()
        .name("integration-file-logging")
        .console(false)
        .level(LevelFilter::INFO)
        .directory(&log_dir)
        .json(true)
        .init()?;
    assert!(logger.writes_files());

    tracing::info!(council = "HD-01", "council created");
    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let content = fs::read_to_string(log_file)?;
    assert!(content.contains("council created"));
    assert!(content.trim_start().starts_with('{'));
    Ok(())
}
