use std::path::PathBuf;

use eyre::Result;
use log::info;

pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

pub fn log_path() -> PathBuf {
    log_dir().join("ytsum.log")
}

/// Send log records to the log file so stdout stays clean for results
pub fn setup_file_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_path();

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

/// Log to stderr, defaulting to `info` when `RUST_LOG` is unset
pub fn setup_stderr_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
}
