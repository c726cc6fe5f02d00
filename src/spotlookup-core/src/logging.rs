use crate::{config::LoggingConfig, paths::AppDirs};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "spotlookup.log";

/// Keeps the background file writer alive; dropping it flushes pending lines.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig, dirs: &AppDirs) -> Result<LoggingGuard, LoggingError> {
    let env_filter = build_filter(config)?;

    let (file_writer, file_guard) = if config.file {
        let (writer, guard) = build_file_writer(config, dirs.log_dir())?;
        (Some(writer), Some(guard))
    } else {
        (None, None)
    };

    // stderr keeps stdout free for command output
    let writer = match (config.stdout, file_writer) {
        (true, Some(file)) => BoxMakeWriter::new(std::io::stderr.and(file)),
        (false, Some(file)) => BoxMakeWriter::new(file),
        (_, None) => BoxMakeWriter::new(std::io::stderr),
    };

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(config.stdout && !config.file)
        .with_writer(writer)
        .try_init()
        .map_err(LoggingError::SubscriberInstall)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = config.level.as_filter_directive();
    EnvFilter::try_new(level).map_err(|source| LoggingError::ParseLevel {
        level: level.to_string(),
        source,
    })
}

fn build_file_writer(
    config: &LoggingConfig,
    log_dir: &Path,
) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDirectory {
        path: log_dir.to_path_buf(),
        source,
    })?;
    let file_stem = config.file_name.as_deref().unwrap_or(DEFAULT_LOG_FILE);
    prune_logs(log_dir, file_stem, config.max_log_files.max(1))?;

    let appender = tracing_appender::rolling::daily(log_dir, file_stem);
    Ok(tracing_appender::non_blocking(appender))
}

/// Remove the oldest rolled files so at most `keep` remain.
fn prune_logs(dir: &Path, file_stem: &str, keep: usize) -> Result<Vec<PathBuf>, LoggingError> {
    let listing = fs::read_dir(dir).map_err(|source| LoggingError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut rolled: Vec<_> = listing
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(file_stem))
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.path()))
        })
        .collect();

    if rolled.len() <= keep {
        return Ok(Vec::new());
    }

    rolled.sort();
    let excess = rolled.len() - keep;
    let mut removed = Vec::with_capacity(excess);
    for (_, path) in rolled.into_iter().take(excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::Cleanup {
            path: path.clone(),
            source,
        })?;
        removed.push(path);
    }
    Ok(removed)
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse log level {level}: {source}")]
    ParseLevel {
        level: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    SubscriberInstall(Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to list log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to remove old log file {path}: {source}")]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },
}
