use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::constants::LOG_FILE_NAME;

/// Oldest entries are dropped past this many lines.
const MAX_IN_MEMORY_LOGS: usize = 1000;

/// Shared logger that can be used across the application
///
/// Every `log` record lands in an in-memory buffer shown by the logs dialog.
/// When file logging is enabled the same records are also appended to
/// `<data_dir>/classdeck/classdeck.log`.
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<Vec<String>>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            log_file: None,
        }
    }

    /// Build a logger from the `logging.enabled` setting
    pub fn from_config(enabled: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self::new());
        }

        Self::with_log_file(Self::get_log_file_path()?)
    }

    /// Build a logger that also writes to `path`
    pub fn with_log_file(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        Ok(Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            log_file: Some(path),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.log_file.is_some()
    }

    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Default log file location
    pub fn get_log_file_path() -> Result<PathBuf> {
        Ok(Config::get_data_dir()?.join(LOG_FILE_NAME))
    }

    /// Route the `log` facade into this logger.
    ///
    /// Can only succeed once per process.
    pub fn install(&self, level: log::LevelFilter) -> Result<()> {
        let memory = self.clone();

        let mut dispatch = fern::Dispatch::new()
            .level(level)
            .level_for("hyper", log::LevelFilter::Warn)
            .level_for("reqwest", log::LevelFilter::Warn)
            .chain(fern::Output::call(move |record| {
                memory.push(format!("{} {}", record.level(), record.args()));
            }));

        if let Some(path) = &self.log_file {
            let file = fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {} {}] {}",
                        Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(
                    fern::log_file(path)
                        .with_context(|| format!("Failed to open log file: {}", path.display()))?,
                );
            dispatch = dispatch.chain(file);
        }

        dispatch.apply().context("Logger already installed")?;
        Ok(())
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        self.push(message);
    }

    fn push(&self, message: String) {
        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);

        if let Ok(mut logs) = self.logs.lock() {
            logs.push(formatted_message);
            if logs.len() > MAX_IN_MEMORY_LOGS {
                let overflow = logs.len() - MAX_IN_MEMORY_LOGS;
                logs.drain(..overflow);
            }
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            let mut sorted_logs = logs.clone();
            sorted_logs.reverse();
            sorted_logs
        } else {
            Vec::new()
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
