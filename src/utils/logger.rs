//! Logger utility for application-wide logging
//!
//! A `log::Log` implementation that appends every record to a log file and
//! echoes it to the console.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Level, Metadata};

/// Custom logger implementation
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    /// Most verbose level that is recorded
    level: Level,
}

impl Logger {
    /// Creates a logger writing to `log_file`, truncating it
    pub fn new(log_file: &Path, level: Level) -> io::Result<Self> {
        let file = File::create(log_file)?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level,
        })
    }

    /// Creates a logger that only echoes to the console
    pub fn console(level: Level) -> Self {
        Logger {
            file: Mutex::new(None),
            level,
        }
    }

    /// Appends a line to the log file
    pub fn write_line(&self, message: &str) -> io::Result<()> {
        if let Ok(mut guard) = self.file.lock() {
            if let Some(file) = guard.as_mut() {
                writeln!(file, "{}", message)?;
                file.flush()?;
            }
        }
        Ok(())
    }

    /// Installs a logger as the global `log` backend
    ///
    /// Falls back to console-only logging when the file cannot be created.
    pub fn init_global_logger(log_file: &Path, verbose: bool) -> io::Result<()> {
        let level = if verbose { Level::Debug } else { Level::Info };
        let global_logger = match Logger::new(log_file, level) {
            Ok(logger) => logger,
            Err(e) => {
                eprintln!("Warning: cannot write log file {}: {}", log_file.display(), e);
                Logger::console(level)
            }
        };

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level.to_level_filter());
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.write_line(&message);

            // Also print to console
            println!("{}", message);
        }
    }

    fn flush(&self) {
        // Already flushing in write_line
    }
}
