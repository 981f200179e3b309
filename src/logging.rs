use log::{LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use crate::error::Result;

#[derive(Debug)]
struct FileLogger {
    log_file: PathBuf,
}

static LOGGER: OnceCell<FileLogger> = OnceCell::new();

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_entry = format!(
                "{} {} - {}\n",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            );

            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_file)
            {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

/// Sends every `log` record to `<log_dir>/log.txt`. The terminal belongs to
/// the UI, so nothing is written to stdout.
pub fn init(log_dir: PathBuf, level: LevelFilter) -> Result<()> {
    create_dir_all(&log_dir)?;

    let logger = LOGGER.get_or_init(|| FileLogger {
        log_file: log_dir.join("log.txt"),
    });
    log::set_logger(logger)?;
    set_level(level);
    Ok(())
}

/// Changes the level once the settings are known.
pub fn set_level(level: LevelFilter) {
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn records_are_appended_from_the_active_level() {
        let dir = tempfile::tempdir().expect("temp dir");
        init(dir.path().join("data"), LevelFilter::Info).expect("install logger");

        log::debug!("hidden before the settings load");
        log::info!("Using default settings");
        set_level(LevelFilter::Debug);
        log::debug!("Player action: look");

        let written = fs::read_to_string(dir.path().join("data").join("log.txt"))
            .expect("log file should exist");
        assert!(!written.contains("hidden before the settings load"));
        assert!(written.contains("INFO - Using default settings"));
        assert!(written.contains("DEBUG - Player action: look"));
    }
}
