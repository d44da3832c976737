//! Browser console sink for the `log` facade.

use gloo::console;
use log::{Level, LevelFilter, Log, Metadata, Record};

pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl ConsoleLogger {
    fn line(record: &Record) -> String {
        format!("[{}] {}: {}", record.level(), record.target(), record.args())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::line(record);
        match record.level() {
            Level::Error => console::error!(line),
            Level::Warn => console::warn!(line),
            Level::Info => console::info!(line),
            Level::Debug | Level::Trace => console::debug!(line),
        }
    }

    fn flush(&self) {}
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the console logger. A second call leaves the first logger in place.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(default_level());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format_names_level_and_target() {
        let line = ConsoleLogger::line(
            &Record::builder()
                .level(Level::Warn)
                .target("finance_dashboard_frontend::page")
                .args(format_args!("missing host"))
                .build(),
        );
        assert_eq!(line, "[WARN] finance_dashboard_frontend::page: missing host");
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        assert_eq!(log::max_level(), default_level());
    }
}
