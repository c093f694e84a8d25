//! Diagnostic logging
//!
//! A minimal `log` backend writing to stderr. The level comes from the `LOG`
//! environment variable and defaults to off, so scripted sessions only ever
//! see the shell's own output.

use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;

pub struct SimpleLogger;

static LOGGER: SimpleLogger = SimpleLogger;

/// Map a `LOG` value to a level filter
pub fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Off,
    }
}

/// Install the logger. Calling it twice keeps the first logger.
pub fn init() {
    let level = level_from_env(std::env::var("LOG").ok().as_deref());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
