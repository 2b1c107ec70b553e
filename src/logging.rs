//! Diagnostic logging to standard error.
//!
//! The level comes from the `LINE_SHELL_LOG` environment variable and defaults
//! to `warn`, so a normal session prints nothing extra.

use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "LINE_SHELL_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Parse a level name; unknown names fall back to `warn`.
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Install the stderr logger with the level from the environment.
///
/// Calling this more than once keeps the first logger.
pub fn init() {
    let level = parse_level(std::env::var(LOG_ENV).ok().as_deref());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_names() {
        assert_eq!(parse_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(parse_level(Some("TRACE")), LevelFilter::Trace);
        assert_eq!(parse_level(Some("off")), LevelFilter::Off);
    }

    #[test]
    fn test_parse_level_defaults_to_warn() {
        assert_eq!(parse_level(None), LevelFilter::Warn);
        assert_eq!(parse_level(Some("loud")), LevelFilter::Warn);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
    }
}
