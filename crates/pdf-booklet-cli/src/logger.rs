use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;

/// One formatted log line
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    fn render(&self, with_target: bool) -> String {
        let time = self.timestamp.format("%H:%M:%S%.3f");
        if with_target {
            format!("{} {:<5} [{}] {}", time, self.level, self.target, self.message)
        } else {
            format!("{} {:<5} {}", time, self.level, self.message)
        }
    }
}

/// Writes log records to stderr, leaving stdout for results
pub struct ConsoleLogger {
    max_level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Level for the `-v`/`-q` flags: info by default, each `-v` one step
    /// more detailed, `-q` warnings only
    pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::Warn;
        }
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let entry = LogEntry {
                timestamp: Local::now(),
                level: record.level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            };

            let line = entry.render(self.max_level >= LevelFilter::Debug);
            // A closed stderr is not worth failing the run over
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(ConsoleLogger::level_for(0, false), LevelFilter::Info);
        assert_eq!(ConsoleLogger::level_for(1, false), LevelFilter::Debug);
        assert_eq!(ConsoleLogger::level_for(3, false), LevelFilter::Trace);
        assert_eq!(ConsoleLogger::level_for(0, true), LevelFilter::Warn);
    }

    #[test]
    fn test_render() {
        let entry = LogEntry {
            timestamp: Local::now(),
            level: Level::Info,
            target: "pdf_booklet::booklet".to_string(),
            message: "Split into 10 book pages".to_string(),
        };
        assert!(entry.render(false).ends_with("INFO  Split into 10 book pages"));
        assert!(entry.render(true).contains("[pdf_booklet::booklet]"));
    }
}
