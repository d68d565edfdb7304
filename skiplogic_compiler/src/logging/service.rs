//! Logging service and sinks
//!
//! Every sink that prints writes to stderr: stdout belongs to the CLI's
//! compiled expressions and JSON output.

use super::codes::Code;
use super::events::{LogEvent, LogLevel};
use crate::config::constants::compile_time::logging::MEMORY_LOG_BUFFER_SIZE;
use crate::config::LoggingPreferences;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Destination for log events
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level filter in front of a single sink
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Pick the sink from user preferences; structured output wins over
    /// console output, and neither means events are discarded
    pub fn with_preferences(preferences: &LoggingPreferences) -> Self {
        let logger: Arc<dyn Logger> = match (
            preferences.use_structured_logging,
            preferences.enable_console_logging,
        ) {
            (true, _) => Arc::new(StructuredLogger),
            (false, true) => Arc::new(ConsoleLogger),
            (false, false) => Arc::new(NullLogger),
        };
        Self::new(logger, preferences.min_log_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }
}

fn write_stderr(line: &str) {
    // Write failures on stderr are ignored
    let _ = writeln!(std::io::stderr().lock(), "{}", line);
}

/// `[LEVEL] CODE - message (key=value, ...)` lines
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        write_stderr(&event.format());
    }
}

/// One JSON object per line
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        match event.format_json() {
            Ok(line) => write_stderr(&line),
            Err(_) => write_stderr(&event.format()),
        }
    }
}

pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Bounded in-memory sink; the oldest events are dropped first
pub struct MemoryLogger {
    events: Mutex<VecDeque<LogEvent>>,
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.lock().iter().cloned().collect()
    }

    pub fn events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.lock()
            .iter()
            .filter(|event| event.code == code)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();
        if events.len() >= MEMORY_LOG_BUFFER_SIZE {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}
