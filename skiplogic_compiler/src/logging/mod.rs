//! Global logging module for the skip-logic compiler
//!
//! Provides a process-wide logging service behind a clean macro interface.
//! Every macro is a no-op until [`init_global_logging`] (or
//! [`init_global_logging_with_service`]) has been called.

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

use crate::config::LoggingPreferences;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, Logger, LoggingService, MemoryLogger, NullLogger, StructuredLogger,
};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from user preferences
pub fn init_global_logging(preferences: &LoggingPreferences) -> Result<(), String> {
    let service = Arc::new(LoggingService::with_preferences(preferences));
    init_global_logging_with_service(service.clone())?;

    service.log_success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    );
    Ok(())
}

/// Initialize with custom service (primarily for testing)
///
/// A second initialization is refused and reported through the logger that
/// is already installed.
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER.set(service).map_err(|_| {
        crate::log_error!(
            codes::system::INITIALIZATION_FAILURE,
            "Global logger already initialized"
        );
        "Global logger already initialized".to_string()
    })
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Whether an event at `level` would reach the global logger
pub fn enabled(level: LogLevel) -> bool {
    try_get_global_logger().is_some_and(|logger| logger.should_log(level))
}

/// Attach context and forward to the global logger (used by the macros)
pub fn emit(event: LogEvent, context: &[(&str, String)]) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    if !logger.should_log(event.level) {
        return;
    }

    let event = context
        .iter()
        .fold(event, |event, (key, value)| event.with_context(key, value));
    logger.log_event(event);
}
