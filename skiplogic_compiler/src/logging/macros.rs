//! Type-safe logging macros using Code types with Display support for context values

/// Log error with Code type
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::error($code, $message),
            &[$(($key, format!("{}", $value))),*],
        )
    };
}

/// Log success with Code type
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::success($code, $message),
            &[$(($key, format!("{}", $value))),*],
        )
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::info($message),
            &[$(($key, format!("{}", $value))),*],
        )
    };
}

/// Log warning message, optionally tagged with a Code
#[macro_export]
macro_rules! log_warning {
    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::warning_with_code($code, $message),
            &[$(($key, format!("{}", $value))),*],
        )
    };

    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::emit(
            $crate::logging::LogEvent::warning($message),
            &[$(($key, format!("{}", $value))),*],
        )
    };
}

/// Log debug message; context is only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::enabled($crate::logging::LogLevel::Debug) {
            $crate::logging::emit(
                $crate::logging::LogEvent::debug_with_code($code, $message),
                &[$(($key, format!("{}", $value))),*],
            )
        }
    };

    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::enabled($crate::logging::LogLevel::Debug) {
            $crate::logging::emit(
                $crate::logging::LogEvent::debug($message),
                &[$(($key, format!("{}", $value))),*],
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    // The global logger may or may not be initialized by another test in this
    // binary; the macros must expand and run either way.
    #[test]
    fn test_macros_expand_without_panicking() {
        log_error!(codes::response::INVALID_INTEGER, "bad integer", "value" => "abc");
        log_success!(codes::success::CRITERION_SERIALIZED, "done");
        log_info!("info", "count" => 3);
        log_warning!("plain warning");
        log_warning!(code = codes::criterion::OPERATOR_NOT_ALLOWED, "rejected", "operator" => -3);
        log_debug!("debug", "flag" => true);
        log_debug!(code = codes::parser::EMPTY_EXPRESSION, "empty");
    }
}
