//! Configuration module for the skip-logic compiler
//!
//! Compile-time limits live in [`constants`]; user preferences that may be
//! changed per process (environment or TOML file) live in [`runtime`].

pub mod constants;
pub mod runtime;

pub use runtime::{ConfigError, LoggingPreferences, RuntimeConfig};
