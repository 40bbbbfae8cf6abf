//! Logging utilities.
//!
//! Centralizes logger initialization. Everything else in the crate logs through
//! the `log` facade; diagnostics that callers may want to intercept go through
//! [`crate::diagnostics`] instead.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
