//! Logging utilities.
//!
//! Centralizes logger initialization for the demo binaries. Uses the
//! standard `log` facade; the backend is `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig};
