//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only talks to the `log`
//! facade; the `env_logger` backend is installed once from `main`.

mod init;

pub use init::{init_logging, LoggingConfig};
