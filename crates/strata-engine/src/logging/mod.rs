//! Logger setup for binaries. Library code only goes through the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
