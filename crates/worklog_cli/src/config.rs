//! Runtime configuration for the CLI.
//!
//! # Responsibility
//! - Resolve log and database settings from flags and environment.
//!
//! # Invariants
//! - A flag always wins over its environment variable.
//! - File logging is enabled only when a log directory is configured.

use clap::Args;
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "WORKLOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "WORKLOG_LOG_DIR";
pub const ENV_DB: &str = "WORKLOG_DB";
pub const DEFAULT_DB_FILE_NAME: &str = "worklog.sqlite3";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct Config {
    /// SQLite ledger file
    #[arg(long = "db", global = true, env = ENV_DB, default_value = DEFAULT_DB_FILE_NAME)]
    pub db_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = ENV_LOG_LEVEL, default_value = worklog_core::default_log_level())]
    pub log_level: String,

    /// Directory for rolling log files; logging stays off when unset
    #[arg(long, global = true, env = ENV_LOG_DIR)]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Starts file logging when a directory is configured.
    pub fn init_logging(&self) {
        let Some(log_dir) = self.log_dir.as_deref() else {
            return;
        };
        if let Err(err) = worklog_core::init_logging(&self.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }
}
