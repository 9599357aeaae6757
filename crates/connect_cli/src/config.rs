//! Command line and environment configuration.

use crate::commands::Commands;
use clap::Parser;

/// Connect user/organisation store CLI
#[derive(Debug, Parser)]
#[command(name = "connect", about = "User and organisation records", long_about = None)]
pub(crate) struct Cli {
    /// SQLite database file
    #[arg(long, env = "CONNECT_DB_PATH", default_value = "connect.db", global = true)]
    pub db_path: String,

    /// Use a throwaway in-memory database instead of `db_path`
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CONNECT_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when omitted
    #[arg(long, env = "CONNECT_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load configuration from `.env`, environment and arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if arguments cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Missing .env is fine.
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(connect_core::default_log_level())
    }
}
