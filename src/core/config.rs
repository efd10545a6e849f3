//! Application configuration.
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | JSFOODS_DB | jsfoods.db | SQLite database path |
//! | LOG_LEVEL | info | Log verbosity |
//! | LOG_DIR | (unset) | Directory for rolling log files |

#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file.
    pub database_path: String,
    /// Log verbosity: trace | debug | info | warn | error.
    pub log_level: String,
    /// Optional directory for daily-rolling log files.
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("JSFOODS_DB").unwrap_or_else(|_| "jsfoods.db".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
