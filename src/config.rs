use crate::errors::ServerError;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line / environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "livability_api")]
#[command(about = "City livability metrics over HTTP")]
#[command(version)]
pub struct Config {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000", env = "LIVABILITY_BIND")]
    pub bind: SocketAddr,

    /// SQLite file holding the city dataset
    #[arg(long, default_value = "data/cities.sqlite3", env = "LIVABILITY_DB")]
    pub database: String,

    /// Schema applied at startup
    #[arg(long, default_value = "sql/schema.sql")]
    pub schema: String,

    /// Pre-fitted livability scaler artifact (JSON)
    #[arg(long, default_value = "data/livability_scaler.json", env = "LIVABILITY_SCALER")]
    pub scaler: PathBuf,

    /// CSV export to load into the dataset before serving
    #[arg(long, env = "LIVABILITY_IMPORT_CSV")]
    pub import_csv: Option<PathBuf>,

    /// Base URL of the walkscore site
    #[arg(long, default_value = "https://www.walkscore.com", env = "WALKSCORE_URL")]
    pub walkscore_url: String,

    /// Timeout for a single walkscore page fetch
    #[arg(long, default_value = "10")]
    pub walkscore_timeout_secs: u64,

    /// Maximum number of worker threads
    #[arg(long, default_value = "8")]
    pub workers: usize,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.workers == 0 {
            return Err(ServerError::Config("--workers must be at least 1".into()));
        }
        if self.walkscore_timeout_secs == 0 {
            return Err(ServerError::Config(
                "--walkscore-timeout-secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn walkscore_timeout(&self) -> Duration {
        Duration::from_secs(self.walkscore_timeout_secs)
    }
}
