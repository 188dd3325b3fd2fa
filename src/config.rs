use chrono::FixedOffset;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;

use crate::pipeline::RequestContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Daily MLB game data with leverage index
#[derive(Parser, Debug, Clone)]
#[command(name = "warning-track", version, about)]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "warning-track.db")]
    pub database_path: String,

    /// Collection that day documents are written to
    #[arg(long, env = "DB_COLLECTION", default_value = "game-data-by-day")]
    pub db_collection: String,

    /// MLB StatsAPI base URL
    #[arg(long, env = "STATS_API_URL", default_value = "https://statsapi.mlb.com")]
    pub stats_api_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// UTC offset (hours) that decides "today" when no date is requested
    #[arg(long, env = "UTC_OFFSET_HOURS", default_value = "-7", allow_hyphen_values = true)]
    pub utc_offset_hours: i32,

    /// Function name attached to log records
    #[arg(long, env = "FN_NAME", default_value = "GetGameDataByDay")]
    pub function_name: String,

    /// Deployed version attached to log records
    #[arg(long, env = "VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub fn_version: String,

    /// Project identifier attached to log records
    #[arg(long, env = "PROJECT_ID", default_value = "warning-track-backend")]
    pub project_id: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(-12..=14).contains(&self.utc_offset_hours) {
            anyhow::bail!("utc_offset_hours must be between -12 and 14");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        if self.db_collection.trim().is_empty() {
            anyhow::bail!("DB_COLLECTION must not be empty");
        }
        self.listen_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address '{}': {}", self.listen_addr, e))
    }

    pub fn utc_offset(&self) -> anyhow::Result<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow::anyhow!("invalid UTC offset {}h", self.utc_offset_hours))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext {
            function_name: self.function_name.clone(),
            version: self.fn_version.clone(),
            project_id: self.project_id.clone(),
            collection: self.db_collection.clone(),
        }
    }
}
