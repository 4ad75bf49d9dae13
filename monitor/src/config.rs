use anyhow::Result;

/// Runtime configuration, loaded from the environment (`MONITOR_*` vars)
/// with sensible defaults for a locally running backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub refresh_interval_secs: u64,
    pub trade_interval_secs: i64,
    pub trades_limit: u32,
    pub log_lines: u32,
    /// Fixed UTC offset (hours) for the header clock and for interpreting
    /// the backend's wall-clock timestamps. Berlin runs +1 in winter and
    /// +2 in summer; override when the backend host changes DST.
    pub tz_offset_hours: i32,
    pub log_file: String,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load config from a specific .env file, or the default `.env` if None.
    pub fn from_env_file(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => {
                dotenvy::from_filename(p).ok();
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Self::build_from_env()
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::build_from_env()
    }

    fn build_from_env() -> Result<Self> {
        Ok(Self {
            api_base: env("MONITOR_API_BASE", "http://127.0.0.1:5000"),
            refresh_interval_secs: env("MONITOR_REFRESH_SECS", "10").parse().unwrap_or(10),
            trade_interval_secs: env("MONITOR_TRADE_INTERVAL_SECS", "300").parse().unwrap_or(300),
            trades_limit: env("MONITOR_TRADES_LIMIT", "20").parse().unwrap_or(20),
            log_lines: env("MONITOR_LOG_LINES", "100").parse().unwrap_or(100),
            tz_offset_hours: env("MONITOR_TZ_OFFSET_HOURS", "2").parse().unwrap_or(2),
            log_file: env("MONITOR_LOG_FILE", "memon.log"),
            request_timeout_secs: env("MONITOR_REQUEST_TIMEOUT_SECS", "10").parse().unwrap_or(10),
        })
    }
}

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
