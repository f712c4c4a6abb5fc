//! Process configuration, read once at startup from environment variables.

use std::path::PathBuf;

pub struct Settings {
    pub host: String,
    pub port: u16,
    pub config_path: PathBuf,
    pub snapshot_dir: PathBuf,
    pub snapshot_interval_ms: u64,
    pub admin_api_key: Option<String>,
    pub max_idempotency_entries: usize,
    pub e2e_mode: bool,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let port: u16 = env_or("PORT", "8080").parse()?;
        let snapshot_interval_ms: u64 = env_or("SNAPSHOT_INTERVAL_MS", "30000").parse()?;
        let max_idempotency_entries: usize = env_or("GAMENG_MAX_IDEMPOTENCY_ENTRIES", "1000").parse()?;

        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port,
            config_path: PathBuf::from(env_or("CONFIG_PATH", "config.json")),
            snapshot_dir: PathBuf::from(env_or("SNAPSHOT_DIR", "snapshots")),
            snapshot_interval_ms,
            admin_api_key: std::env::var("ADMIN_API_KEY").ok(),
            max_idempotency_entries,
            e2e_mode: std::env::var("GAMENG_E2E").is_ok_and(|v| v == "1"),
        })
    }

    pub fn log_level(&self) -> String {
        env_or("LOG_LEVEL", "info")
    }
}
