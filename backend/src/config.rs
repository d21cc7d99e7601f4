use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_BIND: &str = "0.0.0.0:8000";
/// Relative to the workspace root, where the backend is normally launched.
const DEFAULT_STATIC_DIR: &str = "./backend/static";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub static_dir: PathBuf,
    /// Depth of the broadcast channel feeding WebSocket clients.
    pub feed_capacity: usize,
    /// How many broadcast messages `/api/recent` remembers.
    pub recent_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bind = resolve_bind(env_optional("LORAWATCH_BIND"), env_optional("PORT"))?;
        let static_dir = PathBuf::from(env_string(
            "LORAWATCH_STATIC_DIR",
            Some(DEFAULT_STATIC_DIR.to_string()),
        )?);
        let feed_capacity = env_u64("LORAWATCH_FEED_CAPACITY", Some(512))? as usize;
        let recent_capacity = env_u64("LORAWATCH_RECENT_CAPACITY", Some(100))? as usize;

        if feed_capacity == 0 {
            return Err(anyhow!("LORAWATCH_FEED_CAPACITY must be greater than zero"));
        }

        Ok(Self {
            bind,
            static_dir,
            feed_capacity,
            recent_capacity,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            feed_capacity: 512,
            recent_capacity: 100,
        }
    }
}

/// An explicit bind address wins; a bare `PORT` (PaaS convention) binds all interfaces.
fn resolve_bind(bind: Option<String>, port: Option<String>) -> Result<String> {
    if let Some(bind) = bind {
        return Ok(bind);
    }
    match port {
        Some(raw) => {
            let port = raw.parse::<u16>().with_context(|| format!("invalid PORT {raw:?}"))?;
            Ok(format!("0.0.0.0:{port}"))
        }
        None => Ok(DEFAULT_BIND.to_string()),
    }
}

fn env_string(key: &str, default: Option<String>) -> Result<String> {
    match env::var(key) {
        Ok(value) => Ok(value.trim().to_string()),
        Err(_) => default.ok_or_else(|| anyhow!("missing env var {key}")),
    }
}

fn env_u64(key: &str, default: Option<u64>) -> Result<u64> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid {key}")),
        Err(_) => default.ok_or_else(|| anyhow!("missing env var {key}")),
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
