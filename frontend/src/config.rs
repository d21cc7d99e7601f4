use anyhow::{anyhow, Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8000/ws";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub ws_url: Url,
    /// Pause between reconnect attempts.
    pub reconnect: Duration,
}

impl ClientConfig {
    /// `url_arg` (first CLI argument) beats `LORAWATCH_WS_URL`.
    pub fn from_env(url_arg: Option<String>) -> Result<Self> {
        let raw_url = match url_arg {
            Some(url) => url,
            None => env_string("LORAWATCH_WS_URL", Some(DEFAULT_WS_URL.to_string()))?,
        };
        let ws_url = parse_ws_url(&raw_url)?;
        let reconnect = Duration::from_millis(env_u64("LORAWATCH_RECONNECT_MS", Some(800))?);

        Ok(Self { ws_url, reconnect })
    }
}

/// Accepts ws/wss directly and maps http/https to their socket schemes.
pub fn parse_ws_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).with_context(|| format!("invalid feed url {raw:?}"))?;
    let scheme = match url.scheme() {
        "ws" | "http" => "ws",
        "wss" | "https" => "wss",
        other => return Err(anyhow!("unsupported feed url scheme {other:?}")),
    };
    if url.scheme() != scheme {
        url.set_scheme(scheme)
            .map_err(|_| anyhow!("cannot rewrite scheme of {raw:?}"))?;
    }
    if url.path() == "/" {
        url.set_path("/ws");
    }
    Ok(url)
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
