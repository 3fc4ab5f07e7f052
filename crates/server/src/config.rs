use std::fs;

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub lookup_latency_ms: u64,
    pub fixtures_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            lookup_latency_ms: 500,
            fixtures_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    lookup_latency_ms: Option<u64>,
    fixtures_path: Option<String>,
}

/// Defaults, then `server.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn resolve_settings(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match parse_file_settings(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.lookup_latency_ms {
                    settings.lookup_latency_ms = v;
                }
                if let Some(v) = file_cfg.fixtures_path {
                    settings.fixtures_path = Some(v);
                }
            }
            Err(error) => warn!(%error, "ignoring unreadable {SETTINGS_FILE}"),
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__LOOKUP_LATENCY_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.lookup_latency_ms = parsed,
            Err(_) => warn!(
                value = %v,
                kept = settings.lookup_latency_ms,
                "APP__LOOKUP_LATENCY_MS is not a number"
            ),
        }
    }

    if let Some(v) = env("APP__FIXTURES_PATH") {
        settings.fixtures_path = Some(v).filter(|path| !path.trim().is_empty());
    }

    settings
}

fn parse_file_settings(raw: &str) -> anyhow::Result<FileSettings> {
    toml::from_str(raw).context("invalid settings file")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
