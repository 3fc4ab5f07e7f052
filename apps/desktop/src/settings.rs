use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use storage::DEFAULT_BOOK_SLOT;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_SETTINGS_FILE: &str = "address-book.toml";
const ENV_PREFIX: &str = "ADDRESS_BOOK";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
    pub database_url: String,
    pub book_slot: String,
}

/// Layers built-in defaults, the optional settings file and
/// `ADDRESS_BOOK__*` variables, later sources winning.
pub fn load_settings(file: Option<&Path>) -> Result<ClientSettings> {
    resolve_settings(file, None)
}

/// `env` replaces the process environment when given.
pub fn resolve_settings(
    file: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<ClientSettings> {
    let mut builder = Config::builder()
        .set_default("server_url", DEFAULT_SERVER_URL)?
        .set_default("database_url", default_database_url())?
        .set_default("book_slot", DEFAULT_BOOK_SLOT)?;

    if let Some(path) = file {
        builder = builder.add_source(File::from(path).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .source(env),
    );

    builder
        .build()
        .context("failed to read address book settings")?
        .try_deserialize()
        .context("invalid address book settings")
}

/// SQLite file under the per-user data dir, or the working directory when
/// the platform has none.
pub fn default_database_url() -> String {
    match dirs::data_local_dir() {
        Some(base) => {
            let path = base.join("address-book").join("book.sqlite3");
            format!("sqlite://{}", path.display())
        }
        None => "sqlite://address-book.sqlite3".to_string(),
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
