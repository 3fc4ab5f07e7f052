use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Mutex,
};

use shared::domain::BookEntry;

/// Slot key the address book is stored under unless configured otherwise.
pub const DEFAULT_BOOK_SLOT: &str = "addressBook";

/// Local key-value storage backed by SQLite.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `sqlite::memory:` opens its own database, so the
        // pool must hold on to exactly one.
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(connect_options).await?;

        let storage = Self { pool };
        storage.ensure_slot_table().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn ensure_slot_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS local_slots (
                slot_key   TEXT PRIMARY KEY NOT NULL,
                slot_value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to ensure local_slots table exists")?;
        Ok(())
    }

    pub async fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT slot_value FROM local_slots WHERE slot_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read slot '{key}'"))?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    /// Replaces the slot value with a single statement, so readers see either
    /// the previous or the new value and never a mix.
    pub async fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO local_slots (slot_key, slot_value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(slot_key) DO UPDATE SET slot_value = excluded.slot_value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write slot '{key}'"))?;
        Ok(())
    }

    pub async fn delete_slot(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM local_slots WHERE slot_key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete slot '{key}'"))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Durable home of the address book collection.
#[async_trait]
pub trait BookPersistence: Send + Sync {
    async fn load_entries(&self) -> Result<Vec<BookEntry>>;
    async fn save_entries(&self, entries: &[BookEntry]) -> Result<()>;
    async fn clear_entries(&self) -> Result<()>;
}

/// Stores the book as one JSON array in a [`Storage`] slot.
#[derive(Clone)]
pub struct SlotBookPersistence {
    storage: Storage,
    slot: String,
}

impl SlotBookPersistence {
    pub fn new(storage: Storage, slot: impl Into<String>) -> Self {
        Self {
            storage,
            slot: slot.into(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }
}

#[async_trait]
impl BookPersistence for SlotBookPersistence {
    async fn load_entries(&self) -> Result<Vec<BookEntry>> {
        let Some(raw) = self.storage.read_slot(&self.slot).await? else {
            return Ok(Vec::new());
        };
        decode_entries(&raw, &self.slot)
    }

    async fn save_entries(&self, entries: &[BookEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries).context("failed to encode address book")?;
        self.storage.write_slot(&self.slot, &raw).await
    }

    async fn clear_entries(&self) -> Result<()> {
        self.storage.delete_slot(&self.slot).await?;
        Ok(())
    }
}

/// Process-local persistence, for sessions that should not touch disk.
#[derive(Default)]
pub struct MemoryBookPersistence {
    slot: Mutex<Option<String>>,
}

impl MemoryBookPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl BookPersistence for MemoryBookPersistence {
    async fn load_entries(&self) -> Result<Vec<BookEntry>> {
        let guard = self
            .slot
            .lock()
            .map_err(|_| anyhow!("memory slot lock poisoned"))?;
        match guard.as_deref() {
            Some(raw) => decode_entries(raw, "memory"),
            None => Ok(Vec::new()),
        }
    }

    async fn save_entries(&self, entries: &[BookEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries).context("failed to encode address book")?;
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| anyhow!("memory slot lock poisoned"))?;
        *guard = Some(raw);
        Ok(())
    }

    async fn clear_entries(&self) -> Result<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| anyhow!("memory slot lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

fn decode_entries(raw: &str, slot: &str) -> Result<Vec<BookEntry>> {
    serde_json::from_str(raw)
        .with_context(|| format!("address book in slot '{slot}' is not valid JSON"))
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_in_memory(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
