use shared::domain::BookEntry;
use storage::BookPersistence;
use tracing::{info, warn};

use crate::error::BookError;

/// The user's accumulated entries, kept in insertion order and mirrored to
/// `P` after every change. The in-memory collection only changes when the
/// matching write succeeded.
pub struct AddressBook<P> {
    entries: Vec<BookEntry>,
    persistence: P,
}

impl<P: BookPersistence> AddressBook<P> {
    pub async fn open(persistence: P) -> Result<Self, BookError> {
        let loaded = persistence.load_entries().await.map_err(BookError::Load)?;

        let mut entries: Vec<BookEntry> = Vec::with_capacity(loaded.len());
        for entry in loaded {
            if entries.iter().any(|e| e.id() == entry.id()) {
                warn!(id = entry.id(), "dropping duplicate entry from saved address book");
                continue;
            }
            entries.push(entry);
        }

        info!(count = entries.len(), "address book loaded");
        Ok(Self {
            entries,
            persistence,
        })
    }

    /// Discards whatever is saved, including a book that no longer decodes,
    /// and starts over empty on the same persistence.
    pub async fn reset(persistence: P) -> Result<Self, BookError> {
        persistence.clear_entries().await.map_err(|error| {
            warn!(%error, "failed to discard saved address book");
            BookError::Persistence(error)
        })?;
        info!("saved address book discarded");
        Ok(Self {
            entries: Vec::new(),
            persistence,
        })
    }

    pub async fn add(&mut self, entry: BookEntry) -> Result<(), BookError> {
        if self.contains(entry.id()) {
            return Err(BookError::DuplicateEntry {
                id: entry.id().to_string(),
            });
        }

        self.entries.push(entry);
        if let Err(error) = self.persistence.save_entries(&self.entries).await {
            self.entries.pop();
            warn!(%error, "failed to persist new entry; rolled back");
            return Err(BookError::Persistence(error));
        }
        Ok(())
    }

    /// Returns whether an entry with `id` existed.
    pub async fn remove(&mut self, id: &str) -> Result<bool, BookError> {
        let Some(index) = self.entries.iter().position(|e| e.id() == id) else {
            return Ok(false);
        };

        let removed = self.entries.remove(index);
        if let Err(error) = self.persistence.save_entries(&self.entries).await {
            self.entries.insert(index, removed);
            warn!(%error, id, "failed to persist removal; rolled back");
            return Err(BookError::Persistence(error));
        }
        Ok(true)
    }

    pub async fn clear(&mut self) -> Result<(), BookError> {
        self.persistence.clear_entries().await.map_err(|error| {
            warn!(%error, "failed to clear saved address book");
            BookError::Persistence(error)
        })?;
        self.entries.clear();
        Ok(())
    }

    /// Snapshot of the entries in insertion order.
    pub fn list(&self) -> Vec<BookEntry> {
        self.entries.clone()
    }

    pub fn get(&self, id: &str) -> Option<&BookEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }
}

#[cfg(test)]
#[path = "tests/address_book_tests.rs"]
mod tests;
