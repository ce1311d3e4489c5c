use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::db::Database;
use crate::models::{BillAsset, ExpenseRecord};

/// A value kept in an ordered, persisted collection.
pub(crate) trait Record: Serialize + DeserializeOwned + Clone {
    /// Storage key the whole collection lives under.
    const STORAGE_KEY: &'static str;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

impl Record for ExpenseRecord {
    const STORAGE_KEY: &'static str = "expenses";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Record for BillAsset {
    const STORAGE_KEY: &'static str = "bills";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Authoritative in-memory copy of one persisted collection.
///
/// Every mutation serializes the would-be collection and writes it before
/// swapping it in, so a failed write leaves both the stored value and the
/// in-memory copy exactly as they were.
pub(crate) struct Store<T> {
    items: Vec<T>,
}

impl<T: Record> Store<T> {
    /// Read the collection, falling back to empty when the key is absent or
    /// its value cannot be parsed.
    pub(crate) fn load(db: &Database) -> Self {
        let key = T::STORAGE_KEY;
        let raw = match db.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self { items: Vec::new() },
            Err(e) => {
                warn!(key, error = %e, "Could not read stored collection, starting empty");
                return Self { items: Vec::new() };
            }
        };

        let mut items: Vec<T> = match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(key, error = %e, "Stored collection is malformed, starting empty");
                return Self { items: Vec::new() };
            }
        };

        let repaired = assign_missing_ids(&mut items);
        let store = Self { items };
        if repaired > 0 {
            debug!(key, repaired, "Assigned identifiers to stored records");
            if let Err(e) = store.save(db) {
                warn!(key, error = %e, "Could not persist repaired identifiers");
            }
        }
        debug!(key, count = store.items.len(), "Loaded collection");
        store
    }

    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub(crate) fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Creation-timestamp identifier, bumped past every id already in use.
    pub(crate) fn next_id(&self) -> i64 {
        next_id_after(self.items.iter().map(Record::id).max().unwrap_or(0))
    }

    pub(crate) fn save(&self, db: &Database) -> Result<()> {
        persist(db, &self.items)
    }

    pub(crate) fn append(&mut self, db: &Database, item: T) -> Result<()> {
        if self.position(item.id()).is_some() {
            anyhow::bail!("Identifier {} is already in use", item.id());
        }
        let mut next = self.items.clone();
        next.push(item);
        self.commit(db, next)
    }

    /// Append many items with a single write. Returns how many were added.
    pub(crate) fn append_batch(&mut self, db: &Database, items: Vec<T>) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }
        let mut ids: HashSet<i64> = self.items.iter().map(Record::id).collect();
        for item in &items {
            if !ids.insert(item.id()) {
                anyhow::bail!("Identifier {} is already in use", item.id());
            }
        }
        let count = items.len();
        let mut next = self.items.clone();
        next.extend(items);
        self.commit(db, next)?;
        Ok(count)
    }

    /// Replace the item at `position`. The replaced item's identifier is kept.
    pub(crate) fn replace_at(&mut self, db: &Database, position: usize, mut item: T) -> Result<()> {
        let current = self
            .items
            .get(position)
            .ok_or_else(|| anyhow::anyhow!("No record at position {position}"))?;
        item.set_id(current.id());
        let mut next = self.items.clone();
        next[position] = item;
        self.commit(db, next)
    }

    pub(crate) fn remove_at(&mut self, db: &Database, position: usize) -> Result<T> {
        if position >= self.items.len() {
            anyhow::bail!("No record at position {position}");
        }
        let mut next = self.items.clone();
        let removed = next.remove(position);
        self.commit(db, next)?;
        Ok(removed)
    }

    pub(crate) fn replace(&mut self, db: &Database, id: i64, item: T) -> Result<()> {
        let position = self
            .position(id)
            .ok_or_else(|| anyhow::anyhow!("Record {id} no longer exists"))?;
        self.replace_at(db, position, item)
    }

    pub(crate) fn remove(&mut self, db: &Database, id: i64) -> Result<T> {
        let position = self
            .position(id)
            .ok_or_else(|| anyhow::anyhow!("Record {id} no longer exists"))?;
        self.remove_at(db, position)
    }

    fn commit(&mut self, db: &Database, next: Vec<T>) -> Result<()> {
        persist(db, &next)?;
        debug!(key = T::STORAGE_KEY, count = next.len(), "Saved collection");
        self.items = next;
        Ok(())
    }
}

fn persist<T: Record>(db: &Database, items: &[T]) -> Result<()> {
    let json = serde_json::to_string(items)
        .with_context(|| format!("Failed to serialize '{}'", T::STORAGE_KEY))?;
    db.set_item(T::STORAGE_KEY, &json)
}

fn next_id_after(max: i64) -> i64 {
    chrono::Utc::now().timestamp_millis().max(max + 1)
}

/// Give every record without an identifier (or with a duplicate one) a fresh
/// id, in collection order. Returns how many were changed.
fn assign_missing_ids<T: Record>(items: &mut [T]) -> usize {
    let mut next = next_id_after(items.iter().map(Record::id).max().unwrap_or(0));
    let mut seen = HashSet::new();
    let mut repaired = 0;
    for item in items.iter_mut() {
        if item.id() <= 0 || !seen.insert(item.id()) {
            item.set_id(next);
            seen.insert(next);
            next += 1;
            repaired += 1;
        }
    }
    repaired
}

#[cfg(test)]
mod tests;
