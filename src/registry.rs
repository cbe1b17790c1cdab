// 🗂️ Storage Registry - named storages indexed by a sequential id
//
// Ids start at 1 and are never handed out twice, even after a delete.
// The registry is a plain value: whoever hosts it (web state, TUI app,
// test) owns it and passes it around explicitly.

use crate::storage::Storage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type StorageId = u64;

/// One named storage in the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: StorageId,
    pub name: String,
    pub storage: Storage,
}

impl RegistryEntry {
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

#[derive(Debug, Clone)]
pub struct StorageRegistry {
    entries: BTreeMap<StorageId, RegistryEntry>,
    next_id: StorageId,
}

impl StorageRegistry {
    pub fn new() -> Self {
        StorageRegistry {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Register a storage under the next id and return that id
    pub fn add(&mut self, name: impl Into<String>, storage: Storage) -> StorageId {
        let id = self.next_id;
        self.entries.insert(
            id,
            RegistryEntry {
                id,
                name: name.into(),
                storage,
            },
        );
        self.next_id += 1;
        id
    }

    pub fn get(&self, id: StorageId) -> Option<&RegistryEntry> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: StorageId) -> Option<&mut RegistryEntry> {
        self.entries.get_mut(&id)
    }

    /// Remove an entry; unknown ids are ignored
    pub fn delete(&mut self, id: StorageId) {
        self.entries.remove(&id);
    }

    /// All live entries, ordered by id
    pub fn list_all(&self) -> &BTreeMap<StorageId, RegistryEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The id the next `add` will return
    pub fn next_id(&self) -> StorageId {
        self.next_id
    }
}

impl Default for StorageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
