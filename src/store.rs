//! File-backed persistence for the room collection.
//!
//! The entire inventory is one JSON document:
//! ```text
//! { "rooms": [ { "id", "name", "items": [ { "id", "item", "quantity", "category", "notes" } ] } ] }
//! ```
//! Every derived operation is read-full-document, mutate-in-memory,
//! write-full-document. A missing or unreadable document loads as an empty
//! collection rather than an error; stale room/item ids are silent no-ops.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::models::{Item, Room};

/// Errors that can occur while writing the inventory document.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading or writing the document file.
    IoError(PathBuf, io::Error),
    /// Error serializing the document.
    SerializeError(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StoreError::SerializeError(e) => {
                write!(f, "Failed to serialize inventory: {}", e)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::IoError(_, e) => Some(e),
            StoreError::SerializeError(e) => Some(e),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct InventoryDoc {
    rooms: Vec<Room>,
}

/// Partial item update; only the supplied fields overwrite existing ones.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<u32>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

/// CRUD over the persisted room collection.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    data_path: PathBuf,
}

impl InventoryStore {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    /// Loads the full collection.
    ///
    /// Fails soft: a missing, unparsable, or structurally wrong document
    /// yields an empty collection, never an error.
    pub fn load(&self) -> Vec<Room> {
        let contents = match fs::read_to_string(&self.data_path) {
            Ok(contents) => contents,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str::<InventoryDoc>(&contents) {
            Ok(doc) => doc.rooms,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable inventory document {}: {}",
                    self.data_path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Writes the full collection, creating the parent directory if needed.
    pub fn save(&self, rooms: &[Room]) -> Result<(), StoreError> {
        if let Some(parent) = self.data_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::IoError(parent.to_path_buf(), e))?;
        }
        let doc = InventoryDoc {
            rooms: rooms.to_vec(),
        };
        let json = serde_json::to_string_pretty(&doc).map_err(StoreError::SerializeError)?;
        fs::write(&self.data_path, json)
            .map_err(|e| StoreError::IoError(self.data_path.clone(), e))
    }

    /// Creates a room with a fresh identifier and persists it.
    pub fn add_room(&self, name: &str) -> Result<Room, StoreError> {
        let mut rooms = self.load();
        let room = Room::new(name);
        rooms.push(room.clone());
        self.save(&rooms)?;
        Ok(room)
    }

    /// Deletes a room and all of its items. Idempotent.
    pub fn delete_room(&self, room_id: &str) -> Result<(), StoreError> {
        let mut rooms = self.load();
        rooms.retain(|r| r.id != room_id);
        self.save(&rooms)
    }

    /// Renames a room. Unknown id is a silent no-op.
    pub fn rename_room(&self, room_id: &str, new_name: &str) -> Result<(), StoreError> {
        let mut rooms = self.load();
        if let Some(room) = rooms.iter_mut().find(|r| r.id == room_id) {
            room.name = new_name.to_string();
            self.save(&rooms)?;
        }
        Ok(())
    }

    /// Appends a new item to a room.
    ///
    /// Returns `None` without touching the document when the room is unknown.
    pub fn add_item(&self, room_id: &str, name: &str) -> Result<Option<Item>, StoreError> {
        let mut rooms = self.load();
        let room = match rooms.iter_mut().find(|r| r.id == room_id) {
            Some(room) => room,
            None => return Ok(None),
        };
        let item = Item::new(name);
        room.items.push(item.clone());
        self.save(&rooms)?;
        Ok(Some(item))
    }

    /// Merges the supplied fields into an item. Unknown ids are silent no-ops.
    ///
    /// A patched quantity is floored at 1.
    pub fn update_item(
        &self,
        room_id: &str,
        item_id: &str,
        patch: &ItemPatch,
    ) -> Result<(), StoreError> {
        let mut rooms = self.load();
        let item = match rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .and_then(|r| r.item_mut(item_id))
        {
            Some(item) => item,
            None => return Ok(()),
        };
        if let Some(name) = &patch.name {
            item.name = name.clone();
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity.max(1);
        }
        if let Some(category) = &patch.category {
            item.category = category.clone();
        }
        if let Some(notes) = &patch.notes {
            item.notes = notes.clone();
        }
        self.save(&rooms)
    }

    /// Deletes an item from a room. Idempotent.
    pub fn delete_item(&self, room_id: &str, item_id: &str) -> Result<(), StoreError> {
        let mut rooms = self.load();
        if let Some(room) = rooms.iter_mut().find(|r| r.id == room_id) {
            room.items.retain(|i| i.id != item_id);
            self.save(&rooms)?;
        }
        Ok(())
    }
}
