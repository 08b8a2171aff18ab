use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::item::Item;

/// A named grouping of inventory items. Items keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Room {
    /// Create a new empty room with a fresh random identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Total quantity across all items in this room.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity.max(1))).sum()
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        if self.items.is_empty() {
            writeln!(f, "(empty)")?;
        } else {
            for item in &self.items {
                writeln!(f, "  - {}", item)?;
            }
        }
        Ok(())
    }
}
