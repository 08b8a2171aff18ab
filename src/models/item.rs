use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

fn default_quantity() -> u32 {
    1
}

/// A single inventory entry, owned by exactly one room.
///
/// The name is serialized under the key `item` to match the persisted
/// document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(rename = "item")]
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub notes: String,
}

impl Item {
    /// Create a new item with a fresh random identifier and default fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            quantity: 1,
            category: String::new(),
            notes: String::new(),
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (x{})", self.name, self.quantity)?;
        if !self.category.is_empty() {
            write!(f, " [{}]", self.category)?;
        }
        if !self.notes.is_empty() {
            write!(f, " - {}", self.notes)?;
        }
        Ok(())
    }
}
