use clap::{Args, Subcommand};
use std::io::{self, Write};

use super::{find_item, find_room};
use crate::store::{InventoryStore, ItemPatch};

#[derive(Args)]
pub struct ItemCommand {
    #[command(subcommand)]
    pub command: ItemSubcommand,
}

#[derive(Subcommand)]
pub enum ItemSubcommand {
    /// Add an item to a room
    Add {
        /// Room ID or name
        room: String,

        /// Name of the item
        name: String,
    },

    /// Update an item's fields
    Update {
        /// Room ID or name
        room: String,

        /// Item ID or name
        item: String,

        /// New item name
        #[arg(long)]
        name: Option<String>,

        /// New quantity (floored at 1)
        #[arg(long)]
        quantity: Option<u32>,

        /// New category
        #[arg(long)]
        category: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete an item from a room
    Delete {
        /// Room ID or name
        room: String,

        /// Item ID or name
        item: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ItemCommand {
    pub fn run(&self, store: &InventoryStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ItemSubcommand::Add { room, name } => {
                if name.trim().is_empty() {
                    return Err("Item name cannot be empty".into());
                }
                let rooms = store.load();
                let room_id = match find_room(&rooms, room) {
                    Some(room) => room.id.clone(),
                    None => return Err(format!("Room not found: {}", room).into()),
                };
                match store.add_item(&room_id, name.trim())? {
                    Some(item) => println!("Added '{}' ({})", item.name, item.id),
                    None => println!("Room disappeared, nothing added"),
                }
                Ok(())
            }

            ItemSubcommand::Update {
                room,
                item,
                name,
                quantity,
                category,
                notes,
            } => {
                let rooms = store.load();
                let found = match find_room(&rooms, room) {
                    Some(r) => find_item(r, item).map(|i| (r.id.clone(), i.id.clone())),
                    None => return Err(format!("Room not found: {}", room).into()),
                };
                let (room_id, item_id) = match found {
                    Some(ids) => ids,
                    None => return Err(format!("Item not found: {}", item).into()),
                };

                let patch = ItemPatch {
                    name: name.clone(),
                    quantity: *quantity,
                    category: category.clone(),
                    notes: notes.clone(),
                };
                store.update_item(&room_id, &item_id, &patch)?;
                println!("Updated item");
                Ok(())
            }

            ItemSubcommand::Delete { room, item, force } => {
                let rooms = store.load();
                let found = match find_room(&rooms, room) {
                    Some(r) => find_item(r, item).map(|i| (r.id.clone(), i.clone())),
                    None => return Err(format!("Room not found: {}", room).into()),
                };
                let (room_id, item) = match found {
                    Some(found) => found,
                    None => return Err(format!("Item not found: {}", item).into()),
                };

                // Confirm deletion unless --force is used
                if !force {
                    print!("Delete item '{}'? [y/N] ", item.name);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                store.delete_item(&room_id, &item.id)?;
                println!("Deleted item: {}", item.name);
                Ok(())
            }
        }
    }
}
