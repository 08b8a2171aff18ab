use clap::{Args, Subcommand};
use std::io::{self, Write};

use super::{find_room, OutputFormat};
use crate::store::InventoryStore;

#[derive(Args)]
pub struct RoomCommand {
    #[command(subcommand)]
    pub command: RoomSubcommand,
}

#[derive(Subcommand)]
pub enum RoomSubcommand {
    /// Create a new room
    Add {
        /// Name of the room
        name: String,
    },

    /// List all rooms
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a room and its items
    Show {
        /// Room ID or name
        identifier: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Rename a room
    Rename {
        /// Room ID or name
        identifier: String,

        /// New name
        name: String,
    },

    /// Delete a room and all of its items
    Delete {
        /// Room ID or name
        identifier: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl RoomCommand {
    pub fn run(&self, store: &InventoryStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RoomSubcommand::Add { name } => {
                if name.trim().is_empty() {
                    return Err("Room name cannot be empty".into());
                }
                let room = store.add_room(name.trim())?;
                println!("Created room '{}' ({})", room.name, room.id);
                Ok(())
            }

            RoomSubcommand::List { format } => {
                let rooms = store.load();
                if rooms.is_empty() {
                    println!("No rooms found");
                    return Ok(());
                }
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&rooms)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<36}  {:<24}  ITEMS", "ID", "NAME");
                        println!("{}", "-".repeat(72));
                        for room in &rooms {
                            println!(
                                "{:<36}  {:<24}  {}",
                                room.id,
                                room.name,
                                room.total_quantity()
                            );
                        }
                        println!("\nTotal: {} room(s)", rooms.len());
                    }
                }
                Ok(())
            }

            RoomSubcommand::Show { identifier, format } => {
                let rooms = store.load();
                let room = match find_room(&rooms, identifier) {
                    Some(room) => room,
                    None => return Err(format!("Room not found: {}", identifier).into()),
                };
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(room)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", room);
                    }
                }
                Ok(())
            }

            RoomSubcommand::Rename { identifier, name } => {
                if name.trim().is_empty() {
                    return Err("Room name cannot be empty".into());
                }
                let rooms = store.load();
                let room_id = match find_room(&rooms, identifier) {
                    Some(room) => room.id.clone(),
                    None => return Err(format!("Room not found: {}", identifier).into()),
                };
                store.rename_room(&room_id, name.trim())?;
                println!("Renamed room to '{}'", name.trim());
                Ok(())
            }

            RoomSubcommand::Delete { identifier, force } => {
                let rooms = store.load();
                let room = match find_room(&rooms, identifier) {
                    Some(room) => room.clone(),
                    None => return Err(format!("Room not found: {}", identifier).into()),
                };

                // Confirm deletion unless --force is used
                if !force {
                    print!(
                        "Delete room '{}' and its {} item(s)? [y/N] ",
                        room.name,
                        room.items.len()
                    );
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                store.delete_room(&room.id)?;
                println!("Deleted room: {}", room.name);
                Ok(())
            }
        }
    }
}
