use chrono::Utc;
use clap::Args;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::codec;
use crate::store::InventoryStore;

/// Export the inventory as a CSV file
#[derive(Args)]
pub struct ExportCommand {
    /// Output file (default: inventory-<date>.csv)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Import a CSV file, replacing the stored inventory
#[derive(Args)]
pub struct ImportCommand {
    /// CSV file to import
    pub file: PathBuf,

    /// Skip confirmation prompt when replacing existing rooms
    #[arg(long, short)]
    pub force: bool,
}

impl ExportCommand {
    pub fn run(&self, store: &InventoryStore) -> Result<(), Box<dyn std::error::Error>> {
        let rooms = store.load();
        let csv = codec::encode(&rooms);

        let path = match &self.output {
            Some(path) => path.clone(),
            None => PathBuf::from(format!("inventory-{}.csv", Utc::now().format("%Y-%m-%d"))),
        };

        // Leading BOM so spreadsheet tools detect UTF-8.
        let mut contents = String::with_capacity(csv.len() + 3);
        contents.push('\u{feff}');
        contents.push_str(&csv);
        fs::write(&path, contents)?;

        println!("Exported {} room(s) to {}", rooms.len(), path.display());
        Ok(())
    }
}

impl ImportCommand {
    pub fn run(&self, store: &InventoryStore) -> Result<(), Box<dyn std::error::Error>> {
        let text = fs::read_to_string(&self.file)?;
        let rooms = codec::decode(&text);

        let existing = store.load();
        if !existing.is_empty() && !self.force {
            print!(
                "Replace {} existing room(s) with {} imported room(s)? [y/N] ",
                existing.len(),
                rooms.len()
            );
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Import cancelled.");
                return Ok(());
            }
        }

        store.save(&rooms)?;
        let items: usize = rooms.iter().map(|r| r.items.len()).sum();
        println!(
            "Imported {} room(s), {} item(s) from {}",
            rooms.len(),
            items,
            self.file.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, Room};
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_bom_and_crlf() {
        let dir = tempdir().unwrap();
        let store = InventoryStore::new(dir.path().join("inventory.json"));
        store
            .save(&[Room::new("Bedroom").with_items(vec![Item::new("Lamp")])])
            .unwrap();

        let output = dir.path().join("out.csv");
        let cmd = ExportCommand {
            output: Some(output.clone()),
        };
        cmd.run(&store).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.starts_with('\u{feff}'));
        assert!(written.contains("Room,Item,Quantity,Category,Notes\r\n"));
        assert!(written.contains("Bedroom,Lamp,1,,"));
    }

    #[test]
    fn test_import_replaces_collection() {
        let dir = tempdir().unwrap();
        let store = InventoryStore::new(dir.path().join("inventory.json"));
        store.save(&[Room::new("Old")]).unwrap();

        let file = dir.path().join("in.csv");
        fs::write(
            &file,
            "\u{feff}Room,Item,Quantity,Category,Notes\r\nKitchen,Plates,12,Fragile,",
        )
        .unwrap();

        let cmd = ImportCommand { file, force: true };
        cmd.run(&store).unwrap();

        let rooms = store.load();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].name, "Kitchen");
        assert_eq!(rooms[0].items[0].quantity, 12);
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let dir = tempdir().unwrap();
        let store = InventoryStore::new(dir.path().join("inventory.json"));
        store
            .save(&[
                Room::new("Kitchen").with_items(vec![
                    Item::new("Pots, pans").with_quantity(3).with_notes("stack"),
                ]),
                Room::new("Garage"),
            ])
            .unwrap();

        let file = dir.path().join("round.csv");
        ExportCommand {
            output: Some(file.clone()),
        }
        .run(&store)
        .unwrap();
        ImportCommand { file, force: true }.run(&store).unwrap();

        let rooms = store.load();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].items[0].name, "Pots, pans");
        assert_eq!(rooms[0].items[0].quantity, 3);
        assert_eq!(rooms[1].name, "Garage");
        assert!(rooms[1].items.is_empty());
    }
}
