mod config_cmd;
mod dictate;
mod item;
mod room;
mod transfer;

pub use config_cmd::ConfigCommand;
pub use dictate::DictateCommand;
pub use item::ItemCommand;
pub use room::RoomCommand;
pub use transfer::{ExportCommand, ImportCommand};

use clap::ValueEnum;

use crate::models::{Item, Room};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Resolves a room by id first, then by exact name.
pub(crate) fn find_room<'a>(rooms: &'a [Room], identifier: &str) -> Option<&'a Room> {
    rooms
        .iter()
        .find(|r| r.id == identifier)
        .or_else(|| rooms.iter().find(|r| r.name == identifier))
}

/// Resolves an item within a room by id first, then by exact name.
pub(crate) fn find_item<'a>(room: &'a Room, identifier: &str) -> Option<&'a Item> {
    room.items
        .iter()
        .find(|i| i.id == identifier)
        .or_else(|| room.items.iter().find(|i| i.name == identifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_room_prefers_id_over_name() {
        let first = Room::new("target");
        let mut second = Room::new("other");
        second.id = "target".to_string();
        let rooms = vec![first.clone(), second];

        // "target" matches the second room's id before the first room's name
        assert_eq!(find_room(&rooms, "target").unwrap().name, "other");
        assert_eq!(find_room(&rooms, &first.id).unwrap().name, "target");
    }

    #[test]
    fn test_find_room_by_name_falls_back() {
        let rooms = vec![Room::new("Kitchen")];
        assert!(find_room(&rooms, "Kitchen").is_some());
        assert!(find_room(&rooms, "Pantry").is_none());
    }

    #[test]
    fn test_find_item_by_id_or_name() {
        let item = Item::new("Lamp");
        let room = Room::new("Bedroom").with_items(vec![item.clone()]);
        assert!(find_item(&room, &item.id).is_some());
        assert!(find_item(&room, "Lamp").is_some());
        assert!(find_item(&room, "Rug").is_none());
    }
}
