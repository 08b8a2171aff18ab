//! CSV encoding and decoding for the room collection.
//!
//! Wire format: header `Room,Item,Quantity,Category,Notes`, one row per item,
//! one placeholder row per empty room, CRLF between rows. A field is quoted
//! iff it contains a comma, a double quote, or a line break, with internal
//! quotes doubled.
//!
//! Decoding tolerates the legacy 4-column schema without a Quantity column:
//! when the header carries no "quantity" token, quantity defaults to 1 and
//! category/notes shift left. Rows with an empty room name are skipped; rows
//! group into rooms by exact name in first-seen order, so two rows with the
//! same room name merge into one room even when not adjacent.

use crate::models::{Item, Room};

pub const CSV_HEADER: &str = "Room,Item,Quantity,Category,Notes";

/// Encodes the collection to CSV text (no leading BOM, no trailing newline).
pub fn encode(rooms: &[Room]) -> String {
    let mut rows = vec![CSV_HEADER.to_string()];
    for room in rooms {
        if room.items.is_empty() {
            // Placeholder row so the empty room survives a round trip.
            rows.push(format!("{},,,,", escape_field(&room.name)));
        } else {
            for item in &room.items {
                rows.push(
                    [
                        escape_field(&room.name),
                        escape_field(&item.name),
                        item.quantity.to_string(),
                        escape_field(&item.category),
                        escape_field(&item.notes),
                    ]
                    .join(","),
                );
            }
        }
    }
    rows.join("\r\n")
}

/// Decodes CSV text into a collection. Best-effort: malformed rows are
/// skipped individually, never an error.
pub fn decode(text: &str) -> Vec<Room> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = split_records(text).into_iter();
    let header = match records.next() {
        Some(header) => header,
        None => return Vec::new(),
    };
    let has_quantity = header.to_lowercase().contains("quantity");

    let mut rooms: Vec<Room> = Vec::new();
    for record in records {
        let fields = parse_record(record);
        let room_name = fields.first().map(String::as_str).unwrap_or("");
        if room_name.trim().is_empty() {
            continue;
        }
        let room_index = match rooms.iter().position(|r| r.name == room_name) {
            Some(index) => index,
            None => {
                rooms.push(Room::new(room_name));
                rooms.len() - 1
            }
        };

        let item_name = fields.get(1).map(String::as_str).unwrap_or("");
        if item_name.is_empty() {
            // Empty-room placeholder row; the room exists, no item.
            continue;
        }
        let (quantity, category_index) = if has_quantity {
            let raw = fields.get(2).map(String::as_str).unwrap_or("");
            (parse_quantity(raw), 3)
        } else {
            (1, 2)
        };
        let category = fields.get(category_index).cloned().unwrap_or_default();
        let notes = fields.get(category_index + 1).cloned().unwrap_or_default();
        rooms[room_index].items.push(
            Item::new(item_name)
                .with_quantity(quantity)
                .with_category(category)
                .with_notes(notes),
        );
    }
    rooms
}

fn escape_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Splits text into records on CRLF or LF, ignoring line breaks inside
/// quoted fields. Blank lines are discarded.
fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let bytes = text.as_bytes();
    let mut in_quotes = false;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_quotes = !in_quotes,
            b'\r' | b'\n' if !in_quotes => {
                records.push(&text[start..i]);
                if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < text.len() {
        records.push(&text[start..]);
    }
    records.into_iter().filter(|r| !r.is_empty()).collect()
}

/// Splits one record into fields, consuming quoted fields with embedded
/// commas, line breaks, and doubled quotes.
fn parse_record(record: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(c),
            }
        }
    }
    fields.push(field);
    fields
}

fn parse_quantity(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(q) if q >= 1 => q.min(i64::from(u32::MAX)) as u32,
        _ => 1,
    }
}
