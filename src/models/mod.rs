mod item;
mod room;

pub use item::Item;
pub use room::Room;
