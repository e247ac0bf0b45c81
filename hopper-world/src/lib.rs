pub mod error;
pub mod inventory;
pub mod item;
pub mod loot;

pub use error::{LootError, LootErrorKind};
