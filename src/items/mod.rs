//! Items module - item records, drop tables and loot rolls.

mod data;
mod loot;

pub use data::*;
pub use loot::*;
