//! State definitions that gate which combat systems run.

use bevy::prelude::*;

/// Whether the player is inside a wave dungeon.
///
/// Leaving `InDungeon` cancels the pending next-wave task and clears the
/// remaining wave enemies, so no delayed spawn can fire into a dungeon the
/// player already left.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum DungeonState {
    /// Open world: world spawn points are active.
    #[default]
    Overworld,
    /// Wave dungeon is running.
    InDungeon,
}
