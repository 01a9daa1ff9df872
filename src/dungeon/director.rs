//! Wave bookkeeping for the running dungeon.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::core::TaskId;

/// Where dungeon waves spawn.
#[derive(Resource, Debug, Clone, Default)]
pub struct DungeonArena {
    pub center: Vec3,
}

/// Tracks the current dungeon run: level, wave, who is still standing and
/// whether the next wave is already scheduled.
#[derive(Resource, Debug, Default)]
pub struct WaveDirector {
    level: Option<u32>,
    wave: u32,
    alive: HashSet<Entity>,
    pending: Option<TaskId>,
    waves_cleared: u32,
}

impl WaveDirector {
    /// Start a fresh run on `level`.
    pub fn begin(&mut self, level: u32) {
        *self = Self {
            level: Some(level),
            ..default()
        };
    }

    /// Forget the run. Returns the pending next-wave task, if any.
    pub fn reset(&mut self) -> Option<TaskId> {
        let pending = self.pending;
        *self = Self::default();
        pending
    }

    pub fn level(&self) -> Option<u32> {
        self.level
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn waves_cleared(&self) -> u32 {
        self.waves_cleared
    }

    pub fn remaining(&self) -> usize {
        self.alive.len()
    }

    pub fn pending(&self) -> Option<TaskId> {
        self.pending
    }

    /// Only the next wave of the running level may start.
    pub fn accepts(&self, level: u32, wave: u32) -> bool {
        self.level == Some(level) && wave == self.wave + 1
    }

    pub fn wave_started(&mut self, wave: u32, members: impl IntoIterator<Item = Entity>) {
        self.wave = wave;
        self.alive = members.into_iter().collect();
        self.pending = None;
    }

    /// Record a death. Returns true when it cleared the wave.
    pub fn record_death(&mut self, entity: Entity) -> bool {
        if !self.alive.remove(&entity) || !self.alive.is_empty() || self.pending.is_some() {
            return false;
        }
        self.waves_cleared += 1;
        true
    }

    pub fn schedule_next(&mut self, task: TaskId) {
        self.pending = Some(task);
    }
}
