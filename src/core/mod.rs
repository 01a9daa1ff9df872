//! Core module - events, states, scheduling and shared resources.
//!
//! This module provides the foundation that all other combat systems build upon.

mod combat_log;
mod events;
mod plugin;
mod rng;
mod scheduler;
mod states;

pub use combat_log::{CombatLog, COMBAT_LOG_CAPACITY};
pub use events::*;
pub use plugin::{CombatSet, CorePlugin};
pub use rng::CombatRng;
pub use scheduler::{DueTask, ScheduledTask, Scheduler, TaskId};
pub use states::*;
