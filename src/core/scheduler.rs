//! Delayed tasks keyed by fire time.
//!
//! Every task may name an owning entity. Cancelling by owner removes all of
//! its pending tasks, and a task whose owner no longer exists when it fires
//! is skipped by the dispatcher rather than treated as an error.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy::prelude::*;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Work the scheduler can perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduledTask {
    /// Remove the hit-flash hint from the owner.
    ClearHitFlash,
    /// Despawn the owner after its death grace period.
    Despawn,
    /// Begin the given dungeon wave.
    StartWave { level: u32, wave: u32 },
}

#[derive(Debug)]
struct Entry {
    fire_at: f64,
    id: TaskId,
    owner: Option<Entity>,
    task: ScheduledTask,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the BinaryHeap pops the earliest task first, FIFO on ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// A task that came due.
#[derive(Debug, Clone, PartialEq)]
pub struct DueTask {
    pub id: TaskId,
    pub owner: Option<Entity>,
    pub task: ScheduledTask,
}

/// Priority queue of pending tasks.
#[derive(Resource, Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    next_id: u64,
}

impl Scheduler {
    /// Schedule `task` to fire `delay` seconds after `now`.
    pub fn schedule(&mut self, now: f64, delay: f32, owner: Option<Entity>, task: ScheduledTask) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.push(Entry {
            fire_at: now + f64::from(delay.max(0.0)),
            id,
            owner,
            task,
        });
        id
    }

    /// Cancel one task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|entry| entry.id != id);
        self.queue.len() != before
    }

    /// Cancel every pending task owned by `owner`.
    pub fn cancel_owned_by(&mut self, owner: Entity) -> usize {
        let before = self.queue.len();
        self.queue.retain(|entry| entry.owner != Some(owner));
        before - self.queue.len()
    }

    /// Cancel every pending task matching `predicate`.
    pub fn cancel_matching(&mut self, predicate: impl Fn(&ScheduledTask) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|entry| !predicate(&entry.task));
        before - self.queue.len()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.queue.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pop every task due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: f64) -> Vec<DueTask> {
        let mut due = Vec::new();
        while self.queue.peek().is_some_and(|entry| entry.fire_at <= now) {
            if let Some(entry) = self.queue.pop() {
                due.push(DueTask {
                    id: entry.id,
                    owner: entry.owner,
                    task: entry.task,
                });
            }
        }
        due
    }
}

/// Fire due tasks. Entity-owned tasks whose owner is gone are no-ops.
pub fn run_scheduled_tasks(
    mut commands: Commands,
    time: Res<Time>,
    mut scheduler: ResMut<Scheduler>,
    mut wave_events: EventWriter<super::StartWaveEvent>,
) {
    for due in scheduler.drain_due(time.elapsed_secs_f64()) {
        match due.task {
            ScheduledTask::ClearHitFlash => {
                let Some(owner) = due.owner else { continue };
                if let Some(mut entity) = commands.get_entity(owner) {
                    entity.remove::<crate::combat::HitFlash>();
                }
            }
            ScheduledTask::Despawn => {
                let Some(owner) = due.owner else { continue };
                match commands.get_entity(owner) {
                    Some(entity) => entity.despawn_recursive(),
                    None => debug!("Skipping despawn of {:?}: already gone", owner),
                }
            }
            ScheduledTask::StartWave { level, wave } => {
                wave_events.send(super::StartWaveEvent { level, wave });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_fire_in_time_order() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(0.0, 2.0, None, ScheduledTask::StartWave { level: 1, wave: 2 });
        scheduler.schedule(0.0, 0.2, None, ScheduledTask::ClearHitFlash);
        scheduler.schedule(0.0, 0.2, None, ScheduledTask::Despawn);

        assert!(scheduler.drain_due(0.1).is_empty());
        let due = scheduler.drain_due(0.5);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].task, ScheduledTask::ClearHitFlash);
        assert_eq!(due[1].task, ScheduledTask::Despawn);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = Scheduler::default();
        let id = scheduler.schedule(0.0, 2.0, None, ScheduledTask::StartWave { level: 1, wave: 2 });
        assert!(scheduler.is_pending(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.drain_due(10.0).is_empty());
    }

    #[test]
    fn cancel_by_owner_and_kind() {
        let mut scheduler = Scheduler::default();
        let owner = Entity::from_raw(7);
        let other = Entity::from_raw(8);
        scheduler.schedule(0.0, 1.0, Some(owner), ScheduledTask::ClearHitFlash);
        scheduler.schedule(0.0, 1.0, Some(owner), ScheduledTask::Despawn);
        scheduler.schedule(0.0, 1.0, Some(other), ScheduledTask::Despawn);
        scheduler.schedule(0.0, 1.0, None, ScheduledTask::StartWave { level: 2, wave: 3 });

        assert_eq!(scheduler.cancel_owned_by(owner), 2);
        assert_eq!(
            scheduler.cancel_matching(|task| matches!(task, ScheduledTask::StartWave { .. })),
            1
        );
        let due = scheduler.drain_due(5.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].owner, Some(other));
    }
}
