//! Per-instance scheduled-task queue.
//!
//! Every engine owns one `TaskQueue` for its timer-driven behaviour (stimulus
//! presentation, elapsed-time ticks, feedback flashes). The host drives time by
//! calling the engine's `advance(now)`, which drains due tasks in due order.
//!
//! ## Cancellation
//!
//! Each queue carries a generation counter. `cancel_all` bumps it, and a task
//! only fires if it was scheduled under the current generation, so nothing
//! scheduled before a reset can mutate state after it. Individual tasks can
//! be cancelled through the `TaskToken` returned by `schedule`.

use serde::{Deserialize, Serialize};

use super::time::Millis;

/// Handle to one scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskToken {
    id: u64,
    generation: u32,
}

#[derive(Clone, Debug)]
struct Scheduled<T> {
    due: Millis,
    id: u64,
    generation: u32,
    task: T,
}

/// Ordered queue of delayed tasks with cancellation tokens.
#[derive(Clone, Debug)]
pub struct TaskQueue<T> {
    entries: Vec<Scheduled<T>>,
    next_id: u64,
    generation: u32,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            generation: 0,
        }
    }

    /// Schedule `task` to fire `delay_ms` after `now`.
    pub fn schedule(&mut self, now: Millis, delay_ms: u64, task: T) -> TaskToken {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Scheduled {
            due: now.after(delay_ms),
            id,
            generation: self.generation,
            task,
        });
        TaskToken {
            id,
            generation: self.generation,
        }
    }

    /// Cancel one task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        if token.generation != self.generation {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|e| e.id != token.id);
        self.entries.len() != before
    }

    /// Cancel every pending task and invalidate all outstanding tokens.
    pub fn cancel_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.entries.clear();
    }

    /// Remove and return the earliest task due at or before `now`,
    /// together with its due time.
    ///
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, T)> {
        let generation = self.generation;
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.generation == generation && e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.id))
            .map(|(i, _)| i)?;
        let entry = self.entries.swap_remove(index);
        Some((entry.due, entry.task))
    }

    /// Number of live pending tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|e| e.generation == self.generation).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut q = TaskQueue::new();
        q.schedule(Millis(0), 300, "c");
        q.schedule(Millis(0), 100, "a");
        q.schedule(Millis(0), 200, "b");

        assert_eq!(q.pop_due(Millis(50)), None);
        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(Millis(1000))).collect();
        assert_eq!(fired, vec![(Millis(100), "a"), (Millis(200), "b"), (Millis(300), "c")]);
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut q = TaskQueue::new();
        q.schedule(Millis(0), 100, 1);
        q.schedule(Millis(0), 100, 2);
        assert_eq!(q.pop_due(Millis(100)), Some((Millis(100), 1)));
        assert_eq!(q.pop_due(Millis(100)), Some((Millis(100), 2)));
    }

    #[test]
    fn test_cancel_single() {
        let mut q = TaskQueue::new();
        let a = q.schedule(Millis(0), 10, "a");
        let b = q.schedule(Millis(0), 20, "b");

        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert_eq!(q.pending(), 1);
        assert_eq!(q.pop_due(Millis(100)), Some((Millis(20), "b")));
        assert!(!q.cancel(b), "fired tasks cannot be cancelled");
    }

    #[test]
    fn test_cancel_all_invalidates_tokens() {
        let mut q = TaskQueue::new();
        let old = q.schedule(Millis(0), 10, "old");
        q.cancel_all();
        assert_eq!(q.pending(), 0);
        assert!(!q.cancel(old));

        q.schedule(Millis(0), 10, "new");
        assert_eq!(q.pop_due(Millis(10)), Some((Millis(10), "new")));
        assert_eq!(q.pop_due(Millis(10)), None);
    }

    #[test]
    fn test_stale_token_leaves_new_tasks_alone() {
        let mut q = TaskQueue::new();
        let stale = q.schedule(Millis(0), 5, "before reset");
        q.cancel_all();
        q.schedule(Millis(0), 5, "after reset");

        assert!(!q.cancel(stale));
        assert_eq!(q.pending(), 1);
        assert_eq!(q.pop_due(Millis(5)), Some((Millis(5), "after reset")));
    }
}
