use crate::model::TaskStore;
use log::debug;

/// Aggregate view of a store, recomputed from scratch after every
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub pending: usize,
    pub completed: usize,
    /// Sum of the estimates of every task, done or not.
    pub total_time: i64,
    /// Truncated percentage of completed tasks, 0 for an empty store.
    pub done_percent: usize,
}

pub fn compute(store: &TaskStore) -> Stats {
    let mut stats = Stats::default();
    for task in store.iter() {
        if task.is_completed() {
            stats.completed += 1;
        } else {
            stats.pending += 1;
        }
        stats.total_time = stats.total_time.saturating_add(task.minutes());
    }

    let total = stats.pending + stats.completed;
    if total > 0 {
        stats.done_percent = 100 * stats.completed / total;
    }

    debug!("{:?}", stats);
    stats
}
