use serde::{Deserialize, Serialize};

use crate::model::event_book::EventBook;

/// Counters behind the stats cards.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
    pub due_soon: usize,
    pub urgent: usize,
    /// Tasks whose deadline could not be read.
    pub invalid: usize,
}

impl TaskStats {
    /// Completed share of all tasks, in whole percent. 0 for an empty list.
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100 + self.total / 2) / self.total) as u32
    }
}

/// An event book with counts derived from the current task list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventBookSummary {
    pub book: EventBook,
    pub task_count: usize,
    pub completed_count: usize,
}
