use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::calculator::{deadline_of, is_overdue, remaining_days_ceil};
use crate::error::Result;
use crate::language::Language;
use crate::model::task::Task;

const DUE_SOON_DAYS: i64 = 2;
const URGENT_DAYS: i64 = 3;

/// Derived status of a task at a given instant. Never stored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    Overdue,
    DueSoon,
    Urgent,
    Pending,
}

impl TaskStatus {
    /// Pending is the only status shown without a badge.
    pub fn has_badge(self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }

    /// Badge text. Due-soon and urgent share a label; they differ in color only.
    pub fn label(self, language: Language) -> &'static str {
        match self {
            TaskStatus::Completed => language.pick("已完成", "Completed"),
            TaskStatus::Overdue => language.pick("已逾期", "Overdue"),
            TaskStatus::DueSoon | TaskStatus::Urgent => language.pick("即将到期", "Due soon"),
            TaskStatus::Pending => language.pick("待完成", "Pending"),
        }
    }
}

/// Classifies a task at `now`. First match wins:
/// recurring, completed, overdue, due soon (<= 2 days), urgent (<= 3 days).
///
/// Fails only for a one-time, not completed task whose deadline is missing or
/// unparseable.
pub fn classify(task: &Task, now: DateTime<Utc>) -> Result<TaskStatus> {
    if task.is_recurring() {
        return Ok(TaskStatus::Pending);
    }
    if task.completed {
        return Ok(TaskStatus::Completed);
    }
    let deadline = deadline_of(task)?;
    Ok(classify_deadline(deadline, now))
}

/// Status of an open one-time task with the given deadline.
pub fn classify_deadline(deadline: DateTime<Utc>, now: DateTime<Utc>) -> TaskStatus {
    if is_overdue(deadline, now) {
        return TaskStatus::Overdue;
    }

    let days = remaining_days_ceil(deadline, now);
    if (0..=DUE_SOON_DAYS).contains(&days) {
        TaskStatus::DueSoon
    } else if (0..=URGENT_DAYS).contains(&days) {
        TaskStatus::Urgent
    } else {
        TaskStatus::Pending
    }
}
