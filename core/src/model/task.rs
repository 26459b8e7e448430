use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

/// Structured form of a recurring schedule. Only stored; nothing schedules from it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecurrencePattern {
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// 0 = Sunday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
    /// HH:MM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    #[default]
    OneTime,
    Recurring {
        /// Human readable schedule, e.g. "每周二 14:00".
        schedule: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<RecurrencePattern>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,

    // Kept as the ISO-8601 text handed over by storage. Parsing happens in the
    // countdown engine so a bad value fails one task, not the whole file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,

    #[serde(default)]
    pub kind: TaskKind,
    #[serde(default)]
    pub priority: Priority,

    /// Free-form user label. Has no effect on status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub event_book_id: String,

    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notification_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_color: Option<String>,

    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: String, event_book_id: String, deadline: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description: String::new(),
            deadline,
            kind: TaskKind::OneTime,
            priority: Priority::default(),
            folder: None,
            event_book_id,
            completed: false,
            notification_enabled: false,
            folder_color: None,
            created_at: now,
            updated_at: Some(now),
            completed_at: None,
        }
    }

    pub fn new_recurring(title: String, event_book_id: String, schedule: String) -> Self {
        let mut task = Self::new(title, event_book_id, None);
        task.kind = TaskKind::Recurring {
            schedule,
            duration: None,
            pattern: None,
        };
        task
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self.kind, TaskKind::Recurring { .. })
    }

    pub fn schedule(&self) -> Option<&str> {
        match &self.kind {
            TaskKind::Recurring { schedule, .. } => Some(schedule.as_str()),
            TaskKind::OneTime => None,
        }
    }

    /// Flips the completion flag and keeps `completed_at` in step with it.
    pub fn toggle_complete(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
        self.updated_at = Some(now);
    }
}
