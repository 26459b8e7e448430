use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::countdown::calculator::{calculate, deadline_of};
use crate::countdown::classifier::{classify, TaskStatus};
use crate::countdown::formatter::{no_deadline, reformat_legacy};
use crate::error::Result;
use crate::language::Language;
use crate::model::task::Task;

/// Shown in place of a countdown the engine could not produce.
pub const FALLBACK: &str = "—";

/// What a list row needs: the countdown text and the status driving its style.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: Uuid,
    pub countdown: String,
    /// `None` when the task could not be rendered.
    pub status: Option<TaskStatus>,
}

/// Renders one task, failing on a missing or invalid deadline.
pub fn render_task(task: &Task, now: DateTime<Utc>, language: Language) -> Result<TaskView> {
    let status = classify(task, now)?;

    let countdown = match (task.schedule(), status) {
        (Some(schedule), _) if schedule.trim().is_empty() => no_deadline(language).to_string(),
        (Some(schedule), _) => reformat_legacy(schedule, language),
        (None, TaskStatus::Completed) => status.label(language).to_string(),
        (None, _) => calculate(deadline_of(task)?, now, language),
    };

    Ok(TaskView {
        id: task.id,
        countdown,
        status: Some(status),
    })
}

/// Renders a whole list. A task that fails is logged and shown as
/// [`FALLBACK`]; the rest of the list is unaffected.
pub fn render_tasks(tasks: &[Task], now: DateTime<Utc>, language: Language) -> Vec<TaskView> {
    tasks
        .iter()
        .map(|task| {
            render_task(task, now, language).unwrap_or_else(|err| {
                warn!(task_id = %task.id, error = %err, "could not render countdown");
                TaskView {
                    id: task.id,
                    countdown: FALLBACK.to_string(),
                    status: None,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 19, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_batch_survives_bad_rows() {
        let good = Task::new(
            "Statistics".to_string(),
            "university".to_string(),
            Some("2024-09-16".to_string()),
        );
        let bad = Task::new("Broken".to_string(), "university".to_string(), Some("???".to_string()));
        let missing = Task::new("Empty".to_string(), "life".to_string(), None);

        let views = render_tasks(&[good.clone(), bad.clone(), missing], now(), Language::Zh);
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].countdown, "已逾期 3天");
        assert_eq!(views[0].status, Some(TaskStatus::Overdue));
        assert_eq!(views[1].id, bad.id);
        assert_eq!(views[1].countdown, FALLBACK);
        assert_eq!(views[1].status, None);
        assert_eq!(views[2].countdown, FALLBACK);
    }

    #[test]
    fn test_recurring_shows_schedule() {
        let task = Task::new_recurring(
            "Piano".to_string(),
            "life".to_string(),
            "每周二 14:00".to_string(),
        );
        let view = render_task(&task, now(), Language::En).unwrap();
        assert_eq!(view.countdown, "Weekly 二 14:00");
        assert_eq!(view.status, Some(TaskStatus::Pending));

        let blank = Task::new_recurring("Blank".to_string(), "life".to_string(), " ".to_string());
        assert_eq!(render_task(&blank, now(), Language::En).unwrap().countdown, "No deadline");
    }

    #[test]
    fn test_completed_shows_label() {
        let mut task = Task::new(
            "Thesis".to_string(),
            "university".to_string(),
            Some((now() - Duration::days(1)).to_rfc3339()),
        );
        task.toggle_complete(now());
        let view = render_task(&task, now(), Language::En).unwrap();
        assert_eq!(view.countdown, "Completed");
        assert_eq!(view.status, Some(TaskStatus::Completed));
    }

    #[test]
    fn test_open_task_shows_countdown() {
        let task = Task::new(
            "Report".to_string(),
            "work".to_string(),
            Some((now() + Duration::hours(30)).to_rfc3339()),
        );
        let view = render_task(&task, now(), Language::En).unwrap();
        assert_eq!(view.countdown, "1 day 6 hours");
        assert_eq!(view.status, Some(TaskStatus::DueSoon));
    }
}
