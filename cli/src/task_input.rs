use anyhow::{anyhow, Result};
use chrono::{Duration, Local, SecondsFormat};
use eventbook_core::input::{parse_priority, parse_switch, TASK_KEYS};
use eventbook_core::{parse_args, parse_duration, parse_human_date, Task, TaskKind};

pub const DEFAULT_BOOK: &str = "life";

/// A task built from `add` arguments plus the warnings worth printing.
pub struct TaskDraft {
    pub task: Task,
    pub warnings: Vec<String>,
}

/// Builds a task from words and `key:value` pairs, e.g.
/// `Essay deadline:fri book:university pri:h`.
pub fn build_task(args: &[String]) -> Result<TaskDraft> {
    let mut parsed = parse_args(args);
    let warnings = parsed.normalize_keys(&TASK_KEYS);

    if parsed.name.trim().is_empty() {
        return Err(anyhow!("Task name is required."));
    }

    let book = parsed.get("book").unwrap_or(DEFAULT_BOOK).to_string();
    let mut task = match parsed.get("every") {
        Some(schedule) => {
            let duration = parsed
                .get("duration")
                .map(|d| parse_duration(d).map(duration_label))
                .transpose()?;
            let mut task = Task::new_recurring(parsed.name.clone(), book, schedule.to_string());
            task.kind = TaskKind::Recurring {
                schedule: schedule.to_string(),
                duration,
                pattern: None,
            };
            task
        }
        None => {
            let raw = parsed
                .get("deadline")
                .ok_or_else(|| anyhow!("One-time tasks need deadline:<date> (or every:<schedule>)"))?;
            let deadline = parse_human_date(raw, &Local::now())?;
            Task::new(
                parsed.name.clone(),
                book,
                Some(deadline.to_rfc3339_opts(SecondsFormat::Secs, true)),
            )
        }
    };

    if let Some(priority) = parsed.get("priority") {
        task.priority = parse_priority(priority)?;
    }
    if let Some(description) = parsed.get("description") {
        task.description = description.to_string();
    }
    task.folder = parsed.get("folder").map(str::to_string);
    if let Some(notify) = parsed.get("notify") {
        task.notification_enabled = parse_switch(notify)?;
    }

    Ok(TaskDraft { task, warnings })
}

/// Applies `edit` arguments to an existing task: leading words replace the
/// title, `key:value` pairs replace single fields. Returns key warnings.
pub fn apply_edits(task: &mut Task, args: &[String]) -> Result<Vec<String>> {
    let mut parsed = parse_args(args);
    let warnings = parsed.normalize_keys(&TASK_KEYS);

    if !parsed.name.trim().is_empty() {
        task.title = parsed.name.clone();
    }
    if let Some(book) = parsed.get("book") {
        task.event_book_id = book.to_string();
    }
    if let Some(raw) = parsed.get("deadline") {
        if task.is_recurring() {
            return Err(anyhow!("Recurring tasks have no deadline; use every:<schedule>"));
        }
        let deadline = parse_human_date(raw, &Local::now())?;
        task.deadline = Some(deadline.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    if let TaskKind::Recurring { schedule, duration, .. } = &mut task.kind {
        if let Some(every) = parsed.get("every") {
            *schedule = every.to_string();
        }
        if let Some(raw) = parsed.get("duration") {
            *duration = Some(duration_label(parse_duration(raw)?));
        }
    } else if parsed.get("every").is_some() || parsed.get("duration").is_some() {
        return Err(anyhow!("every:/duration: only apply to recurring tasks"));
    }
    if let Some(priority) = parsed.get("priority") {
        task.priority = parse_priority(priority)?;
    }
    if let Some(description) = parsed.get("description") {
        task.description = description.to_string();
    }
    if let Some(folder) = parsed.get("folder") {
        task.folder = (!folder.is_empty()).then(|| folder.to_string());
    }
    if let Some(notify) = parsed.get("notify") {
        task.notification_enabled = parse_switch(notify)?;
    }

    Ok(warnings)
}

/// Stored in the Chinese form the countdown formatter knows how to localize.
fn duration_label(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    if minutes >= 1440 && minutes % 1440 == 0 {
        format!("{}天", minutes / 1440)
    } else if minutes >= 60 && minutes % 60 == 0 {
        format!("{}小时", minutes / 60)
    } else {
        format!("{}分钟", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_one_time_task() {
        let draft = build_task(&args(&["Essay", "dea:2025-11-13", "b:university", "pri:h", "fo:CSC3"])).unwrap();
        assert_eq!(draft.task.title, "Essay");
        assert_eq!(draft.task.event_book_id, "university");
        assert_eq!(draft.task.priority, eventbook_core::Priority::High);
        assert_eq!(draft.task.folder.as_deref(), Some("CSC3"));
        assert!(draft.task.deadline.is_some());
        assert!(draft.warnings.is_empty());
    }

    #[test]
    fn test_recurring_task() {
        let draft = build_task(&args(&["Swim", "every:每周二 14:00", "dur:2h"])).unwrap();
        assert_eq!(draft.task.event_book_id, DEFAULT_BOOK);
        assert_eq!(draft.task.deadline, None);
        assert_eq!(
            draft.task.kind,
            TaskKind::Recurring {
                schedule: "每周二 14:00".to_string(),
                duration: Some("2小时".to_string()),
                pattern: None,
            }
        );
    }

    #[test]
    fn test_requires_name_and_deadline() {
        assert!(build_task(&args(&["dea:tomorrow"])).is_err());
        assert!(build_task(&args(&["Essay"])).is_err());
        assert!(build_task(&args(&["Essay", "dea:whenever"])).is_err());
    }

    #[test]
    fn test_recurring_duration_in_chinese() {
        let draft = build_task(&args(&["Swim", "every:每周二 14:00", "dur:2小时"])).unwrap();
        match draft.task.kind {
            TaskKind::Recurring { duration, .. } => assert_eq!(duration.as_deref(), Some("2小时")),
            TaskKind::OneTime => panic!("expected a recurring task"),
        }
        assert!(build_task(&args(&["Essay", "dea:+3天"])).is_ok());
    }

    #[test]
    fn test_apply_edits() {
        let mut task = build_task(&args(&["Essay", "dea:2025-11-13", "fo:CSC3"])).unwrap().task;
        let before = task.deadline.clone();

        let warnings = apply_edits(&mut task, &args(&["Final", "essay", "pri:h", "fo:", "dea:+3天"])).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(task.title, "Final essay");
        assert_eq!(task.priority, eventbook_core::Priority::High);
        assert_eq!(task.folder, None);
        assert_ne!(task.deadline, before);

        assert!(apply_edits(&mut task, &args(&["every:每天"])).is_err());
    }

    #[test]
    fn test_apply_edits_to_recurring() {
        let mut task = build_task(&args(&["Swim", "every:每周二 14:00"])).unwrap().task;
        apply_edits(&mut task, &args(&["every:每周四 18:00", "dur:90m"])).unwrap();
        assert_eq!(task.title, "Swim");
        assert_eq!(task.schedule(), Some("每周四 18:00"));
        assert!(apply_edits(&mut task, &args(&["dea:tomorrow"])).is_err());
    }

    #[test]
    fn test_duration_label() {
        assert_eq!(duration_label(Duration::hours(2)), "2小时");
        assert_eq!(duration_label(Duration::minutes(90)), "90分钟");
        assert_eq!(duration_label(Duration::days(1)), "1天");
    }
}
