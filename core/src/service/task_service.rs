use std::cmp::Ordering;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::countdown::calculator::deadline_of;
use crate::countdown::classifier::{classify, TaskStatus};
use crate::model::task::{Priority, Task};
use crate::repository::TaskRepository;
use crate::service::dto::TaskStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortStrategy {
    /// Earliest deadline first; tasks without a readable deadline go last.
    #[default]
    Deadline,
    /// High priority first, then by deadline.
    Priority,
}

/// The filter chips of a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
}

impl StatusFilter {
    /// Completed goes by the flag alone; open tasks split into overdue and
    /// everything else. Tasks that cannot be classified only show under `All`.
    pub fn matches(self, task: &Task, now: DateTime<Utc>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Overdue => {
                !task.completed && matches!(classify(task, now), Ok(TaskStatus::Overdue))
            }
            StatusFilter::Pending => {
                !task.completed
                    && matches!(classify(task, now), Ok(status) if status != TaskStatus::Overdue)
            }
        }
    }
}

pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new task. One-time tasks must carry a readable deadline.
    pub fn create_task(&self, task: Task) -> Result<Task> {
        if task.title.trim().is_empty() {
            return Err(anyhow!("Task title is required"));
        }
        if !task.is_recurring() {
            deadline_of(&task)?;
        }
        let created = self.repo.create(task)?;
        info!(task_id = %created.id, event_book = %created.event_book_id, "task created");
        Ok(created)
    }

    pub fn get_task(&self, id: &Uuid) -> Result<Task> {
        self.repo.get(id)
    }

    /// Looks a task up by the leading characters of its id.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Task> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Err(anyhow!("Task id is required"));
        }
        let mut matches: Vec<Task> = self
            .repo
            .list()?
            .into_iter()
            .filter(|t| t.id.to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(anyhow!("No task matches id '{}'", prefix)),
            n => Err(anyhow!("Id '{}' is ambiguous ({} tasks match)", prefix, n)),
        }
    }

    pub fn list_tasks(&self, strategy: SortStrategy) -> Result<Vec<Task>> {
        let mut tasks = self.repo.list()?;
        sort_tasks(&mut tasks, strategy);
        Ok(tasks)
    }

    pub fn list_by_event_book(&self, event_book_id: &str, strategy: SortStrategy) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .repo
            .list()?
            .into_iter()
            .filter(|t| t.event_book_id == event_book_id)
            .collect();
        sort_tasks(&mut tasks, strategy);
        Ok(tasks)
    }

    pub fn list_by_folder(&self, folder: &str, strategy: SortStrategy) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .repo
            .list()?
            .into_iter()
            .filter(|t| t.folder.as_deref() == Some(folder))
            .collect();
        sort_tasks(&mut tasks, strategy);
        Ok(tasks)
    }

    pub fn filter_tasks(
        &self,
        filter: StatusFilter,
        now: DateTime<Utc>,
        strategy: SortStrategy,
    ) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .repo
            .list()?
            .into_iter()
            .filter(|t| filter.matches(t, now))
            .collect();
        sort_tasks(&mut tasks, strategy);
        Ok(tasks)
    }

    /// Overwrites the stored task wholesale. Same checks as `create_task`.
    pub fn update_task(&self, task: &Task) -> Result<()> {
        if task.title.trim().is_empty() {
            return Err(anyhow!("Task title is required"));
        }
        if !task.is_recurring() {
            deadline_of(task)?;
        }
        let mut task = task.clone();
        task.updated_at = Some(Utc::now());
        self.repo.update(&task)
    }

    pub fn toggle_complete(&self, id: &Uuid) -> Result<Task> {
        let mut task = self.repo.get(id)?;
        task.toggle_complete(Utc::now());
        self.repo.update(&task)?;
        info!(task_id = %task.id, completed = task.completed, "task completion toggled");
        Ok(task)
    }

    pub fn delete_task(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<TaskStats> {
        Ok(collect_stats(&self.repo.list()?, now))
    }
}

pub fn collect_stats(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };
    for task in tasks {
        if task.completed {
            stats.completed += 1;
            continue;
        }
        match classify(task, now) {
            Ok(TaskStatus::Overdue) => stats.overdue += 1,
            Ok(TaskStatus::DueSoon) => {
                stats.pending += 1;
                stats.due_soon += 1;
            }
            Ok(TaskStatus::Urgent) => {
                stats.pending += 1;
                stats.urgent += 1;
            }
            Ok(_) => stats.pending += 1,
            Err(_) => stats.invalid += 1,
        }
    }
    stats
}

// Standalone functions for pure logic

pub fn sort_tasks(tasks: &mut [Task], strategy: SortStrategy) {
    match strategy {
        SortStrategy::Deadline => tasks.sort_by(compare_deadline),
        SortStrategy::Priority => tasks.sort_by(|a, b| {
            priority_rank(b.priority)
                .cmp(&priority_rank(a.priority))
                .then_with(|| compare_deadline(a, b))
        }),
    }
}

fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::High => 3,
        Priority::Medium => 2,
        Priority::Low => 1,
    }
}

fn compare_deadline(a: &Task, b: &Task) -> Ordering {
    match (deadline_of(a).ok(), deadline_of(b).ok()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.created_at.cmp(&b.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use chrono::{Duration, TimeZone};

    #[derive(Default)]
    struct MockTaskRepo {
        tasks: RefCell<Vec<Task>>,
    }

    impl TaskRepository for MockTaskRepo {
        fn create(&self, task: Task) -> Result<Task> {
            self.tasks.borrow_mut().push(task.clone());
            Ok(task)
        }
        fn get(&self, id: &Uuid) -> Result<Task> {
            self.tasks
                .borrow()
                .iter()
                .find(|t| t.id == *id)
                .cloned()
                .ok_or_else(|| anyhow!("not found"))
        }
        fn list(&self) -> Result<Vec<Task>> {
            Ok(self.tasks.borrow().clone())
        }
        fn update(&self, task: &Task) -> Result<()> {
            let mut tasks = self.tasks.borrow_mut();
            let pos = tasks.iter().position(|t| t.id == task.id).ok_or_else(|| anyhow!("not found"))?;
            tasks[pos] = task.clone();
            Ok(())
        }
        fn delete(&self, id: &Uuid) -> Result<()> {
            self.tasks.borrow_mut().retain(|t| t.id != *id);
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 19, 12, 0, 0).unwrap()
    }

    fn task_due(title: &str, offset: Duration) -> Task {
        Task::new(
            title.to_string(),
            "university".to_string(),
            Some((now() + offset).to_rfc3339()),
        )
    }

    fn service_with(tasks: Vec<Task>) -> TaskService<MockTaskRepo> {
        let repo = MockTaskRepo {
            tasks: RefCell::new(tasks),
        };
        TaskService::new(repo)
    }

    #[test]
    fn test_create_rejects_bad_one_time_tasks() {
        let service = service_with(vec![]);
        let missing = Task::new("No deadline".to_string(), "life".to_string(), None);
        assert!(service.create_task(missing).is_err());

        let invalid = Task::new("Bad".to_string(), "life".to_string(), Some("later".to_string()));
        assert!(service.create_task(invalid).is_err());

        let blank = task_due("  ", Duration::days(1));
        assert!(service.create_task(blank).is_err());

        let recurring = Task::new_recurring("Yoga".to_string(), "fitness".to_string(), "每天 07:00".to_string());
        assert!(service.create_task(recurring).is_ok());
    }

    #[test]
    fn test_update_task_overwrites_and_validates() {
        let original = task_due("Essay", Duration::days(5));
        let service = service_with(vec![original.clone()]);

        let mut edited = original.clone();
        edited.title = "Final essay".to_string();
        edited.deadline = Some((now() + Duration::days(1)).to_rfc3339());
        service.update_task(&edited).unwrap();

        let stored = service.get_task(&original.id).unwrap();
        assert_eq!(stored.title, "Final essay");
        assert_eq!(classify(&stored, now()).unwrap(), TaskStatus::DueSoon);

        let mut broken = stored.clone();
        broken.deadline = Some("someday".to_string());
        assert!(service.update_task(&broken).is_err());
        assert_eq!(service.get_task(&original.id).unwrap().title, "Final essay");
    }

    #[test]
    fn test_list_sorted_by_deadline() {
        let late = task_due("late", Duration::days(10));
        let early = task_due("early", Duration::days(1));
        let recurring = Task::new_recurring("gym".to_string(), "fitness".to_string(), "每周一".to_string());
        let service = service_with(vec![recurring, late, early]);

        let titles: Vec<String> = service
            .list_tasks(SortStrategy::Deadline)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["early", "late", "gym"]);
    }

    #[test]
    fn test_priority_sort_breaks_ties_by_deadline() {
        let mut high_late = task_due("high_late", Duration::days(9));
        high_late.priority = Priority::High;
        let mut high_early = task_due("high_early", Duration::days(2));
        high_early.priority = Priority::High;
        let mut low = task_due("low", Duration::days(1));
        low.priority = Priority::Low;

        let mut tasks = vec![low, high_late, high_early];
        sort_tasks(&mut tasks, SortStrategy::Priority);
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["high_early", "high_late", "low"]);
    }

    #[test]
    fn test_filters() {
        let overdue = task_due("overdue", -Duration::days(3));
        let mut done = task_due("done", -Duration::days(3));
        done.completed = true;
        let open = task_due("open", Duration::days(5));
        let broken = Task::new("broken".to_string(), "work".to_string(), Some("?".to_string()));
        let service = service_with(vec![overdue, done, open, broken]);

        let titles = |filter: StatusFilter| -> Vec<String> {
            service
                .filter_tasks(filter, now(), SortStrategy::Deadline)
                .unwrap()
                .into_iter()
                .map(|t| t.title)
                .collect()
        };
        assert_eq!(titles(StatusFilter::Overdue), vec!["overdue"]);
        assert_eq!(titles(StatusFilter::Completed), vec!["done"]);
        assert_eq!(titles(StatusFilter::Pending), vec!["open"]);
        assert_eq!(titles(StatusFilter::All).len(), 4);
    }

    #[test]
    fn test_toggle_complete_persists() {
        let task = task_due("essay", Duration::days(1));
        let id = task.id;
        let service = service_with(vec![task]);

        let toggled = service.toggle_complete(&id).unwrap();
        assert!(toggled.completed);
        assert!(toggled.completed_at.is_some());
        assert!(service.get_task(&id).unwrap().completed);

        let reopened = service.toggle_complete(&id).unwrap();
        assert!(!reopened.completed);
        assert!(reopened.completed_at.is_none());
    }

    #[test]
    fn test_find_by_prefix() {
        let task = task_due("essay", Duration::days(1));
        let id = task.id;
        let service = service_with(vec![task]);
        let prefix = &id.to_string()[..8];
        assert_eq!(service.find_by_prefix(prefix).unwrap().id, id);
        assert!(service.find_by_prefix("zzzz").is_err());
        assert!(service.find_by_prefix("").is_err());
    }

    #[test]
    fn test_list_by_event_book_and_folder() {
        let mut a = task_due("a", Duration::days(1));
        a.folder = Some("CSC3".to_string());
        let mut b = task_due("b", Duration::days(2));
        b.event_book_id = "work".to_string();
        let service = service_with(vec![a, b]);

        let uni = service.list_by_event_book("university", SortStrategy::Deadline).unwrap();
        assert_eq!(uni.len(), 1);
        assert_eq!(uni[0].title, "a");
        let folder = service.list_by_folder("CSC3", SortStrategy::Deadline).unwrap();
        assert_eq!(folder.len(), 1);
    }

    #[test]
    fn test_stats() {
        let overdue = task_due("overdue", -Duration::hours(1));
        let due_soon = task_due("soon", Duration::days(1));
        let urgent = task_due("urgent", Duration::days(3));
        let later = task_due("later", Duration::days(30));
        let mut done = task_due("done", Duration::days(30));
        done.completed = true;
        let broken = Task::new("broken".to_string(), "work".to_string(), None);
        let service = service_with(vec![overdue, due_soon, urgent, later, done, broken]);

        let stats = service.stats(now()).unwrap();
        assert_eq!(stats.total, 6);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.due_soon, 1);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.invalid, 1);
        assert_eq!(stats.completion_rate(), 17);
    }
}
