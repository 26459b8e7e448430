use anyhow::Result;
use chrono::{DateTime, Utc};
use ratatui::widgets::TableState;
use tracing::warn;
use eventbook_core::{
    render_tasks, AppConfig, EventBook, EventBookRepository, FileEventBookRepository,
    FileSettingsRepository, FileTaskRepository, Language, SettingsRepository, SortStrategy,
    StatusFilter, Task, TaskService, TaskView, UserSettings,
};

use crate::task_input::build_task;

pub enum InputMode {
    Normal,
    Adding,
}

pub struct App {
    pub service: TaskService<FileTaskRepository>,
    pub books: Vec<EventBook>,
    pub tasks: Vec<Task>,
    pub views: Vec<TaskView>,
    pub state: TableState,
    pub filter: StatusFilter,
    pub language: Language,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<String>,
    pub rendered_at: DateTime<Utc>,
    settings_repo: FileSettingsRepository,
    settings: UserSettings,
}

impl App {
    pub fn new(config: AppConfig) -> Result<App> {
        let service = TaskService::new(FileTaskRepository::new(config.base_dir())?);
        let books = FileEventBookRepository::new(config.base_dir())?.list()?;
        let settings_repo = FileSettingsRepository::new(config.base_dir())?;

        let mut app = App {
            service,
            books,
            tasks: Vec::new(),
            views: Vec::new(),
            state: TableState::default(),
            filter: StatusFilter::All,
            language: config.language,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
            rendered_at: Utc::now(),
            settings_repo,
            settings: config.settings,
        };
        app.reload_tasks();
        if !app.tasks.is_empty() {
            app.state.select(Some(0));
        }
        Ok(app)
    }

    pub fn selected_task(&self) -> Option<(&Task, &TaskView)> {
        let i = self.state.selected()?;
        Some((self.tasks.get(i)?, self.views.get(i)?))
    }

    pub fn book_name(&self, id: &str) -> String {
        self.books
            .iter()
            .find(|b| b.id == id)
            .map(|b| format!("{} {}", b.icon, b.display_name(self.language)))
            .unwrap_or_else(|| id.to_string())
    }

    pub fn next(&mut self) {
        if self.tasks.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.tasks.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.tasks.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.tasks.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn toggle_status(&mut self) {
        if let Some(task) = self.state.selected().and_then(|i| self.tasks.get(i)) {
            let id = task.id;
            if let Err(e) = self.service.toggle_complete(&id) {
                self.message = Some(e.to_string());
            }
            self.reload_tasks();
        }
    }

    pub fn delete_task(&mut self) {
        if let Some(i) = self.state.selected() {
            if let Some(task) = self.tasks.get(i) {
                if let Err(e) = self.service.delete_task(&task.id) {
                    self.message = Some(e.to_string());
                }
            }
            self.reload_tasks();

            if self.tasks.is_empty() {
                self.state.select(None);
            } else if i >= self.tasks.len() {
                self.state.select(Some(self.tasks.len() - 1));
            } else {
                self.state.select(Some(i));
            }
        }
    }

    /// Moves to the next filter chip: all → pending → completed → overdue.
    pub fn cycle_filter(&mut self) {
        self.filter = match self.filter {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::Overdue,
            StatusFilter::Overdue => StatusFilter::All,
        };
        self.reload_tasks();
        self.state.select(if self.tasks.is_empty() { None } else { Some(0) });
    }

    /// Switches zh/en, re-renders every countdown and remembers the choice.
    pub fn toggle_language(&mut self) {
        self.language = match self.language {
            Language::Zh => Language::En,
            Language::En => Language::Zh,
        };
        self.settings.language = self.language;
        if let Err(e) = self.settings_repo.save(&self.settings) {
            self.message = Some(e.to_string());
        }
        self.refresh_countdowns(Utc::now());
    }

    /// Re-reads the task file and renders countdowns against the current time.
    pub fn reload_tasks(&mut self) {
        let now = Utc::now();
        match self.service.filter_tasks(self.filter, now, SortStrategy::Deadline) {
            Ok(tasks) => self.tasks = tasks,
            Err(e) => {
                warn!(error = %e, "could not reload tasks");
                self.message = Some(e.to_string());
            }
        }
        if self.state.selected().is_some_and(|i| i >= self.tasks.len()) {
            self.state.select(self.tasks.len().checked_sub(1));
        }
        self.refresh_countdowns(now);
    }

    pub fn refresh_countdowns(&mut self, now: DateTime<Utc>) {
        self.views = render_tasks(&self.tasks, now, self.language);
        self.rendered_at = now;
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
        self.message = None;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_command(&mut self) {
        if !self.input.trim().is_empty() {
            self.submit_add();
        }
        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }

    fn submit_add(&mut self) {
        let created = build_task(&split_input(&self.input)).and_then(|draft| {
            if !self.books.iter().any(|b| b.id == draft.task.event_book_id) {
                anyhow::bail!("Event book '{}' not found", draft.task.event_book_id);
            }
            self.service.create_task(draft.task)
        });

        match created {
            Ok(task) => {
                self.reload_tasks();
                let index = self.tasks.iter().position(|t| t.id == task.id);
                self.state.select(index.or(self.state.selected()));
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }
}

/// Splits on whitespace but keeps double-quoted runs together, so
/// `every:"每周二 14:00"` stays one argument.
pub fn split_input(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_input_keeps_quoted_values() {
        assert_eq!(
            split_input(r#"Swim every:"每周二 14:00" dur:2h"#),
            vec!["Swim", "every:每周二 14:00", "dur:2h"]
        );
        assert_eq!(split_input("  Essay   dea:fri "), vec!["Essay", "dea:fri"]);
        assert!(split_input("   ").is_empty());
    }
}
