pub mod config;
pub mod countdown;
pub mod error;
pub mod input;
pub mod language;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use config::AppConfig;
pub use countdown::{calculate, calculate_str, classify, render_tasks, Countdown, TaskStatus, TaskView};
pub use error::CountdownError;
pub use language::Language;
pub use model::event_book::EventBook;
pub use model::settings::UserSettings;
pub use model::task::{Priority, RecurrencePattern, Task, TaskKind};
pub use repository::{
    EventBookRepository, FileEventBookRepository, FileSettingsRepository, FileTaskRepository,
    SettingsRepository, TaskRepository,
};
pub use input::{parse_args, expand_key, ParsedInput};
pub use time::{parse_deadline, parse_duration, parse_human_date};
pub use service::task_service::{TaskService, SortStrategy, StatusFilter, sort_tasks};
pub use service::event_book_service::EventBookService;
pub use service::dto::{EventBookSummary, TaskStats};
