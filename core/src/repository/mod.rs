pub mod event_book;
pub mod file;
pub mod settings;
pub mod traits;

// Re-export
pub use event_book::FileEventBookRepository;
pub use file::{resolve_base_dir, FileTaskRepository};
pub use settings::FileSettingsRepository;
pub use traits::{EventBookRepository, SettingsRepository, TaskRepository};
