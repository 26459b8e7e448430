pub mod event_book;
pub mod settings;
pub mod task;
