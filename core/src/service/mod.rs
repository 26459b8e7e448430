pub mod dto;
pub mod event_book_service;
pub mod task_service;
