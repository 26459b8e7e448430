use anyhow::{anyhow, Result};
use tracing::info;

use crate::model::event_book::EventBook;
use crate::repository::{EventBookRepository, TaskRepository};
use crate::service::dto::EventBookSummary;

pub struct EventBookService<B: EventBookRepository, R: TaskRepository> {
    books: B,
    tasks: R,
}

impl<B: EventBookRepository, R: TaskRepository> EventBookService<B, R> {
    pub fn new(books: B, tasks: R) -> Self {
        Self { books, tasks }
    }

    pub fn get(&self, id: &str) -> Result<EventBook> {
        self.books
            .get(id)?
            .ok_or_else(|| anyhow!("Event book '{}' not found", id))
    }

    /// All books with task counts taken from the current task list.
    pub fn list_summaries(&self) -> Result<Vec<EventBookSummary>> {
        let tasks = self.tasks.list()?;
        let summaries = self
            .books
            .list()?
            .into_iter()
            .map(|book| {
                let in_book = tasks.iter().filter(|t| t.event_book_id == book.id);
                let (task_count, completed_count) =
                    in_book.fold((0, 0), |(all, done), t| (all + 1, done + usize::from(t.completed)));
                EventBookSummary {
                    book,
                    task_count,
                    completed_count,
                }
            })
            .collect();
        Ok(summaries)
    }

    pub fn create(&self, name: &str, description: &str, icon: &str, color: &str) -> Result<EventBook> {
        if name.trim().is_empty() {
            return Err(anyhow!("Event book name is required"));
        }
        let book = EventBook::new(
            name.trim().to_string(),
            description.to_string(),
            icon.to_string(),
            color.to_string(),
        );
        let created = self.books.create(book)?;
        info!(event_book = %created.id, "event book created");
        Ok(created)
    }

    /// Deletes a book that no task refers to.
    pub fn delete(&self, id: &str) -> Result<()> {
        let in_use = self.tasks.list()?.iter().filter(|t| t.event_book_id == id).count();
        if in_use > 0 {
            return Err(anyhow!("Event book '{}' still holds {} task(s)", id, in_use));
        }
        self.books.delete(id)?;
        info!(event_book = %id, "event book deleted");
        Ok(())
    }
}
