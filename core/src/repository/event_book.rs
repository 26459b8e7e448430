use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::model::event_book::EventBook;
use crate::repository::file::JsonFile;
use crate::repository::traits::EventBookRepository;

const EVENT_BOOK_FILE_NAME: &str = "event_books.json";

/// Event books in `event_books.json`, seeded with the built-in books.
#[derive(Clone, Debug)]
pub struct FileEventBookRepository {
    file: JsonFile,
}

impl FileEventBookRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let file = JsonFile::open(base_dir, EVENT_BOOK_FILE_NAME, EventBook::builtin)?;
        Ok(FileEventBookRepository { file })
    }
}

impl EventBookRepository for FileEventBookRepository {
    fn create(&self, book: EventBook) -> Result<EventBook> {
        let mut books: Vec<EventBook> = self.file.read()?;
        if books.iter().any(|b| b.id == book.id) {
            return Err(anyhow!("Event book '{}' already exists", book.id));
        }
        books.push(book.clone());
        self.file.write(&books)?;
        Ok(book)
    }

    fn get(&self, id: &str) -> Result<Option<EventBook>> {
        let books: Vec<EventBook> = self.file.read()?;
        Ok(books.into_iter().find(|b| b.id == id))
    }

    fn list(&self) -> Result<Vec<EventBook>> {
        self.file.read()
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut books: Vec<EventBook> = self.file.read()?;
        let initial_len = books.len();
        books.retain(|b| b.id != id);
        if books.len() == initial_len {
            return Err(anyhow!("Event book '{}' not found", id));
        }
        self.file.write(&books)
    }
}
