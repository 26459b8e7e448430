use anyhow::Result;
use uuid::Uuid;

use crate::model::event_book::EventBook;
use crate::model::settings::UserSettings;
use crate::model::task::Task;

pub trait TaskRepository {
    fn create(&self, task: Task) -> Result<Task>;
    fn get(&self, id: &Uuid) -> Result<Task>;
    fn list(&self) -> Result<Vec<Task>>;
    fn update(&self, task: &Task) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;
}

pub trait EventBookRepository {
    fn create(&self, book: EventBook) -> Result<EventBook>;
    fn get(&self, id: &str) -> Result<Option<EventBook>>;
    fn list(&self) -> Result<Vec<EventBook>>;
    fn delete(&self, id: &str) -> Result<()>;
}

pub trait SettingsRepository {
    fn load(&self) -> Result<UserSettings>;
    fn save(&self, settings: &UserSettings) -> Result<()>;
}
