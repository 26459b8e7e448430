use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::model::task::Task;
use crate::repository::traits::TaskRepository;

const DEFAULT_DIR_NAME: &str = ".eventbook";
const DEFAULT_FILE_NAME: &str = "tasks.json";

/// Data directory: the explicit one if given, otherwise `~/.eventbook`.
/// Created when missing.
pub fn resolve_base_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match base_dir {
        Some(dir) => dir,
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            home_dir.join(DEFAULT_DIR_NAME)
        }
    };
    fs::create_dir_all(&path)
        .with_context(|| format!("Could not create data directory {}", path.display()))?;
    Ok(path)
}

/// One JSON document on disk, created with an initial value on first use.
#[derive(Clone, Debug)]
pub(crate) struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub(crate) fn open<T, F>(base_dir: Option<PathBuf>, file_name: &str, initial: F) -> Result<Self>
    where
        T: Serialize,
        F: FnOnce() -> T,
    {
        let path = resolve_base_dir(base_dir)?.join(file_name);
        let file = JsonFile { path };
        if !file.path.exists() {
            debug!(path = %file.path.display(), "initializing data file");
            file.write(&initial())?;
        }
        Ok(file)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn read<T: DeserializeOwned>(&self) -> Result<T> {
        let file = File::open(&self.path)
            .with_context(|| format!("Could not open {}", self.path.display()))?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)
            .with_context(|| format!("Could not parse {}", self.path.display()))?;
        Ok(value)
    }

    pub(crate) fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Could not write {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct FileTaskRepository {
    file: JsonFile,
}

impl FileTaskRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let file = JsonFile::open(base_dir, DEFAULT_FILE_NAME, Vec::<Task>::new)?;
        Ok(FileTaskRepository { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = self.file.read()?;
        debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        debug!(count = tasks.len(), "saving tasks");
        self.file.write(tasks)
    }
}

impl TaskRepository for FileTaskRepository {
    fn create(&self, task: Task) -> Result<Task> {
        let mut tasks = self.read_tasks()?;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(anyhow!("Task with ID {} already exists", task.id));
        }
        tasks.push(task.clone());
        self.write_tasks(&tasks)?;
        Ok(task)
    }

    fn get(&self, id: &Uuid) -> Result<Task> {
        self.read_tasks()?
            .into_iter()
            .find(|t| t.id == *id)
            .ok_or_else(|| anyhow!("Task with ID {} not found", id))
    }

    fn list(&self) -> Result<Vec<Task>> {
        self.read_tasks()
    }

    fn update(&self, task: &Task) -> Result<()> {
        let mut tasks = self.read_tasks()?;
        if let Some(pos) = tasks.iter().position(|t| t.id == task.id) {
            tasks[pos] = task.clone();
            self.write_tasks(&tasks)?;
            Ok(())
        } else {
            Err(anyhow!("Task with ID {} not found", task.id))
        }
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut tasks = self.read_tasks()?;
        let initial_len = tasks.len();
        tasks.retain(|t| t.id != *id);

        if tasks.len() == initial_len {
            return Err(anyhow!("Task with ID {} not found", id));
        }

        self.write_tasks(&tasks)?;
        Ok(())
    }
}
