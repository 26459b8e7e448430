use thiserror::Error;
use uuid::Uuid;

/// Failures of the countdown engine. Each one is local to a single task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountdownError {
    #[error("invalid deadline: '{value}'")]
    InvalidDeadline { value: String },

    #[error("one-time task {task_id} has no deadline")]
    MissingDeadline { task_id: Uuid },

    #[error("unsupported language code: '{code}'")]
    UnsupportedLanguage { code: String },
}

pub type Result<T, E = CountdownError> = std::result::Result<T, E>;
