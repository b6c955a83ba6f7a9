use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("{0}")]
    Usage(String),
    #[error("{0} is outside todo list range.")]
    OutOfRange(i64),
    #[error("Task is completed\n\t{0}")]
    TaskCompleted(String),
    #[error("No tasks marked done.")]
    NothingToArchive,
    #[error("Invalid filter term: {0}")]
    Filter(#[from] regex::Error),
    #[error("Task list IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TodoError {
    pub fn usage(message: impl Into<String>) -> Self {
        TodoError::Usage(message.into())
    }
}
