/// Message shown to the user whenever a task cannot be created.
pub const INVALID_TASK_ALERT: &str = "Please enter a valid task!";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task text is missing or not a string")]
    MissingText,
    #[error("task text is empty after trimming")]
    EmptyText,
}

