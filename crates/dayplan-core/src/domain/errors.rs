//! Errors - error types and their classification.
//!
//! `StoreError` is what a repository reports; `DayplanError` is what the
//! view-model hands to the presentation layer. An absent target id is never
//! an error (toggle/rename/delete of a missing task are silent no-ops).

use thiserror::Error;

/// Classification used by the presentation layer to pick a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store or network unreachable. State is left unchanged, no retry.
    Transport,
    /// Input rejected before reaching the repository.
    Validation,
}

/// Failure reported by a `TaskRepository` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking worker panicked or the connection lock was poisoned.
    #[error("store worker failed: {0}")]
    Join(String),
}

/// Error surfaced by view-model intents.
#[derive(Debug, Error)]
pub enum DayplanError {
    #[error(transparent)]
    Transport(#[from] StoreError),

    #[error("task text must not be empty")]
    EmptyText,
}

impl DayplanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DayplanError::Transport(_) => ErrorKind::Transport,
            DayplanError::EmptyText => ErrorKind::Validation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority {0:?} (expected low, medium or high)")]
pub struct ParsePriorityError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what} {value:?} (expected one of: {expected})")]
pub struct ParseModeError {
    pub what: &'static str,
    pub value: String,
    pub expected: &'static str,
}
