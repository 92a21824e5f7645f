//! Typed error hierarchy for the board core.
//!
//! Every operation reports failures through `BoardError`; there is no
//! local retry or recovery. Callers map `*NotFound` to their own 404-style
//! responses and everything else to a generic failure.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Project {id} not found")]
    ProjectNotFound { id: i64 },

    #[error("Board {id} not found")]
    BoardNotFound { id: i64 },

    #[error("Column {id} not found")]
    ColumnNotFound { id: i64 },

    #[error("Task {id} not found")]
    TaskNotFound { id: i64 },

    #[error("Subtask {id} not found")]
    SubtaskNotFound { id: i64 },

    /// A reorder request whose id list does not match the scope's current
    /// membership. Accepting it would leave the positions non-dense, so it
    /// is rejected outright instead of silently persisted.
    #[error("Reorder does not match scope membership: {message}")]
    InvalidOrder { message: String },

    #[error("Invalid value in database: {0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Database task panicked")]
    TaskPanicked,
}
