//! Shared error types for the services crate.

use thiserror::Error;

use peerpilot_core::CatalogError;
use peerpilot_core::model::AttemptError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the quiz state machine and its runner.
///
/// Every out-of-state transition is rejected here instead of relying on the
/// caller to disable controls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("quiz not found: {0}")]
    NotFound(String),
    #[error("quiz has no questions")]
    Empty,
    #[error("choice {choice} is out of range for {choices} choices")]
    InvalidChoice { choice: usize, choices: usize },
    #[error("select a choice before checking the answer")]
    NoSelection,
    #[error("answer already checked for this question")]
    AnswerLocked,
    #[error("check the answer before moving on")]
    NotChecked,
    #[error("quiz already finished")]
    Finished,
    #[error(transparent)]
    Attempt(#[from] AttemptError),
}

/// Errors emitted by `SessionNotifier` implementations.
///
/// The request workflow only distinguishes success from failure; the variants
/// exist for logging.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotificationError {
    #[error("mail notifications are not configured")]
    Disabled,
    #[error("student contact address is missing")]
    MissingContact,
    #[error("mail request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Errors emitted when a browse action names something the catalog lacks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BrowseError {
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("unknown session: {0}")]
    UnknownSession(String),
    #[error("unknown tutor: {0}")]
    UnknownTutor(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
