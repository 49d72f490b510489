//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::evaluate::EvaluateError;
use storage::repository::StorageError;

/// Errors emitted by `ProgressLedger`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no quiz questions in scope")]
    EmptyPool,

    #[error("no active learner selected")]
    NoActiveLearner,

    #[error("question {index} is already scored")]
    AlreadyAnswered { index: usize },

    #[error("question {index} has not been answered yet")]
    NotYetAnswered { index: usize },

    #[error("session already completed")]
    Completed,

    #[error("session is not complete yet")]
    NotComplete,

    #[error(transparent)]
    Evaluate(#[from] EvaluateError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
