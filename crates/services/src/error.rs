//! Shared error types for the services crate.

use thiserror::Error;

use backend::SourceError;
use exam_core::model::QuestionError;
use exam_core::scoring::ScoringError;

/// Errors emitted by the quiz session engine.
///
/// None of these are fatal: a failed command leaves the engine in the state
/// it was in before the call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    /// The source answered but had no questions for the configuration.
    #[error("no questions match the requested configuration")]
    Empty,

    /// The question source could not be reached or failed.
    #[error("question source unavailable")]
    Source(#[source] SourceError),

    /// `check` was called before any option was selected.
    #[error("no option selected")]
    NoSelection,

    /// The current question has zero options and cannot be answered.
    #[error("question has no options to answer")]
    Unanswerable,

    /// The current question was already checked; answers are final.
    #[error("answer already checked")]
    AlreadyAnswered,

    /// `advance` was called before the current question was checked.
    #[error("current question has not been answered")]
    NotAnswered,

    /// The command is not valid in the engine's current state.
    #[error("operation not valid in the current quiz state")]
    InvalidState,

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Errors emitted by `ExamDirectory`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors emitted by `TranslationService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranslationError {
    #[error("translator returned an empty response")]
    EmptyResponse,

    #[error(transparent)]
    Source(#[from] SourceError),
}
