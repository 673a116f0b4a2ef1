use thiserror::Error;

use crate::model::{ExamError, MappingError, QuestionError};
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Exam(#[from] ExamError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
