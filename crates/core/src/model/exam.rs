use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::ExamId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam name cannot be empty")]
    EmptyName,

    #[error("question limit must be > 0")]
    InvalidQuestionLimit,

    #[error("unknown language code: {0}")]
    UnknownLanguage(String),
}

//
// ─── EXAM ──────────────────────────────────────────────────────────────────────
//

/// A catalog entry: an exam with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    id: ExamId,
    name: String,
}

impl Exam {
    /// Creates a new exam entry.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::EmptyName` if the name is empty or whitespace-only.
    pub fn new(id: ExamId, name: impl Into<String>) -> Result<Self, ExamError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ExamError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.trim().to_owned(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &ExamId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

//
// ─── LANGUAGE ──────────────────────────────────────────────────────────────────
//

/// Language a question set is requested in. The wire codes are `es`/`en`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Returns the two-letter wire code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ExamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es" => Ok(Language::Spanish),
            "en" => Ok(Language::English),
            other => Err(ExamError::UnknownLanguage(other.to_owned())),
        }
    }
}

//
// ─── QUIZ CONFIGURATION ────────────────────────────────────────────────────────
//

/// Configuration submitted from setup. Fully determines the fetched
/// question set and is immutable once a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    exam_id: ExamId,
    language: Language,
    question_limit: u32,
    randomize: bool,
}

impl QuizConfig {
    /// Creates a quiz configuration.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::InvalidQuestionLimit` if the limit is zero.
    pub fn new(
        exam_id: ExamId,
        language: Language,
        question_limit: u32,
        randomize: bool,
    ) -> Result<Self, ExamError> {
        if question_limit == 0 {
            return Err(ExamError::InvalidQuestionLimit);
        }
        Ok(Self {
            exam_id,
            language,
            question_limit,
            randomize,
        })
    }

    /// Creates the setup-screen defaults for an exam.
    ///
    /// Defaults: Spanish, 10 questions, random order.
    #[must_use]
    pub fn default_for_exam(exam_id: ExamId) -> Self {
        Self {
            exam_id,
            language: Language::Spanish,
            question_limit: 10,
            randomize: true,
        }
    }

    // Accessors
    #[must_use]
    pub fn exam_id(&self) -> &ExamId {
        &self.exam_id
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn question_limit(&self) -> u32 {
        self.question_limit
    }

    #[must_use]
    pub fn randomize(&self) -> bool {
        self.randomize
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
