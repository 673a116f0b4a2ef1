use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionNumber;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("option letter cannot be empty")]
    EmptyOptionLetter,

    #[error("duplicate option letter: {0}")]
    DuplicateOptionLetter(String),

    #[error("correct letter cannot be empty")]
    EmptyCorrectLetter,

    #[error("selection {0} is not one of the option letters")]
    UnknownSelection(String),

    #[error("question has already been answered")]
    AlreadyAnswered,
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// One answer choice within a question, identified by its letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    letter: String,
    text: String,
}

impl AnswerOption {
    /// Creates an option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyOptionLetter` if the letter is blank.
    pub fn new(letter: impl Into<String>, text: impl Into<String>) -> Result<Self, QuestionError> {
        let letter = letter.into();
        if letter.trim().is_empty() {
            return Err(QuestionError::EmptyOptionLetter);
        }
        Ok(Self {
            letter: letter.trim().to_owned(),
            text: text.into(),
        })
    }

    #[must_use]
    pub fn letter(&self) -> &str {
        &self.letter
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question extracted from an exam document.
///
/// The option letters are unique within the question. `user_selection`
/// is absent until the question has been answered, and once recorded it
/// always matches one of the option letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    number: QuestionNumber,
    text: String,
    options: Vec<AnswerOption>,
    correct_letter: String,
    explanation: Option<String>,
    user_selection: Option<String>,
}

impl Question {
    /// Creates a question with its options.
    ///
    /// A question with zero options is representable (the source data may be
    /// broken that way) but reports itself unanswerable.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or correct letter is blank, or
    /// if two options share a letter.
    pub fn new(
        number: QuestionNumber,
        text: impl Into<String>,
        options: Vec<AnswerOption>,
        correct_letter: impl Into<String>,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let correct_letter = correct_letter.into();
        if correct_letter.trim().is_empty() {
            return Err(QuestionError::EmptyCorrectLetter);
        }

        for (i, opt) in options.iter().enumerate() {
            if options[..i].iter().any(|o| o.letter == opt.letter) {
                return Err(QuestionError::DuplicateOptionLetter(opt.letter.clone()));
            }
        }

        let explanation = explanation
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty());

        Ok(Self {
            number,
            text: text.trim().to_owned(),
            options,
            correct_letter: correct_letter.trim().to_owned(),
            explanation,
            user_selection: None,
        })
    }

    // Accessors
    #[must_use]
    pub fn number(&self) -> QuestionNumber {
        self.number
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_letter(&self) -> &str {
        &self.correct_letter
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn user_selection(&self) -> Option<&str> {
        self.user_selection.as_deref()
    }

    /// Whether the question has at least one option to pick from.
    #[must_use]
    pub fn is_answerable(&self) -> bool {
        !self.options.is_empty()
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.user_selection.is_some()
    }

    /// Whether the given letter identifies one of this question's options.
    #[must_use]
    pub fn has_option(&self, letter: &str) -> bool {
        self.options.iter().any(|o| o.letter == letter)
    }

    /// Commits the user's answer onto the question.
    ///
    /// Answers are one-directional: once recorded a selection cannot be
    /// changed or removed.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::AlreadyAnswered` if a selection was recorded
    /// before, or `QuestionError::UnknownSelection` if the letter does not
    /// match any option.
    pub fn record_selection(&mut self, letter: impl Into<String>) -> Result<(), QuestionError> {
        if self.user_selection.is_some() {
            return Err(QuestionError::AlreadyAnswered);
        }
        let letter = letter.into();
        if !self.has_option(&letter) {
            return Err(QuestionError::UnknownSelection(letter));
        }
        self.user_selection = Some(letter);
        Ok(())
    }

    /// Whether the recorded selection matches the correct letter.
    ///
    /// An unanswered question is never correct.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.user_selection.as_deref() == Some(self.correct_letter.as_str())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_question() -> Question {
        Question::new(
            QuestionNumber::new(1),
            "Which service hosts containers?",
            vec![
                AnswerOption::new("A", "App Service").unwrap(),
                AnswerOption::new("B", "Container Instances").unwrap(),
                AnswerOption::new("C", "Key Vault").unwrap(),
            ],
            "B",
            Some("Container Instances runs containers directly.".into()),
        )
        .unwrap()
    }

    #[test]
    fn question_rejects_empty_prompt() {
        let err = Question::new(QuestionNumber::new(1), "  ", Vec::new(), "A", None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn question_rejects_duplicate_letters() {
        let err = Question::new(
            QuestionNumber::new(1),
            "Q",
            vec![
                AnswerOption::new("A", "one").unwrap(),
                AnswerOption::new("A", "two").unwrap(),
            ],
            "A",
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOptionLetter("A".into()));
    }

    #[test]
    fn zero_option_question_is_unanswerable() {
        let q = Question::new(QuestionNumber::new(7), "Broken", Vec::new(), "A", None).unwrap();
        assert!(!q.is_answerable());
        assert!(!q.is_answered());
    }

    #[test]
    fn record_selection_requires_known_letter() {
        let mut q = build_question();
        let err = q.record_selection("Z").unwrap_err();
        assert_eq!(err, QuestionError::UnknownSelection("Z".into()));
        assert!(q.user_selection().is_none());
    }

    #[test]
    fn record_selection_is_one_directional() {
        let mut q = build_question();
        q.record_selection("A").unwrap();
        let err = q.record_selection("B").unwrap_err();
        assert_eq!(err, QuestionError::AlreadyAnswered);
        assert_eq!(q.user_selection(), Some("A"));
    }

    #[test]
    fn correctness_is_exact_letter_equality() {
        let mut q = build_question();
        assert!(!q.is_correct());
        q.record_selection("B").unwrap();
        assert!(q.is_correct());
    }

    #[test]
    fn explanation_blank_is_dropped() {
        let q = Question::new(
            QuestionNumber::new(1),
            "Q",
            vec![AnswerOption::new("A", "one").unwrap()],
            "A",
            Some("   ".into()),
        )
        .unwrap();
        assert_eq!(q.explanation(), None);
    }
}
