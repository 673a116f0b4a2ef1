use chrono::{DateTime, Utc};
use std::fmt;

use exam_core::model::Question;

use super::progress::QuizProgress;
use crate::error::QuizError;

//
// ─── OUTCOME VALUES ────────────────────────────────────────────────────────────
//

/// Feedback produced by checking the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerCheck {
    pub correct: bool,
    /// Shown when the pick was wrong, for contrast.
    pub correct_letter: String,
    pub explanation: Option<String>,
}

/// What `advance` did: moved to the next question, or finished the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    Next,
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through a frozen question list.
///
/// The list is fixed at construction; the session steps through it strictly
/// forward, committing one answer per question. Answers are final: a checked
/// question can never be re-answered.
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    pending: Option<String>,
    answered: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session over a non-empty question list.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if no questions are provided.
    pub fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }

        Ok(Self {
            questions,
            current: 0,
            pending: None,
            answered: false,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// The question at the current index.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// The candidate selection, if one has been made but not yet checked.
    #[must_use]
    pub fn pending_selection(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Whether the current question has been checked.
    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        self.answered
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            position: self.current + 1,
            total: self.questions.len(),
            remaining: self.questions.len() - (self.current + 1),
            is_complete: self.is_complete(),
        }
    }

    /// Records a candidate selection for the current question.
    ///
    /// Re-selecting before `check` is allowed; nothing is committed yet.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyAnswered` once the question was checked,
    /// `QuizError::Unanswerable` for a zero-option question, or
    /// `QuizError::Question` if the letter names no option.
    pub fn select(&mut self, letter: impl Into<String>) -> Result<(), QuizError> {
        if self.is_complete() {
            return Err(QuizError::InvalidState);
        }
        if self.answered {
            return Err(QuizError::AlreadyAnswered);
        }
        let question = self.current_question();
        if !question.is_answerable() {
            return Err(QuizError::Unanswerable);
        }
        let letter = letter.into();
        if !question.has_option(&letter) {
            return Err(QuizError::Question(
                exam_core::model::QuestionError::UnknownSelection(letter),
            ));
        }
        self.pending = Some(letter);
        Ok(())
    }

    /// Commits the pending selection onto the current question.
    ///
    /// A `check` with no prior `select` is a no-op failure: the question
    /// stays unanswered and the session state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` if nothing was selected,
    /// `QuizError::AlreadyAnswered` on a second check, or
    /// `QuizError::Unanswerable` for a zero-option question.
    pub fn check(&mut self) -> Result<AnswerCheck, QuizError> {
        if self.is_complete() {
            return Err(QuizError::InvalidState);
        }
        if self.answered {
            return Err(QuizError::AlreadyAnswered);
        }
        if !self.current_question().is_answerable() {
            return Err(QuizError::Unanswerable);
        }
        let Some(letter) = self.pending.take() else {
            return Err(QuizError::NoSelection);
        };

        let question = &mut self.questions[self.current];
        if let Err(e) = question.record_selection(letter.clone()) {
            // Rejected commits leave the session untouched.
            self.pending = Some(letter);
            return Err(QuizError::Question(e));
        }
        self.answered = true;

        let question = self.current_question();
        Ok(AnswerCheck {
            correct: question.is_correct(),
            correct_letter: question.correct_letter().to_owned(),
            explanation: question.explanation().map(str::to_owned),
        })
    }

    /// Moves past the current question.
    ///
    /// On the last question the session completes instead; `completed_at`
    /// should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAnswered` if the current question has not been
    /// checked yet.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<SessionStep, QuizError> {
        if self.is_complete() {
            return Err(QuizError::InvalidState);
        }
        if !self.answered {
            return Err(QuizError::NotAnswered);
        }

        if self.current + 1 >= self.questions.len() {
            self.completed_at = Some(now);
            return Ok(SessionStep::Finished);
        }

        self.current += 1;
        self.pending = None;
        self.answered = false;
        Ok(SessionStep::Next)
    }

    /// Consumes the session, yielding the annotated question list for
    /// grading and review.
    #[must_use]
    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("pending", &self.pending)
            .field("answered", &self.answered)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
