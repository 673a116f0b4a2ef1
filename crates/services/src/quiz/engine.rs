use std::fmt;
use std::mem;
use std::sync::Arc;

use backend::{QuestionSource, SourceError};
use exam_core::Clock;
use exam_core::model::{Question, QuizConfig};
use exam_core::scoring::{self, QuizReport, ScoreSummary};

use super::progress::QuizProgress;
use super::session::{AnswerCheck, QuizSession, SessionStep};
use crate::error::QuizError;

/// The externally visible engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Setup,
    Playing,
    Results,
}

/// What `advance` produced: the next question's progress, or the final
/// score once the last question is passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Next(QuizProgress),
    Finished(ScoreSummary),
}

enum Phase {
    Setup,
    Playing(QuizSession),
    Results(QuizReport),
}

/// Finite-state controller over one quiz run: `setup → playing → results`.
///
/// Commands are explicit methods returning outcome values; a rejected
/// command never changes state. The engine owns the session while playing
/// and the graded report once results are reached.
pub struct QuizEngine {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    phase: Phase,
}

impl QuizEngine {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock: Clock::default_clock(),
            source,
            phase: Phase::Setup,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn state(&self) -> QuizState {
        match self.phase {
            Phase::Setup => QuizState::Setup,
            Phase::Playing(_) => QuizState::Playing,
            Phase::Results(_) => QuizState::Results,
        }
    }

    /// Submits the setup configuration and starts playing.
    ///
    /// On failure the engine stays in `setup`; the error distinguishes an
    /// empty result from an unreachable source so the surface can show
    /// different messages.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside `setup`, `QuizError::Empty`
    /// when no questions match, or `QuizError::Source` when the fetch fails.
    pub async fn start_quiz(&mut self, config: &QuizConfig) -> Result<QuizProgress, QuizError> {
        if !matches!(self.phase, Phase::Setup) {
            return Err(QuizError::InvalidState);
        }

        let questions = self
            .source
            .fetch_questions(config)
            .await
            .map_err(|e| match e {
                SourceError::NotFound => QuizError::Empty,
                other => QuizError::Source(other),
            })?;

        let session = QuizSession::new(questions, self.clock.now())?;
        let progress = session.progress();
        self.phase = Phase::Playing(session);
        Ok(progress)
    }

    /// The question currently exposed, while playing.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            Phase::Playing(session) => Some(session.current_question()),
            _ => None,
        }
    }

    /// Progress of the running session, while playing.
    #[must_use]
    pub fn progress(&self) -> Option<QuizProgress> {
        match &self.phase {
            Phase::Playing(session) => Some(session.progress()),
            _ => None,
        }
    }

    /// Records a candidate selection on the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside `playing`, or the session's
    /// own rejection.
    pub fn select(&mut self, letter: &str) -> Result<(), QuizError> {
        self.playing_mut()?.select(letter)
    }

    /// Commits the pending selection and reports correctness feedback.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside `playing`, or the session's
    /// own rejection (`NoSelection`, `AlreadyAnswered`, `Unanswerable`).
    pub fn check(&mut self) -> Result<AnswerCheck, QuizError> {
        self.playing_mut()?.check()
    }

    /// Moves to the next question, or grades the session after the last one.
    ///
    /// On completion the annotated question list is graded and kept as the
    /// results report; the returned summary is the headline score.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` outside `playing`, or
    /// `QuizError::NotAnswered` before the current question is checked.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, QuizError> {
        let now = self.clock.now();
        let session = self.playing_mut()?;

        match session.advance(now)? {
            SessionStep::Next => Ok(AdvanceOutcome::Next(session.progress())),
            SessionStep::Finished => {
                let Phase::Playing(session) = mem::replace(&mut self.phase, Phase::Setup) else {
                    unreachable!("advance only runs while playing");
                };
                let report = scoring::grade(&session.into_questions())?;
                let summary = report.summary;
                self.phase = Phase::Results(report);
                Ok(AdvanceOutcome::Finished(summary))
            }
        }
    }

    /// The graded report, once results are reached.
    #[must_use]
    pub fn report(&self) -> Option<&QuizReport> {
        match &self.phase {
            Phase::Results(report) => Some(report),
            _ => None,
        }
    }

    /// Discards the current run and returns to `setup`.
    ///
    /// Legal from any state; a fresh session is created on the next start.
    pub fn restart(&mut self) {
        self.phase = Phase::Setup;
    }

    fn playing_mut(&mut self) -> Result<&mut QuizSession, QuizError> {
        match &mut self.phase {
            Phase::Playing(session) => Ok(session),
            _ => Err(QuizError::InvalidState),
        }
    }
}

impl fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizEngine")
            .field("state", &self.state())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
