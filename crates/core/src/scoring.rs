use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Question, QuestionNumber};

/// Minimum percentage score required to pass an exam.
pub const PASS_THRESHOLD: u8 = 70;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("cannot grade an empty question list")]
    NoQuestions,
}

/// Per-question outcome in the results view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Review entry for one question: the verdict plus the letters needed to
/// render the contrast between the user's pick and the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub number: QuestionNumber,
    pub verdict: Verdict,
    pub selected: Option<String>,
    pub correct_letter: String,
}

impl QuestionReview {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self.verdict, Verdict::Correct)
    }
}

/// Aggregate score over a completed question list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total: usize,
    pub correct_count: usize,
    /// Rounded percentage in `[0, 100]`.
    pub score: u8,
    pub passed: bool,
}

/// Full grading output: the aggregate plus a per-question review list in
/// question order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizReport {
    pub summary: ScoreSummary,
    pub reviews: Vec<QuestionReview>,
}

impl QuizReport {
    #[must_use]
    pub fn incorrect_reviews(&self) -> impl Iterator<Item = &QuestionReview> {
        self.reviews.iter().filter(|r| !r.is_correct())
    }
}

/// Grades an answered question list.
///
/// A question counts as correct when its recorded selection equals the
/// correct letter exactly. A question with no recorded selection should not
/// occur once a session completes, but is tolerated and graded incorrect.
///
/// The score is `round(100 * correct / total)` with halves rounding up
/// (`f64::round` is half-away-from-zero, which coincides with half-up for
/// non-negative percentages); passing means `score >= PASS_THRESHOLD`.
///
/// # Errors
///
/// Returns `ScoringError::NoQuestions` for an empty list, which the session
/// engine's non-empty invariant rules out.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn grade(questions: &[Question]) -> Result<QuizReport, ScoringError> {
    if questions.is_empty() {
        return Err(ScoringError::NoQuestions);
    }

    let reviews: Vec<QuestionReview> = questions
        .iter()
        .map(|q| QuestionReview {
            number: q.number(),
            verdict: if q.is_correct() {
                Verdict::Correct
            } else {
                Verdict::Incorrect
            },
            selected: q.user_selection().map(str::to_owned),
            correct_letter: q.correct_letter().to_owned(),
        })
        .collect();

    let total = questions.len();
    let correct_count = reviews.iter().filter(|r| r.is_correct()).count();

    #[allow(clippy::cast_precision_loss)]
    let score = (100.0 * correct_count as f64 / total as f64).round() as u8;

    Ok(QuizReport {
        summary: ScoreSummary {
            total,
            correct_count,
            score,
            passed: score >= PASS_THRESHOLD,
        },
        reviews,
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerOption;

    fn answered_question(number: u32, selected: Option<&str>) -> Question {
        let mut q = Question::new(
            QuestionNumber::new(number),
            format!("Question {number}"),
            vec![
                AnswerOption::new("A", "first").unwrap(),
                AnswerOption::new("B", "second").unwrap(),
            ],
            "A",
            None,
        )
        .unwrap();
        if let Some(letter) = selected {
            q.record_selection(letter).unwrap();
        }
        q
    }

    #[test]
    fn grade_rejects_empty_list() {
        let err = grade(&[]).unwrap_err();
        assert_eq!(err, ScoringError::NoQuestions);
    }

    #[test]
    fn four_of_five_scores_eighty_and_passes() {
        let questions = vec![
            answered_question(1, Some("A")),
            answered_question(2, Some("A")),
            answered_question(3, Some("B")),
            answered_question(4, Some("A")),
            answered_question(5, Some("A")),
        ];

        let report = grade(&questions).unwrap();
        assert_eq!(report.summary.score, 80);
        assert!(report.summary.passed);
        assert_eq!(report.summary.correct_count, 4);

        let incorrect: Vec<_> = report.incorrect_reviews().collect();
        assert_eq!(incorrect.len(), 1);
        assert_eq!(incorrect[0].number, QuestionNumber::new(3));
        assert_eq!(incorrect[0].selected.as_deref(), Some("B"));
        assert_eq!(incorrect[0].correct_letter, "A");
    }

    #[test]
    fn two_of_three_rounds_up_to_pass() {
        // 2/3 = 66.666..% rounds to 67, below the threshold.
        let questions = vec![
            answered_question(1, Some("A")),
            answered_question(2, Some("A")),
            answered_question(3, Some("B")),
        ];
        let report = grade(&questions).unwrap();
        assert_eq!(report.summary.score, 67);
        assert!(!report.summary.passed);
    }

    #[test]
    fn half_percentage_rounds_up() {
        // 5/8 = 62.5% must round to 63.
        let mut questions: Vec<Question> =
            (1..=5).map(|n| answered_question(n, Some("A"))).collect();
        questions.extend((6..=8).map(|n| answered_question(n, Some("B"))));

        let report = grade(&questions).unwrap();
        assert_eq!(report.summary.score, 63);
    }

    #[test]
    fn unanswered_question_is_graded_incorrect() {
        let questions = vec![answered_question(1, None)];
        let report = grade(&questions).unwrap();
        assert_eq!(report.summary.score, 0);
        assert!(!report.summary.passed);
        assert_eq!(report.reviews[0].verdict, Verdict::Incorrect);
        assert_eq!(report.reviews[0].selected, None);
    }

    #[test]
    fn exactly_seventy_passes() {
        let mut questions: Vec<Question> =
            (1..=7).map(|n| answered_question(n, Some("A"))).collect();
        questions.extend((8..=10).map(|n| answered_question(n, Some("B"))));

        let report = grade(&questions).unwrap();
        assert_eq!(report.summary.score, 70);
        assert!(report.summary.passed);
    }
}
