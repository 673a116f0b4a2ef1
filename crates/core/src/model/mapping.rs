use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionNumber;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MappingError {
    #[error("page numbers are 1-based, got 0")]
    ZeroPage,

    #[error("start page must be <= end page")]
    InvalidPageRange,

    #[error("question range start must be <= end")]
    InvalidQuestionRange,

    #[error("question number 0 is not valid in a range")]
    ZeroQuestionNumber,

    #[error("duplicate mapping entry for question {0}")]
    DuplicateQuestion(QuestionNumber),

    #[error("fallback start page must be >= 1")]
    InvalidFallbackStartPage,

    #[error("fallback pages per question must be a positive finite number")]
    InvalidFallbackSpan,
}

//
// ─── PAGE MAPPING ──────────────────────────────────────────────────────────────
//

/// Correspondence between one question and the page interval it occupies
/// in the exam document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMapping {
    question: QuestionNumber,
    start_page: u32,
    end_page: u32,
}

impl PageMapping {
    /// Creates a mapping entry.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::ZeroPage` if a page is 0 (pages are 1-based),
    /// or `MappingError::InvalidPageRange` if `start_page > end_page`.
    pub fn new(
        question: QuestionNumber,
        start_page: u32,
        end_page: u32,
    ) -> Result<Self, MappingError> {
        if start_page == 0 || end_page == 0 {
            return Err(MappingError::ZeroPage);
        }
        if start_page > end_page {
            return Err(MappingError::InvalidPageRange);
        }
        Ok(Self {
            question,
            start_page,
            end_page,
        })
    }

    #[must_use]
    pub fn question(&self) -> QuestionNumber {
        self.question
    }

    #[must_use]
    pub fn start_page(&self) -> u32 {
        self.start_page
    }

    #[must_use]
    pub fn end_page(&self) -> u32 {
        self.end_page
    }

    /// Whether the page falls inside this entry's interval (inclusive).
    #[must_use]
    pub fn contains_page(&self, page: u32) -> bool {
        page >= self.start_page && page <= self.end_page
    }
}

//
// ─── QUESTION RANGE ────────────────────────────────────────────────────────────
//

/// Inclusive range of question numbers a mapping resolution covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRange {
    start: u32,
    end: u32,
}

impl QuestionRange {
    /// Creates an inclusive question range.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::ZeroQuestionNumber` if either bound is 0, or
    /// `MappingError::InvalidQuestionRange` if `start > end`.
    pub fn new(start: u32, end: u32) -> Result<Self, MappingError> {
        if start == 0 || end == 0 {
            return Err(MappingError::ZeroQuestionNumber);
        }
        if start > end {
            return Err(MappingError::InvalidQuestionRange);
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of questions covered by the range.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates the question numbers in order.
    pub fn numbers(&self) -> impl Iterator<Item = QuestionNumber> + use<> {
        (self.start..=self.end).map(QuestionNumber::new)
    }
}

//
// ─── MAPPING TABLE ─────────────────────────────────────────────────────────────
//

/// Ordered question→page-range table, unique by question number.
///
/// The table answers both navigation directions: question number to start
/// page, and current page to question number (first match wins when entries
/// overlap).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingTable {
    entries: Vec<PageMapping>,
}

impl MappingTable {
    /// Builds a table from entries, preserving their order.
    ///
    /// An empty entry list is a valid (if useless) table; lookups just miss.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::DuplicateQuestion` if two entries share a
    /// question number.
    pub fn from_entries(entries: Vec<PageMapping>) -> Result<Self, MappingError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.question == entry.question) {
                return Err(MappingError::DuplicateQuestion(entry.question));
            }
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[PageMapping] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the entry for a question number.
    #[must_use]
    pub fn get(&self, question: QuestionNumber) -> Option<&PageMapping> {
        self.entries.iter().find(|e| e.question == question)
    }

    /// Finds the first entry whose page interval contains `page`.
    #[must_use]
    pub fn question_for_page(&self, page: u32) -> Option<&PageMapping> {
        self.entries.iter().find(|e| e.contains_page(page))
    }
}

//
// ─── FALLBACK LAYOUT ───────────────────────────────────────────────────────────
//

/// Layout assumptions used to synthesize an approximate mapping when the
/// authoritative analysis is unavailable: the page the first question starts
/// on, and the average number of pages one question occupies.
///
/// The synthesized table is known to drift from ground truth; its only
/// contract is monotonic coverage so navigation stays usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackLayout {
    start_page: u32,
    pages_per_question: f64,
}

impl FallbackLayout {
    /// Creates a fallback layout.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::InvalidFallbackStartPage` if the start page is 0,
    /// or `MappingError::InvalidFallbackSpan` if the span is not positive and
    /// finite.
    pub fn new(start_page: u32, pages_per_question: f64) -> Result<Self, MappingError> {
        if start_page == 0 {
            return Err(MappingError::InvalidFallbackStartPage);
        }
        if !pages_per_question.is_finite() || pages_per_question <= 0.0 {
            return Err(MappingError::InvalidFallbackSpan);
        }
        Ok(Self {
            start_page,
            pages_per_question,
        })
    }

    #[must_use]
    pub fn start_page(&self) -> u32 {
        self.start_page
    }

    #[must_use]
    pub fn pages_per_question(&self) -> f64 {
        self.pages_per_question
    }

    /// Synthesizes a deterministic approximate table for the given range.
    ///
    /// Question `n` starts at `floor(P0 + (n - 1) * W)` and ends at
    /// `floor(start + W)`, where `P0` is the layout start page and `W` the
    /// average span. Repeated invocations with the same inputs produce an
    /// identical table.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn synthesize(&self, range: QuestionRange) -> MappingTable {
        let p0 = f64::from(self.start_page);
        let w = self.pages_per_question;

        let entries = range
            .numbers()
            .map(|number| {
                let n = f64::from(number.value());
                let start = (p0 + (n - 1.0) * w).floor().max(1.0) as u32;
                let end = (f64::from(start) + w).floor() as u32;
                PageMapping {
                    question: number,
                    start_page: start,
                    end_page: end,
                }
            })
            .collect();

        MappingTable { entries }
    }
}

impl Default for FallbackLayout {
    /// The layout observed for the AZ-204 document: content starts at page
    /// 18, roughly 2.5 pages per question.
    fn default() -> Self {
        Self {
            start_page: 18,
            pages_per_question: 2.5,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
