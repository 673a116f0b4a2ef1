use std::sync::Arc;

use exam_core::model::{MappingTable, QuestionNumber};

use crate::notice::Notice;

/// The document viewer, as the navigation layer sees it.
///
/// Injected explicitly rather than reached through an ambient handle. The
/// viewer remains the source of truth for the current page: it emits a
/// page-change signal (forwarded here as `NavigationSync::on_page_changed`)
/// and a one-shot loaded signal once initial rendering completes, which the
/// presentation layer uses to swap its skeleton out.
pub trait DocumentViewer: Send + Sync {
    /// Command the viewer to display the given page.
    fn go_to_page(&self, page: u32);
}

/// Result of a question-heading click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpOutcome {
    Jumped { question: QuestionNumber, page: u32 },
    NotFound { question: QuestionNumber },
}

impl JumpOutcome {
    #[must_use]
    pub fn jumped(&self) -> bool {
        matches!(self, JumpOutcome::Jumped { .. })
    }

    /// The transient message to show for this outcome.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            JumpOutcome::Jumped { question, page } => {
                Notice::info(format!("Jumping to question {question} (page {page})"))
            }
            JumpOutcome::NotFound { question } => {
                Notice::warning(format!("No page mapping found for question {question}"))
            }
        }
    }
}

/// Keeps the document viewer and the question list in step, in both
/// directions, against the current mapping table.
///
/// Headings carry their question number as a structured identifier, so both
/// operations work purely in question numbers. The two directions are
/// deliberately loosely coupled: a jump changes the page, which makes the
/// viewer report the change back, which re-highlights the same question —
/// an accepted, idempotent loop.
pub struct NavigationSync {
    viewer: Arc<dyn DocumentViewer>,
    table: MappingTable,
    current: Option<QuestionNumber>,
}

impl NavigationSync {
    #[must_use]
    pub fn new(viewer: Arc<dyn DocumentViewer>) -> Self {
        Self {
            viewer,
            table: MappingTable::default(),
            current: None,
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: MappingTable) -> Self {
        self.table = table;
        self
    }

    /// Replaces the mapping table, e.g. after the exam selection changes.
    ///
    /// Last writer wins: a superseded resolution may land late and simply
    /// overwrites. The highlight is reset because it referred to the old
    /// table.
    pub fn set_table(&mut self, table: MappingTable) {
        self.table = table;
        self.current = None;
    }

    #[must_use]
    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// The question currently highlighted, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<QuestionNumber> {
        self.current
    }

    /// Handles a click on a question heading: navigates the viewer to the
    /// question's start page, or reports that no mapping exists.
    #[must_use]
    pub fn jump_to_question(&self, question: QuestionNumber) -> JumpOutcome {
        match self.table.get(question) {
            Some(entry) => {
                let page = entry.start_page();
                self.viewer.go_to_page(page);
                JumpOutcome::Jumped { question, page }
            }
            None => JumpOutcome::NotFound { question },
        }
    }

    /// Handles the viewer reporting a page change: highlights the question
    /// whose interval contains the page (first match) and returns it as the
    /// scroll target.
    ///
    /// A page outside every interval is not an error; the previous highlight
    /// is left in place and `None` says there is nothing to scroll to.
    /// Re-reporting the same page is idempotent.
    pub fn on_page_changed(&mut self, page: u32) -> Option<QuestionNumber> {
        let question = self.table.question_for_page(page)?.question();
        self.current = Some(question);
        Some(question)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
