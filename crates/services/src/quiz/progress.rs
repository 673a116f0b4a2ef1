/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    /// Questions left after the current one (the "pending" badge).
    pub remaining: usize,
    pub is_complete: bool,
}

impl QuizProgress {
    /// Progress bar value in `(0, 1]`.
    ///
    /// `total` is never zero: a session cannot start with an empty question
    /// list.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        self.position as f64 / self.total as f64
    }
}
