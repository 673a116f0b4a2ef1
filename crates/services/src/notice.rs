use std::time::Duration;

use crate::error::QuizError;

/// How long a transient notice stays on screen before auto-dismissing.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A transient, dismissible message for the user.
///
/// Notices are the only way failures reach the surface: the affected
/// feature degrades while the rest of the application keeps working.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    level: NoticeLevel,
    message: String,
    dismiss_after: Duration,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            dismiss_after: DEFAULT_DISMISS_AFTER,
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            dismiss_after: DEFAULT_DISMISS_AFTER,
        }
    }

    #[must_use]
    pub fn with_dismiss_after(mut self, dismiss_after: Duration) -> Self {
        self.dismiss_after = dismiss_after;
        self
    }

    #[must_use]
    pub fn level(&self) -> NoticeLevel {
        self.level
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }

    /// Maps a setup failure to its user-facing message.
    ///
    /// An empty result and an unreachable source read differently on screen,
    /// so they get distinct texts; everything else falls back to the error's
    /// own description.
    #[must_use]
    pub fn from_quiz_error(error: &QuizError) -> Self {
        match error {
            QuizError::Empty => Self::warning("No questions match the selected exam"),
            QuizError::Source(_) => Self::warning("Could not reach the question source"),
            other => Self::warning(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::SourceError;

    #[test]
    fn empty_and_unreachable_get_distinct_messages() {
        let empty = Notice::from_quiz_error(&QuizError::Empty);
        let unreachable = Notice::from_quiz_error(&QuizError::Source(SourceError::Unreachable(
            "connection refused".into(),
        )));

        assert_ne!(empty.message(), unreachable.message());
        assert_eq!(empty.level(), NoticeLevel::Warning);
    }

    #[test]
    fn default_dismiss_duration_is_three_seconds() {
        let notice = Notice::info("saved");
        assert_eq!(notice.dismiss_after(), Duration::from_secs(3));
    }
}
