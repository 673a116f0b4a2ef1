mod engine;
mod progress;
mod session;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use engine::{AdvanceOutcome, QuizEngine, QuizState};
pub use progress::QuizProgress;
pub use session::{AnswerCheck, QuizSession, SessionStep};
