mod exam;
mod ids;
mod mapping;
mod question;

pub use exam::{Exam, ExamError, Language, QuizConfig};
pub use ids::{ExamId, ParseIdError, QuestionNumber};
pub use mapping::{FallbackLayout, MappingError, MappingTable, PageMapping, QuestionRange};
pub use question::{AnswerOption, Question, QuestionError};
