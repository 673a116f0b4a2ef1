#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod mapping;
pub mod navigation;
pub mod notice;
pub mod quiz;
pub mod translation;

pub use exam_core::Clock;

pub use catalog::ExamDirectory;
pub use error::{CatalogError, QuizError, TranslationError};
pub use mapping::{MappingOrigin, MappingResolver, ResolvedMapping};
pub use navigation::{DocumentViewer, JumpOutcome, NavigationSync};
pub use notice::{Notice, NoticeLevel};
pub use quiz::{AdvanceOutcome, AnswerCheck, QuizEngine, QuizProgress, QuizSession, QuizState};
pub use translation::TranslationService;
