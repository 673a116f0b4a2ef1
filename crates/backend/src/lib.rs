#![forbid(unsafe_code)]

pub mod http;
pub mod source;

pub use http::{HttpBackend, HttpConfig, HttpInitError};
pub use source::{
    Backend, ExamCatalog, InMemorySource, PageAnalysis, QuestionSource, SourceError, Translator,
};
