use async_trait::async_trait;
use exam_core::model::{Exam, ExamId, Language, PageMapping, Question, QuestionRange, QuizConfig};
use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by the remote collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("not found")]
    NotFound,

    #[error("source unreachable: {0}")]
    Unreachable(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("request failed with status {0}")]
    Status(u16),
}

/// Provides the question list for a quiz session.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch questions for the configured exam, language, limit and order.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::NotFound` when the exam has no question set,
    /// or other `SourceError` values for transport failures.
    async fn fetch_questions(&self, config: &QuizConfig) -> Result<Vec<Question>, SourceError>;
}

/// Lists the exams available for selection.
#[async_trait]
pub trait ExamCatalog: Send + Sync {
    /// Fetch the exam catalog.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the catalog cannot be fetched.
    async fn fetch_exams(&self) -> Result<Vec<Exam>, SourceError>;
}

/// Derives question page boundaries from the exam document content.
#[async_trait]
pub trait PageAnalysis: Send + Sync {
    /// Fetch the authoritative page mapping for a question range.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the analysis fails or the response cannot
    /// be interpreted; callers are expected to degrade to a synthesized
    /// mapping.
    async fn fetch_mappings(
        &self,
        exam: &ExamId,
        range: QuestionRange,
    ) -> Result<Vec<PageMapping>, SourceError>;
}

/// Translation and page-text extraction for the study panel.
///
/// The OCR/translation computation itself lives behind this contract; the
/// core only forwards requests and maps failures to notices.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a free-text snippet.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` for transport or service failures.
    async fn translate_text(&self, text: &str) -> Result<String, SourceError>;

    /// Extract the raw text of one document page.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` for transport or service failures.
    async fn extract_page_text(&self, exam: &ExamId, page: u32) -> Result<String, SourceError>;

    /// Translate one document page from its rendered image.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` for transport or service failures.
    async fn translate_page_image(&self, exam: &ExamId, page: u32) -> Result<String, SourceError>;
}

/// Simple in-memory source implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySource {
    exams: Arc<Mutex<Vec<Exam>>>,
    questions: Arc<Mutex<HashMap<(ExamId, Language), Vec<Question>>>>,
    mappings: Arc<Mutex<HashMap<ExamId, Vec<PageMapping>>>>,
    translations: Arc<Mutex<HashMap<String, String>>>,
    page_texts: Arc<Mutex<HashMap<(ExamId, u32), String>>>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an exam in the catalog.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert_exam(&self, exam: Exam) {
        self.exams.lock().expect("exams lock").push(exam);
    }

    /// Seeds the question set for an exam and language.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert_questions(&self, exam: ExamId, language: Language, questions: Vec<Question>) {
        self.questions
            .lock()
            .expect("questions lock")
            .insert((exam, language), questions);
    }

    /// Seeds the authoritative page mapping for an exam.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert_mappings(&self, exam: ExamId, mappings: Vec<PageMapping>) {
        self.mappings
            .lock()
            .expect("mappings lock")
            .insert(exam, mappings);
    }

    /// Seeds a canned translation for a text snippet.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert_translation(&self, text: impl Into<String>, translation: impl Into<String>) {
        self.translations
            .lock()
            .expect("translations lock")
            .insert(text.into(), translation.into());
    }

    /// Seeds the extracted text for one document page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert_page_text(&self, exam: ExamId, page: u32, text: impl Into<String>) {
        self.page_texts
            .lock()
            .expect("page texts lock")
            .insert((exam, page), text.into());
    }
}

#[async_trait]
impl QuestionSource for InMemorySource {
    async fn fetch_questions(&self, config: &QuizConfig) -> Result<Vec<Question>, SourceError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| SourceError::Unreachable(e.to_string()))?;
        let mut questions = guard
            .get(&(config.exam_id().clone(), config.language()))
            .cloned()
            .ok_or(SourceError::NotFound)?;
        drop(guard);

        if config.randomize() {
            questions.shuffle(&mut rng());
        }
        questions.truncate(usize::try_from(config.question_limit()).unwrap_or(usize::MAX));
        Ok(questions)
    }
}

#[async_trait]
impl ExamCatalog for InMemorySource {
    async fn fetch_exams(&self) -> Result<Vec<Exam>, SourceError> {
        let guard = self
            .exams
            .lock()
            .map_err(|e| SourceError::Unreachable(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl PageAnalysis for InMemorySource {
    async fn fetch_mappings(
        &self,
        exam: &ExamId,
        range: QuestionRange,
    ) -> Result<Vec<PageMapping>, SourceError> {
        let guard = self
            .mappings
            .lock()
            .map_err(|e| SourceError::Unreachable(e.to_string()))?;
        let mappings = guard.get(exam).ok_or(SourceError::NotFound)?;
        Ok(mappings
            .iter()
            .filter(|m| m.question().value() >= range.start() && m.question().value() <= range.end())
            .copied()
            .collect())
    }
}

#[async_trait]
impl Translator for InMemorySource {
    async fn translate_text(&self, text: &str) -> Result<String, SourceError> {
        let guard = self
            .translations
            .lock()
            .map_err(|e| SourceError::Unreachable(e.to_string()))?;
        guard.get(text).cloned().ok_or(SourceError::NotFound)
    }

    async fn extract_page_text(&self, exam: &ExamId, page: u32) -> Result<String, SourceError> {
        let guard = self
            .page_texts
            .lock()
            .map_err(|e| SourceError::Unreachable(e.to_string()))?;
        guard
            .get(&(exam.clone(), page))
            .cloned()
            .ok_or(SourceError::NotFound)
    }

    async fn translate_page_image(&self, exam: &ExamId, page: u32) -> Result<String, SourceError> {
        // The in-memory source has no rendered pages; reuse the seeded text.
        self.extract_page_text(exam, page).await
    }
}

/// Aggregates the remote collaborators behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Backend {
    pub questions: Arc<dyn QuestionSource>,
    pub exams: Arc<dyn ExamCatalog>,
    pub analysis: Arc<dyn PageAnalysis>,
    pub translator: Arc<dyn Translator>,
}

impl Backend {
    #[must_use]
    pub fn in_memory() -> Self {
        let source = InMemorySource::new();
        Self::from_in_memory(source)
    }

    #[must_use]
    pub fn from_in_memory(source: InMemorySource) -> Self {
        let questions: Arc<dyn QuestionSource> = Arc::new(source.clone());
        let exams: Arc<dyn ExamCatalog> = Arc::new(source.clone());
        let analysis: Arc<dyn PageAnalysis> = Arc::new(source.clone());
        let translator: Arc<dyn Translator> = Arc::new(source);
        Self {
            questions,
            exams,
            analysis,
            translator,
        }
    }
}
