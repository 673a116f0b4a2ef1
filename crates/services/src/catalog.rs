use std::sync::Arc;

use backend::ExamCatalog;
use exam_core::model::{Exam, QuizConfig};

use crate::error::CatalogError;

/// Lists the available exams and seeds the setup screen.
#[derive(Clone)]
pub struct ExamDirectory {
    exams: Arc<dyn ExamCatalog>,
}

impl ExamDirectory {
    #[must_use]
    pub fn new(exams: Arc<dyn ExamCatalog>) -> Self {
        Self { exams }
    }

    /// Fetch the exam catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Source` if the catalog cannot be fetched.
    pub async fn list_exams(&self) -> Result<Vec<Exam>, CatalogError> {
        let exams = self.exams.fetch_exams().await?;
        Ok(exams)
    }

    /// Builds the default setup configuration, preselecting the first exam
    /// in the catalog.
    ///
    /// Returns `Ok(None)` when the catalog is empty.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Source` if the catalog cannot be fetched.
    pub async fn default_config(&self) -> Result<Option<QuizConfig>, CatalogError> {
        let exams = self.exams.fetch_exams().await?;
        Ok(exams
            .first()
            .map(|exam| QuizConfig::default_for_exam(exam.id().clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::InMemorySource;
    use exam_core::model::{ExamId, Language};

    #[tokio::test]
    async fn default_config_preselects_first_exam() {
        let source = InMemorySource::new();
        source.insert_exam(Exam::new(ExamId::new("az-204"), "AZ-204").unwrap());
        source.insert_exam(Exam::new(ExamId::new("dp-300"), "DP-300").unwrap());

        let directory = ExamDirectory::new(Arc::new(source));
        let config = directory.default_config().await.unwrap().unwrap();

        assert_eq!(config.exam_id(), &ExamId::new("az-204"));
        assert_eq!(config.language(), Language::Spanish);
        assert_eq!(config.question_limit(), 10);
        assert!(config.randomize());
    }

    #[tokio::test]
    async fn empty_catalog_yields_no_default() {
        let directory = ExamDirectory::new(Arc::new(InMemorySource::new()));
        assert!(directory.default_config().await.unwrap().is_none());
    }
}
