use std::sync::Arc;

use backend::Translator;
use exam_core::model::ExamId;

use crate::error::TranslationError;

/// Drives the on-demand translation/explanation panel.
///
/// The OCR and translation computation is the remote collaborator's
/// business; this service only forwards requests and rejects empty answers
/// so the panel never renders a blank result.
#[derive(Clone)]
pub struct TranslationService {
    translator: Arc<dyn Translator>,
}

impl TranslationService {
    #[must_use]
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Translate a free-text snippet.
    ///
    /// # Errors
    ///
    /// Returns `TranslationError::EmptyResponse` when the translator answers
    /// with nothing usable, or `TranslationError::Source` for transport
    /// failures.
    pub async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let translation = self.translator.translate_text(text).await?;
        Self::non_empty(translation)
    }

    /// Translate one document page from its rendered image.
    ///
    /// # Errors
    ///
    /// Returns `TranslationError::EmptyResponse` or
    /// `TranslationError::Source` as for [`translate`](Self::translate).
    pub async fn page_translation(
        &self,
        exam: &ExamId,
        page: u32,
    ) -> Result<String, TranslationError> {
        let translation = self.translator.translate_page_image(exam, page).await?;
        Self::non_empty(translation)
    }

    /// Extract the raw text of one document page.
    ///
    /// # Errors
    ///
    /// Returns `TranslationError::EmptyResponse` or
    /// `TranslationError::Source` as for [`translate`](Self::translate).
    pub async fn page_text(&self, exam: &ExamId, page: u32) -> Result<String, TranslationError> {
        let text = self.translator.extract_page_text(exam, page).await?;
        Self::non_empty(text)
    }

    fn non_empty(text: String) -> Result<String, TranslationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        Ok(trimmed.to_owned())
    }
}
