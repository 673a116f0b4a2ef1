use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use exam_core::model::{Exam, ExamId, PageMapping, Question, QuestionRange, QuizConfig};

use crate::source::{
    Backend, ExamCatalog, PageAnalysis, QuestionSource, SourceError, Translator,
};

mod wire;

use wire::{WireExam, WireHealth, WireMapping, WirePageText, WireQuestion, WireTranslation};

/// Connection settings for the study API.
#[derive(Clone, Debug)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpConfig {
    /// Reads the configuration from the environment.
    ///
    /// `STUDY_API_URL` overrides the base URL (default
    /// `http://localhost:8000`); `STUDY_API_TIMEOUT_SECS` overrides the
    /// request timeout (default 15 seconds).
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("STUDY_API_URL").unwrap_or_else(|_| "http://localhost:8000".into());
        let timeout = env::var("STUDY_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map_or(Duration::from_secs(15), Duration::from_secs);
        Self { base_url, timeout }
    }

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(15),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpInitError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Study API client implementing all collaborator contracts.
///
/// Every request is single-shot with a client-level timeout; a failure
/// completes the call with a `SourceError` rather than hanging.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Builds a client against the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the underlying client cannot be
    /// constructed.
    pub fn new(config: HttpConfig) -> Result<Self, HttpInitError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn transport(e: reqwest::Error) -> SourceError {
        SourceError::Unreachable(e.to_string())
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SourceError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound);
        }
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SourceError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }

    /// Probes the service health endpoint.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the service is unreachable or reports an
    /// unexpected status.
    pub async fn health(&self) -> Result<(), SourceError> {
        let health: WireHealth = self.get_json("health", &[]).await?;
        if health.status == "ok" {
            Ok(())
        } else {
            Err(SourceError::Malformed(format!(
                "unexpected health status: {}",
                health.status
            )))
        }
    }
}

fn document_filename(exam: &ExamId) -> String {
    format!("{exam}.pdf")
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct PageRequest {
    page_number: u32,
    pdf_filename: String,
}

#[async_trait]
impl QuestionSource for HttpBackend {
    async fn fetch_questions(&self, config: &QuizConfig) -> Result<Vec<Question>, SourceError> {
        let path = format!("questions/{}", config.exam_id());
        let query = [
            ("lang", config.language().code().to_owned()),
            ("limit", config.question_limit().to_string()),
            ("randomize", config.randomize().to_string()),
        ];
        let wire: Vec<WireQuestion> = self.get_json(&path, &query).await?;
        wire.into_iter().map(WireQuestion::into_question).collect()
    }
}

#[async_trait]
impl ExamCatalog for HttpBackend {
    async fn fetch_exams(&self) -> Result<Vec<Exam>, SourceError> {
        let wire: Vec<WireExam> = self.get_json("exams", &[]).await?;
        wire.into_iter().map(WireExam::into_exam).collect()
    }
}

#[async_trait]
impl PageAnalysis for HttpBackend {
    async fn fetch_mappings(
        &self,
        exam: &ExamId,
        range: QuestionRange,
    ) -> Result<Vec<PageMapping>, SourceError> {
        let query = [
            ("start_question", range.start().to_string()),
            ("end_question", range.end().to_string()),
            ("pdf_filename", document_filename(exam)),
        ];
        let wire: Vec<WireMapping> = self.get_json("analyze-pages", &query).await?;
        wire.into_iter().map(WireMapping::into_mapping).collect()
    }
}

#[async_trait]
impl Translator for HttpBackend {
    async fn translate_text(&self, text: &str) -> Result<String, SourceError> {
        let body: WireTranslation = self
            .post_json("translate", &TranslateRequest { text })
            .await?;
        Ok(body.translation)
    }

    async fn extract_page_text(&self, exam: &ExamId, page: u32) -> Result<String, SourceError> {
        let body: WirePageText = self
            .post_json(
                "extract-page-text",
                &PageRequest {
                    page_number: page,
                    pdf_filename: document_filename(exam),
                },
            )
            .await?;
        Ok(body.text)
    }

    async fn translate_page_image(&self, exam: &ExamId, page: u32) -> Result<String, SourceError> {
        let body: WireTranslation = self
            .post_json(
                "translate-page-image",
                &PageRequest {
                    page_number: page,
                    pdf_filename: document_filename(exam),
                },
            )
            .await?;
        Ok(body.translation)
    }
}

impl Backend {
    /// Build a `Backend` backed by the study API.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the HTTP client cannot be constructed.
    pub fn http(config: HttpConfig) -> Result<Self, HttpInitError> {
        let backend = Arc::new(HttpBackend::new(config)?);
        Ok(Self {
            questions: backend.clone(),
            exams: backend.clone(),
            analysis: backend.clone(),
            translator: backend,
        })
    }
}
