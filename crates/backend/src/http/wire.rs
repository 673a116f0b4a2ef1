//! Wire shapes for the study API.
//!
//! The API speaks the legacy Spanish field names (`numero`, `pregunta`,
//! `opciones`, ...), and the page-analysis endpoint reports question numbers
//! as integers where the question endpoints carry them as strings. All of
//! that coercion happens here so the rest of the crate only sees domain
//! types.

use exam_core::model::{AnswerOption, Exam, ExamId, PageMapping, Question, QuestionNumber};
use serde::Deserialize;

use crate::source::SourceError;

fn malformed<E: core::fmt::Display>(field: &'static str) -> impl FnOnce(E) -> SourceError {
    move |e| SourceError::Malformed(format!("{field}: {e}"))
}

/// Question number field that arrives as either an integer or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberField {
    Int(u32),
    Text(String),
}

impl NumberField {
    pub(crate) fn into_number(self) -> Result<QuestionNumber, SourceError> {
        match self {
            NumberField::Int(n) => Ok(QuestionNumber::new(n)),
            NumberField::Text(s) => s.parse().map_err(malformed("question number")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireOption {
    letra: String,
    texto: String,
    #[serde(default)]
    es_correcta: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireQuestion {
    numero: NumberField,
    pregunta: String,
    #[serde(default)]
    opciones: Vec<WireOption>,
    #[serde(default)]
    respuesta_correcta: String,
    #[serde(default)]
    explicacion: Option<String>,
}

impl WireQuestion {
    pub(crate) fn into_question(self) -> Result<Question, SourceError> {
        let number = self.numero.into_number()?;

        // Some data sets only flag the correct option instead of naming the
        // letter at the question level.
        let correct_letter = if self.respuesta_correcta.trim().is_empty() {
            self.opciones
                .iter()
                .find(|o| o.es_correcta)
                .map(|o| o.letra.clone())
                .unwrap_or_default()
        } else {
            self.respuesta_correcta
        };

        let options = self
            .opciones
            .into_iter()
            .map(|o| AnswerOption::new(o.letra, o.texto))
            .collect::<Result<Vec<_>, _>>()
            .map_err(malformed("question option"))?;

        Question::new(number, self.pregunta, options, correct_letter, self.explicacion)
            .map_err(malformed("question"))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireExam {
    id: String,
    name: String,
}

impl WireExam {
    pub(crate) fn into_exam(self) -> Result<Exam, SourceError> {
        Exam::new(ExamId::new(self.id), self.name).map_err(malformed("exam"))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMapping {
    question: NumberField,
    start_page: u32,
    end_page: u32,
}

impl WireMapping {
    pub(crate) fn into_mapping(self) -> Result<PageMapping, SourceError> {
        let question = self.question.into_number()?;
        PageMapping::new(question, self.start_page, self.end_page)
            .map_err(malformed("page mapping"))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTranslation {
    pub(crate) translation: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePageText {
    pub(crate) text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireHealth {
    pub(crate) status: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_parses_legacy_field_names() {
        let json = r#"{
            "numero": "12",
            "pregunta": "Which tier supports autoscale?",
            "opciones": [
                {"letra": "A", "texto": "Basic", "es_correcta": false},
                {"letra": "B", "texto": "Standard", "es_correcta": true}
            ],
            "respuesta_correcta": "B",
            "explicacion": "Standard adds autoscale."
        }"#;

        let wire: WireQuestion = serde_json::from_str(json).unwrap();
        let question = wire.into_question().unwrap();

        assert_eq!(question.number(), QuestionNumber::new(12));
        assert_eq!(question.correct_letter(), "B");
        assert_eq!(question.options().len(), 2);
        assert_eq!(question.explanation(), Some("Standard adds autoscale."));
        assert!(question.user_selection().is_none());
    }

    #[test]
    fn question_derives_correct_letter_from_flag() {
        let json = r#"{
            "numero": 3,
            "pregunta": "Pick one",
            "opciones": [
                {"letra": "A", "texto": "no"},
                {"letra": "B", "texto": "yes", "es_correcta": true}
            ]
        }"#;

        let wire: WireQuestion = serde_json::from_str(json).unwrap();
        let question = wire.into_question().unwrap();
        assert_eq!(question.correct_letter(), "B");
    }

    #[test]
    fn question_with_unparsable_number_is_malformed() {
        let json = r#"{
            "numero": "twelve",
            "pregunta": "Q",
            "opciones": [{"letra": "A", "texto": "x"}],
            "respuesta_correcta": "A"
        }"#;

        let wire: WireQuestion = serde_json::from_str(json).unwrap();
        let err = wire.into_question().unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn mapping_accepts_integer_question_numbers() {
        let json = r#"{"question": 7, "start_page": 33, "end_page": 35}"#;
        let wire: WireMapping = serde_json::from_str(json).unwrap();
        let mapping = wire.into_mapping().unwrap();
        assert_eq!(mapping.question(), QuestionNumber::new(7));
        assert_eq!(mapping.start_page(), 33);
    }

    #[test]
    fn mapping_accepts_string_question_numbers() {
        let json = r#"{"question": "7", "start_page": 33, "end_page": 35}"#;
        let wire: WireMapping = serde_json::from_str(json).unwrap();
        assert_eq!(wire.into_mapping().unwrap().question(), QuestionNumber::new(7));
    }

    #[test]
    fn mapping_with_inverted_pages_is_malformed() {
        let json = r#"{"question": 7, "start_page": 35, "end_page": 33}"#;
        let wire: WireMapping = serde_json::from_str(json).unwrap();
        assert!(matches!(
            wire.into_mapping().unwrap_err(),
            SourceError::Malformed(_)
        ));
    }

    #[test]
    fn exam_entry_parses() {
        let json = r#"{"id": "az-204", "name": "AZ-204: Developing Solutions"}"#;
        let wire: WireExam = serde_json::from_str(json).unwrap();
        let exam = wire.into_exam().unwrap();
        assert_eq!(exam.id().value(), "az-204");
    }
}
