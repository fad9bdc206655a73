//! Loading question banks from JSON.

use std::path::Path;

use serde::Deserialize;

use hoax_core::model::{QuestionBank, QuestionDraft, QuestionId, Verdict};

use crate::error::QuestionSourceError;

const EMBEDDED_QUESTIONS: &str = include_str!("../data/hoax_questions.json");

/// On-disk shape of a question. `type` and `imageRef` are accepted as aliases.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestionRecord {
    id: u64,
    headline: String,
    #[serde(alias = "type")]
    verdict: Verdict,
    explanation: String,
    #[serde(alias = "imageRef")]
    image: String,
}

impl From<QuestionRecord> for QuestionDraft {
    fn from(record: QuestionRecord) -> Self {
        QuestionDraft {
            id: QuestionId::new(record.id),
            headline: record.headline,
            verdict: record.verdict,
            explanation: record.explanation,
            image: record.image,
        }
    }
}

/// The ten built-in "Real or Hoax?" headlines.
///
/// # Errors
///
/// Only fails if the embedded data is broken.
pub fn embedded_bank() -> Result<QuestionBank, QuestionSourceError> {
    bank_from_json_str(EMBEDDED_QUESTIONS)
}

/// Parse a JSON array of question records, keeping file order.
///
/// # Errors
///
/// Returns `QuestionSourceError::Json` for malformed JSON, `Question` for an
/// invalid record and `Bank` for an empty list or duplicate ids.
pub fn bank_from_json_str(raw: &str) -> Result<QuestionBank, QuestionSourceError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(raw)?;
    let questions = records
        .into_iter()
        .map(|record| QuestionDraft::from(record).validate())
        .collect::<Result<Vec<_>, _>>()?;
    let bank = QuestionBank::new(questions)?;
    log::debug!("loaded {} questions", bank.len());
    Ok(bank)
}

/// Read and parse a question file.
///
/// # Errors
///
/// Returns `QuestionSourceError::Io` if the file cannot be read, otherwise
/// the same errors as `bank_from_json_str`.
pub fn bank_from_path(path: impl AsRef<Path>) -> Result<QuestionBank, QuestionSourceError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| QuestionSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    bank_from_json_str(&raw)
}
