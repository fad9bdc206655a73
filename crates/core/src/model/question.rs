use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::image::{ImageRef, ImageRefError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id}: headline cannot be empty")]
    EmptyHeadline { id: QuestionId },

    #[error("question {id}: explanation cannot be empty")]
    EmptyExplanation { id: QuestionId },

    #[error("question {id}: {source}")]
    Image {
        id: QuestionId,
        #[source]
        source: ImageRefError,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown verdict {raw:?}, expected REAL or HOAX")]
pub struct VerdictParseError {
    raw: String,
}

//
// ─── VERDICT ───────────────────────────────────────────────────────────────────
//

/// Classification of a headline: either it happened, or it was fabricated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Real,
    Hoax,
}

impl Verdict {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Real => "REAL",
            Verdict::Hoax => "HOAX",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Verdict {
    type Err = VerdictParseError;

    /// Accepts `real`/`hoax` in any case, plus the single-letter shortcuts `r`/`h`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "real" | "r" => Ok(Verdict::Real),
            "hoax" | "h" => Ok(Verdict::Hoax),
            _ => Err(VerdictParseError { raw: s.to_string() }),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single quiz entry. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    headline: String,
    verdict: Verdict,
    explanation: String,
    image: ImageRef,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn headline(&self) -> &str {
        &self.headline
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    /// True when `guess` names this question's verdict. A missing guess never matches.
    #[must_use]
    pub fn is_correct(&self, guess: Option<Verdict>) -> bool {
        guess == Some(self.verdict)
    }
}

/// Unvalidated question input, as read from a question file.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub headline: String,
    pub verdict: Verdict,
    pub explanation: String,
    pub image: String,
}

impl QuestionDraft {
    /// Trim text fields and parse the image reference.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the headline or explanation is blank, or the
    /// image reference cannot be parsed.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = self.id;
        let headline = self.headline.trim().to_string();
        if headline.is_empty() {
            return Err(QuestionError::EmptyHeadline { id });
        }
        let explanation = self.explanation.trim().to_string();
        if explanation.is_empty() {
            return Err(QuestionError::EmptyExplanation { id });
        }
        let image = ImageRef::parse(&self.image)
            .map_err(|source| QuestionError::Image { id, source })?;

        Ok(Question {
            id,
            headline,
            verdict: self.verdict,
            explanation,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(headline: &str, explanation: &str, image: &str) -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new(3),
            headline: headline.into(),
            verdict: Verdict::Hoax,
            explanation: explanation.into(),
            image: image.into(),
        }
    }

    #[test]
    fn validate_trims_text() {
        let q = draft("  Pentagon explosion  ", " Fake image. ", "images/q2.jpg")
            .validate()
            .unwrap();
        assert_eq!(q.headline(), "Pentagon explosion");
        assert_eq!(q.explanation(), "Fake image.");
        assert_eq!(q.verdict(), Verdict::Hoax);
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let err = draft(" ", "x", "a.jpg").validate().unwrap_err();
        assert_eq!(
            err,
            QuestionError::EmptyHeadline {
                id: QuestionId::new(3)
            }
        );

        let err = draft("x", "", "a.jpg").validate().unwrap_err();
        assert!(matches!(err, QuestionError::EmptyExplanation { .. }));

        let err = draft("x", "y", "").validate().unwrap_err();
        assert!(matches!(
            err,
            QuestionError::Image {
                source: ImageRefError::Empty,
                ..
            }
        ));
    }

    #[test]
    fn missing_guess_is_never_correct() {
        let q = draft("h", "e", "a.jpg").validate().unwrap();
        assert!(q.is_correct(Some(Verdict::Hoax)));
        assert!(!q.is_correct(Some(Verdict::Real)));
        assert!(!q.is_correct(None));
    }

    #[test]
    fn verdict_parses_shortcuts() {
        assert_eq!("R".parse::<Verdict>().unwrap(), Verdict::Real);
        assert_eq!(" hoax ".parse::<Verdict>().unwrap(), Verdict::Hoax);
        assert!("maybe".parse::<Verdict>().is_err());
        assert_eq!(Verdict::Real.to_string(), "REAL");
    }
}
