use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank must contain at least one question")]
    Empty,

    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),
}

/// Fixed, ordered, non-empty list of questions shared by every attempt.
///
/// Cloning is cheap; all clones point at the same questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Arc<[Question]>,
}

impl QuestionBank {
    /// Builds a bank, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` for an empty list and `BankError::DuplicateId`
    /// when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id()) {
                return Err(BankError::DuplicateId(q.id()));
            }
        }
        Ok(Self {
            questions: questions.into(),
        })
    }

    /// Number of questions. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
