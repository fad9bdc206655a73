use thiserror::Error;

/// Seconds a player gets per question unless configured otherwise.
pub const DEFAULT_QUESTION_TIMEOUT_SECS: u32 = 15;
pub const MIN_QUESTION_TIMEOUT_SECS: u32 = 1;
pub const MAX_QUESTION_TIMEOUT_SECS: u32 = 600;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("question timeout must be between 1 and 600 seconds, got {0}")]
    InvalidQuestionTimeout(u32),
}

/// Tunables for a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    question_timeout_secs: u32,
}

impl QuizSettings {
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuestionTimeout` if the timeout is outside
    /// `MIN_QUESTION_TIMEOUT_SECS..=MAX_QUESTION_TIMEOUT_SECS`.
    pub fn new(question_timeout_secs: u32) -> Result<Self, SettingsError> {
        if !(MIN_QUESTION_TIMEOUT_SECS..=MAX_QUESTION_TIMEOUT_SECS).contains(&question_timeout_secs)
        {
            return Err(SettingsError::InvalidQuestionTimeout(question_timeout_secs));
        }
        Ok(Self {
            question_timeout_secs,
        })
    }

    #[must_use]
    pub fn question_timeout_secs(&self) -> u32 {
        self.question_timeout_secs
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_timeout_secs: DEFAULT_QUESTION_TIMEOUT_SECS,
        }
    }
}
