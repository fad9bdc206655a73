mod answer;
mod bank;
mod ids;
mod image;
mod question;
mod settings;
mod summary;

pub use answer::{Answer, AnswerRecord, Feedback};
pub use bank::{BankError, QuestionBank};
pub use ids::QuestionId;
pub use image::{ImageRef, ImageRefError};
pub use question::{Question, QuestionDraft, QuestionError, Verdict, VerdictParseError};
pub use settings::{
    DEFAULT_QUESTION_TIMEOUT_SECS, MAX_QUESTION_TIMEOUT_SECS, MIN_QUESTION_TIMEOUT_SECS,
    QuizSettings, SettingsError,
};
pub use summary::{QuizSummary, Rating, SummaryError, accuracy_percent};
