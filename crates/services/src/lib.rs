#![forbid(unsafe_code)]

mod countdown;
pub mod controller;
pub mod error;
pub mod questions;

pub use hoax_core::Clock;

pub use controller::QuizController;
pub use error::{ControllerError, QuestionSourceError};
pub use questions::{bank_from_json_str, bank_from_path, embedded_bank};
