#![forbid(unsafe_code)]

pub mod model;
pub mod quiz;
pub mod time;

pub use quiz::{Phase, QuizSession, SessionSnapshot};
pub use time::Clock;
