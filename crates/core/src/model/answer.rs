use chrono::{DateTime, Utc};

use crate::model::ids::QuestionId;
use crate::model::question::Verdict;

/// What the player handed in for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// The player picked a verdict.
    Given(Verdict),
    /// The countdown ran out first.
    NoAnswer,
}

impl Answer {
    #[must_use]
    pub fn from_guess(guess: Option<Verdict>) -> Self {
        guess.map_or(Answer::NoAnswer, Answer::Given)
    }
}

/// How an answered question is presented back to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
    TimedOut,
}

impl Feedback {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Feedback::Correct => "Right",
            Feedback::Incorrect => "Wrong",
            Feedback::TimedOut => "Time's up",
        }
    }
}

/// One scoring decision inside an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub answer: Answer,
    pub correct: bool,
    pub seconds_remaining: u32,
    pub answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    #[must_use]
    pub fn feedback(&self) -> Feedback {
        match (self.answer, self.correct) {
            (Answer::NoAnswer, _) => Feedback::TimedOut,
            (Answer::Given(_), true) => Feedback::Correct,
            (Answer::Given(_), false) => Feedback::Incorrect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn timeout_record_reads_as_timed_out() {
        let record = AnswerRecord {
            question_id: QuestionId::new(1),
            answer: Answer::from_guess(None),
            correct: false,
            seconds_remaining: 0,
            answered_at: fixed_now(),
        };
        assert_eq!(record.feedback(), Feedback::TimedOut);
        assert_eq!(record.answer, Answer::NoAnswer);
    }

    #[test]
    fn given_answers_map_to_correctness() {
        let mut record = AnswerRecord {
            question_id: QuestionId::new(1),
            answer: Answer::from_guess(Some(Verdict::Hoax)),
            correct: true,
            seconds_remaining: 9,
            answered_at: fixed_now(),
        };
        assert_eq!(record.feedback(), Feedback::Correct);
        record.correct = false;
        assert_eq!(record.feedback(), Feedback::Incorrect);
    }
}
