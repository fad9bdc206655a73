use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::answer::{AnswerRecord, Feedback};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("quiz has no questions")]
    NoQuestions,

    #[error("answered {answered} questions but the quiz has {total}")]
    CountMismatch { total: usize, answered: usize },
}

/// End-of-quiz literacy verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Excellent,
    Average,
    NeedsPractice,
}

impl Rating {
    /// 80% and up is excellent, 50% and up is average.
    #[must_use]
    pub fn from_accuracy(percent: u32) -> Self {
        if percent >= 80 {
            Rating::Excellent
        } else if percent >= 50 {
            Rating::Average
        } else {
            Rating::NeedsPractice
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Rating::Excellent => {
                "Excellent digital literacy. You possess strong critical thinking skills."
            }
            Rating::Average => {
                "Average results. Be cautious of provocative headlines and verify sources."
            }
            Rating::NeedsPractice => {
                "Digital literacy calibration recommended. Review the identification protocols."
            }
        }
    }
}

/// Integer accuracy in percent, rounded down.
#[must_use]
pub fn accuracy_percent(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    u32::try_from(score.min(total) * 100 / total).unwrap_or(100)
}

/// Aggregate of a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total_questions: usize,
    correct: usize,
    incorrect: usize,
    timed_out: usize,
}

impl QuizSummary {
    /// Build a summary from the answer log of a finished attempt.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` precedes
    /// `started_at`, `SummaryError::NoQuestions` for an empty quiz and
    /// `SummaryError::CountMismatch` if not every question has a record.
    pub fn from_records(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total_questions: usize,
        records: &[AnswerRecord],
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        if total_questions == 0 {
            return Err(SummaryError::NoQuestions);
        }
        if records.len() != total_questions {
            return Err(SummaryError::CountMismatch {
                total: total_questions,
                answered: records.len(),
            });
        }

        let mut correct = 0;
        let mut incorrect = 0;
        let mut timed_out = 0;
        for record in records {
            match record.feedback() {
                Feedback::Correct => correct += 1,
                Feedback::Incorrect => incorrect += 1,
                Feedback::TimedOut => timed_out += 1,
            }
        }

        Ok(Self {
            started_at,
            completed_at,
            total_questions,
            correct,
            incorrect,
            timed_out,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> usize {
        self.incorrect
    }

    #[must_use]
    pub fn timed_out(&self) -> usize {
        self.timed_out
    }

    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        accuracy_percent(self.correct, self.total_questions)
    }

    #[must_use]
    pub fn rating(&self) -> Rating {
        Rating::from_accuracy(self.accuracy_percent())
    }

    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, QuestionId, Verdict};
    use crate::time::fixed_now;

    fn record(id: u64, answer: Answer, correct: bool) -> AnswerRecord {
        AnswerRecord {
            question_id: QuestionId::new(id),
            answer,
            correct,
            seconds_remaining: 5,
            answered_at: fixed_now(),
        }
    }

    #[test]
    fn summary_counts_outcomes() {
        let records = vec![
            record(1, Answer::Given(Verdict::Real), true),
            record(2, Answer::Given(Verdict::Real), false),
            record(3, Answer::NoAnswer, false),
            record(4, Answer::Given(Verdict::Hoax), true),
        ];
        let summary = QuizSummary::from_records(fixed_now(), fixed_now(), 4, &records).unwrap();

        assert_eq!(summary.correct(), 2);
        assert_eq!(summary.incorrect(), 1);
        assert_eq!(summary.timed_out(), 1);
        assert_eq!(summary.accuracy_percent(), 50);
        assert_eq!(summary.rating(), Rating::Average);
    }

    #[test]
    fn summary_rejects_inconsistent_input() {
        let later = fixed_now() + chrono::Duration::seconds(10);
        assert_eq!(
            QuizSummary::from_records(later, fixed_now(), 1, &[]).unwrap_err(),
            SummaryError::InvalidTimeRange
        );
        assert_eq!(
            QuizSummary::from_records(fixed_now(), later, 0, &[]).unwrap_err(),
            SummaryError::NoQuestions
        );
        assert_eq!(
            QuizSummary::from_records(fixed_now(), later, 2, &[record(1, Answer::NoAnswer, false)])
                .unwrap_err(),
            SummaryError::CountMismatch {
                total: 2,
                answered: 1
            }
        );
    }

    #[test]
    fn rating_thresholds_follow_accuracy() {
        assert_eq!(Rating::from_accuracy(100), Rating::Excellent);
        assert_eq!(Rating::from_accuracy(80), Rating::Excellent);
        assert_eq!(Rating::from_accuracy(79), Rating::Average);
        assert_eq!(Rating::from_accuracy(50), Rating::Average);
        assert_eq!(Rating::from_accuracy(40), Rating::NeedsPractice);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(0, 10), 0);
    }
}
