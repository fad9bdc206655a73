//! The quiz session state machine.
//!
//! `QuizSession` is a plain value mutated only through `start`, `submit_answer`,
//! `advance` and `tick`. It knows nothing about real timers: whoever drives it
//! calls `tick` once per elapsed second while a question is open.

use chrono::{DateTime, Utc};

use crate::model::{
    Answer, AnswerRecord, Feedback, Question, QuestionBank, QuizSettings, QuizSummary, Rating,
    Verdict, accuracy_percent,
};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NotStarted,
    AwaitingAnswer,
    ShowingResult,
    Finished,
}

/// Result of a single countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No question is open; the tick changed nothing.
    Idle,
    /// One second was consumed.
    Counted { seconds_remaining: u32 },
    /// The countdown ran out and the question was closed without an answer.
    TimedOut,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt over a fixed question bank.
#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: QuestionBank,
    settings: QuizSettings,
    phase: Phase,
    current_index: usize,
    score: usize,
    seconds_remaining: u32,
    last_answer: Option<Answer>,
    turn: u64,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    answers: Vec<AnswerRecord>,
}

impl QuizSession {
    #[must_use]
    pub fn new(bank: QuestionBank, settings: QuizSettings) -> Self {
        let capacity = bank.len();
        Self {
            bank,
            settings,
            phase: Phase::NotStarted,
            current_index: 0,
            score: 0,
            seconds_remaining: settings.question_timeout_secs(),
            last_answer: None,
            turn: 0,
            started_at: None,
            completed_at: None,
            answers: Vec::with_capacity(capacity),
        }
    }

    /// (Re)start the attempt from the first question. Valid in every phase;
    /// all previous progress is discarded.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.current_index = 0;
        self.score = 0;
        self.answers.clear();
        self.started_at = Some(now);
        self.completed_at = None;
        self.open_current_question();
    }

    /// Close the current question with `guess`, scoring it if it matches.
    ///
    /// `None` means the countdown expired and is never scored. Returns `false`
    /// and leaves the session untouched unless a question is open, so only the
    /// first of two competing submissions counts.
    pub fn submit_answer(&mut self, guess: Option<Verdict>, now: DateTime<Utc>) -> bool {
        if self.phase != Phase::AwaitingAnswer {
            return false;
        }
        let Some(question) = self.bank.get(self.current_index) else {
            return false;
        };

        let correct = question.is_correct(guess);
        let answer = Answer::from_guess(guess);
        self.answers.push(AnswerRecord {
            question_id: question.id(),
            answer,
            correct,
            seconds_remaining: self.seconds_remaining,
            answered_at: now,
        });
        if correct {
            self.score += 1;
        }
        self.last_answer = Some(answer);
        self.phase = Phase::ShowingResult;
        true
    }

    /// Move past a shown result: to the next question, or to `Finished` after
    /// the last one. Returns `false` (no-op) outside `ShowingResult`.
    pub fn advance(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != Phase::ShowingResult {
            return false;
        }
        if self.current_index >= self.bank.last_index() {
            self.phase = Phase::Finished;
            self.completed_at = Some(now);
            return true;
        }
        self.current_index += 1;
        self.open_current_question();
        true
    }

    /// Consume one second of the open question's countdown.
    ///
    /// The tick that brings the countdown to zero also closes the question with
    /// no answer, exactly once.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.phase != Phase::AwaitingAnswer {
            return TickOutcome::Idle;
        }
        if self.seconds_remaining <= 1 {
            self.seconds_remaining = 0;
            self.submit_answer(None, now);
            return TickOutcome::TimedOut;
        }
        self.seconds_remaining -= 1;
        TickOutcome::Counted {
            seconds_remaining: self.seconds_remaining,
        }
    }

    /// Invalidate the running countdown without changing the phase, so a tick
    /// already in flight for the current turn is discarded.
    pub fn close_countdown(&mut self) {
        self.turn = self.turn.wrapping_add(1);
    }

    fn open_current_question(&mut self) {
        self.seconds_remaining = self.settings.question_timeout_secs();
        self.last_answer = None;
        self.phase = Phase::AwaitingAnswer;
        self.turn = self.turn.wrapping_add(1);
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    #[must_use]
    pub fn last_answer(&self) -> Option<Answer> {
        self.last_answer
    }

    /// Identifies the currently open question. Bumped every time a question is
    /// opened, including on restart, and when the countdown is closed, so a
    /// countdown can tell whether it is stale.
    #[must_use]
    pub fn turn(&self) -> u64 {
        self.turn
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.bank.len()
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::AwaitingAnswer | Phase::ShowingResult => self.bank.get(self.current_index),
            Phase::NotStarted | Phase::Finished => None,
        }
    }

    /// Summary of a finished attempt; `None` before `Finished`.
    #[must_use]
    pub fn summary(&self) -> Option<QuizSummary> {
        if self.phase != Phase::Finished {
            return None;
        }
        let started_at = self.started_at?;
        let completed_at = self.completed_at?;
        QuizSummary::from_records(started_at, completed_at, self.bank.len(), &self.answers).ok()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            current_index: self.current_index,
            question_count: self.bank.len(),
            score: self.score,
            seconds_remaining: self.seconds_remaining,
            question_timeout: self.settings.question_timeout_secs(),
            last_answer: self.last_answer,
            question: self.current_question().cloned(),
            turn: self.turn,
            summary: self.summary(),
        }
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Read-only copy of a session, handed to whatever renders the quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub current_index: usize,
    pub question_count: usize,
    pub score: usize,
    pub seconds_remaining: u32,
    pub question_timeout: u32,
    pub last_answer: Option<Answer>,
    pub question: Option<Question>,
    pub turn: u64,
    pub summary: Option<QuizSummary>,
}

impl SessionSnapshot {
    /// `(current_index + 1) / question_count`, in `(0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_fraction(&self) -> f64 {
        if self.question_count == 0 {
            return 0.0;
        }
        (self.current_index + 1) as f64 / self.question_count as f64
    }

    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        accuracy_percent(self.score, self.question_count)
    }

    /// Outcome of the current question while its result is shown.
    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        if self.phase != Phase::ShowingResult {
            return None;
        }
        let question = self.question.as_ref()?;
        match self.last_answer? {
            Answer::NoAnswer => Some(Feedback::TimedOut),
            Answer::Given(v) if question.is_correct(Some(v)) => Some(Feedback::Correct),
            Answer::Given(_) => Some(Feedback::Incorrect),
        }
    }

    #[must_use]
    pub fn rating(&self) -> Option<Rating> {
        (self.phase == Phase::Finished).then(|| Rating::from_accuracy(self.accuracy_percent()))
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
