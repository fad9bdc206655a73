//! Plain-text rendering of quiz snapshots.

use std::fmt::Write as _;

use hoax_core::model::Verdict;
use hoax_core::{Phase, SessionSnapshot};

/// Keyboard commands understood while playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Answer(Verdict),
    Next,
    Restart,
    Quit,
}

impl Input {
    /// Empty input means "continue": begin the quiz or go to the next question.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Ok(verdict) = line.parse::<Verdict>() {
            return Some(Input::Answer(verdict));
        }
        match line.to_ascii_lowercase().as_str() {
            "" | "n" | "next" => Some(Input::Next),
            "s" | "restart" => Some(Input::Restart),
            "q" | "quit" | "exit" => Some(Input::Quit),
            _ => None,
        }
    }
}

/// Turns snapshots into terminal output, printing the full screen only when
/// the phase or question changes and a short countdown line otherwise.
#[derive(Debug, Default)]
pub struct Screen {
    shown: Option<(Phase, u64)>,
}

impl Screen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, snap: &SessionSnapshot) -> Option<String> {
        let key = (snap.phase, snap.turn);
        if self.shown == Some(key) {
            return countdown_line(snap);
        }
        self.shown = Some(key);
        Some(full_screen(snap))
    }
}

fn countdown_line(snap: &SessionSnapshot) -> Option<String> {
    if snap.phase != Phase::AwaitingAnswer {
        return None;
    }
    let secs = snap.seconds_remaining;
    (secs <= 3 || secs % 5 == 0).then(|| format!("  ... {secs}s left"))
}

#[must_use]
pub fn full_screen(snap: &SessionSnapshot) -> String {
    let mut out = String::new();
    match snap.phase {
        Phase::NotStarted => {
            let _ = writeln!(out, "REAL OR HOAX?");
            let _ = writeln!(
                out,
                "{} questions. Two options. Can you tell real news from fake?",
                snap.question_count
            );
            let _ = writeln!(out, "Press Enter to begin, q to quit.");
        }
        Phase::AwaitingAnswer => {
            let _ = writeln!(
                out,
                "\nQuestion {} / {}  [{:>3.0}%]  {}s",
                snap.current_index + 1,
                snap.question_count,
                snap.progress_fraction() * 100.0,
                snap.seconds_remaining
            );
            if let Some(question) = &snap.question {
                let _ = writeln!(out, "\"{}\"", question.headline());
                let _ = writeln!(out, "  thumbnail: {}", question.image());
            }
            let _ = writeln!(out, "Answer with r (REAL) or h (HOAX).");
        }
        Phase::ShowingResult => {
            if let Some(feedback) = snap.feedback() {
                let _ = writeln!(out, "{}", feedback.title());
            }
            if let Some(question) = &snap.question {
                let _ = writeln!(out, "It was {}. {}", question.verdict(), question.explanation());
            }
            let _ = writeln!(out, "Score: {}. Press Enter for the next question.", snap.score);
        }
        Phase::Finished => {
            let _ = writeln!(out, "\nAssessment complete");
            let _ = writeln!(
                out,
                "Score: {}% ({}/{})",
                snap.accuracy_percent(),
                snap.score,
                snap.question_count
            );
            if let Some(rating) = snap.rating() {
                let _ = writeln!(out, "{}", rating.message());
            }
            if let Some(summary) = &snap.summary {
                let _ = writeln!(
                    out,
                    "correct {}, wrong {}, timed out {}",
                    summary.correct(),
                    summary.incorrect(),
                    summary.timed_out()
                );
            }
            let _ = writeln!(out, "Press s to restart, q to quit.");
        }
    }
    out
}
