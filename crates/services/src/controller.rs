use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use log::{debug, info, trace, warn};
use tokio::runtime::Handle;
use tokio::sync::watch;

use hoax_core::model::{QuestionBank, QuizSettings, Verdict};
use hoax_core::quiz::TickOutcome;
use hoax_core::{Clock, Phase, QuizSession, SessionSnapshot};

use crate::countdown::Countdown;
use crate::error::ControllerError;

const TICK_PERIOD: Duration = Duration::from_secs(1);

//
// ─── SHARED STATE ──────────────────────────────────────────────────────────────
//

struct ControllerState {
    session: QuizSession,
    countdown: Option<Countdown>,
}

impl ControllerState {
    fn cancel_countdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            trace!("cancelling countdown for turn {}", countdown.turn());
        }
    }
}

struct Shared {
    clock: Clock,
    state: Mutex<ControllerState>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &ControllerState) -> SessionSnapshot {
        let snapshot = state.session.snapshot();
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }

    /// Runs one countdown tick. Returns `false` once the countdown should stop.
    fn on_tick(&self, turn: u64) -> bool {
        let mut state = self.lock();
        if state.session.turn() != turn {
            warn!(
                "discarding stale tick for turn {turn} (current turn {})",
                state.session.turn()
            );
            return false;
        }

        match state.session.tick(self.clock.now()) {
            TickOutcome::Idle => false,
            TickOutcome::Counted { seconds_remaining } => {
                trace!("turn {turn}: {seconds_remaining}s left");
                self.publish(&state);
                true
            }
            TickOutcome::TimedOut => {
                debug!(
                    "question {} timed out",
                    state.session.current_index() + 1
                );
                state.cancel_countdown();
                self.publish(&state);
                false
            }
        }
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives one quiz attempt: owns the session, runs the per-question countdown
/// and publishes a snapshot after every change.
///
/// All entry points are cheap and never block on the countdown. The countdown
/// runs on the Tokio runtime that was current when a question was opened.
#[derive(Clone)]
pub struct QuizController {
    shared: Arc<Shared>,
}

impl QuizController {
    #[must_use]
    pub fn new(clock: Clock, bank: QuestionBank, settings: QuizSettings) -> Self {
        let session = QuizSession::new(bank, settings);
        let (snapshots, _rx) = watch::channel(session.snapshot());
        Self {
            shared: Arc::new(Shared {
                clock,
                state: Mutex::new(ControllerState {
                    session,
                    countdown: None,
                }),
                snapshots,
            }),
        }
    }

    /// Receiver that always holds the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.snapshots.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().session.snapshot()
    }

    /// (Re)start from the first question, discarding any progress and any
    /// running countdown.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoRuntime` when called outside a Tokio runtime.
    pub fn start(&self) -> Result<SessionSnapshot, ControllerError> {
        let runtime = Handle::try_current().map_err(|_| ControllerError::NoRuntime)?;
        let mut state = self.shared.lock();
        state.cancel_countdown();
        state.session.start(self.shared.clock.now());
        debug!(
            "quiz started with {} questions, {}s each",
            state.session.question_count(),
            state.session.settings().question_timeout_secs()
        );
        self.arm_countdown(&runtime, &mut state);
        Ok(self.shared.publish(&state))
    }

    /// Answer the open question. `None` is treated like a timeout.
    ///
    /// Ignored unless a question is open, so a click racing the timeout (or a
    /// double click) scores at most once.
    pub fn submit_answer(&self, guess: Option<Verdict>) -> SessionSnapshot {
        let mut state = self.shared.lock();
        if !state
            .session
            .submit_answer(guess, self.shared.clock.now())
        {
            debug!(
                "ignoring answer in phase {:?}",
                state.session.phase()
            );
            return state.session.snapshot();
        }
        state.cancel_countdown();
        debug!(
            "question {} answered with {:?}, score {}",
            state.session.current_index() + 1,
            guess,
            state.session.score()
        );
        self.shared.publish(&state)
    }

    /// Leave the shown result: open the next question or finish the quiz.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoRuntime` when a next question would need a
    /// countdown but no Tokio runtime is current.
    pub fn advance(&self) -> Result<SessionSnapshot, ControllerError> {
        let mut state = self.shared.lock();
        if state.session.phase() != Phase::ShowingResult {
            debug!("ignoring advance in phase {:?}", state.session.phase());
            return Ok(state.session.snapshot());
        }
        let runtime = if state.session.current_index() < state.session.bank().last_index() {
            Some(Handle::try_current().map_err(|_| ControllerError::NoRuntime)?)
        } else {
            None
        };

        state.cancel_countdown();
        state.session.advance(self.shared.clock.now());
        match (state.session.phase(), runtime) {
            (Phase::AwaitingAnswer, Some(runtime)) => {
                self.arm_countdown(&runtime, &mut state);
            }
            (Phase::Finished, _) => {
                info!(
                    "quiz finished: {}/{} correct ({}%)",
                    state.session.score(),
                    state.session.question_count(),
                    state.session.snapshot().accuracy_percent()
                );
            }
            _ => {}
        }
        Ok(self.shared.publish(&state))
    }

    /// Cancel the running countdown, e.g. when the quiz view is left. The
    /// phase and score are kept; a tick already waiting on the lock is
    /// discarded because the turn moves on.
    pub fn stop(&self) {
        let mut state = self.shared.lock();
        state.session.close_countdown();
        state.cancel_countdown();
    }

    fn arm_countdown(&self, runtime: &Handle, state: &mut ControllerState) {
        let turn = state.session.turn();
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        state.countdown = Some(Countdown::arm(runtime, turn, TICK_PERIOD, move || {
            weak.upgrade().is_some_and(|shared| shared.on_tick(turn))
        }));
    }
}

impl std::fmt::Debug for QuizController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("QuizController")
            .field("phase", &state.session.phase())
            .field("current_index", &state.session.current_index())
            .field("score", &state.session.score())
            .field("countdown_armed", &state.countdown.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoax_core::time::fixed_clock;

    use crate::questions::embedded_bank;

    #[test]
    fn start_outside_runtime_is_an_error() {
        let controller =
            QuizController::new(fixed_clock(), embedded_bank().unwrap(), QuizSettings::default());
        let err = controller.start().unwrap_err();
        assert!(matches!(err, ControllerError::NoRuntime));
        assert_eq!(controller.snapshot().phase, Phase::NotStarted);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_in_flight_during_stop_is_discarded() {
        let controller =
            QuizController::new(fixed_clock(), embedded_bank().unwrap(), QuizSettings::default());
        let started = controller.start().unwrap();

        // A tick that fired before `stop` but only now gets the lock.
        controller.stop();
        assert!(!controller.shared.on_tick(started.turn));

        let snap = controller.snapshot();
        assert_eq!(snap.phase, Phase::AwaitingAnswer);
        assert_eq!(snap.seconds_remaining, 15);
        assert_ne!(snap.turn, started.turn);
    }

    #[test]
    fn submit_before_start_is_ignored() {
        let controller =
            QuizController::new(fixed_clock(), embedded_bank().unwrap(), QuizSettings::default());
        let snap = controller.submit_answer(Some(Verdict::Real));
        assert_eq!(snap.phase, Phase::NotStarted);
        assert_eq!(snap.score, 0);
        assert_eq!(controller.advance().unwrap().phase, Phase::NotStarted);
    }
}
