use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Repeating timer owned by one open question.
///
/// The first tick fires one `period` after arming. `on_tick` returning `false`
/// ends the task. Dropping the `Countdown` aborts the task, so replacing or
/// clearing the stored value is how a question's timer gets cancelled.
pub(crate) struct Countdown {
    turn: u64,
    handle: JoinHandle<()>,
}

impl Countdown {
    pub(crate) fn arm<F>(runtime: &Handle, turn: u64, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });
        Self { turn, handle }
    }

    pub(crate) fn turn(&self) -> u64 {
        self.turn
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting(runtime: &Handle, ticks: &Arc<AtomicUsize>) -> Countdown {
        let ticks = Arc::clone(ticks);
        Countdown::arm(runtime, 1, Duration::from_secs(1), move || {
            ticks.fetch_add(1, Ordering::SeqCst);
            true
        })
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let _countdown = counting(&Handle::current(), &ticks);

        time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_aborts_the_task() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let countdown = counting(&Handle::current(), &ticks);

        time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        drop(countdown);
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        // The aborted task released its captured clone.
        assert_eq!(Arc::strong_count(&ticks), 1);
    }
}
