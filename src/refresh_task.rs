//! Periodic redraw while a branch's commits are still loading.
//!
//! The task is a tokio timer loop paired with a `CancellationToken`. Every
//! tick posts a redraw request so newly loaded commits show up; stopping the
//! task posts exactly one more so the final state is painted.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::redraw::RedrawSender;

/// Default interval between redraws while loading.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(500);

/// Shortest interval accepted; tokio rejects a zero period.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(10);

/// Handle to a refresh loop. Clones share the same running state.
#[derive(Clone)]
pub struct RefreshTask {
    interval: Duration,
    redraw: RedrawSender,
    runtime: Handle,
    /// `Some` while running.
    cancel: Arc<Mutex<Option<CancellationToken>>>,
}

impl RefreshTask {
    /// Create a stopped task. The loop will be spawned on `runtime` by [`RefreshTask::start`].
    pub fn new(interval: Duration, redraw: RedrawSender, runtime: Handle) -> Self {
        Self {
            interval: interval.max(MIN_REFRESH_INTERVAL),
            redraw,
            runtime,
            cancel: Arc::new(Mutex::new(None)),
        }
    }

    pub fn start(&self) {
        let mut cancel = self.cancel.lock();
        if cancel.is_some() {
            return;
        }

        let token = CancellationToken::new();
        *cancel = Some(token.clone());
        self.runtime
            .spawn(refresh_loop(self.interval, self.redraw.clone(), token));
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "refresh task started");
    }

    /// Stop the loop. Safe to call any number of times, from any thread.
    ///
    /// Only signals cancellation; the loop sends its final redraw and exits on its own.
    pub fn stop(&self) {
        if let Some(token) = self.cancel.lock().take() {
            token.cancel();
            tracing::debug!("refresh task stopped");
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.cancel.lock().is_some()
    }

    /// Whether both handles refer to the same task.
    #[cfg(test)]
    pub fn same_task(&self, other: &RefreshTask) -> bool {
        Arc::ptr_eq(&self.cancel, &other.cancel)
    }
}

async fn refresh_loop(interval: Duration, redraw: RedrawSender, cancel: CancellationToken) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                redraw.request();
                return;
            }
            _ = ticker.tick() => {
                tracing::trace!("redrawing with newly loaded commits");
                redraw.request();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redraw::RedrawRequest;
    use tokio::sync::mpsc;

    const LONG: Duration = Duration::from_secs(3600);
    const WAIT: Duration = Duration::from_secs(2);

    fn new_task(interval: Duration) -> (RefreshTask, mpsc::Receiver<RedrawRequest>) {
        let (redraw, rx) = RedrawSender::channel();
        (RefreshTask::new(interval, redraw, Handle::current()), rx)
    }

    #[tokio::test]
    async fn test_new_task_is_stopped() {
        let (task, mut rx) = new_task(LONG);
        assert!(!task.is_running());
        task.stop();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stop_sends_one_final_redraw() {
        let (task, mut rx) = new_task(LONG);
        task.start();
        assert!(task.is_running());

        task.stop();
        assert!(!task.is_running());

        let got = tokio::time::timeout(WAIT, rx.recv()).await;
        assert_eq!(got.ok().flatten(), Some(RedrawRequest));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_double_stop_is_noop() {
        let (task, mut rx) = new_task(LONG);
        task.start();
        task.stop();
        task.stop();

        let got = tokio::time::timeout(WAIT, rx.recv()).await;
        assert!(got.ok().flatten().is_some());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_ticks_while_running() {
        let (task, mut rx) = new_task(Duration::from_millis(10));
        task.start();

        for _ in 0..3 {
            let got = tokio::time::timeout(WAIT, rx.recv()).await;
            assert!(got.ok().flatten().is_some());
        }
        task.stop();
    }

    #[tokio::test]
    async fn test_start_twice_keeps_single_loop() {
        let (task, mut rx) = new_task(LONG);
        task.start();
        task.start();
        task.stop();

        let got = tokio::time::timeout(WAIT, rx.recv()).await;
        assert!(got.ok().flatten().is_some());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_stop_from_foreign_thread() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (redraw, mut rx) = RedrawSender::channel();
        let task = RefreshTask::new(LONG, redraw, runtime.handle().clone());
        task.start();

        let remote = task.clone();
        std::thread::spawn(move || remote.stop()).join().unwrap();
        assert!(!task.is_running());

        let got = runtime.block_on(async { tokio::time::timeout(WAIT, rx.recv()).await });
        assert!(got.ok().flatten().is_some());
    }
}
