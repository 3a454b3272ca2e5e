//! Single-slot deadline timer with cancellation support.
//!
//! Schedules one callback after a delay on the tokio runtime. Arming the timer
//! cancels whatever was previously scheduled, so at most one deadline is live.

use std::time::Duration;

use tokio::{runtime::Handle, time};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// The live scheduled callback.
struct DeadlineEntry {
    /// Cancels the sleeping task.
    token: CancellationToken,
    /// Generation the deadline was armed for.
    generation: u64,
}

/// One cancellable scheduled callback, tagged with the generation it belongs to.
pub(crate) struct DeadlineTimer {
    /// Runtime the deadline tasks are spawned on.
    runtime: Handle,
    /// Currently armed deadline, if any.
    live: Option<DeadlineEntry>,
}

impl DeadlineTimer {
    /// Create an unarmed timer that schedules onto `runtime`.
    pub(crate) fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            live: None,
        }
    }

    /// Generation of the armed deadline, if any.
    pub(crate) fn generation(&self) -> Option<u64> {
        self.live.as_ref().map(|e| e.generation)
    }

    /// Replace any armed deadline with `on_expire` running after `after`.
    pub(crate) fn arm<F>(&mut self, generation: u64, after: Duration, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        let cancel = token.clone();
        let fut = async move {
            trace!(
                "deadline_armed" = generation,
                after_ms = after.as_millis() as u64
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    trace!("deadline_cancelled" = generation);
                }
                _ = time::sleep(after) => {
                    trace!("deadline_elapsed" = generation);
                    on_expire();
                }
            }
        };
        drop(self.runtime.spawn(fut));
        self.live = Some(DeadlineEntry { token, generation });
    }

    /// Cancel the armed deadline if present (non-blocking).
    pub(crate) fn cancel(&mut self) {
        if let Some(entry) = self.live.take() {
            entry.token.cancel();
        }
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        (hits, move || {
            h.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let mut timer = DeadlineTimer::new(Handle::current());
        let (hits, cb) = counter();
        timer.arm(1, Duration::from_millis(100), cb);
        assert_eq!(timer.generation(), Some(1));
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_callback() {
        let mut timer = DeadlineTimer::new(Handle::current());
        let (hits, cb) = counter();
        timer.arm(1, Duration::from_millis(100), cb);
        timer.cancel();
        assert_eq!(timer.generation(), None);
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_replaces_previous() {
        let mut timer = DeadlineTimer::new(Handle::current());
        let (first, cb1) = counter();
        let (second, cb2) = counter();
        timer.arm(1, Duration::from_millis(100), cb1);
        timer.arm(2, Duration::from_millis(100), cb2);
        assert_eq!(timer.generation(), Some(2));
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels() {
        let (hits, cb) = counter();
        {
            let mut timer = DeadlineTimer::new(Handle::current());
            timer.arm(1, Duration::from_millis(100), cb);
        }
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
