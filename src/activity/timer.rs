use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A single pending debounce fire.
///
/// Holds the cancellation handle and the instant the wait began. Cancelling
/// only prevents a fire that has not started yet: once the delay elapses the
/// callback runs to completion even if `cancel` is called meanwhile, so the
/// callback itself must re-validate freshness.
#[derive(Debug)]
pub struct DebounceTimer {
    generation: u64,
    scheduled_at: Instant,
    fires_at: Instant,
    token: CancellationToken,
}

impl DebounceTimer {
    /// Spawn a timer that calls `on_fire(scheduled_at)` once `delay` has
    /// elapsed since `scheduled_at`, unless cancelled first.
    pub fn schedule<F, Fut>(
        generation: u64,
        scheduled_at: Instant,
        delay: Duration,
        on_fire: F,
    ) -> Self
    where
        F: FnOnce(Instant) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let fires_at = scheduled_at + delay;
        let token = CancellationToken::new();
        let cancelled = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancelled.cancelled() => {
                    debug!("debounce timer #{} cancelled", generation);
                }
                () = tokio::time::sleep_until(fires_at) => {
                    on_fire(scheduled_at).await;
                }
            }
        });
        Self {
            generation,
            scheduled_at,
            fires_at,
            token,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scheduled_at(&self) -> Instant {
        self.scheduled_at
    }

    pub fn fires_at(&self) -> Instant {
        self.fires_at
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let timer = DebounceTimer::schedule(1, Instant::now(), Duration::from_secs(5), move |_| {
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        assert_eq!(timer.fires_at() - timer.scheduled_at(), Duration::from_secs(5));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let timer = DebounceTimer::schedule(2, Instant::now(), Duration::from_secs(5), move |_| {
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        timer.cancel();
        assert!(timer.is_cancelled());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_receives_scheduled_instant() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let slot = seen.clone();
        let start = Instant::now();
        let _timer = DebounceTimer::schedule(3, start, Duration::from_secs(1), move |at| {
            async move {
                *slot.lock().unwrap() = Some(at);
            }
        });
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*seen.lock().unwrap(), Some(start));
    }
}
