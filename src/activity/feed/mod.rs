use super::actor::Actor;
use super::event::{ActionEvent, ActionKind, format_summary};
use super::notifier::AdminNotifier;
use super::timer::DebounceTimer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Reference quiet period before a summary is delivered.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
struct FeedState {
    buffer: Vec<ActionEvent>,
    last_activity: Option<Instant>,
    timer: Option<DebounceTimer>,
    generation: u64,
}

struct FeedInner {
    notifier: Arc<dyn AdminNotifier>,
    debounce: Duration,
    state: Mutex<FeedState>,
}

/// Activity buffer plus its debounce scheduler.
///
/// Every recorded action restarts a single trailing quiet window; when the
/// window expires without newer activity the whole buffer is drained into one
/// summary. The window is measured from the last action, so a sustained burst
/// postpones the summary indefinitely.
///
/// Cloning shares the same buffer and timer. Without a destination the feed
/// is inert and `record` costs nothing.
#[derive(Clone)]
pub struct ActivityFeed {
    inner: Option<Arc<FeedInner>>,
}

impl ActivityFeed {
    pub fn new(notifier: Option<Arc<dyn AdminNotifier>>, debounce: Duration) -> Self {
        Self {
            inner: notifier.map(|notifier| {
                Arc::new(FeedInner {
                    notifier,
                    debounce,
                    state: Mutex::new(FeedState::default()),
                })
            }),
        }
    }

    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Append an action and restart the debounce window.
    pub async fn record(
        &self,
        actor: &Actor,
        kind: ActionKind,
        target: Option<&str>,
        extra: Option<&str>,
    ) {
        let Some(inner) = &self.inner else {
            return;
        };
        let event = ActionEvent::new(
            actor.clone(),
            kind,
            target.map(str::to_string),
            extra.map(str::to_string),
        );

        let mut state = inner.state.lock().await;
        state.buffer.push(event);
        let now = Instant::now();
        state.last_activity = Some(now);

        if let Some(previous) = state.timer.take() {
            previous.cancel();
        }
        state.generation += 1;
        let generation = state.generation;
        let feed = Arc::clone(inner);
        state.timer = Some(DebounceTimer::schedule(
            generation,
            now,
            inner.debounce,
            move |wait_started| async move { feed.fire(generation, wait_started).await },
        ));
        debug!(
            "recorded {} (buffered={}, summary in {}s)",
            kind,
            state.buffer.len(),
            inner.debounce.as_secs()
        );
    }

    /// Deliver whatever is buffered right away, cancelling the pending
    /// window. Used on shutdown.
    pub async fn flush(&self) {
        let Some(inner) = &self.inner else {
            return;
        };
        let batch = {
            let mut state = inner.state.lock().await;
            if let Some(timer) = state.timer.take() {
                timer.cancel();
            }
            std::mem::take(&mut state.buffer)
        };
        inner.deliver(batch).await;
    }

    /// Number of buffered, not yet summarised events.
    pub async fn pending(&self) -> usize {
        match &self.inner {
            Some(inner) => inner.state.lock().await.buffer.len(),
            None => 0,
        }
    }

    pub async fn has_pending_timer(&self) -> bool {
        match &self.inner {
            Some(inner) => inner.state.lock().await.timer.is_some(),
            None => false,
        }
    }
}

impl FeedInner {
    /// Timer callback. A fire whose wait began before the latest action is
    /// stale and does nothing; the newer timer owns the eventual flush.
    async fn fire(&self, generation: u64, wait_started: Instant) {
        let batch = {
            let mut state = self.state.lock().await;
            if state.last_activity.is_some_and(|ts| ts > wait_started) {
                debug!("debounce fire #{} superseded by newer activity", generation);
                return;
            }
            if state
                .timer
                .as_ref()
                .is_some_and(|t| t.generation() == generation)
            {
                state.timer = None;
            }
            std::mem::take(&mut state.buffer)
        };
        self.deliver(batch).await;
    }

    /// At-most-once delivery: the batch is already out of the buffer and is
    /// dropped on failure.
    async fn deliver(&self, batch: Vec<ActionEvent>) {
        if batch.is_empty() {
            return;
        }
        let summary = format_summary(&batch);
        match self.notifier.notify(&summary).await {
            Ok(()) => info!("activity summary delivered ({} events)", batch.len()),
            Err(e) => warn!(
                "activity summary delivery failed, dropping {} events: {:#}",
                batch.len(),
                e
            ),
        }
    }
}
