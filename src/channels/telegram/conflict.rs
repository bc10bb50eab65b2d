use crate::activity::AlertEmitter;
use crate::errors::LookoutError;
use crate::utils::truncate_chars;
use futures_util::future::BoxFuture;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use teloxide::error_handlers::ErrorHandler;
use teloxide::{ApiError, RequestError};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Longest error text forwarded to the administrator.
pub const ERROR_NOTICE_CHARS: usize = 1000;
/// At most one error notice per window; later ones are counted and mentioned
/// in the next notice.
pub const ERROR_NOTICE_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Default)]
struct NoticeWindow {
    last_sent: Option<Instant>,
    suppressed: usize,
}

/// Error handler for both the update listener and the update handlers.
///
/// A competing poller on the same token stops intake: the administrator is
/// told once and `stop` is cancelled so the run loop can shut the dispatcher
/// down. Any other error is forwarded to the administrator, rate limited by
/// [`ERROR_NOTICE_COOLDOWN`].
pub struct ConflictGuard {
    admin: AlertEmitter,
    stop: CancellationToken,
    tripped: AtomicBool,
    notices: Mutex<NoticeWindow>,
}

impl ConflictGuard {
    pub fn new(admin: AlertEmitter, stop: CancellationToken) -> Self {
        Self {
            admin,
            stop,
            tripped: AtomicBool::new(false),
            notices: Mutex::new(NoticeWindow::default()),
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    /// True only for the first call.
    fn trip(&self) -> bool {
        !self.tripped.swap(true, Ordering::SeqCst)
    }

    /// `Some(suppressed_since_last)` when a notice may go out now.
    fn notice_slot(&self) -> Option<usize> {
        let mut window = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if let Some(last) = window.last_sent
            && now.duration_since(last) < ERROR_NOTICE_COOLDOWN
        {
            window.suppressed += 1;
            return None;
        }
        window.last_sent = Some(now);
        Some(std::mem::take(&mut window.suppressed))
    }

    async fn handle(&self, failure: LookoutError) {
        if failure.is_fatal() {
            self.on_conflict().await;
        } else {
            self.on_error(&failure.to_string()).await;
        }
    }

    async fn on_conflict(&self) {
        if !self.trip() {
            return;
        }
        error!("telegram: another instance is polling this bot token, stopping");
        let text = format!(
            "⚠️ Stopping: another instance is polling this bot token (pid={})",
            std::process::id()
        );
        if let Err(e) = self.admin.forward(&text).await {
            warn!("telegram: could not report polling conflict: {}", e);
        }
        self.stop.cancel();
    }

    async fn on_error(&self, text: &str) {
        warn!("telegram: {}", text);
        if !self.admin.is_enabled() {
            return;
        }
        let Some(suppressed) = self.notice_slot() else {
            return;
        };
        let mut notice = format!("🚨 Bot error: {}", truncate_chars(text, ERROR_NOTICE_CHARS));
        if suppressed > 0 {
            notice.push_str(&format!("\n({suppressed} more since the last notice)"));
        }
        if let Err(e) = self.admin.forward(&notice).await {
            warn!("telegram: could not report error: {}", e);
        }
    }
}

/// Map a Bot API failure onto the crate's error taxonomy.
pub fn classify(error: &RequestError) -> LookoutError {
    if matches!(error, RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) {
        return LookoutError::Conflict(error.to_string());
    }
    LookoutError::from_transport_text(&error.to_string())
}

/// Polling listener errors.
impl ErrorHandler<RequestError> for ConflictGuard {
    fn handle_error(self: Arc<Self>, error: RequestError) -> BoxFuture<'static, ()> {
        Box::pin(async move { self.handle(classify(&error)).await })
    }
}

/// Errors returned by update handlers.
impl ErrorHandler<anyhow::Error> for ConflictGuard {
    fn handle_error(self: Arc<Self>, error: anyhow::Error) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let failure = match error.downcast::<LookoutError>() {
                Ok(typed) => typed,
                Err(other) => LookoutError::from_transport_text(&format!("{:#}", other)),
            };
            self.handle(failure).await;
        })
    }
}

/// The webhook listener never reports errors.
impl ErrorHandler<Infallible> for ConflictGuard {
    fn handle_error(self: Arc<Self>, error: Infallible) -> BoxFuture<'static, ()> {
        match error {}
    }
}
