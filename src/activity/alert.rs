use super::actor::Actor;
use super::event::{ActionEvent, ActionKind};
use super::notifier::AdminNotifier;
use crate::errors::LookoutError;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends one detailed administrator message per action, with no buffering.
///
/// Independent of [`ActivityFeed`](super::ActivityFeed): call sites invoke
/// both side by side.
#[derive(Clone, Default)]
pub struct AlertEmitter {
    notifier: Option<Arc<dyn AdminNotifier>>,
}

impl AlertEmitter {
    pub fn new(notifier: Option<Arc<dyn AdminNotifier>>) -> Self {
        Self { notifier }
    }

    pub fn is_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Deliver an alert for a single action. Failures are logged and
    /// swallowed.
    pub async fn alert(
        &self,
        actor: &Actor,
        kind: ActionKind,
        target: Option<&str>,
        extra: Option<&str>,
    ) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let event = ActionEvent::new(
            actor.clone(),
            kind,
            target.map(str::to_string),
            extra.map(str::to_string),
        );
        match notifier.notify(&event.alert_text()).await {
            Ok(()) => debug!("alert delivered: {}", kind),
            Err(e) => warn!("failed to deliver {} alert: {:#}", kind, e),
        }
    }

    /// Forward free text (user reports, startup notices) to the
    /// administrator, surfacing the outcome to the caller.
    pub async fn forward(&self, text: &str) -> Result<(), LookoutError> {
        let notifier = self
            .notifier
            .as_ref()
            .ok_or_else(|| LookoutError::Config("no administrator chat configured".into()))?;
        notifier
            .notify(text)
            .await
            .map_err(|e| LookoutError::Delivery(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::actor::{RawInteraction, resolve_actor};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Capture {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl AdminNotifier for Capture {
        async fn notify(&self, text: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("blocked by user");
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn capture(fail: bool) -> Arc<Capture> {
        Arc::new(Capture {
            sent: Mutex::new(Vec::new()),
            fail,
        })
    }

    #[tokio::test]
    async fn test_alert_is_delivered_immediately() {
        let sink = capture(false);
        let emitter = AlertEmitter::new(Some(sink.clone()));
        let actor = resolve_actor(&RawInteraction::default());
        emitter
            .alert(&actor, ActionKind::Searched, Some("natgeo"), Some("chat_id=5"))
            .await;
        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("searched"));
        assert!(sent[0].contains("Target: natgeo"));
    }

    #[tokio::test]
    async fn test_alert_failure_is_swallowed() {
        let emitter = AlertEmitter::new(Some(capture(true)));
        let actor = resolve_actor(&RawInteraction::default());
        // Must not panic or propagate
        emitter.alert(&actor, ActionKind::ReportSent, None, None).await;
    }

    #[tokio::test]
    async fn test_forward_reports_missing_destination_and_failure() {
        let none = AlertEmitter::default();
        assert!(!none.is_enabled());
        assert!(matches!(
            none.forward("hi").await,
            Err(LookoutError::Config(_))
        ));

        let failing = AlertEmitter::new(Some(capture(true)));
        assert!(matches!(
            failing.forward("hi").await,
            Err(LookoutError::Delivery(_))
        ));

        let sink = capture(false);
        let ok = AlertEmitter::new(Some(sink.clone()));
        ok.forward("report body").await.unwrap();
        assert_eq!(sink.sent.lock().unwrap()[0], "report body");
    }
}
