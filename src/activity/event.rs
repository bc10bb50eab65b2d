use super::actor::Actor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Searched,
    ProfileShown,
    RequestedPosts,
    ViewedPostsPage,
    RequestedStories,
    RequestedHighlights,
    OpenedHighlight,
    ReportSent,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Searched => "searched",
            Self::ProfileShown => "profile_shown",
            Self::RequestedPosts => "requested_posts",
            Self::ViewedPostsPage => "viewed_posts_page",
            Self::RequestedStories => "requested_stories",
            Self::RequestedHighlights => "requested_highlights",
            Self::OpenedHighlight => "opened_highlight",
            Self::ReportSent => "report_sent",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded action. Owned by the activity buffer until flushed; never
/// mutated after append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub timestamp: DateTime<Utc>,
    pub actor: Actor,
    pub kind: ActionKind,
    pub target: Option<String>,
    pub extra: Option<String>,
}

impl ActionEvent {
    pub fn new(
        actor: Actor,
        kind: ActionKind,
        target: Option<String>,
        extra: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            actor,
            kind,
            target,
            extra,
        }
    }

    /// Single summary line: time, who, what, on whom.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{} {} (@{}) {}",
            self.timestamp.format("%H:%M:%S"),
            self.actor.display_name,
            self.actor.username,
            self.kind
        );
        if let Some(target) = &self.target {
            line.push_str(" → ");
            line.push_str(target);
        }
        if let Some(extra) = &self.extra {
            line.push_str(" · ");
            line.push_str(extra);
        }
        line
    }

    /// Detailed multi-line rendering used for immediate alerts.
    pub fn alert_text(&self) -> String {
        let actor = &self.actor;
        let mut text = format!(
            "🔔 {}\nUser: {} (@{}) id={}\nPhone: {}\nLanguage: {}\nTime: {}",
            self.kind,
            actor.display_name,
            actor.username,
            actor.id,
            actor.phone.as_deref().unwrap_or("N/A"),
            actor.language,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        );
        if let Some(target) = &self.target {
            text.push_str("\nTarget: ");
            text.push_str(target);
        }
        if let Some(extra) = &self.extra {
            text.push_str("\nDetails: ");
            text.push_str(extra);
        }
        text
    }
}

/// Aggregate summary: header plus one line per event, in append order.
pub fn format_summary(events: &[ActionEvent]) -> String {
    let noun = if events.len() == 1 { "action" } else { "actions" };
    let mut out = format!("🗂 Activity summary ({} {})", events.len(), noun);
    for event in events {
        out.push('\n');
        out.push_str(&event.summary_line());
    }
    out
}
