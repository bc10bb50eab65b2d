// Shared test helpers — not all items used by every test binary.
#![allow(unused)]

use async_trait::async_trait;
use lookout::activity::{
    ActivityFeed, AdminNotifier, AlertEmitter, RawInteraction, RawUser,
};
use lookout::conversation::{
    Callback, ConversationMachine, Inbound, Input, MachineSettings, Outcome, SessionManager,
};
use lookout::errors::LookoutError;
use lookout::source::{HighlightRef, ProfileInfo, ProfileSource, RawPost, UserRef};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ADMIN_CHAT: i64 = 999;

/// Records every administrator message in delivery order.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl AdminNotifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|m| m.starts_with("🗂"))
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|m| m.starts_with("🔔"))
            .collect()
    }
}

/// In-memory profile source with a single account.
pub struct StaticSource {
    pub user: UserRef,
    pub posts: Vec<Value>,
}

impl Default for StaticSource {
    fn default() -> Self {
        Self {
            user: UserRef {
                pk: 787132,
                username: "natgeo".into(),
                full_name: Some("National Geographic".into()),
            },
            posts: posts(9),
        }
    }
}

#[async_trait]
impl ProfileSource for StaticSource {
    async fn search_users(&self, query: &str, _limit: usize) -> Result<Vec<UserRef>, LookoutError> {
        if query == self.user.username {
            Ok(vec![self.user.clone()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn user_info(&self, _user: &UserRef) -> Option<ProfileInfo> {
        None
    }

    async fn user_media(&self, _user: &UserRef, amount: usize) -> Vec<RawPost> {
        self.posts.iter().take(amount).cloned().collect()
    }

    async fn user_stories(&self, _user: &UserRef) -> Vec<RawPost> {
        Vec::new()
    }

    async fn user_highlights(&self, _user: &UserRef) -> Vec<HighlightRef> {
        Vec::new()
    }

    async fn highlight_contents(&self, _highlight: &HighlightRef) -> Option<Vec<RawPost>> {
        None
    }
}

pub fn posts(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "pk": i,
                "display_url": format!("https://cdn.example.com/{i}.jpg"),
                "caption": {"text": format!("post {i}")}
            })
        })
        .collect()
}

pub struct Bot {
    pub machine: ConversationMachine,
    pub sessions: SessionManager,
    pub admin: Arc<RecordingNotifier>,
}

impl Bot {
    pub fn new(source: Arc<dyn ProfileSource>, debounce: Duration) -> Self {
        let admin = Arc::new(RecordingNotifier::default());
        let notifier: Arc<dyn AdminNotifier> = admin.clone();
        let machine = ConversationMachine::new(
            source,
            ActivityFeed::new(Some(notifier.clone()), debounce),
            AlertEmitter::new(Some(notifier.clone())),
            AlertEmitter::new(Some(notifier)),
            MachineSettings {
                admin_chat_id: Some(ADMIN_CHAT),
                ..MachineSettings::default()
            },
        );
        Self {
            machine,
            sessions: SessionManager::new(4),
            admin,
        }
    }

    /// One turn for user `user_id` chatting in their private chat.
    pub async fn turn(&self, user_id: i64, input: Input) -> Outcome {
        let inbound = Inbound {
            chat_id: user_id,
            raw: RawInteraction {
                user: Some(RawUser {
                    id: Some(user_id),
                    username: Some(format!("user{user_id}")),
                    first_name: Some(format!("User {user_id}")),
                    ..RawUser::default()
                }),
                language: Some("en".into()),
                ..RawInteraction::default()
            },
            input,
        };
        let session = self.sessions.get_or_create(&user_id.to_string());
        let mut session = session.lock().await;
        self.machine.handle(&mut session, &inbound).await
    }

    pub async fn text(&self, user_id: i64, text: &str) -> Outcome {
        self.turn(user_id, Input::Text(text.to_string())).await
    }

    pub async fn press(&self, user_id: i64, callback: Callback) -> Outcome {
        self.turn(user_id, Input::Callback(callback)).await
    }

    /// `/start` then English.
    pub async fn onboard(&self, user_id: i64) {
        self.turn(user_id, Input::Start).await;
        self.press(user_id, Callback::Language("en".into())).await;
    }
}
