//! Telegram transport: long polling or a webhook through teloxide, conversion of updates
//! into [`Inbound`] inputs and rendering of [`Reply`](crate::conversation::Reply)
//! values back into Bot API calls.

pub mod conflict;
pub mod convert;
pub mod notifier;
pub mod render;

pub use conflict::ConflictGuard;
pub use notifier::TelegramAdminNotifier;

use crate::activity::{AdminNotifier, AlertEmitter, resolve_actor};
use crate::config::TelegramConfig;
use crate::conversation::{ConversationMachine, Inbound, SessionManager};
use crate::errors::LookoutError;
use std::net::SocketAddr;
use std::sync::Arc;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, Update};
use teloxide::update_listeners::{polling_default, webhooks};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shared state handed to every update handler.
struct BotContext {
    config: TelegramConfig,
    machine: Arc<ConversationMachine>,
    sessions: Arc<SessionManager>,
}

impl BotContext {
    async fn handle(&self, bot: &Bot, inbound: Inbound, origin: Option<MessageId>) {
        let sender = resolve_actor(&inbound.raw);
        if !self.config.is_allowed(&sender.id) {
            debug!("telegram: ignoring update from {} (not in allowFrom)", sender.id);
            return;
        }

        let session = self.sessions.get_or_create(&inbound.chat_id.to_string());
        let (replies, state) = {
            let mut session = session.lock().await;
            self.machine.handle(&mut session, &inbound).await
        };
        debug!(
            "telegram: chat {} -> {} ({} replies)",
            inbound.chat_id,
            state,
            replies.len()
        );
        let delivered = render::send_replies(bot, ChatId(inbound.chat_id), origin, &replies).await;
        if !delivered.is_empty() {
            let mut session = session.lock().await;
            for (shown, how) in &delivered {
                self.machine
                    .profile_delivered(&mut session, &inbound.raw, shown, *how)
                    .await;
            }
        }
    }
}

async fn on_message(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> anyhow::Result<()> {
    if let Some(inbound) = convert::inbound_from_message(&msg) {
        ctx.handle(&bot, inbound, None).await;
    }
    Ok(())
}

async fn on_callback(bot: Bot, query: CallbackQuery, ctx: Arc<BotContext>) -> anyhow::Result<()> {
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!("telegram: failed to answer callback query: {}", e);
    }
    let origin = query.message.as_ref().map(|m| m.id());
    ctx.handle(&bot, convert::inbound_from_callback(&query), origin)
        .await;
    Ok(())
}

/// How updates reach the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerMode {
    Polling,
    Webhook { address: SocketAddr, url: url::Url },
}

/// Webhook when `telegram.webhook` is configured and yields a usable URL,
/// long polling otherwise.
pub fn listener_mode(config: &TelegramConfig) -> ListenerMode {
    let Some(hook) = &config.webhook else {
        return ListenerMode::Polling;
    };
    match hook.endpoint(&config.token) {
        Ok(url) => ListenerMode::Webhook {
            address: hook.listen_address(),
            url,
        },
        Err(e) => {
            warn!("telegram: unusable webhook url {:?} ({}), polling instead", hook.url, e);
            ListenerMode::Polling
        }
    }
}

pub struct TelegramChannel {
    config: TelegramConfig,
    bot: Bot,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Self {
        let bot = Bot::new(&config.token);
        Self { config, bot }
    }

    /// Notifier delivering to `chat_id` through this channel's bot.
    pub fn admin_notifier(&self, chat_id: i64) -> Arc<dyn AdminNotifier> {
        Arc::new(TelegramAdminNotifier::new(self.bot.clone(), chat_id))
    }

    /// Receive updates until Ctrl-C or a polling conflict. A webhook that
    /// cannot be set up falls back to long polling. Pending activity is
    /// flushed before returning.
    pub async fn run(
        &self,
        machine: Arc<ConversationMachine>,
        sessions: Arc<SessionManager>,
        admin: AlertEmitter,
    ) -> Result<(), LookoutError> {
        info!("Initializing Telegram bot...");

        if admin.is_enabled() {
            let notice = format!(
                "🔔 Admin notifications enabled\nlookout v{} pid={}",
                crate::VERSION,
                std::process::id()
            );
            if let Err(e) = admin.forward(&notice).await {
                warn!("telegram: startup notice not delivered: {}", e);
            }
        }

        let ctx = Arc::new(BotContext {
            config: self.config.clone(),
            machine: machine.clone(),
            sessions,
        });
        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(on_message))
            .branch(Update::filter_callback_query().endpoint(on_callback));

        let stop = CancellationToken::new();
        let guard = Arc::new(ConflictGuard::new(admin, stop.clone()));

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![ctx])
            .default_handler(|_| async {})
            .error_handler(guard.clone())
            .enable_ctrlc_handler()
            .build();

        let shutdown = dispatcher.shutdown_token();
        let stopper = tokio::spawn(async move {
            stop.cancelled().await;
            match shutdown.shutdown() {
                Ok(done) => done.await,
                Err(e) => warn!("telegram: dispatcher was not running: {}", e),
            }
        });

        let webhook = match listener_mode(&self.config) {
            ListenerMode::Polling => None,
            ListenerMode::Webhook { address, url } => {
                info!("Telegram bot listening on {} for webhook {}", address, url);
                let options = webhooks::Options::new(address, url);
                match webhooks::axum(self.bot.clone(), options).await {
                    Ok(listener) => Some(listener),
                    Err(e) => {
                        warn!("telegram: webhook setup failed ({}), falling back to polling", e);
                        None
                    }
                }
            }
        };
        match webhook {
            Some(listener) => {
                dispatcher
                    .dispatch_with_listener(listener, guard.clone())
                    .await;
            }
            None => {
                info!("Telegram bot polling for updates");
                let listener = polling_default(self.bot.clone()).await;
                dispatcher
                    .dispatch_with_listener(listener, guard.clone())
                    .await;
            }
        }
        stopper.abort();

        machine.feed().flush().await;
        info!("Telegram bot stopped");

        if guard.is_tripped() {
            return Err(LookoutError::Conflict(
                "another instance is polling this bot token".into(),
            ));
        }
        Ok(())
    }
}
