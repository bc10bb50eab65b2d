use super::input::{Callback, Inbound, Input, MenuWord, extract_username};
use super::locale::{Language, Texts};
use super::reply::{Keyboard, ProfileDelivery, Reply, ShownProfile};
use super::session::Session;
use super::state::ConversationState;
use crate::activity::{ActionKind, ActivityFeed, Actor, AlertEmitter, RawInteraction};
use crate::config::Config;
use crate::errors::LookoutError;
use crate::pager::{MediaItem, extract};
use crate::source::{HighlightRef, ProfileInfo, ProfileSource, RawPost, UserRef};
use crate::utils::truncate_chars;
use std::sync::Arc;
use tracing::{debug, info, warn};

const MAX_REPORT_CHARS: usize = 2000;
const MAX_DUMP_CHARS: usize = 3900;

#[derive(Debug, Clone)]
pub struct MachineSettings {
    /// Only this chat may use `/dump_media`.
    pub admin_chat_id: Option<i64>,
    pub posts_amount: usize,
    pub search_limit: usize,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            admin_chat_id: None,
            posts_amount: 80,
            search_limit: 5,
        }
    }
}

impl From<&Config> for MachineSettings {
    fn from(config: &Config) -> Self {
        Self {
            admin_chat_id: config.admin.chat_id,
            posts_amount: config.pager.posts_amount,
            search_limit: config.pager.search_limit,
        }
    }
}

/// Drives one session through a turn: updates its state, calls the profile
/// source, and reports the action to both the alert emitter and the
/// activity feed.
pub struct ConversationMachine {
    source: Arc<dyn ProfileSource>,
    feed: ActivityFeed,
    alerts: AlertEmitter,
    admin: AlertEmitter,
    settings: MachineSettings,
}

/// What one turn produced: replies to send and the state the session is now in.
pub type Outcome = (Vec<Reply>, ConversationState);

impl ConversationMachine {
    /// `alerts` carries per-action alerts (may be disabled independently);
    /// `admin` is the destination for user reports.
    pub fn new(
        source: Arc<dyn ProfileSource>,
        feed: ActivityFeed,
        alerts: AlertEmitter,
        admin: AlertEmitter,
        settings: MachineSettings,
    ) -> Self {
        Self {
            source,
            feed,
            alerts,
            admin,
            settings,
        }
    }

    pub fn feed(&self) -> &ActivityFeed {
        &self.feed
    }

    /// Handle one input. The session's state is updated in place and also
    /// returned.
    pub async fn handle(&self, session: &mut Session, inbound: &Inbound) -> Outcome {
        let actor = session.actor_for(&inbound.raw);
        let from = session.state;
        let (replies, next) = match &inbound.input {
            Input::Start => (self.greet(session.lang()), ConversationState::SelectingLanguage),
            Input::Help => (self.help(session.lang()), from),
            Input::Contact => (Vec::new(), from),
            Input::DumpMedia(arg) => (self.dump_media(session, inbound.chat_id, arg.as_deref()), from),
            Input::Text(text) => match from {
                ConversationState::SelectingLanguage => (self.greet(session.lang()), from),
                ConversationState::Choosing => self.on_text(session, &actor, inbound.chat_id, text).await,
                ConversationState::Reporting => {
                    let replies = self.on_report(session, &actor, inbound.chat_id, text).await;
                    (replies, ConversationState::Choosing)
                }
            },
            Input::Callback(Callback::Language(code)) => self.select_language(session, code),
            Input::Callback(cb) => match from {
                ConversationState::SelectingLanguage => {
                    let t = session.lang().texts();
                    (vec![Reply::with_keyboard(t.invalid_language, Keyboard::languages())], from)
                }
                _ => self.on_callback(session, &actor, cb, from).await,
            },
        };
        if next != from {
            debug!("session {}: {} -> {}", session.key, from, next);
        }
        session.state = next;
        (replies, next)
    }

    fn greet(&self, lang: Language) -> Vec<Reply> {
        let t = lang.texts();
        vec![
            Reply::with_keyboard(t.greeting, Keyboard::languages()),
            Reply::with_keyboard(t.quick_menu, Keyboard::main_menu(lang)),
        ]
    }

    fn help(&self, lang: Language) -> Vec<Reply> {
        vec![Reply::with_keyboard(lang.texts().help, Keyboard::main_menu(lang))]
    }

    fn select_language(&self, session: &mut Session, code: &str) -> Outcome {
        let lang = Language::from_code(code);
        session.language = Some(lang);
        let t = lang.texts();
        let replies = vec![
            Reply::with_keyboard(t.greeting_ready, Keyboard::start(lang)),
            Reply::with_keyboard(t.quick_menu, Keyboard::main_menu(lang)),
        ];
        (replies, ConversationState::Choosing)
    }

    /// Record `profile_shown` for a picture card once the transport knows
    /// whether the picture or the text fallback went out.
    pub async fn profile_delivered(
        &self,
        session: &mut Session,
        raw: &RawInteraction,
        shown: &ShownProfile,
        how: ProfileDelivery,
    ) {
        let actor = session.actor_for(raw);
        let extra = how.extra(shown.private);
        self.track(
            &actor,
            ActionKind::ProfileShown,
            Some(&shown.username),
            extra.as_deref(),
        )
        .await;
    }

    /// Record and alert side by side.
    async fn track(&self, actor: &Actor, kind: ActionKind, target: Option<&str>, extra: Option<&str>) {
        self.feed.record(actor, kind, target, extra).await;
        self.alerts.alert(actor, kind, target, extra).await;
    }

    async fn on_text(&self, session: &mut Session, actor: &Actor, chat_id: i64, text: &str) -> Outcome {
        let lang = session.lang();
        let t = lang.texts();
        let text = text.trim();
        if text.is_empty() {
            return (
                vec![Reply::with_keyboard(t.no_text, Keyboard::main_menu(lang))],
                ConversationState::Choosing,
            );
        }

        match MenuWord::recognise(text, lang) {
            Some(MenuWord::Search) => {
                return (
                    vec![Reply::with_keyboard(t.search_prompt, Keyboard::main_menu(lang))],
                    ConversationState::Choosing,
                );
            }
            Some(MenuWord::Help) => return (self.help(lang), ConversationState::Choosing),
            Some(MenuWord::Report) => return self.start_report(lang),
            None => {}
        }

        let query = extract_username(text);
        let extra = format!("chat_id={chat_id}");
        self.track(actor, ActionKind::Searched, Some(&query), Some(&extra))
            .await;

        let users = match self
            .source
            .search_users(&query, self.settings.search_limit)
            .await
        {
            Ok(users) => users,
            Err(e) => {
                warn!("search for '{}' failed: {}", query, e);
                return (
                    vec![Reply::with_keyboard(t.search_failed, Keyboard::main_menu(lang))],
                    ConversationState::Choosing,
                );
            }
        };
        let Some(first) = users.into_iter().next() else {
            return (
                vec![Reply::with_keyboard(
                    Texts::fill(t.no_users_found, &query),
                    Keyboard::main_menu(lang),
                )],
                ConversationState::Choosing,
            );
        };

        session.select_profile(first.clone());
        let reply = self.show_profile(lang, actor, &first).await;
        (vec![reply], ConversationState::Choosing)
    }

    fn start_report(&self, lang: Language) -> Outcome {
        (
            vec![Reply::with_keyboard(lang.texts().report_prompt, Keyboard::RemoveMenu)],
            ConversationState::Reporting,
        )
    }

    async fn show_profile(&self, lang: Language, actor: &Actor, user: &UserRef) -> Reply {
        let t = lang.texts();
        match self.source.user_info(user).await {
            Some(info) => {
                let picture = info.best_picture().map(str::to_string);
                // A picture card may still fall back to text; the transport
                // reports which via `profile_delivered`.
                let shown = if picture.is_some() {
                    Some(ShownProfile {
                        username: info.username.clone(),
                        private: info.is_private,
                    })
                } else {
                    let extra = info.is_private.then_some("private");
                    self.track(actor, ActionKind::ProfileShown, Some(&info.username), extra)
                        .await;
                    None
                };
                Reply::Profile {
                    caption: profile_caption(lang, &info),
                    picture,
                    keyboard: Keyboard::profile_actions(lang),
                    shown,
                }
            }
            None => {
                self.track(
                    actor,
                    ActionKind::ProfileShown,
                    Some(&user.username),
                    Some("no detailed info"),
                )
                .await;
                let full_name = user.full_name.as_deref().unwrap_or("N/A");
                let text = Texts::fill(&Texts::fill(t.profile_fallback, &user.username), full_name);
                Reply::with_keyboard(text, Keyboard::profile_actions(lang))
            }
        }
    }

    async fn on_report(&self, session: &Session, actor: &Actor, chat_id: i64, text: &str) -> Vec<Reply> {
        let lang = session.lang();
        let t = lang.texts();
        let menu = || Keyboard::main_menu(lang);
        let text = text.trim();
        if text.is_empty() {
            return vec![Reply::with_keyboard(t.report_empty, menu())];
        }

        let report = format!(
            "📣 User report\nFrom: {} (@{}) id={}\nPhone: {}\nLanguage: {}\nChat: {}\n\n{}",
            actor.display_name,
            actor.username,
            actor.id,
            actor.phone.as_deref().unwrap_or("N/A"),
            actor.language,
            chat_id,
            truncate_chars(text, MAX_REPORT_CHARS),
        );
        match self.admin.forward(&report).await {
            Ok(()) => {
                info!("report from {} forwarded", actor.id);
                let extra = format!("chat_id={chat_id}");
                self.track(actor, ActionKind::ReportSent, None, Some(&extra))
                    .await;
                vec![Reply::with_keyboard(t.report_sent, menu())]
            }
            Err(LookoutError::Config(_)) => vec![Reply::with_keyboard(t.no_admin, menu())],
            Err(e) => {
                warn!("report from {} not delivered: {}", actor.id, e);
                vec![Reply::with_keyboard(t.report_failed, menu())]
            }
        }
    }

    async fn on_callback(
        &self,
        session: &mut Session,
        actor: &Actor,
        cb: &Callback,
        from: ConversationState,
    ) -> Outcome {
        let lang = session.lang();
        let t = lang.texts();
        match cb {
            Callback::StartSearch => {
                return (
                    vec![Reply::with_keyboard(t.search_prompt, Keyboard::main_menu(lang))],
                    from,
                );
            }
            Callback::StartHelp => return (self.help(lang), from),
            Callback::StartReport => return self.start_report(lang),
            Callback::Noop => return (Vec::new(), from),
            Callback::Unknown(data) => {
                debug!("unknown callback '{}'", data);
                return (
                    vec![Reply::with_keyboard(t.unknown_action, Keyboard::profile_actions(lang))],
                    from,
                );
            }
            _ => {}
        }

        let Some(user) = session.selected_profile.clone() else {
            return (
                vec![Reply::with_keyboard(t.no_user_selected, Keyboard::main_menu(lang))],
                from,
            );
        };

        let replies = match cb {
            Callback::ViewPosts => self.view_posts(session, actor, &user).await,
            Callback::PostsPage(n) => self.posts_page(session, actor, &user, *n).await,
            Callback::ViewStories => self.view_stories(lang, actor, &user).await,
            Callback::ViewHighlights => self.view_highlights(lang, actor, &user).await,
            Callback::OpenHighlight(pk) => self.open_highlight(lang, actor, &user, *pk).await,
            Callback::ViewTracking => {
                vec![Reply::with_keyboard(t.tracking, Keyboard::profile_actions(lang))]
            }
            Callback::CloseProfile => {
                session.close_profile();
                vec![
                    Reply::ClearButtons,
                    Reply::with_keyboard(t.profile_closed, Keyboard::main_menu(lang)),
                ]
            }
            Callback::ProfileMenu => {
                vec![Reply::with_keyboard(t.profile_menu, Keyboard::profile_actions(lang))]
            }
            // Handled above
            Callback::Language(_)
            | Callback::StartSearch
            | Callback::StartHelp
            | Callback::StartReport
            | Callback::Noop
            | Callback::Unknown(_) => Vec::new(),
        };
        (replies, from)
    }

    /// Fetch posts into the session. Returns false when nothing came back.
    async fn fetch_posts(&self, session: &mut Session, user: &UserRef) -> bool {
        let posts = self
            .source
            .user_media(user, self.settings.posts_amount)
            .await;
        if posts.is_empty() {
            return false;
        }
        let added = session.load_posts(posts);
        debug!(
            "session {}: {} posts -> {} media items",
            session.key,
            session.raw_posts.len(),
            added
        );
        true
    }

    async fn view_posts(&self, session: &mut Session, actor: &Actor, user: &UserRef) -> Vec<Reply> {
        let lang = session.lang();
        let t = lang.texts();
        self.track(actor, ActionKind::RequestedPosts, Some(&user.username), None)
            .await;
        let mut replies = vec![Reply::text(t.fetching_posts)];
        if !self.fetch_posts(session, user).await {
            replies.push(Reply::with_keyboard(t.no_posts, Keyboard::main_menu(lang)));
            return replies;
        }
        replies.extend(self.show_page(session, actor, user, 0).await);
        replies
    }

    async fn posts_page(
        &self,
        session: &mut Session,
        actor: &Actor,
        user: &UserRef,
        requested: i64,
    ) -> Vec<Reply> {
        let lang = session.lang();
        if session.media.is_empty() && !self.fetch_posts(session, user).await {
            return vec![Reply::with_keyboard(
                lang.texts().no_posts,
                Keyboard::main_menu(lang),
            )];
        }
        self.show_page(session, actor, user, requested).await
    }

    async fn show_page(
        &self,
        session: &mut Session,
        actor: &Actor,
        user: &UserRef,
        requested: i64,
    ) -> Vec<Reply> {
        let lang = session.lang();
        let t = lang.texts();
        let page = session.media.page(session.page_size, requested);
        let items = page.items.to_vec();
        let index = page.index;
        let label = page.label();
        let keyboard = Keyboard::posts_nav(lang, &page);
        session.current_page = index;

        let extra = format!("page={label}");
        self.track(
            actor,
            ActionKind::ViewedPostsPage,
            Some(&user.username),
            Some(&extra),
        )
        .await;

        if items.is_empty() {
            return vec![Reply::with_keyboard(t.no_media, keyboard)];
        }
        vec![
            Reply::Album(items),
            Reply::with_keyboard(t.posts_navigation, keyboard),
        ]
    }

    async fn view_stories(&self, lang: Language, actor: &Actor, user: &UserRef) -> Vec<Reply> {
        let t = lang.texts();
        self.track(actor, ActionKind::RequestedStories, Some(&user.username), None)
            .await;
        let mut replies = vec![Reply::text(t.fetching_stories)];
        let stories = self.source.user_stories(user).await;
        if stories.is_empty() {
            replies.push(Reply::with_keyboard(t.no_stories, Keyboard::profile_actions(lang)));
            return replies;
        }
        replies.extend(sendable(&stories).into_iter().map(Reply::Media));
        replies.push(Reply::with_keyboard(t.stories_shown, Keyboard::profile_actions(lang)));
        replies
    }

    async fn view_highlights(&self, lang: Language, actor: &Actor, user: &UserRef) -> Vec<Reply> {
        let t = lang.texts();
        self.track(actor, ActionKind::RequestedHighlights, Some(&user.username), None)
            .await;
        let mut replies = vec![Reply::text(t.fetching_highlights)];
        let highlights = self.source.user_highlights(user).await;
        if highlights.is_empty() {
            replies.push(Reply::with_keyboard(t.no_highlights, Keyboard::profile_actions(lang)));
            return replies;
        }
        replies.extend(highlights.iter().map(|h| {
            Reply::with_keyboard(format!("⭐ {}", h.label()), Keyboard::open_highlight(lang, h.pk))
        }));
        replies.push(Reply::with_keyboard(t.select_highlight, Keyboard::profile_actions(lang)));
        replies
    }

    async fn open_highlight(
        &self,
        lang: Language,
        actor: &Actor,
        user: &UserRef,
        pk: Option<i64>,
    ) -> Vec<Reply> {
        let t = lang.texts();
        let Some(pk) = pk else {
            return vec![Reply::with_keyboard(t.invalid_highlight, Keyboard::profile_actions(lang))];
        };
        let extra = format!("highlight_pk={pk}");
        self.track(actor, ActionKind::OpenedHighlight, Some(&user.username), Some(&extra))
            .await;

        let mut replies = vec![Reply::text(t.fetching_highlight)];
        let highlight = HighlightRef { pk, title: None };
        let items = match self.source.highlight_contents(&highlight).await {
            None => {
                replies.push(Reply::with_keyboard(t.no_highlight_info, Keyboard::profile_actions(lang)));
                return replies;
            }
            Some(items) if items.is_empty() => {
                replies.push(Reply::with_keyboard(t.no_highlight_items, Keyboard::profile_actions(lang)));
                return replies;
            }
            Some(items) => items,
        };
        replies.extend(sendable(&items).into_iter().map(Reply::Media));
        replies.push(Reply::with_keyboard(t.highlights_shown, Keyboard::profile_actions(lang)));
        replies
    }

    fn dump_media(&self, session: &Session, chat_id: i64, arg: Option<&str>) -> Vec<Reply> {
        let t = session.lang().texts();
        if self.settings.admin_chat_id != Some(chat_id) {
            return vec![Reply::text(t.not_authorized)];
        }
        let index = match arg.map(str::trim).filter(|a| !a.is_empty()) {
            None => 0,
            Some(a) => match a.parse::<i64>() {
                Ok(i) => i,
                Err(_) => return vec![Reply::text(t.dump_usage)],
            },
        };
        if session.raw_posts.is_empty() {
            return vec![Reply::text(t.no_media_cached)];
        }
        let Some(post) = usize::try_from(index)
            .ok()
            .and_then(|i| session.raw_posts.get(i))
        else {
            return vec![Reply::text(Texts::fill(
                t.index_out_of_range,
                session.raw_posts.len() - 1,
            ))];
        };
        let dumped = serde_json::to_string_pretty(post).unwrap_or_else(|_| post.to_string());
        vec![Reply::text(format!(
            "Media[{index}] (truncated):\n{}",
            truncate_chars(&dumped, MAX_DUMP_CHARS)
        ))]
    }
}

/// Flatten raw posts and keep only items that can actually be sent.
fn sendable(posts: &[RawPost]) -> Vec<MediaItem> {
    posts
        .iter()
        .flat_map(extract)
        .filter(MediaItem::is_sendable)
        .collect()
}

/// `1234567` -> `1,234,567`; `None` -> `N/A`.
fn fmt_count(n: Option<u64>) -> String {
    let Some(n) = n else {
        return "N/A".to_string();
    };
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn profile_caption(lang: Language, info: &ProfileInfo) -> String {
    let t = lang.texts();
    let yes_no = |b: bool| if b { t.yes } else { t.no };
    let or_na = |s: &Option<String>| {
        s.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("N/A")
            .to_string()
    };
    format!(
        "👤 {user} (https://instagram.com/{user})\n📛 {}\n📝 {}\n• {}: {}\n• {}: {}\n• {}: {}\n🔒 {}: {}\n✅ {}: {}",
        or_na(&info.full_name),
        or_na(&info.biography),
        t.followers,
        fmt_count(info.follower_count),
        t.following,
        fmt_count(info.following_count),
        t.posts,
        fmt_count(info.media_count),
        t.private,
        yes_no(info.is_private),
        t.verified,
        yes_no(info.is_verified),
        user = info.username,
    )
}
