use super::locale::Language;
use super::state::ConversationState;
use crate::activity::{Actor, RawInteraction, resolve_actor};
use crate::pager::MediaList;
use crate::source::{RawPost, UserRef};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const MAX_CACHED_SESSIONS: NonZeroUsize = NonZeroUsize::new(1024).unwrap();

/// Per-user conversational state. Lives in memory only.
#[derive(Debug, Clone)]
pub struct Session {
    pub key: String,
    pub state: ConversationState,
    /// `None` until the user picks one; replies use English meanwhile.
    pub language: Option<Language>,
    pub selected_profile: Option<UserRef>,
    pub media: MediaList,
    /// Posts exactly as fetched, kept for `/dump_media`.
    pub raw_posts: Vec<RawPost>,
    pub page_size: usize,
    pub current_page: usize,
    phone: Option<String>,
}

impl Session {
    pub fn new(key: impl Into<String>, page_size: usize) -> Self {
        Self {
            key: key.into(),
            state: ConversationState::default(),
            language: None,
            selected_profile: None,
            media: MediaList::new(),
            raw_posts: Vec::new(),
            page_size: page_size.max(1),
            current_page: 0,
            phone: None,
        }
    }

    pub fn lang(&self) -> Language {
        self.language.unwrap_or_default()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Resolve the actor for this turn. A phone seen in any earlier turn is
    /// carried forward; the chosen language replaces the transport's.
    pub fn actor_for(&mut self, raw: &RawInteraction) -> Actor {
        let mut actor = resolve_actor(raw);
        if let Some(phone) = &actor.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(lang) = self.language {
            actor.language = lang.code().to_string();
        }
        actor.with_fallback_phone(self.phone.as_deref())
    }

    /// Switch to a new profile, dropping media fetched for the previous one.
    pub fn select_profile(&mut self, user: UserRef) {
        debug!("session {}: selected profile {}", self.key, user.username);
        self.selected_profile = Some(user);
        self.reset_media();
    }

    pub fn close_profile(&mut self) {
        self.selected_profile = None;
        self.reset_media();
    }

    /// Replace the media list with freshly fetched posts.
    pub fn load_posts(&mut self, posts: Vec<RawPost>) -> usize {
        self.reset_media();
        let added = self.media.ingest(&posts);
        self.raw_posts = posts;
        added
    }

    fn reset_media(&mut self) {
        self.media.clear();
        self.raw_posts.clear();
        self.current_page = 0;
    }
}

/// In-memory session registry. Each session sits behind its own lock so
/// turns for one user are serialized while different users run freely.
pub struct SessionManager {
    page_size: usize,
    cache: std::sync::Mutex<LruCache<String, Arc<Mutex<Session>>>>,
}

impl SessionManager {
    pub fn new(page_size: usize) -> Self {
        Self::with_capacity(page_size, MAX_CACHED_SESSIONS)
    }

    pub fn with_capacity(page_size: usize, capacity: NonZeroUsize) -> Self {
        Self {
            page_size,
            cache: std::sync::Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Shared handle to the session for `key`, creating it on first use.
    pub fn get_or_create(&self, key: &str) -> Arc<Mutex<Session>> {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(existing) = cache.get(key) {
            return Arc::clone(existing);
        }
        let session = Arc::new(Mutex::new(Session::new(key, self.page_size)));
        cache.put(key.to_string(), Arc::clone(&session));
        debug!("session {} created ({} cached)", key, cache.len());
        session
    }

    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
