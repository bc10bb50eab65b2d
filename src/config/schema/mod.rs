use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::warn;

/// Generates a `Debug` impl that redacts secret fields.
///
/// Field specifiers:
/// - `field_name`            — printed normally via `&self.field_name`
/// - `redact(field_name)`    — `String` field: shows `[empty]` or `[REDACTED]`
macro_rules! redact_debug {
    (@field $builder:ident, $self:ident, redact($field:ident)) => {
        $builder.field(
            stringify!($field),
            &if $self.$field.is_empty() {
                "[empty]"
            } else {
                "[REDACTED]"
            },
        );
    };
    (@field $builder:ident, $self:ident, $field:ident) => {
        $builder.field(stringify!($field), &$self.$field);
    };

    (@fields $builder:ident, $self:ident,) => {};
    (@fields $builder:ident, $self:ident, redact($field:ident), $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, redact($field));
        redact_debug!(@fields $builder, $self, $($rest)*);
    };
    (@fields $builder:ident, $self:ident, $field:ident, $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, $field);
        redact_debug!(@fields $builder, $self, $($rest)*);
    };

    ($struct_name:ident, $($fields:tt)*) => {
        impl std::fmt::Debug for $struct_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut builder = f.debug_struct(stringify!($struct_name));
                redact_debug!(@fields builder, self, $($fields)*);
                builder.finish()
            }
        }
    };
}

fn default_true() -> bool {
    true
}

/// Bot API refuses media groups larger than this.
pub const MAX_PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Telegram
// ---------------------------------------------------------------------------

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: String,
    /// Telegram user ids allowed to talk to the bot. Empty allows everyone.
    #[serde(default, rename = "allowFrom")]
    pub allow_from: Vec<String>,
    /// Receive updates through a webhook instead of long polling.
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}

redact_debug!(TelegramConfig, redact(token), allow_from, webhook,);

impl TelegramConfig {
    pub fn is_allowed(&self, user_id: &str) -> bool {
        self.allow_from.is_empty()
            || self
                .allow_from
                .iter()
                .any(|a| a.trim_start_matches('+') == user_id)
    }
}

fn default_webhook_port() -> u16 {
    8443
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Public base URL Telegram posts updates to.
    pub url: String,
    /// Path appended to `url`; defaults to the bot id part of the token.
    #[serde(default)]
    pub path: Option<String>,
    /// Local port the listener binds on all interfaces.
    #[serde(default = "default_webhook_port")]
    pub port: u16,
}

impl WebhookConfig {
    pub fn listen_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Full URL registered with Telegram: `url` joined with the configured
    /// path, or with the token's bot id when no path is set.
    pub fn endpoint(&self, token: &str) -> Result<url::Url, url::ParseError> {
        let path = match self.path.as_deref().map(|p| p.trim_matches('/')) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => token.split(':').next().unwrap_or_default().to_string(),
        };
        url::Url::parse(&format!("{}/{}", self.url.trim_end_matches('/'), path))
    }
}

// ---------------------------------------------------------------------------
// Administrator destination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    /// Chat that receives alerts, summaries and reports. `None` disables all
    /// administrator traffic.
    #[serde(default, rename = "chatId")]
    pub chat_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Activity feed
// ---------------------------------------------------------------------------

fn default_debounce_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Quiet period after the last recorded action before a summary is sent.
    #[serde(default = "default_debounce_secs", rename = "debounceSecs")]
    pub debounce_secs: u64,
    /// Send one detailed message per action.
    #[serde(default = "default_true")]
    pub alerts: bool,
    /// Send debounced aggregate summaries.
    #[serde(default = "default_true")]
    pub summaries: bool,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            debounce_secs: default_debounce_secs(),
            alerts: true,
            summaries: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Pager
// ---------------------------------------------------------------------------

fn default_page_size() -> usize {
    4
}

fn default_posts_amount() -> usize {
    80
}

fn default_search_limit() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagerConfig {
    #[serde(default = "default_page_size", rename = "pageSize")]
    pub page_size: usize,
    #[serde(default = "default_posts_amount", rename = "postsAmount")]
    pub posts_amount: usize,
    #[serde(default = "default_search_limit", rename = "searchLimit")]
    pub search_limit: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            posts_amount: default_posts_amount(),
            search_limit: default_search_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Profile-data source
// ---------------------------------------------------------------------------

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default, rename = "baseUrl")]
    pub base_url: String,
    #[serde(default, rename = "apiKey")]
    pub api_key: String,
    #[serde(default = "default_timeout_secs", rename = "timeoutSecs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

redact_debug!(SourceConfig, base_url, redact(api_key), timeout_secs,);

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub pager: PagerConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), crate::errors::LookoutError> {
        self.validate_activity()?;
        self.validate_pager()?;
        self.validate_source()?;
        self.validate_webhook()?;
        if self.admin.chat_id.is_none() {
            warn!("admin.chatId not set; administrator notifications disabled");
        }
        Ok(())
    }

    fn validate_activity(&self) -> Result<(), crate::errors::LookoutError> {
        use crate::errors::LookoutError;
        if self.activity.debounce_secs == 0 {
            return Err(LookoutError::Config(
                "activity.debounceSecs must be > 0".into(),
            ));
        }
        if self.activity.debounce_secs > 86_400 {
            warn!("activity.debounceSecs is longer than a day; summaries will be rare");
        }
        Ok(())
    }

    fn validate_pager(&self) -> Result<(), crate::errors::LookoutError> {
        use crate::errors::LookoutError;
        let p = &self.pager;
        if p.page_size == 0 || p.page_size > MAX_PAGE_SIZE {
            return Err(LookoutError::Config(format!(
                "pager.pageSize must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if p.posts_amount == 0 {
            return Err(LookoutError::Config(
                "pager.postsAmount must be > 0".into(),
            ));
        }
        if p.search_limit == 0 {
            return Err(LookoutError::Config(
                "pager.searchLimit must be > 0".into(),
            ));
        }
        Ok(())
    }

    fn validate_source(&self) -> Result<(), crate::errors::LookoutError> {
        use crate::errors::LookoutError;
        let s = &self.source;
        if s.timeout_secs == 0 {
            return Err(LookoutError::Config(
                "source.timeoutSecs must be > 0".into(),
            ));
        }
        if !s.base_url.is_empty() && url::Url::parse(&s.base_url).is_err() {
            return Err(LookoutError::Config(format!(
                "source.baseUrl is not a valid URL: {}",
                s.base_url
            )));
        }
        Ok(())
    }

    fn validate_webhook(&self) -> Result<(), crate::errors::LookoutError> {
        use crate::errors::LookoutError;
        let Some(hook) = &self.telegram.webhook else {
            return Ok(());
        };
        if hook.port == 0 {
            return Err(LookoutError::Config(
                "telegram.webhook.port must be > 0".into(),
            ));
        }
        match url::Url::parse(&hook.url) {
            Ok(u) if u.scheme() == "https" || u.scheme() == "http" => Ok(()),
            _ => Err(LookoutError::Config(format!(
                "telegram.webhook.url is not a valid http(s) URL: {}",
                hook.url
            ))),
        }
    }
}
