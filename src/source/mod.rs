//! Profile-data collaborator: the small async surface the conversation layer
//! consumes, plus an HTTP implementation.

pub mod http;

pub use http::HttpProfileSource;

use crate::errors::LookoutError;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Untyped post as returned by the source; shapes vary between posts,
/// stories and highlight items.
pub type RawPost = serde_json::Value;

/// Search hit identifying one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(deserialize_with = "de_pk")]
    pub pk: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    #[serde(deserialize_with = "de_pk")]
    pub pk: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub profile_pic_url_hd: Option<String>,
    #[serde(default)]
    pub follower_count: Option<u64>,
    #[serde(default)]
    pub following_count: Option<u64>,
    #[serde(default)]
    pub media_count: Option<u64>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_verified: bool,
}

impl ProfileInfo {
    /// HD picture when available, otherwise the standard one.
    pub fn best_picture(&self) -> Option<&str> {
        [&self.profile_pic_url_hd, &self.profile_pic_url]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRef {
    #[serde(deserialize_with = "de_pk")]
    pub pk: i64,
    #[serde(default)]
    pub title: Option<String>,
}

impl HighlightRef {
    pub fn label(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => self.pk.to_string(),
        }
    }
}

/// Accept a primary key as a JSON number or a numeric string.
fn de_pk<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Pk {
        Num(i64),
        Str(String),
    }

    match Pk::deserialize(deserializer)? {
        Pk::Num(n) => Ok(n),
        Pk::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Source of profile data. Only `search_users` reports failure; the other
/// operations collapse "no data" and "fetch failed" into an empty result.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn search_users(&self, query: &str, limit: usize) -> Result<Vec<UserRef>, LookoutError>;

    async fn user_info(&self, user: &UserRef) -> Option<ProfileInfo>;

    async fn user_media(&self, user: &UserRef, amount: usize) -> Vec<RawPost>;

    async fn user_stories(&self, user: &UserRef) -> Vec<RawPost>;

    async fn user_highlights(&self, user: &UserRef) -> Vec<HighlightRef>;

    async fn highlight_contents(&self, highlight: &HighlightRef) -> Option<Vec<RawPost>>;
}
