use super::{HighlightRef, ProfileInfo, ProfileSource, RawPost, UserRef};
use crate::config::SourceConfig;
use crate::errors::LookoutError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Deserialize)]
struct HighlightContents {
    #[serde(default)]
    items: Vec<RawPost>,
}

/// [`ProfileSource`] backed by a JSON gateway.
pub struct HttpProfileSource {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpProfileSource {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client: Client::builder()
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(
            &config.base_url,
            Some(config.api_key.clone()),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// GET `path` and decode the body. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req
            .send()
            .await
            .with_context(|| format!("request to {} failed", path))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!("profile source: {} not found", path);
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!(
                "{} returned {}: {}",
                path,
                status,
                crate::utils::truncate_chars(&body, 200)
            );
        }
        let value = resp
            .json::<T>()
            .await
            .with_context(|| format!("invalid JSON from {}", path))?;
        Ok(Some(value))
    }

    /// Fetch a list where failure and absence both mean "nothing".
    async fn get_list<T: DeserializeOwned>(
        &self,
        op: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Vec<T> {
        match self.get_json::<Vec<T>>(path, query).await {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                warn!("profile source {} failed: {:#}", op, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn search_users(&self, query: &str, limit: usize) -> Result<Vec<UserRef>, LookoutError> {
        let params = [("q", query.to_string()), ("limit", limit.to_string())];
        match self.get_json::<Vec<UserRef>>("/users/search", &params).await {
            Ok(users) => {
                let mut users = users.unwrap_or_default();
                users.truncate(limit);
                Ok(users)
            }
            Err(e) => {
                warn!("profile source search failed for '{}': {:#}", query, e);
                Err(LookoutError::Source(format!("{:#}", e)))
            }
        }
    }

    async fn user_info(&self, user: &UserRef) -> Option<ProfileInfo> {
        match self
            .get_json::<ProfileInfo>(&format!("/users/{}", user.pk), &[])
            .await
        {
            Ok(info) => info,
            Err(e) => {
                warn!("profile source user_info failed for {}: {:#}", user.pk, e);
                None
            }
        }
    }

    async fn user_media(&self, user: &UserRef, amount: usize) -> Vec<RawPost> {
        self.get_list(
            "user_media",
            &format!("/users/{}/medias", user.pk),
            &[("amount", amount.to_string())],
        )
        .await
    }

    async fn user_stories(&self, user: &UserRef) -> Vec<RawPost> {
        self.get_list("user_stories", &format!("/users/{}/stories", user.pk), &[])
            .await
    }

    async fn user_highlights(&self, user: &UserRef) -> Vec<HighlightRef> {
        self.get_list(
            "user_highlights",
            &format!("/users/{}/highlights", user.pk),
            &[],
        )
        .await
    }

    async fn highlight_contents(&self, highlight: &HighlightRef) -> Option<Vec<RawPost>> {
        match self
            .get_json::<HighlightContents>(&format!("/highlights/{}", highlight.pk), &[])
            .await
        {
            Ok(contents) => contents.map(|c| c.items),
            Err(e) => {
                warn!(
                    "profile source highlight_contents failed for {}: {:#}",
                    highlight.pk, e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
