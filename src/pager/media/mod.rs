use crate::utils::regex::RegexPatterns;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const NO_CAPTION: &str = "No caption";

/// Keys under which a multi-item post lists its sub-items, in lookup order.
const CAROUSEL_KEYS: &[&str] = &["carousel_media", "resources", "items", "carousel_items"];

// Preferred URL locations, as JSON pointers, checked in order before falling
// back to a recursive scan of the whole object.
const POST_VIDEO_FIELDS: &[&str] = &[
    "/video_url",
    "/video_versions/0/url",
    "/display_url",
    "/thumbnail_url",
];
const POST_PHOTO_FIELDS: &[&str] = &[
    "/display_url",
    "/thumbnail_url",
    "/image_versions2/candidates/0/url",
    "/image_url",
    "/display_src",
    "/url",
    "/src",
    "/secure_url",
];
const CAROUSEL_VIDEO_FIELDS: &[&str] = &["/video_url", "/video_versions/0/url", "/thumbnail_url"];
const CAROUSEL_PHOTO_FIELDS: &[&str] = &[
    "/thumbnail_url",
    "/display_url",
    "/image_versions2/candidates/0/url",
    "/url",
    "/src",
];

/// Keys visited first during the recursive scan so that canonical fields win
/// over incidental links.
const SCAN_PRIORITY_KEYS: &[&str] = &[
    "video_url",
    "display_url",
    "display_src",
    "thumbnail_url",
    "image_url",
    "url",
    "src",
    "secure_url",
];

const CAPTION_KEYS: &[&str] = &["caption_text", "caption", "title", "text", "description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

/// One addressable photo or video. `url` is `None` when nothing usable could
/// be resolved; such items are kept for diagnostics but never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub url: Option<String>,
    pub kind: MediaKind,
    pub caption: String,
    pub owning_post_id: Option<String>,
}

impl MediaItem {
    pub fn is_sendable(&self) -> bool {
        self.url.is_some()
    }
}

/// Flatten one raw post into media items.
///
/// A carousel yields one item per sub-item, each classified by its own video
/// flag; anything else yields exactly one item.
pub fn extract(post: &Value) -> Vec<MediaItem> {
    let post_id = post_id(post);

    for key in CAROUSEL_KEYS {
        if let Some(subs) = post.get(*key).and_then(Value::as_array)
            && !subs.is_empty()
        {
            let parent_caption = caption_of(post);
            return subs
                .iter()
                .map(|sub| {
                    let caption = caption_field(sub).unwrap_or_else(|| parent_caption.clone());
                    item_from(
                        sub,
                        CAROUSEL_VIDEO_FIELDS,
                        CAROUSEL_PHOTO_FIELDS,
                        caption,
                        post_id.clone(),
                    )
                })
                .collect();
        }
    }

    vec![item_from(
        post,
        POST_VIDEO_FIELDS,
        POST_PHOTO_FIELDS,
        caption_of(post),
        post_id,
    )]
}

fn item_from(
    value: &Value,
    video_fields: &[&str],
    photo_fields: &[&str],
    caption: String,
    owning_post_id: Option<String>,
) -> MediaItem {
    let prefer_video = is_video(value);
    let fields = if prefer_video {
        video_fields
    } else {
        photo_fields
    };
    let url = preferred_url(value, fields).or_else(|| scan_best_url(value, prefer_video));
    let kind = match &url {
        _ if prefer_video => MediaKind::Video,
        Some(u) if looks_like_video(u) => MediaKind::Video,
        _ => MediaKind::Photo,
    };
    MediaItem {
        url,
        kind,
        caption,
        owning_post_id,
    }
}

fn is_video(value: &Value) -> bool {
    value.get("is_video").and_then(Value::as_bool).unwrap_or(false)
        || value.get("media_type").and_then(Value::as_i64) == Some(2)
        || value.get("type").and_then(Value::as_str) == Some("video")
}

fn looks_like_video(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.contains(".mp4") || lower.contains(".m3u8")
}

fn preferred_url(value: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|ptr| value.pointer(ptr).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
}

/// Every media link found anywhere in `value`, deduplicated, in discovery order.
pub fn find_urls(value: &Value) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    walk(value, &mut seen, &mut found);
    found
}

fn walk(value: &Value, seen: &mut HashSet<String>, found: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for m in RegexPatterns::media_url().find_iter(s) {
                let url = m.as_str().to_string();
                if seen.insert(url.clone()) {
                    found.push(url);
                }
            }
        }
        Value::Object(map) => {
            for key in SCAN_PRIORITY_KEYS {
                if let Some(v) = map.get(*key) {
                    walk(v, seen, found);
                }
            }
            for v in map.values() {
                walk(v, seen, found);
            }
        }
        Value::Array(items) => {
            for v in items {
                walk(v, seen, found);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn scan_best_url(value: &Value, prefer_video: bool) -> Option<String> {
    let urls = find_urls(value);
    if prefer_video
        && let Some(video) = urls.iter().find(|u| RegexPatterns::video_url().is_match(u))
    {
        return Some(video.clone());
    }
    urls.into_iter().next()
}

fn post_id(post: &Value) -> Option<String> {
    ["pk", "id"].iter().find_map(|key| match post.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn caption_field(value: &Value) -> Option<String> {
    for key in CAPTION_KEYS {
        let text = match value.get(*key) {
            Some(Value::String(s)) => Some(s.as_str()),
            // Raw API shape: {"caption": {"text": "..."}}
            Some(Value::Object(obj)) => obj.get("text").and_then(Value::as_str),
            _ => None,
        };
        if let Some(t) = text.map(str::trim).filter(|t| !t.is_empty()) {
            return Some(t.to_string());
        }
    }
    value
        .pointer("/edge_media_to_caption/edges/0/node/text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn caption_of(value: &Value) -> String {
    caption_field(value).unwrap_or_else(|| NO_CAPTION.to_string())
}
