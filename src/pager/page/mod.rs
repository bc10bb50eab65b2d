use super::media::{MediaItem, extract};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// One slice of a paged list. `index` is always within `[0, total_pages)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub index: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total_pages
    }

    /// 1-based position label, e.g. `2/5`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.index + 1, self.total_pages)
    }
}

/// Slice `items` into the page at `requested`, clamped into range.
///
/// `total_pages` is `ceil(len / page_size)` with a minimum of 1, so an empty
/// list still has a single (empty) page. A zero page size is treated as 1.
pub fn build_page<T>(items: &[T], page_size: usize, requested: i64) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let last = (total_pages - 1) as i64;
    let index = requested.clamp(0, last) as usize;
    let start = (index * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    Page {
        items: &items[start..end],
        index,
        total_pages,
    }
}

/// Session media list: flattened, sendable, deduplicated by URL at ingestion.
#[derive(Debug, Clone, Default)]
pub struct MediaList {
    items: Vec<MediaItem>,
    seen: HashSet<String>,
}

impl MediaList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten and append `posts` in order. Items without a URL and URLs
    /// already present are skipped. Returns the number of items added.
    pub fn ingest(&mut self, posts: &[Value]) -> usize {
        let before = self.items.len();
        let mut skipped = 0usize;
        for item in posts.iter().flat_map(extract) {
            match &item.url {
                Some(url) if self.seen.insert(url.clone()) => self.items.push(item),
                _ => skipped += 1,
            }
        }
        let added = self.items.len() - before;
        debug!("media list: ingested {} items, skipped {}", added, skipped);
        added
    }

    pub fn page(&self, page_size: usize, requested: i64) -> Page<'_, MediaItem> {
        build_page(&self.items, page_size, requested)
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests;
