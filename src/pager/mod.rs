//! Flattening raw posts into media items and slicing them into pages.

pub mod media;
pub mod page;

pub use media::{MediaItem, MediaKind, extract};
pub use page::{MediaList, Page, build_page};
