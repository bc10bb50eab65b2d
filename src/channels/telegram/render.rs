use crate::channels::base::{caption, split_message};
use crate::conversation::{Keyboard, ProfileDelivery, Reply, ShownProfile};
use crate::pager::{MediaItem, MediaKind};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia, InputMediaPhoto,
    InputMediaVideo, KeyboardButton, KeyboardMarkup, KeyboardRemove, MessageId, ReplyMarkup,
};
use tracing::warn;

pub const MAX_MESSAGE_CHARS: usize = 4096;
pub const MAX_CAPTION_CHARS: usize = 1024;

pub fn markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Inline(rows) => ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(
            rows.iter().map(|row| {
                row.iter()
                    .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.callback.data()))
                    .collect::<Vec<_>>()
            }),
        )),
        Keyboard::Menu(rows) => ReplyMarkup::Keyboard(
            KeyboardMarkup::new(rows.iter().map(|row| {
                row.iter()
                    .map(|label| KeyboardButton::new(label.clone()))
                    .collect::<Vec<_>>()
            }))
            .resize_keyboard(),
        ),
        Keyboard::RemoveMenu => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
    }
}

fn media_url(item: &MediaItem) -> Option<url::Url> {
    item.url.as_deref().and_then(|u| url::Url::parse(u).ok())
}

/// Album entries for every item with a parseable URL.
pub fn album_media(items: &[MediaItem]) -> Vec<InputMedia> {
    items
        .iter()
        .filter_map(|item| {
            let file = InputFile::url(media_url(item)?);
            let text = caption(&item.caption, MAX_CAPTION_CHARS);
            Some(match item.kind {
                MediaKind::Photo => {
                    let mut photo = InputMediaPhoto::new(file);
                    if let Some(text) = text {
                        photo = photo.caption(text);
                    }
                    InputMedia::Photo(photo)
                }
                MediaKind::Video => {
                    let mut video = InputMediaVideo::new(file);
                    if let Some(text) = text {
                        video = video.caption(text);
                    }
                    InputMedia::Video(video)
                }
            })
        })
        .collect()
}

/// Plain-text stand-in for an item Telegram refused to fetch.
pub fn media_fallback_text(item: &MediaItem) -> String {
    match &item.url {
        Some(url) => format!("{}\n{}", item.caption, url),
        None => item.caption.clone(),
    }
}

/// Deliver replies in order. Each failure is logged and the rest still go
/// out. Returns how each deferred profile card was delivered.
pub async fn send_replies(
    bot: &Bot,
    chat: ChatId,
    origin: Option<MessageId>,
    replies: &[Reply],
) -> Vec<(ShownProfile, ProfileDelivery)> {
    let mut delivered = Vec::new();
    for reply in replies {
        let sent = match reply {
            Reply::Profile {
                caption: text,
                picture,
                keyboard,
                shown,
            } => send_profile(bot, chat, text, picture.as_deref(), keyboard)
                .await
                .map(|how| {
                    if let Some(shown) = shown {
                        delivered.push((shown.clone(), how));
                    }
                }),
            other => send_reply(bot, chat, origin, other).await,
        };
        if let Err(e) = sent {
            warn!("telegram: failed to send reply to {}: {:#}", chat, e);
        }
    }
    delivered
}

async fn send_profile(
    bot: &Bot,
    chat: ChatId,
    text: &str,
    picture: Option<&str>,
    keyboard: &Keyboard,
) -> anyhow::Result<ProfileDelivery> {
    let Some(picture) = picture.and_then(|p| url::Url::parse(p).ok()) else {
        send_text(bot, chat, text, Some(keyboard)).await?;
        return Ok(ProfileDelivery::TextFallback);
    };
    let sent = match caption(text, MAX_CAPTION_CHARS) {
        Some(c) => {
            bot.send_photo(chat, InputFile::url(picture))
                .caption(c)
                .reply_markup(markup(keyboard))
                .await
        }
        None => {
            bot.send_photo(chat, InputFile::url(picture))
                .reply_markup(markup(keyboard))
                .await
        }
    };
    match sent {
        Ok(_) => Ok(ProfileDelivery::Picture),
        Err(e) => {
            warn!("telegram: profile picture rejected, sending text: {}", e);
            send_text(bot, chat, text, Some(keyboard)).await?;
            Ok(ProfileDelivery::TextFallback)
        }
    }
}

async fn send_reply(
    bot: &Bot,
    chat: ChatId,
    origin: Option<MessageId>,
    reply: &Reply,
) -> anyhow::Result<()> {
    match reply {
        Reply::Text { text, keyboard } => send_text(bot, chat, text, keyboard.as_ref()).await,
        Reply::Profile {
            caption: text,
            picture,
            keyboard,
            ..
        } => send_profile(bot, chat, text, picture.as_deref(), keyboard)
            .await
            .map(|_| ()),
        Reply::Album(items) => send_album(bot, chat, items).await,
        Reply::Media(item) => send_single(bot, chat, item).await,
        Reply::ClearButtons => {
            if let Some(message_id) = origin {
                bot.edit_message_reply_markup(chat, message_id).await?;
            }
            Ok(())
        }
    }
}

async fn send_text(
    bot: &Bot,
    chat: ChatId,
    text: &str,
    keyboard: Option<&Keyboard>,
) -> anyhow::Result<()> {
    let chunks = split_message(text, MAX_MESSAGE_CHARS);
    let last = chunks.len().saturating_sub(1);
    for (i, chunk) in chunks.into_iter().enumerate() {
        match keyboard {
            Some(kb) if i == last => {
                bot.send_message(chat, chunk).reply_markup(markup(kb)).await?;
            }
            _ => {
                bot.send_message(chat, chunk).await?;
            }
        }
    }
    Ok(())
}

async fn send_album(bot: &Bot, chat: ChatId, items: &[MediaItem]) -> anyhow::Result<()> {
    let media = album_media(items);
    if media.len() < 2 {
        for item in items {
            send_single(bot, chat, item).await?;
        }
        return Ok(());
    }
    if let Err(e) = bot.send_media_group(chat, media).await {
        warn!("telegram: album rejected, sending items one by one: {}", e);
        for item in items {
            send_single(bot, chat, item).await?;
        }
    }
    Ok(())
}

async fn send_single(bot: &Bot, chat: ChatId, item: &MediaItem) -> anyhow::Result<()> {
    let Some(url) = media_url(item) else {
        bot.send_message(chat, media_fallback_text(item)).await?;
        return Ok(());
    };
    let text = caption(&item.caption, MAX_CAPTION_CHARS).unwrap_or_default();
    let sent = match item.kind {
        MediaKind::Photo => bot
            .send_photo(chat, InputFile::url(url))
            .caption(text)
            .await
            .map(|_| ()),
        MediaKind::Video => bot
            .send_video(chat, InputFile::url(url))
            .caption(text)
            .await
            .map(|_| ()),
    };
    if let Err(e) = sent {
        warn!("telegram: {:?} rejected, sending link: {}", item.kind, e);
        bot.send_message(chat, media_fallback_text(item)).await?;
    }
    Ok(())
}
