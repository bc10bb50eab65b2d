use crate::activity::{RawInteraction, RawUser};
use crate::conversation::{Callback, Inbound, Input};
use teloxide::types::{CallbackQuery, Message, User};

/// Classify message text. Bot commands may carry an `@botname` suffix;
/// unknown commands are treated as plain text.
pub fn parse_input(text: &str) -> Input {
    let trimmed = text.trim();
    let Some(command_line) = trimmed.strip_prefix('/') else {
        return Input::Text(trimmed.to_string());
    };
    let (head, rest) = command_line
        .split_once(char::is_whitespace)
        .unwrap_or((command_line, ""));
    let command = head.split('@').next().unwrap_or_default().to_lowercase();
    match command.as_str() {
        "start" => Input::Start,
        "help" => Input::Help,
        "dump_media" => {
            let arg = rest.split_whitespace().next().map(str::to_string);
            Input::DumpMedia(arg)
        }
        _ => Input::Text(trimmed.to_string()),
    }
}

pub fn raw_user(user: &User) -> RawUser {
    RawUser {
        id: i64::try_from(user.id.0).ok(),
        username: user.username.clone(),
        full_name: Some(user.full_name()),
        first_name: Some(user.first_name.clone()),
        last_name: user.last_name.clone(),
    }
}

/// `None` for messages that carry neither text nor a shared contact.
pub fn inbound_from_message(msg: &Message) -> Option<Inbound> {
    let input = if let Some(text) = msg.text() {
        parse_input(text)
    } else if msg.contact().is_some() {
        Input::Contact
    } else {
        return None;
    };
    let raw = RawInteraction {
        user: msg.from.as_ref().map(raw_user),
        callback_user: None,
        phone: msg.contact().map(|c| c.phone_number.clone()),
        language: msg.from.as_ref().and_then(|u| u.language_code.clone()),
    };
    Some(Inbound {
        chat_id: msg.chat.id.0,
        raw,
        input,
    })
}

/// Callbacks from messages Telegram no longer exposes fall back to the
/// presser's private chat.
pub fn inbound_from_callback(query: &CallbackQuery) -> Inbound {
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id.0)
        .or_else(|| i64::try_from(query.from.id.0).ok())
        .unwrap_or_default();
    let data = query.data.as_deref().unwrap_or_default();
    Inbound {
        chat_id,
        raw: RawInteraction {
            user: None,
            callback_user: Some(raw_user(&query.from)),
            phone: None,
            language: query.from.language_code.clone(),
        },
        input: Input::Callback(Callback::parse(data)),
    }
}
