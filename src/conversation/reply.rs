use super::input::Callback;
use super::locale::Language;
use crate::pager::{MediaItem, Page};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub callback: Callback,
}

impl Button {
    fn new(label: impl Into<String>, callback: Callback) -> Self {
        Self {
            label: label.into(),
            callback,
        }
    }
}

/// Keyboard attached to a text reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Buttons under the message.
    Inline(Vec<Vec<Button>>),
    /// Persistent reply keyboard with shortcut words.
    Menu(Vec<Vec<String>>),
    /// Hide the persistent keyboard.
    RemoveMenu,
}

impl Keyboard {
    pub fn languages() -> Self {
        Self::Inline(
            Language::ALL
                .iter()
                .map(|l| {
                    vec![Button::new(
                        l.native_name(),
                        Callback::Language(l.code().to_string()),
                    )]
                })
                .collect(),
        )
    }

    pub fn start(lang: Language) -> Self {
        let t = lang.texts();
        Self::Inline(vec![
            vec![Button::new(t.button_search, Callback::StartSearch)],
            vec![Button::new(t.button_help, Callback::StartHelp)],
            vec![Button::new(t.button_report, Callback::StartReport)],
        ])
    }

    pub fn main_menu(lang: Language) -> Self {
        let t = lang.texts();
        Self::Menu(vec![vec![
            t.menu_search.to_string(),
            t.menu_help.to_string(),
            t.menu_report.to_string(),
        ]])
    }

    pub fn profile_actions(lang: Language) -> Self {
        let t = lang.texts();
        Self::Inline(vec![
            vec![Button::new(t.button_posts, Callback::ViewPosts)],
            vec![Button::new(t.button_stories, Callback::ViewStories)],
            vec![Button::new(t.button_highlights, Callback::ViewHighlights)],
            vec![Button::new(t.button_tracking, Callback::ViewTracking)],
            vec![Button::new(t.button_close, Callback::CloseProfile)],
        ])
    }

    /// Prev (unless first), page indicator, Next (unless last), Back.
    pub fn posts_nav<T>(lang: Language, page: &Page<'_, T>) -> Self {
        let t = lang.texts();
        let index = page.index as i64;
        let mut row = Vec::with_capacity(4);
        if !page.is_first() {
            row.push(Button::new(t.button_prev, Callback::PostsPage(index - 1)));
        }
        row.push(Button::new(
            format!("{} {}", t.page, page.label()),
            Callback::Noop,
        ));
        if !page.is_last() {
            row.push(Button::new(t.button_next, Callback::PostsPage(index + 1)));
        }
        row.push(Button::new(t.button_back, Callback::ProfileMenu));
        Self::Inline(vec![row])
    }

    pub fn open_highlight(lang: Language, pk: i64) -> Self {
        Self::Inline(vec![vec![Button::new(
            lang.texts().button_open,
            Callback::OpenHighlight(Some(pk)),
        )]])
    }
}

/// The profile a picture card shows; reported back through
/// [`ConversationMachine::profile_delivered`](super::ConversationMachine::profile_delivered).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownProfile {
    pub username: String,
    pub private: bool,
}

/// How a picture card actually reached the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileDelivery {
    Picture,
    /// Picture rejected; the caption went out as plain text.
    TextFallback,
}

impl ProfileDelivery {
    /// Details attached to the `profile_shown` record.
    pub fn extra(self, private: bool) -> Option<String> {
        match (self, private) {
            (Self::Picture, false) => None,
            (Self::Picture, true) => Some("private".into()),
            (Self::TextFallback, false) => Some("text fallback".into()),
            (Self::TextFallback, true) => Some("text fallback · private".into()),
        }
    }
}

/// One outbound message, independent of any chat API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text {
        text: String,
        keyboard: Option<Keyboard>,
    },
    /// Profile card: picture with caption when a picture is known.
    Profile {
        caption: String,
        picture: Option<String>,
        keyboard: Keyboard,
        /// Set when recording `profile_shown` waits for the transport to say
        /// how the card went out.
        shown: Option<ShownProfile>,
    },
    /// Several items sent together (one posts page).
    Album(Vec<MediaItem>),
    /// A single photo or video.
    Media(MediaItem),
    /// Strip the inline keyboard from the message the callback came from.
    ClearButtons,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self::Text {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }

    /// Text content, if this reply carries any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Profile { caption, .. } => Some(caption),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_delivery_extra() {
        assert_eq!(ProfileDelivery::Picture.extra(false), None);
        assert_eq!(ProfileDelivery::Picture.extra(true).as_deref(), Some("private"));
        assert_eq!(
            ProfileDelivery::TextFallback.extra(false).as_deref(),
            Some("text fallback")
        );
        assert_eq!(
            ProfileDelivery::TextFallback.extra(true).as_deref(),
            Some("text fallback · private")
        );
    }
    use crate::pager::build_page;

    fn nav_callbacks(kb: &Keyboard) -> Vec<Callback> {
        match kb {
            Keyboard::Inline(rows) => rows[0].iter().map(|b| b.callback.clone()).collect(),
            other => panic!("expected inline keyboard, got {:?}", other),
        }
    }

    #[test]
    fn test_posts_nav_first_middle_last() {
        let items: Vec<u32> = (0..10).collect();

        let first = Keyboard::posts_nav(Language::En, &build_page(&items, 4, 0));
        assert_eq!(
            nav_callbacks(&first),
            vec![Callback::Noop, Callback::PostsPage(1), Callback::ProfileMenu]
        );

        let middle = Keyboard::posts_nav(Language::En, &build_page(&items, 4, 1));
        assert_eq!(
            nav_callbacks(&middle),
            vec![
                Callback::PostsPage(0),
                Callback::Noop,
                Callback::PostsPage(2),
                Callback::ProfileMenu
            ]
        );

        let last = Keyboard::posts_nav(Language::En, &build_page(&items, 4, 2));
        assert_eq!(
            nav_callbacks(&last),
            vec![Callback::PostsPage(1), Callback::Noop, Callback::ProfileMenu]
        );
    }

    #[test]
    fn test_page_indicator_label() {
        let items: Vec<u32> = (0..10).collect();
        let Keyboard::Inline(rows) = Keyboard::posts_nav(Language::En, &build_page(&items, 4, 1))
        else {
            panic!("expected inline keyboard");
        };
        assert_eq!(rows[0][1].label, "Page 2/3");
    }

    #[test]
    fn test_language_picker_lists_every_language() {
        let Keyboard::Inline(rows) = Keyboard::languages() else {
            panic!("expected inline keyboard");
        };
        assert_eq!(rows.len(), Language::ALL.len());
        assert_eq!(rows[1][0].callback, Callback::Language("ru".into()));
    }
}
