use super::locale::{Language, Texts};
use crate::activity::RawInteraction;
use crate::utils::regex::RegexPatterns;

/// Button payloads. `parse` and `data` are inverses for every variant except
/// `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Language(String),
    StartSearch,
    StartHelp,
    StartReport,
    ViewPosts,
    PostsPage(i64),
    ViewStories,
    ViewHighlights,
    /// `None` when the payload carried a non-numeric id.
    OpenHighlight(Option<i64>),
    ViewTracking,
    CloseProfile,
    ProfileMenu,
    Noop,
    Unknown(String),
}

impl Callback {
    pub fn parse(data: &str) -> Self {
        let data = data.trim();
        if let Some(code) = data.strip_prefix("lang:") {
            return Self::Language(code.to_string());
        }
        if let Some(page) = data.strip_prefix("posts_page:") {
            return Self::PostsPage(page.trim().parse().unwrap_or(0));
        }
        if let Some(pk) = data.strip_prefix("highlight:") {
            return Self::OpenHighlight(pk.trim().parse().ok());
        }
        match data {
            "start_search" => Self::StartSearch,
            "start_help" => Self::StartHelp,
            "start_report" => Self::StartReport,
            "view_posts" => Self::ViewPosts,
            "view_stories" => Self::ViewStories,
            "view_highlights" => Self::ViewHighlights,
            "view_tracking" => Self::ViewTracking,
            "close_profile" => Self::CloseProfile,
            "profile_menu" => Self::ProfileMenu,
            "noop" => Self::Noop,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn data(&self) -> String {
        match self {
            Self::Language(code) => format!("lang:{code}"),
            Self::StartSearch => "start_search".into(),
            Self::StartHelp => "start_help".into(),
            Self::StartReport => "start_report".into(),
            Self::ViewPosts => "view_posts".into(),
            Self::PostsPage(n) => format!("posts_page:{n}"),
            Self::ViewStories => "view_stories".into(),
            Self::ViewHighlights => "view_highlights".into(),
            Self::OpenHighlight(Some(pk)) => format!("highlight:{pk}"),
            Self::OpenHighlight(None) => "highlight:".into(),
            Self::ViewTracking => "view_tracking".into(),
            Self::CloseProfile => "close_profile".into(),
            Self::ProfileMenu => "profile_menu".into(),
            Self::Noop => "noop".into(),
            Self::Unknown(raw) => raw.clone(),
        }
    }
}

/// One inbound user action, already classified by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// `/start`: restart from language selection.
    Start,
    /// `/help`
    Help,
    /// `/dump_media [index]`
    DumpMedia(Option<String>),
    Text(String),
    /// A shared contact with no text; only its phone number matters.
    Contact,
    Callback(Callback),
}

/// An input together with who sent it and from where.
#[derive(Debug, Clone)]
pub struct Inbound {
    pub chat_id: i64,
    pub raw: RawInteraction,
    pub input: Input,
}

/// Reply-keyboard shortcut words, matched case-insensitively in the
/// session's language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuWord {
    Search,
    Help,
    Report,
}

impl MenuWord {
    pub fn recognise(text: &str, lang: Language) -> Option<Self> {
        let t: &Texts = lang.texts();
        let lower = text.trim().to_lowercase();
        [
            (t.menu_search, Self::Search),
            (t.menu_help, Self::Help),
            (t.menu_report, Self::Report),
        ]
        .into_iter()
        .find(|(word, _)| word.to_lowercase() == lower)
        .map(|(_, w)| w)
    }
}

/// Reduce a pasted profile link to its username; anything else is returned
/// trimmed.
pub fn extract_username(text: &str) -> String {
    let text = text.trim();
    match RegexPatterns::profile_link().captures(text) {
        Some(caps) => caps[1].trim().trim_matches('/').to_string(),
        None => text.to_string(),
    }
}
