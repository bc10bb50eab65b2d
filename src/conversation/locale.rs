use serde::{Deserialize, Serialize};

/// Interface language for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ru];

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }

    /// Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Self::Ru,
            _ => Self::En,
        }
    }

    pub fn texts(self) -> &'static Texts {
        match self {
            Self::En => &EN,
            Self::Ru => &RU,
        }
    }

    /// Name of the language in itself, for the picker.
    pub fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ru => "Русский",
        }
    }
}

/// User-facing strings. `{}` marks a single substitution.
pub struct Texts {
    pub greeting: &'static str,
    pub greeting_ready: &'static str,
    pub invalid_language: &'static str,
    pub menu_search: &'static str,
    pub menu_help: &'static str,
    pub menu_report: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
    pub quick_menu: &'static str,
    pub help: &'static str,
    pub search_prompt: &'static str,
    pub no_text: &'static str,
    pub search_failed: &'static str,
    pub no_users_found: &'static str,
    pub profile_fallback: &'static str,
    pub followers: &'static str,
    pub following: &'static str,
    pub posts: &'static str,
    pub private: &'static str,
    pub verified: &'static str,
    pub report_prompt: &'static str,
    pub report_empty: &'static str,
    pub report_sent: &'static str,
    pub report_failed: &'static str,
    pub no_admin: &'static str,
    pub no_user_selected: &'static str,
    pub fetching_posts: &'static str,
    pub no_posts: &'static str,
    pub posts_navigation: &'static str,
    pub no_media: &'static str,
    pub fetching_stories: &'static str,
    pub no_stories: &'static str,
    pub stories_shown: &'static str,
    pub fetching_highlights: &'static str,
    pub no_highlights: &'static str,
    pub select_highlight: &'static str,
    pub invalid_highlight: &'static str,
    pub fetching_highlight: &'static str,
    pub no_highlight_info: &'static str,
    pub no_highlight_items: &'static str,
    pub highlights_shown: &'static str,
    pub tracking: &'static str,
    pub profile_closed: &'static str,
    pub profile_menu: &'static str,
    pub unknown_action: &'static str,
    pub dump_usage: &'static str,
    pub no_media_cached: &'static str,
    pub index_out_of_range: &'static str,
    pub not_authorized: &'static str,
    pub button_posts: &'static str,
    pub button_stories: &'static str,
    pub button_highlights: &'static str,
    pub button_tracking: &'static str,
    pub button_close: &'static str,
    pub button_prev: &'static str,
    pub button_next: &'static str,
    pub button_back: &'static str,
    pub button_search: &'static str,
    pub button_help: &'static str,
    pub button_report: &'static str,
    pub button_open: &'static str,
    pub page: &'static str,
}

impl Texts {
    pub fn fill(template: &str, value: impl std::fmt::Display) -> String {
        template.replacen("{}", &value.to_string(), 1)
    }
}

static EN: Texts = Texts {
    greeting: "🤖 Profile Finder\n\nPlease select your language:",
    greeting_ready: "🤖 Profile Finder\n\n🔍 Send a username (or paste a profile URL):",
    invalid_language: "Invalid selection. Please choose a language.",
    menu_search: "Search",
    menu_help: "Help",
    menu_report: "Report",
    yes: "Yes",
    no: "No",
    quick_menu: "Quick menu:",
    help: "Usage:\n\
           - Send a username (e.g. natgeo) or paste a profile URL.\n\
           - The bot finds the account and shows the profile with actions (Posts / Stories / Highlights / Tracking).\n\
           - Press Posts, Stories or Highlights to see media while the profile stays visible.\n\n\
           If requests are being blocked, wait a while and try again.",
    search_prompt: "🔍 Send a username (or paste a profile URL):",
    no_text: "Please send a username or choose an option from the menu.",
    search_failed: "❌ Search failed (requests may be blocked). Try again later.",
    no_users_found: "No users found for '{}'.",
    profile_fallback: "👤 {}\nFull name: {}",
    followers: "Followers",
    following: "Following",
    posts: "Posts",
    private: "Private",
    verified: "Verified",
    report_prompt: "✉️ Please type your report message; it will be forwarded to the admin.",
    report_empty: "Empty report. Cancelled.",
    report_sent: "✅ Report sent. Thank you!",
    report_failed: "Failed to send report to admin.",
    no_admin: "No admin configured to receive reports.",
    no_user_selected: "⚠️ No user selected. Start a new search.",
    fetching_posts: "⏳ Fetching recent posts...",
    no_posts: "❌ No posts or failed to fetch.",
    posts_navigation: "Posts — navigation:",
    no_media: "No sendable media on this page.",
    fetching_stories: "⏳ Fetching stories...",
    no_stories: "⚠️ No stories available or cannot fetch.",
    stories_shown: "Stories shown. (Profile remains above.)",
    fetching_highlights: "⏳ Fetching highlights...",
    no_highlights: "⚠️ No highlights found.",
    select_highlight: "Select a highlight message above to open it.",
    invalid_highlight: "⚠️ Invalid highlight id.",
    fetching_highlight: "⏳ Fetching highlight contents...",
    no_highlight_info: "❌ Failed to fetch highlight info.",
    no_highlight_items: "⚠️ No items in this highlight.",
    highlights_shown: "Highlights shown. (Profile remains above.)",
    tracking: "📡 Tracking feature is coming soon!",
    profile_closed: "Profile closed. Use the menu to search again.",
    profile_menu: "Profile menu:",
    unknown_action: "Unknown action.",
    dump_usage: "Usage: /dump_media <index>",
    no_media_cached: "No cached raw media found. Fetch posts first.",
    index_out_of_range: "Index out of range. Range: 0..{}",
    not_authorized: "❌ You are not authorized to use this command.",
    button_posts: "🖼 Posts",
    button_stories: "📺 Stories",
    button_highlights: "⭐ Highlights",
    button_tracking: "📡 Tracking",
    button_close: "❌ Close",
    button_prev: "⬅️ Prev",
    button_next: "Next ➡️",
    button_back: "⬅️ Back",
    button_search: "🔎 Search",
    button_help: "❓ Help",
    button_report: "✉️ Report",
    button_open: "Open",
    page: "Page",
};

static RU: Texts = Texts {
    greeting: "🤖 Поиск профилей\n\nПожалуйста, выберите язык:",
    greeting_ready: "🤖 Поиск профилей\n\n🔍 Отправьте имя пользователя (или вставьте URL профиля):",
    invalid_language: "Неверный выбор. Пожалуйста, выберите язык.",
    menu_search: "Поиск",
    menu_help: "Помощь",
    menu_report: "Сообщить",
    yes: "Да",
    no: "Нет",
    quick_menu: "Быстрое меню:",
    help: "Использование:\n\
           - Отправьте имя пользователя (например, natgeo) или вставьте URL профиля.\n\
           - Бот найдет аккаунт и покажет профиль с действиями (Посты / Истории / Хайлайты / Отслеживание).\n\
           - Нажмите Посты, Истории или Хайлайты, чтобы увидеть медиа; профиль останется выше.\n\n\
           Если запросы блокируются, подождите и попробуйте снова.",
    search_prompt: "🔍 Отправьте имя пользователя (или вставьте URL профиля):",
    no_text: "Пожалуйста, отправьте имя пользователя или выберите опцию из меню.",
    search_failed: "❌ Поиск не удался (запросы могут блокироваться). Попробуйте позже.",
    no_users_found: "Пользователи не найдены для '{}'.",
    profile_fallback: "👤 {}\nПолное имя: {}",
    followers: "Подписчики",
    following: "Подписки",
    posts: "Посты",
    private: "Приватный",
    verified: "Проверенный",
    report_prompt: "✉️ Введите ваше сообщение; оно будет отправлено администратору.",
    report_empty: "Пустой отчет. Отменено.",
    report_sent: "✅ Отчет отправлен. Спасибо!",
    report_failed: "Не удалось отправить отчет администратору.",
    no_admin: "Администратор для получения отчетов не настроен.",
    no_user_selected: "⚠️ Пользователь не выбран. Начните новый поиск.",
    fetching_posts: "⏳ Загрузка последних постов...",
    no_posts: "❌ Нет постов или не удалось загрузить.",
    posts_navigation: "Посты — навигация:",
    no_media: "Нет медиа для отправки на этой странице.",
    fetching_stories: "⏳ Загрузка историй...",
    no_stories: "⚠️ Нет доступных историй или не удалось загрузить.",
    stories_shown: "Истории показаны. (Профиль остается выше.)",
    fetching_highlights: "⏳ Загрузка хайлайтов...",
    no_highlights: "⚠️ Хайлайты не найдены.",
    select_highlight: "Выберите сообщение хайлайта выше, чтобы открыть его.",
    invalid_highlight: "⚠️ Неверный ID хайлайта.",
    fetching_highlight: "⏳ Загрузка содержимого хайлайта...",
    no_highlight_info: "❌ Не удалось загрузить информацию о хайлайте.",
    no_highlight_items: "⚠️ Нет элементов в этом хайлайте.",
    highlights_shown: "Хайлайты показаны. (Профиль остается выше.)",
    tracking: "📡 Функция отслеживания скоро появится!",
    profile_closed: "Профиль закрыт. Используйте меню для нового поиска.",
    profile_menu: "Меню профиля:",
    unknown_action: "Неизвестное действие.",
    dump_usage: "Использование: /dump_media <index>",
    no_media_cached: "Кэшированные медиа не найдены. Сначала загрузите посты.",
    index_out_of_range: "Индекс вне диапазона. Диапазон: 0..{}",
    not_authorized: "❌ У вас нет прав для использования этой команды.",
    button_posts: "🖼 Посты",
    button_stories: "📺 Истории",
    button_highlights: "⭐ Хайлайты",
    button_tracking: "📡 Отслеживание",
    button_close: "❌ Закрыть",
    button_prev: "⬅️ Назад",
    button_next: "Далее ➡️",
    button_back: "⬅️ Вернуться",
    button_search: "🔎 Поиск",
    button_help: "❓ Помощь",
    button_report: "✉️ Сообщить",
    button_open: "Открыть",
    page: "Стр.",
};
