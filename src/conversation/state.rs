use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a session is in the conversation. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    SelectingLanguage,
    /// Steady state: search, help, profile navigation and paging.
    Choosing,
    /// Next text message is forwarded to the administrator.
    Reporting,
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SelectingLanguage => "selecting_language",
            Self::Choosing => "choosing",
            Self::Reporting => "reporting",
        };
        f.write_str(s)
    }
}
