use serde::{Deserialize, Serialize};

/// Sentinel for identity fields the interaction did not carry.
pub const UNKNOWN: &str = "unknown";

/// A user record as the transport saw it. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUser {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A raw inbound interaction. `user` is the sender of the outer update;
/// `callback_user` is the presser of a button inside it, which is the more
/// specific source when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInteraction {
    pub user: Option<RawUser>,
    pub callback_user: Option<RawUser>,
    /// Phone number, only present when the user shared a contact in this
    /// interaction.
    pub phone: Option<String>,
    pub language: Option<String>,
}

/// Resolved identity of the person behind an interaction. Immutable once
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub language: String,
}

impl Actor {
    /// Copy of this actor carrying `phone` when it has none of its own.
    pub fn with_fallback_phone(&self, phone: Option<&str>) -> Self {
        let mut actor = self.clone();
        if actor.phone.is_none() {
            actor.phone = phone.map(str::to_string);
        }
        actor
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn display_name(user: &RawUser) -> Option<String> {
    non_empty(user.full_name.as_deref()).or_else(|| {
        let joined = format!(
            "{} {}",
            user.first_name.as_deref().unwrap_or_default(),
            user.last_name.as_deref().unwrap_or_default()
        );
        non_empty(Some(&joined))
    })
}

/// Derive an [`Actor`] from a raw interaction. Never fails: absent fields
/// become [`UNKNOWN`].
///
/// The callback presser wins over the outer sender as a whole record, so an
/// actor never mixes the id of one user with the name of another.
pub fn resolve_actor(raw: &RawInteraction) -> Actor {
    let source = raw.callback_user.as_ref().or(raw.user.as_ref());
    let (id, username, name) = match source {
        Some(user) => (
            user.id.map(|id| id.to_string()),
            non_empty(user.username.as_deref()),
            display_name(user),
        ),
        None => (None, None, None),
    };
    Actor {
        id: id.unwrap_or_else(|| UNKNOWN.to_string()),
        username: username.unwrap_or_else(|| UNKNOWN.to_string()),
        display_name: name.unwrap_or_else(|| UNKNOWN.to_string()),
        phone: non_empty(raw.phone.as_deref()),
        language: non_empty(raw.language.as_deref()).unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, username: &str, first: &str) -> RawUser {
        RawUser {
            id: Some(id),
            username: Some(username.to_string()),
            first_name: Some(first.to_string()),
            ..RawUser::default()
        }
    }

    #[test]
    fn test_empty_interaction_resolves_to_sentinels() {
        let actor = resolve_actor(&RawInteraction::default());
        assert_eq!(actor.id, UNKNOWN);
        assert_eq!(actor.username, UNKNOWN);
        assert_eq!(actor.display_name, UNKNOWN);
        assert_eq!(actor.language, UNKNOWN);
        assert_eq!(actor.phone, None);
    }

    #[test]
    fn test_user_with_no_fields_resolves_to_sentinels() {
        let raw = RawInteraction {
            user: Some(RawUser::default()),
            ..RawInteraction::default()
        };
        let actor = resolve_actor(&raw);
        assert_eq!(actor.id, UNKNOWN);
        assert_eq!(actor.username, UNKNOWN);
        assert_eq!(actor.display_name, UNKNOWN);
    }

    #[test]
    fn test_callback_user_overrides_outer_user() {
        let raw = RawInteraction {
            user: Some(user(1, "outer", "Outer")),
            callback_user: Some(RawUser {
                id: Some(2),
                ..RawUser::default()
            }),
            ..RawInteraction::default()
        };
        let actor = resolve_actor(&raw);
        assert_eq!(actor.id, "2");
        // Whole-record precedence: no borrowing from the outer user
        assert_eq!(actor.username, UNKNOWN);
        assert_eq!(actor.display_name, UNKNOWN);
    }

    #[test]
    fn test_display_name_prefers_full_name_then_parts() {
        let mut u = user(5, "ann", "Ann");
        u.last_name = Some("Lee".into());
        let raw = RawInteraction {
            user: Some(u.clone()),
            ..RawInteraction::default()
        };
        assert_eq!(resolve_actor(&raw).display_name, "Ann Lee");

        u.full_name = Some("Ann B. Lee".into());
        let raw = RawInteraction {
            user: Some(u),
            ..RawInteraction::default()
        };
        assert_eq!(resolve_actor(&raw).display_name, "Ann B. Lee");
    }

    #[test]
    fn test_blank_strings_are_unknown() {
        let raw = RawInteraction {
            user: Some(RawUser {
                id: Some(9),
                username: Some("  ".into()),
                first_name: Some(String::new()),
                ..RawUser::default()
            }),
            phone: Some(" ".into()),
            language: Some("ru".into()),
            ..RawInteraction::default()
        };
        let actor = resolve_actor(&raw);
        assert_eq!(actor.id, "9");
        assert_eq!(actor.username, UNKNOWN);
        assert_eq!(actor.display_name, UNKNOWN);
        assert_eq!(actor.phone, None);
        assert_eq!(actor.language, "ru");
    }

    #[test]
    fn test_fallback_phone_only_fills_absent() {
        let raw = RawInteraction {
            user: Some(user(1, "a", "A")),
            phone: Some("+100".into()),
            ..RawInteraction::default()
        };
        let actor = resolve_actor(&raw);
        assert_eq!(
            actor.with_fallback_phone(Some("+200")).phone.as_deref(),
            Some("+100")
        );
        let bare = resolve_actor(&RawInteraction::default());
        assert_eq!(
            bare.with_fallback_phone(Some("+200")).phone.as_deref(),
            Some("+200")
        );
    }
}
