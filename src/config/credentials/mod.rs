use super::schema::Config;
use tracing::{info, warn};

macro_rules! define_credentials {
    ($( $name:literal, $env:literal => $($path:ident).+ );* $(;)?) => {
        /// (slot name, env var name) pairs.
        pub const CREDENTIAL_ENV_VARS: &[(&str, &str)] = &[$(($name, $env)),*];

        /// Get the current value of a credential field by slot name.
        pub fn get_credential_value<'a>(config: &'a Config, name: &str) -> Option<&'a str> {
            match name {
                $($name => Some(config.$($path).+.as_str()),)*
                _ => None,
            }
        }

        /// Apply environment variable overrides.
        ///
        /// Any `LOOKOUT_*` secret env var that is set and non-empty overwrites
        /// the corresponding config field, so secrets can be injected without
        /// touching the config file.
        pub fn apply_env_overrides(config: &mut Config) {
            $(
                if let Ok(val) = std::env::var($env) {
                    if !val.is_empty() {
                        config.$($path).+ = val;
                    }
                }
            )*
            apply_admin_override(config, std::env::var(ADMIN_CHAT_ID_ENV).ok().as_deref());
        }
    };
}

define_credentials! {
    "telegram-token",  "LOOKOUT_TELEGRAM_TOKEN"  => telegram.token;
    "source-api-key",  "LOOKOUT_SOURCE_API_KEY"  => source.api_key;
}

pub const ADMIN_CHAT_ID_ENV: &str = "LOOKOUT_ADMIN_CHAT_ID";

/// Apply the administrator chat override. An unparseable value disables
/// administrator traffic rather than failing startup.
pub fn apply_admin_override(config: &mut Config, raw: Option<&str>) {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return;
    };
    match raw.parse::<i64>() {
        Ok(chat_id) => {
            info!("Admin notifications enabled for chat_id={}", chat_id);
            config.admin.chat_id = Some(chat_id);
        }
        Err(_) => {
            warn!(
                "{} is not a valid chat id ({:?}); admin notifications disabled",
                ADMIN_CHAT_ID_ENV, raw
            );
            config.admin.chat_id = None;
        }
    }
}

/// Where the effective value of a credential slot came from.
pub fn detect_source(name: &str, config: &Config) -> &'static str {
    let env_set = CREDENTIAL_ENV_VARS
        .iter()
        .find(|(slot, _)| *slot == name)
        .is_some_and(|(_, env)| std::env::var(env).is_ok_and(|v| !v.is_empty()));
    if env_set {
        return "env";
    }
    match get_credential_value(config, name) {
        Some(v) if !v.is_empty() => "config",
        _ => "unset",
    }
}
