use lookout::config::{Config, load_config, save_config};

fn default_config() -> Config {
    serde_json::from_str("{}").unwrap()
}

#[test]
fn test_valid_default_passes() {
    assert!(default_config().validate().is_ok());
}

#[test]
fn test_defaults() {
    let config = default_config();
    assert_eq!(config.activity.debounce_secs, 60);
    assert!(config.activity.alerts);
    assert!(config.activity.summaries);
    assert_eq!(config.pager.page_size, 4);
    assert_eq!(config.pager.posts_amount, 80);
    assert_eq!(config.pager.search_limit, 5);
    assert_eq!(config.source.timeout_secs, 30);
    assert!(config.admin.chat_id.is_none());
}

#[test]
fn test_zero_debounce_rejected() {
    let mut config = default_config();
    config.activity.debounce_secs = 0;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("debounceSecs"));
}

#[test]
fn test_page_size_above_media_group_limit_rejected() {
    let mut config = default_config();
    config.pager.page_size = 11;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("pageSize"));
}

#[test]
fn test_bad_base_url_rejected() {
    let mut config = default_config();
    config.source.base_url = "not a url".into();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("baseUrl"));
}

#[test]
fn test_camel_case_keys() {
    let config: Config = serde_json::from_str(
        r#"{
            "telegram": {"token": "t", "allowFrom": ["42"]},
            "admin": {"chatId": -100123},
            "activity": {"debounceSecs": 5, "alerts": false},
            "pager": {"pageSize": 10}
        }"#,
    )
    .unwrap();
    assert_eq!(config.admin.chat_id, Some(-100_123));
    assert_eq!(config.activity.debounce_secs, 5);
    assert!(!config.activity.alerts);
    assert!(config.activity.summaries);
    assert!(config.telegram.is_allowed("42"));
    assert!(!config.telegram.is_allowed("43"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_debug_redacts_secrets() {
    let mut config = default_config();
    config.telegram.token = "123:SECRET".into();
    config.source.api_key = "KEY".into();
    let debug = format!("{:?}", config);
    assert!(!debug.contains("SECRET"));
    assert!(!debug.contains("KEY"));
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = default_config();
    config.pager.page_size = 6;
    save_config(&config, Some(&path)).unwrap();
    let loaded = load_config(Some(&path)).unwrap();
    assert_eq!(loaded.pager.page_size, 6);
}

#[test]
fn test_invalid_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"pager": {"pageSize": 0}}"#).unwrap();
    assert!(load_config(Some(&path)).is_err());
}

#[test]
fn test_webhook_with_bad_url_rejected() {
    let config: Config = serde_json::from_str(
        r#"{"telegram": {"token": "1:t", "webhook": {"url": "ftp//nope", "port": 8080}}}"#,
    )
    .unwrap();
    assert!(config.validate().is_err());

    let config: Config = serde_json::from_str(
        r#"{"telegram": {"token": "1:t", "webhook": {"url": "https://hooks.example.org", "path": "tg"}}}"#,
    )
    .unwrap();
    assert!(config.validate().is_ok());
}
