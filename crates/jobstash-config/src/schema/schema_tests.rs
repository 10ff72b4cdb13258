use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.storage.path, PathBuf::from("responses"));
    assert_eq!(config.storage.extension, "json");
}

#[test]
fn test_retention_config_default() {
    let retention = RetentionConfig::default();
    assert_eq!(retention.max_age_days, 2.0);
    assert!(retention.sweep_on_submit);
    assert_eq!(retention.interval_seconds, 0);
}

#[test]
fn test_logging_config_default() {
    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.dir.is_none());
    assert_eq!(logging.max_files, 30);
}

#[test]
fn test_partial_section_fills_defaults() {
    let config: Config = toml::from_str(
        r#"
        [retention]
        interval_seconds = 3600
        "#,
    )
    .unwrap();

    assert_eq!(config.retention.interval_seconds, 3600);
    assert_eq!(config.retention.max_age_days, 2.0);
    assert!(config.retention.sweep_on_submit);
}

#[test]
fn test_config_serialize_roundtrip_through_toml() {
    let mut config = Config::default();
    config.storage.path = PathBuf::from("/var/lib/jobstash");
    config.retention.max_age_days = 7.5;

    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();

    assert_eq!(parsed.storage.path, PathBuf::from("/var/lib/jobstash"));
    assert_eq!(parsed.retention.max_age_days, 7.5);
    assert!(!text.contains("dir ="));
}
