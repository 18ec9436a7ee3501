//! Full-file parse and resolution tests against a realistic config fixture

use std::path::PathBuf;

use redwaf_config::{parse_file, ConfigError, ConfigValue, Settings};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("config.lua")
}

#[test]
fn test_parse_fixture_end_to_end() {
    let map = parse_file(&fixture_path()).unwrap();

    assert_eq!(
        map.get("RulePath"),
        Some(&ConfigValue::Str(
            "/usr/local/nginx/conf/waf/wafconf/".into()
        ))
    );
    assert_eq!(map.get("CCDeny"), Some(&ConfigValue::Str("off".into())));
    assert_eq!(map.get("CCBanTime"), Some(&ConfigValue::Raw("600".into())));
    assert_eq!(map.get("redis_port"), Some(&ConfigValue::Raw("6379".into())));
    assert_eq!(map.get("redis_username"), Some(&ConfigValue::Nil));
    assert_eq!(
        map.get("black_fileExt"),
        Some(&ConfigValue::List(vec!["php".into(), "jsp".into()]))
    );
    assert_eq!(
        map.get("ipBlocklist"),
        Some(&ConfigValue::List(vec!["1.0.0.1".into()]))
    );

    // The challenge page keeps its braces, quotes and equals signs
    let html = match map.get("html") {
        Some(ConfigValue::Str(html)) => html,
        other => panic!("html should be a string, got {:?}", other),
    };
    assert!(html.contains("<title>Access Denied</title>"));
    assert!(html.contains("{ id = \"waf\" }"));
    assert!(html.contains("width = inherit"));

    // Nothing from the export table leaks through
    assert!(!map.contains("version"));
    assert!(!map.contains("_M"));
}

#[test]
fn test_fixture_resolves_to_settings() {
    let map = parse_file(&fixture_path()).unwrap();
    let settings = Settings::from_config(&map).unwrap();

    assert_eq!(settings.connection.host, "127.0.0.1");
    assert_eq!(settings.connection.port, 6379);
    assert_eq!(settings.connection.username, None);
    assert_eq!(settings.ip_whitelist, vec!["127.0.0.1"]);
    assert_eq!(settings.ip_blocklist, vec!["1.0.0.1"]);
    assert!(settings
        .behavior
        .iter()
        .any(|(field, value)| field == "CCBanTime" && value == "600"));
    assert!(settings
        .behavior
        .iter()
        .any(|(field, value)| field == "html" && value.contains("Access Denied")));
}

#[test]
fn test_missing_file_is_a_file_access_error() {
    let result = parse_file(&PathBuf::from("/nonexistent/waf/config.lua"));
    assert!(matches!(result, Err(ConfigError::FileAccess { .. })));
}
