use std::collections::HashMap;
use std::env::VarError;
use std::path::Path;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert!(cfg.headless);
    assert_eq!(cfg.window_size(), (1920, 1080));
    assert_eq!(cfg.ready_timeout_secs, 10);
    assert_eq!(cfg.ready_timeout(), std::time::Duration::from_secs(10));
    assert!(cfg.debug_html_path.is_none());
}

#[test]
fn unknown_pricewalk_variables_do_not_affect_loading() {
    let mut map = HashMap::new();
    map.insert("PRICEWALK_ENV", "staging");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn user_agent_override() {
    let mut map = HashMap::new();
    map.insert("PRICEWALK_USER_AGENT", "pricewalk-test/1.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "pricewalk-test/1.0");
}

#[test]
fn headless_accepts_common_boolean_spellings() {
    for (raw, expected) in [("false", false), ("0", false), ("OFF", false), ("yes", true)] {
        let mut map = HashMap::new();
        map.insert("PRICEWALK_HEADLESS", raw);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.headless, expected, "PRICEWALK_HEADLESS={raw}");
    }
}

#[test]
fn headless_invalid() {
    let mut map = HashMap::new();
    map.insert("PRICEWALK_HEADLESS", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEWALK_HEADLESS"),
        "expected InvalidEnvVar(PRICEWALK_HEADLESS), got: {result:?}"
    );
}

#[test]
fn window_size_override() {
    let mut map = HashMap::new();
    map.insert("PRICEWALK_WINDOW_WIDTH", "1280");
    map.insert("PRICEWALK_WINDOW_HEIGHT", "720");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.window_size(), (1280, 720));
}

#[test]
fn window_height_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PRICEWALK_WINDOW_HEIGHT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEWALK_WINDOW_HEIGHT"),
        "expected InvalidEnvVar(PRICEWALK_WINDOW_HEIGHT), got: {result:?}"
    );
}

#[test]
fn ready_timeout_override() {
    let mut map = HashMap::new();
    map.insert("PRICEWALK_READY_TIMEOUT_SECS", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.ready_timeout_secs, 3);
}

#[test]
fn ready_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("PRICEWALK_READY_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEWALK_READY_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PRICEWALK_READY_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn debug_html_path_is_optional() {
    let mut map = HashMap::new();
    map.insert("PRICEWALK_DEBUG_HTML_PATH", "debug_last_page.html");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.debug_html_path.as_deref(),
        Some(Path::new("debug_last_page.html"))
    );
}

#[test]
fn blank_debug_html_path_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("PRICEWALK_DEBUG_HTML_PATH", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.debug_html_path.is_none());
}
