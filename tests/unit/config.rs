use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_are_sane() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.model, DEFAULT_MODEL);
    assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    assert!(cfg.api_key.is_none());
    assert_eq!(cfg.request_timeout(), Duration::from_secs(120));
    assert!(cfg.history_path().ends_with("destiny_archives.json"));
}

#[test]
fn gemini_key_wins_over_generic_key() {
    let mut cfg = AppConfig::default();
    cfg.apply_env(env(&[("GEMINI_API_KEY", "g"), ("API_KEY", "a")]));
    assert_eq!(cfg.api_key.as_deref(), Some("g"));

    let mut cfg = AppConfig::default();
    cfg.apply_env(env(&[("GEMINI_API_KEY", " "), ("API_KEY", "a")]));
    assert_eq!(cfg.api_key.as_deref(), Some("a"));
}

#[test]
fn env_overrides_paths_and_model() {
    let mut cfg = AppConfig::default();
    cfg.apply_env(env(&[
        ("DESTINY_CARD_MODEL", "m"),
        ("DESTINY_CARD_DATA_DIR", "/tmp/dc"),
        ("DESTINY_CARD_OUTPUT_DIR", "/tmp/out"),
    ]));
    assert_eq!(cfg.model, "m");
    assert_eq!(cfg.history_path(), PathBuf::from("/tmp/dc/destiny_archives.json"));
    assert_eq!(cfg.output_dir, PathBuf::from("/tmp/out"));
}

#[test]
fn partial_json_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, r#"{"model": "custom", "request_timeout_secs": 5}"#).unwrap();

    let cfg: AppConfig = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(cfg.model, "custom");
    assert_eq!(cfg.request_timeout(), Duration::from_secs(5));
    assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(AppConfig::load(Some(&dir.path().join("nope.json"))).is_err());
}
