use super::{resolve_settings, Settings};

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    assert_eq!(resolve_settings(None, env_from(&[])), Settings::default());
    assert_eq!(Settings::default().lookup_latency_ms, 500);
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
        bind_addr = "0.0.0.0:8080"
        lookup_latency_ms = 0
        fixtures_path = "fixtures/addresses.json"
    "#;
    let settings = resolve_settings(Some(raw), env_from(&[]));
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.lookup_latency_ms, 0);
    assert_eq!(
        settings.fixtures_path.as_deref(),
        Some("fixtures/addresses.json")
    );
}

#[test]
fn env_overrides_file_and_prefixed_bind_wins() {
    let raw = r#"bind_addr = "0.0.0.0:8080""#;
    let settings = resolve_settings(
        Some(raw),
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:4000"),
            ("APP__BIND_ADDR", "127.0.0.1:5000"),
            ("APP__LOOKUP_LATENCY_MS", "25"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:5000");
    assert_eq!(settings.lookup_latency_ms, 25);
}

#[test]
fn unparsable_latency_keeps_previous_value() {
    let settings = resolve_settings(None, env_from(&[("APP__LOOKUP_LATENCY_MS", "soon")]));
    assert_eq!(settings.lookup_latency_ms, 500);
}

#[test]
fn invalid_file_falls_back_to_defaults() {
    let settings = resolve_settings(Some("bind_addr = ["), env_from(&[]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn blank_fixtures_env_disables_fixtures() {
    let raw = r#"fixtures_path = "a.json""#;
    let settings = resolve_settings(Some(raw), env_from(&[("APP__FIXTURES_PATH", " ")]));
    assert_eq!(settings.fixtures_path, None);
}
