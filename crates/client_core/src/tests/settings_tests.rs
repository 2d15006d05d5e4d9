use std::{collections::HashMap, io::Write};

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn settings_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_with(None, &[], env(&[])).expect("load");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.request_timeout(), Duration::from_secs(15));
}

#[test]
fn file_overrides_defaults_and_env_overrides_file() {
    let file = settings_file(
        r#"
api_base_url = "https://clinic.example.com/api"
request_timeout_secs = 5
diet_chart_return_route = "/dashboard/manager"
access_token = "from-file"
"#,
    );

    let settings = load_settings_with(
        Some(file.path()),
        &[],
        env(&[
            ("APP__ACCESS_TOKEN", "from-env"),
            ("APP__REQUEST_TIMEOUT_SECS", "9"),
        ]),
    )
    .expect("load");

    assert_eq!(settings.api_base_url, "https://clinic.example.com/api");
    assert_eq!(settings.diet_chart_return_route, "/dashboard/manager");
    assert_eq!(settings.access_token.as_deref(), Some("from-env"));
    assert_eq!(settings.request_timeout_secs, 9);
}

#[test]
fn app_prefixed_url_wins_over_legacy_variable() {
    let settings = load_settings_with(
        None,
        &[],
        env(&[
            ("DASHBOARD_API_URL", "http://legacy:1"),
            ("APP__API_BASE_URL", "http://preferred:2"),
        ]),
    )
    .expect("load");
    assert_eq!(settings.api_base_url, "http://preferred:2");
}

#[test]
fn unparsable_timeout_env_is_ignored() {
    let settings = load_settings_with(
        None,
        &[],
        env(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]),
    )
    .expect("load");
    assert_eq!(settings.request_timeout_secs, 15);
}

#[test]
fn explicit_missing_or_malformed_file_is_an_error() {
    let missing = std::env::temp_dir().join("clinic-dashboard-does-not-exist.toml");
    assert!(load_settings_with(Some(&missing), &[], env(&[])).is_err());

    let malformed = settings_file("api_base_url = ");
    assert!(load_settings_with(Some(malformed.path()), &[], env(&[])).is_err());

    let unknown_key = settings_file("colour = \"teal\"");
    assert!(load_settings_with(Some(unknown_key.path()), &[], env(&[])).is_err());
}

#[test]
fn broken_candidate_file_is_skipped() {
    let malformed = settings_file("request_timeout_secs = \"fast\"");
    let settings = load_settings_with(None, &[malformed.path().to_path_buf()], env(&[]))
        .expect("load");
    assert_eq!(settings, Settings::default());
}

#[test]
fn validation_rejects_bad_values() {
    let zero_timeout = load_settings_with(
        None,
        &[],
        env(&[("APP__REQUEST_TIMEOUT_SECS", "0")]),
    );
    assert!(zero_timeout.is_err());

    let relative_route = settings_file("patient_return_route = \"patients\"");
    assert!(load_settings_with(Some(relative_route.path()), &[], env(&[])).is_err());

    let bad_url = load_settings_with(None, &[], env(&[("APP__API_BASE_URL", "ftp://x")]));
    assert!(bad_url.is_err());
}
