use std::path::PathBuf;

use blockdown::config::{ConfigFlags, load_config_flags, parse_flag_tokens};
use blockdown::persist::DEFAULT_DEBOUNCE_MS;

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".blockdownrc");
    let content = r"
# comment
--debounce-ms 250

--line-length=72

--export-dir exports
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert_eq!(flags.debounce_ms, Some(250));
    assert_eq!(flags.line_length, Some(72));
    assert_eq!(flags.export_dir, Some(PathBuf::from("exports")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".blockdownrc");
    let content = "--debounce-ms 800\n--base-url https://a.example/\n--log-file file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "blockdown".to_string(),
        "--base-url".to_string(),
        "https://b.example/".to_string(),
        "--line-length".to_string(),
        "100".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert_eq!(effective.debounce_ms, Some(800), "file flags should remain");
    assert_eq!(effective.line_length, Some(100), "cli flags should be applied");
    assert_eq!(
        effective.base_url.as_deref(),
        Some("https://b.example/"),
        "cli should override base url"
    );
    assert_eq!(
        effective.log_file,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_local_override_layers_on_global() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config");
    let local = dir.path().join(".blockdownrc");
    std::fs::write(&global, "--debounce-ms 900\n--log-level info\n").unwrap();
    std::fs::write(&local, "--log-level debug\n").unwrap();

    let merged = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    assert_eq!(merged.debounce_ms, Some(900));
    assert_eq!(merged.log_level.as_deref(), Some("debug"));
}

#[test]
fn test_empty_config_yields_default_settings() {
    let settings = ConfigFlags::default().settings();
    assert_eq!(settings.debounce_ms, DEFAULT_DEBOUNCE_MS);
    assert!(settings.log_file.is_none());
}
