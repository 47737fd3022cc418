use super::*;

#[test]
fn first_load_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let config = load_or_init_config(Some(&path)).unwrap();

    assert!(path.exists());
    assert_eq!(config.default_workspace, "workspace");
    assert_eq!(config.server.base_url, "http://localhost:8080");
}

#[test]
fn existing_settings_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"default_workspace": "main", "features": {"publisher": false}}"#,
    )
    .unwrap();

    let config = load_or_init_config(Some(&path)).unwrap();

    assert_eq!(config.default_workspace, "main");
    assert!(!config.features.publisher);
    assert!(config.features.generate);
}

#[test]
fn malformed_settings_report_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_config(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("settings.json"));
}
