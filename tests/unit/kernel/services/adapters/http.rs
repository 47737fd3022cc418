use super::*;

fn backend() -> HttpBackend {
    let settings = ServerSettings {
        base_url: "http://ide.local:8080/root/".to_string(),
        ..ServerSettings::default()
    };
    HttpBackend::new(&settings).unwrap()
}

#[test]
fn urls_encode_each_segment() {
    let backend = backend();
    let url = backend
        .workspaces_url(&["workspace", "/my project/app.js"])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "http://ide.local:8080/root/services/v8/ide/workspaces/workspace/my%20project/app.js"
    );
}

#[test]
fn manager_urls_end_with_the_operation() {
    let url = backend().manager_url("workspace", "rename").unwrap();
    assert_eq!(
        url.path(),
        "/root/services/v8/ide/workspace/workspace/rename"
    );
}

#[test]
fn parent_of_strips_the_last_segment() {
    assert_eq!(parent_of("/demo/src/app.js"), "/demo/src");
    assert_eq!(parent_of("/demo"), "");
    assert_eq!(parent_of("/demo/src/"), "/demo");
}

#[test]
fn rejects_non_base_urls() {
    let settings = ServerSettings {
        base_url: "mailto:ide@example.com".to_string(),
        ..ServerSettings::default()
    };
    assert!(matches!(
        HttpBackend::new(&settings),
        Err(ApiError::NotABase(_))
    ));
}
