use super::*;

fn descriptor() -> WorkspaceDescriptor {
    serde_json::from_value(serde_json::json!({
        "name": "workspace",
        "path": "/workspace",
        "projects": [{
            "name": "demo",
            "path": "/workspace/demo",
            "git": true,
            "gitName": "demo-repo",
            "folders": [{
                "name": "lib",
                "path": "/workspace/demo/lib",
                "type": "folder",
                "files": [{
                    "name": "util.ts",
                    "path": "/workspace/demo/lib/util.ts",
                    "type": "file",
                    "contentType": "application/typescript"
                }]
            }],
            "files": [{
                "name": "app.js",
                "path": "/workspace/demo/app.js",
                "type": "file",
                "contentType": "application/javascript",
                "status": "M"
            }]
        }]
    }))
    .unwrap()
}

#[test]
fn strip_workspace_drops_leading_segment() {
    assert_eq!(strip_workspace("/workspace/demo/main.js", "workspace"), "/demo/main.js");
    assert_eq!(strip_workspace("/foo/p", "foo"), "/p");
}

#[test]
fn file_extension_is_lowercased() {
    assert_eq!(file_extension("Logo.PNG"), "png");
    assert_eq!(file_extension("Makefile"), "makefile");
}

#[test]
fn icons_follow_extension_tables() {
    let mut icons = FileIcons::default();
    assert_eq!(icons.icon_for("a.mjs"), "syntax");
    assert_eq!(icons.icon_for("a.scss"), "number-sign");
    assert_eq!(icons.icon_for("a.png"), "file");

    icons.add_image_ext("png");
    icons.add_model_ext("edm");
    assert_eq!(icons.icon_for("a.png"), "picture");
    assert_eq!(icons.icon_for("a.edm"), "document-text");
}

#[test]
fn build_projects_strips_workspace_and_orders_folders_first() {
    let projects = build_projects(&descriptor(), &FileIcons::default());
    assert_eq!(projects.len(), 1);

    let demo = &projects[0];
    assert_eq!(demo.kind, NodeKind::Project);
    assert_eq!(demo.data.path, "/demo");
    assert!(demo.data.git);
    assert_eq!(demo.data.git_name.as_deref(), Some("demo-repo"));

    assert_eq!(demo.children[0].text, "lib");
    assert_eq!(demo.children[0].kind, NodeKind::Folder);
    assert_eq!(demo.children[0].children[0].data.path, "/demo/lib/util.ts");

    let app = &demo.children[1];
    assert_eq!(app.data.path, "/demo/app.js");
    assert_eq!(app.data.workspace, "workspace");
    assert_eq!(app.data.content_type.as_deref(), Some("application/javascript"));
    assert_eq!(app.status, Some(FileStatus::Modified));
    assert_eq!(app.icon.as_deref(), Some("syntax"));
}

#[test]
fn names_with_slashes_are_invalid() {
    assert!(is_valid_name("main.js"));
    assert!(is_valid_name("with space"));
    assert!(!is_valid_name("a/b.js"));
    assert!(!is_valid_name("/"));
    assert!(!is_valid_name(""));
}

#[test]
fn rebase_path_swaps_prefix() {
    assert_eq!(
        rebase_path("/demo/lib/a.js", "/demo/lib", "/demo/src").as_deref(),
        Some("/demo/src/a.js")
    );
    assert_eq!(rebase_path("/other/a.js", "/demo", "/x"), None);
}
