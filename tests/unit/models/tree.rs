use super::*;
use std::sync::mpsc;

fn demo_tree() -> (ProjectTree, NodeId, NodeId, NodeId) {
    let mut tree = ProjectTree::new();
    let root = tree.root();
    let project = tree
        .create_node(
            root,
            NewNode::new("demo", NodeKind::Project, NodeData::new("/demo", "workspace")),
            None,
        )
        .unwrap();
    let folder = tree
        .create_node(
            project,
            NewNode::new("lib", NodeKind::Folder, NodeData::new("/demo/lib", "workspace")),
            None,
        )
        .unwrap();
    let file = tree
        .create_node(
            project,
            NewNode::new("app.js", NodeKind::File, NodeData::new("/demo/app.js", "workspace")),
            None,
        )
        .unwrap();
    (tree, project, folder, file)
}

#[test]
fn create_node_keeps_sibling_order_and_position() {
    let (mut tree, project, folder, file) = demo_tree();
    assert_eq!(tree.children(project), &[folder, file]);

    let spinner = tree
        .create_node(project, NewNode::spinner(), Some(0))
        .unwrap();
    assert_eq!(tree.children(project), &[spinner, folder, file]);
    assert_eq!(tree.get_node(spinner).unwrap().text(), "Loading...");
    assert_eq!(tree.position_of(file), Some(2));
}

#[test]
fn files_cannot_hold_children() {
    let (mut tree, _, _, file) = demo_tree();
    let err = tree
        .create_node(
            file,
            NewNode::new("x", NodeKind::File, NodeData::default()),
            None,
        )
        .unwrap_err();
    assert_eq!(err, TreeError::ParentNotContainer);
}

#[test]
fn duplicate_sibling_names_are_tolerated() {
    let (mut tree, project, _, _) = demo_tree();
    let dup = tree.create_node(
        project,
        NewNode::new("app.js", NodeKind::File, NodeData::new("/demo/app.js", "workspace")),
        None,
    );
    assert!(dup.is_ok());
    assert_eq!(tree.children(project).len(), 3);
}

#[test]
fn move_rejects_own_subtree() {
    let (mut tree, project, folder, _) = demo_tree();
    assert_eq!(
        tree.move_node(project, folder, None),
        Err(TreeError::MoveIntoDescendant)
    );
}

#[test]
fn delete_removes_subtree_and_selection() {
    let (mut tree, project, folder, file) = demo_tree();
    tree.select_node(file);
    tree.delete_node(project).unwrap();

    assert!(tree.get_node(folder).is_none());
    assert!(tree.get_node(file).is_none());
    assert!(tree.selected().is_empty());
    assert!(tree.is_empty());
}

#[test]
fn programmatic_mutations_emit_nothing() {
    let (mut tree, _, folder, file) = demo_tree();
    let (tx, rx) = mpsc::channel();
    tree.on(TreeEventKind::Rename, tx.clone());
    tree.on(TreeEventKind::Move, tx);

    tree.rename_node(file, "main.js").unwrap();
    tree.move_node(file, folder, None).unwrap();

    assert!(rx.try_recv().is_err());
}

#[test]
fn user_rename_emits_old_and_new_name() {
    let (mut tree, _, _, file) = demo_tree();
    let (tx, rx) = mpsc::channel();
    tree.on(TreeEventKind::Rename, tx);

    tree.user_rename(file, "main.js").unwrap();

    assert_eq!(
        rx.try_recv().unwrap(),
        TreeEvent::Renamed {
            node: file,
            old: "app.js".into(),
            new: "main.js".into(),
        }
    );
}

#[test]
fn user_move_reports_old_parent_and_position() {
    let (mut tree, project, folder, file) = demo_tree();
    let (tx, rx) = mpsc::channel();
    tree.on(TreeEventKind::Move, tx);

    tree.user_move(file, folder, None).unwrap();

    assert_eq!(
        rx.try_recv().unwrap(),
        TreeEvent::Moved {
            node: file,
            parent: folder,
            position: 0,
            old_parent: project,
            old_position: 1,
        }
    );
}

#[test]
fn user_copy_clones_subtree() {
    let (mut tree, project, folder, _) = demo_tree();
    tree.create_node(
        folder,
        NewNode::new("a.js", NodeKind::File, NodeData::new("/demo/lib/a.js", "workspace")),
        None,
    )
    .unwrap();

    let copy = tree.user_copy(folder, project, None).unwrap();

    assert_ne!(copy, folder);
    assert_eq!(tree.get_node(copy).unwrap().text(), "lib");
    assert_eq!(tree.children(copy).len(), 1);
}

#[test]
fn paste_after_cut_replays_moves_and_clears_clipboard() {
    let (mut tree, _, folder, file) = demo_tree();
    let (tx, rx) = mpsc::channel();
    tree.on(TreeEventKind::Move, tx);

    tree.cut(&[file]);
    assert!(tree.can_paste());
    tree.paste(folder);

    assert!(matches!(rx.try_recv(), Ok(TreeEvent::Moved { node, .. }) if node == file));
    assert!(!tree.can_paste());
}

#[test]
fn rows_follow_depth_first_sibling_order() {
    let (tree, _, _, _) = demo_tree();
    let rows: Vec<(u16, String)> = tree
        .rows()
        .into_iter()
        .map(|r| (r.depth, r.text.to_string()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (0, "demo".to_string()),
            (1, "lib".to_string()),
            (1, "app.js".to_string())
        ]
    );
}

#[test]
fn find_by_path_and_project_of() {
    let (tree, project, _, file) = demo_tree();
    assert_eq!(tree.find_by_path("/demo/app.js"), Some(file));
    assert_eq!(tree.project_of(file), Some(project));
    assert_eq!(tree.find_by_path("/nope"), None);
}
