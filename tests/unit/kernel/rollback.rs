use super::*;
use crate::models::{NewNode, NodeKind, ProjectTree};

struct Fixture {
    tree: ProjectTree,
    project: NodeId,
    folder: NodeId,
    file: NodeId,
}

fn fixture() -> Fixture {
    let mut tree = ProjectTree::new();
    let root = tree.root();
    let project = tree
        .create_node(
            root,
            NewNode::new("demo", NodeKind::Project, NodeData::new("/demo", "workspace")),
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
    let folder = tree
        .create_node(
            project,
            NewNode::new("lib", NodeKind::Folder, NodeData::new("/demo/lib", "workspace")),
            None,
        )
        .unwrap();
    Fixture {
        tree,
        project,
        folder,
        file,
    }
}

#[test]
fn rename_revert_restores_text_and_cleans_up() {
    let mut f = fixture();
    let snapshot = NodeSnapshot::capture(&f.tree, f.file).unwrap();
    f.tree.rename_node(f.file, "main.js").unwrap();

    let mut ops = PendingOps::new();
    let id = ops.begin(&mut f.tree, OpKind::Rename, f.file, snapshot, f.project);
    assert!(f.tree.get_node(f.file).unwrap().disabled);
    assert_eq!(f.tree.children(f.project).len(), 3);

    let op = ops.take(id).unwrap();
    let mut reverted = false;
    with_rollback(&mut f.tree, op, Outcome::Revert, |_, _| {}, |_, _| reverted = true);

    let node = f.tree.get_node(f.file).unwrap();
    assert!(reverted);
    assert_eq!(node.text(), "app.js");
    assert!(!node.disabled);
    assert_eq!(f.tree.children(f.project), &[f.file, f.folder]);
}

#[test]
fn move_revert_returns_to_old_parent_and_position() {
    let mut f = fixture();
    let snapshot = NodeSnapshot::capture(&f.tree, f.file).unwrap();
    f.tree.move_node(f.file, f.folder, None).unwrap();

    let mut ops = PendingOps::new();
    let id = ops.begin(&mut f.tree, OpKind::Move, f.file, snapshot, f.folder);
    assert!(f.tree.get_node(f.file).unwrap().hidden);

    let op = ops.take(id).unwrap();
    with_rollback(&mut f.tree, op, Outcome::Revert, |_, _| {}, |_, _| {});

    assert_eq!(f.tree.children(f.project), &[f.file, f.folder]);
    assert!(f.tree.children(f.folder).is_empty());
    assert!(!f.tree.get_node(f.file).unwrap().hidden);
}

#[test]
fn copy_revert_deletes_the_copy() {
    let mut f = fixture();
    let copy = f.tree.user_copy(f.file, f.folder, None).unwrap();
    let snapshot = NodeSnapshot::capture(&f.tree, copy).unwrap();

    let mut ops = PendingOps::new();
    let id = ops.begin(&mut f.tree, OpKind::Copy, copy, snapshot, f.folder);
    let op = ops.take(id).unwrap();
    with_rollback(&mut f.tree, op, Outcome::Revert, |_, _| {}, |_, _| {});

    assert!(f.tree.get_node(copy).is_none());
    assert!(f.tree.children(f.folder).is_empty());
}

#[test]
fn commit_runs_callback_and_still_cleans_up() {
    let mut f = fixture();
    let snapshot = NodeSnapshot::capture(&f.tree, f.file).unwrap();
    let mut ops = PendingOps::new();
    let id = ops.begin(&mut f.tree, OpKind::Rename, f.file, snapshot, f.project);

    let op = ops.take(id).unwrap();
    with_rollback(
        &mut f.tree,
        op,
        Outcome::Commit,
        |tree, op| {
            tree.get_node_mut(op.target).unwrap().data.path = "/demo/main.js".to_string();
        },
        |_, _| panic!("not reverted"),
    );

    let node = f.tree.get_node(f.file).unwrap();
    assert_eq!(node.data.path, "/demo/main.js");
    assert!(!node.disabled);
    assert_eq!(f.tree.children(f.project).len(), 2);
}

#[test]
fn cancel_all_cleans_every_operation() {
    let mut f = fixture();
    let mut ops = PendingOps::new();
    let a = NodeSnapshot::capture(&f.tree, f.file).unwrap();
    let b = NodeSnapshot::capture(&f.tree, f.folder).unwrap();
    ops.begin(&mut f.tree, OpKind::Rename, f.file, a, f.project);
    ops.begin(&mut f.tree, OpKind::Delete, f.folder, b, f.project);
    assert!(ops.is_pending(f.folder));

    assert_eq!(ops.cancel_all(&mut f.tree), 2);
    assert!(ops.is_empty());
    assert_eq!(f.tree.children(f.project), &[f.file, f.folder]);
    assert!(!f.tree.get_node(f.folder).unwrap().disabled);
}
