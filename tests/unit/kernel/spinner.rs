use super::*;
use crate::models::{NodeData, ProjectTree};

fn project_with(names: &[&str]) -> (ProjectTree, NodeId, Vec<NodeId>) {
    let mut tree = ProjectTree::new();
    let root = tree.root();
    let project = tree
        .create_node(
            root,
            NewNode::new("demo", NodeKind::Project, NodeData::new("/demo", "workspace")),
            None,
        )
        .unwrap();
    let ids = names
        .iter()
        .map(|name| {
            tree.create_node(
                project,
                NewNode::new(*name, NodeKind::File, NodeData::new(format!("/demo/{name}"), "workspace")),
                None,
            )
            .unwrap()
        })
        .collect();
    (tree, project, ids)
}

#[test]
fn spinner_goes_first_and_is_removed() {
    let (mut tree, project, ids) = project_with(&["a.js"]);
    let spinner = show_spinner(&mut tree, project).unwrap();
    assert_eq!(tree.children(project)[0], spinner);

    hide_spinner(&mut tree, spinner);
    assert_eq!(tree.children(project), ids.as_slice());
}

#[test]
fn hide_spinner_ignores_regular_nodes() {
    let (mut tree, project, ids) = project_with(&["a.js"]);
    hide_spinner(&mut tree, ids[0]);
    assert_eq!(tree.children(project).len(), 1);
}

#[test]
fn conflict_is_exact_and_case_sensitive() {
    let (tree, project, ids) = project_with(&["a.js", "A.js", "a.js"]);
    assert_eq!(find_name_conflict(&tree, project, ids[0]), Some(ids[2]));
    assert_eq!(find_name_conflict(&tree, project, ids[1]), None);
}

#[test]
fn spinners_never_conflict() {
    let (mut tree, project, ids) = project_with(&["Loading..."]);
    show_spinner(&mut tree, project).unwrap();
    assert_eq!(find_name_conflict(&tree, project, ids[0]), None);
    assert_eq!(child_names(&tree, project), vec!["Loading...".to_string()]);
}

#[test]
fn next_free_name_appends_counter_before_extension() {
    let (tree, project, _) = project_with(&["New File.js", "New File 1.js", "README"]);
    assert_eq!(next_free_name(&tree, project, "New File.js"), "New File 2.js");
    assert_eq!(next_free_name(&tree, project, "README"), "README 1");
    assert_eq!(next_free_name(&tree, project, "other.js"), "other.js");
}
