//! Spinner placeholders and pre-flight duplicate-name detection.

use crate::models::{NewNode, NodeId, NodeKind, TreeView};

/// Inserts a spinner at index 0 of `parent`.
pub fn show_spinner<T: TreeView + ?Sized>(tree: &mut T, parent: NodeId) -> Option<NodeId> {
    match tree.create_node(parent, NewNode::spinner(), Some(0)) {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(error = %e, "cannot show spinner");
            None
        }
    }
}

/// Removes a spinner; ids that no longer name a spinner are ignored.
pub fn hide_spinner<T: TreeView + ?Sized>(tree: &mut T, spinner: NodeId) {
    if tree.get_node(spinner).is_some_and(|n| n.is_spinner()) {
        let _ = tree.delete_node(spinner);
    }
}

/// First sibling under `parent` (other than `node`) whose text equals
/// `node`'s text exactly.
pub fn find_name_conflict<T: TreeView + ?Sized>(
    tree: &T,
    parent: NodeId,
    node: NodeId,
) -> Option<NodeId> {
    let name = tree.get_node(node)?.text();
    find_named_child(tree, parent, name, Some(node))
}

pub fn find_named_child<T: TreeView + ?Sized>(
    tree: &T,
    parent: NodeId,
    name: &str,
    exclude: Option<NodeId>,
) -> Option<NodeId> {
    tree.children(parent).iter().copied().find(|&child| {
        Some(child) != exclude
            && tree
                .get_node(child)
                .is_some_and(|n| n.kind() != NodeKind::Spinner && n.text() == name)
    })
}

/// Names of the non-spinner children of `parent`.
pub fn child_names<T: TreeView + ?Sized>(tree: &T, parent: NodeId) -> Vec<String> {
    tree.children(parent)
        .iter()
        .filter_map(|&c| tree.get_node(c))
        .filter(|n| !n.is_spinner())
        .map(|n| n.text().to_string())
        .collect()
}

/// `name` when no sibling uses it, otherwise the first free `stem N.ext`.
pub fn next_free_name<T: TreeView + ?Sized>(tree: &T, parent: NodeId, name: &str) -> String {
    let taken = child_names(tree, parent);
    if !taken.iter().any(|n| n == name) {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    };
    let mut n = 1;
    loop {
        let candidate = format!("{stem} {n}{ext}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/spinner.rs"]
mod tests;
