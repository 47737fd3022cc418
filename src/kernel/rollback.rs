//! Optimistic node operations.
//!
//! A [`PendingOperation`] is opened when a gesture mutates the tree ahead of
//! the backend: the node's prior state is snapshotted, the node is disabled
//! or hidden and a spinner goes up on its parent. When the backend answers,
//! [`with_rollback`] commits or restores the snapshot and then always runs
//! the same cleanup.

use compact_str::CompactString;
use rustc_hash::FxHashMap;

use super::spinner::{hide_spinner, show_spinner};
use crate::models::{FileStatus, NodeData, NodeId, TreeView};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpKind {
    Rename,
    Copy,
    Move,
    /// Target is the parent receiving the new node.
    Create,
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot {
    pub parent: NodeId,
    pub position: usize,
    pub text: CompactString,
    pub data: NodeData,
    pub status: Option<FileStatus>,
    pub icon: Option<CompactString>,
}

impl NodeSnapshot {
    pub fn capture<T: TreeView + ?Sized>(tree: &T, node: NodeId) -> Option<Self> {
        let n = tree.get_node(node)?;
        Some(Self {
            parent: n.parent()?,
            position: tree.position_of(node)?,
            text: n.text().into(),
            data: n.data.clone(),
            status: n.status,
            icon: n.icon.clone(),
        })
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_location(mut self, parent: NodeId, position: usize) -> Self {
        self.parent = parent;
        self.position = position;
        self
    }
}

#[derive(Clone, Debug)]
pub struct PendingOperation {
    pub id: OpId,
    pub kind: OpKind,
    pub target: NodeId,
    pub original: NodeSnapshot,
    pub spinner: Option<NodeId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Commit,
    Revert,
}

#[derive(Default)]
pub struct PendingOps {
    next: u64,
    ops: FxHashMap<OpId, PendingOperation>,
}

impl PendingOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an operation on `target` and shows a spinner on `spinner_parent`.
    pub fn begin<T: TreeView + ?Sized>(
        &mut self,
        tree: &mut T,
        kind: OpKind,
        target: NodeId,
        original: NodeSnapshot,
        spinner_parent: NodeId,
    ) -> OpId {
        self.next += 1;
        let id = OpId(self.next);

        if let Some(node) = tree.get_node_mut(target) {
            match kind {
                OpKind::Rename | OpKind::Delete => node.disabled = true,
                OpKind::Copy | OpKind::Move => node.hidden = true,
                OpKind::Create => {}
            }
        }
        let spinner = show_spinner(tree, spinner_parent);

        tracing::debug!(op = id.0, ?kind, "pending operation opened");
        self.ops.insert(
            id,
            PendingOperation {
                id,
                kind,
                target,
                original,
                spinner,
            },
        );
        id
    }

    pub fn get(&self, id: OpId) -> Option<&PendingOperation> {
        self.ops.get(&id)
    }

    pub fn take(&mut self, id: OpId) -> Option<PendingOperation> {
        self.ops.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn is_pending(&self, node: NodeId) -> bool {
        self.ops.values().any(|op| op.target == node)
    }

    /// Drops every operation after running its cleanup; nothing is committed
    /// or restored. Returns how many were dropped.
    pub fn cancel_all<T: TreeView + ?Sized>(&mut self, tree: &mut T) -> usize {
        let count = self.ops.len();
        for (_, op) in self.ops.drain() {
            cleanup(tree, &op);
        }
        if count > 0 {
            tracing::info!(count, "pending operations cancelled");
        }
        count
    }
}

/// Puts the target back the way the snapshot recorded it.
pub fn restore<T: TreeView + ?Sized>(tree: &mut T, op: &PendingOperation) {
    let original = &op.original;
    match op.kind {
        OpKind::Rename => {
            let _ = tree.rename_node(op.target, &original.text);
            if let Some(node) = tree.get_node_mut(op.target) {
                node.data = original.data.clone();
                node.status = original.status;
                node.icon = original.icon.clone();
            }
        }
        OpKind::Copy => {
            let _ = tree.delete_node(op.target);
        }
        OpKind::Move => {
            if let Err(e) = tree.move_node(op.target, original.parent, Some(original.position)) {
                tracing::warn!(error = %e, "cannot move node back");
            }
        }
        OpKind::Create | OpKind::Delete => {}
    }
}

/// Removes the spinner and re-enables and shows the target.
pub fn cleanup<T: TreeView + ?Sized>(tree: &mut T, op: &PendingOperation) {
    if let Some(spinner) = op.spinner {
        hide_spinner(tree, spinner);
    }
    if op.kind == OpKind::Create {
        return;
    }
    if let Some(node) = tree.get_node_mut(op.target) {
        node.disabled = false;
        node.hidden = false;
    }
}

pub fn with_rollback<T, C, R>(
    tree: &mut T,
    op: PendingOperation,
    outcome: Outcome,
    on_commit: C,
    on_revert: R,
) where
    T: TreeView + ?Sized,
    C: FnOnce(&mut T, &PendingOperation),
    R: FnOnce(&mut T, &PendingOperation),
{
    match outcome {
        Outcome::Commit => on_commit(tree, &op),
        Outcome::Revert => {
            restore(tree, &op);
            on_revert(tree, &op);
        }
    }
    cleanup(tree, &op);
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/rollback.rs"]
mod tests;
