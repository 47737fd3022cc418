use compact_str::CompactString;

use super::{Continuation, DispatchResult};
use crate::kernel::effect::BackendRequest;
use crate::kernel::hub::{self, status_error};
use crate::kernel::rollback::{NodeSnapshot, OpKind};
use crate::kernel::spinner::find_name_conflict;
use crate::kernel::Effect;
use crate::models::{
    is_valid_name, rebase_path, with_trailing_slash, NodeId, NodeKind, TreeEvent, TreeView,
};

impl<T: TreeView> super::Store<T> {
    pub(super) fn reduce_tree_event(&mut self, event: TreeEvent) -> DispatchResult {
        match event {
            TreeEvent::Selected { node, by_click } => self.on_select(node, by_click),
            TreeEvent::DoubleClicked { node } => self.open_file(node, None),
            TreeEvent::Renamed { node, old, new } => self.on_rename(node, &old, &new),
            TreeEvent::Copied {
                node,
                original,
                parent,
                ..
            } => self.on_copy(node, original, parent),
            TreeEvent::Moved {
                node,
                parent,
                old_parent,
                old_position,
                ..
            } => self.on_move(node, parent, old_parent, old_position),
        }
    }

    fn on_select(&mut self, node: NodeId, by_click: bool) -> DispatchResult {
        let Some(n) = self.tree.get_node(node).filter(|n| by_click && n.is_file()) else {
            return DispatchResult::unchanged();
        };
        let message = hub::file_selected(
            n.text(),
            &n.data.path,
            n.data.content_type.as_deref(),
            &n.data.workspace,
        );
        DispatchResult {
            effects: vec![Effect::post(message)],
            state_changed: false,
        }
    }

    pub(super) fn open_file(&mut self, node: NodeId, editor: Option<&str>) -> DispatchResult {
        let Some(n) = self.tree.get_node(node).filter(|n| n.is_file()) else {
            return DispatchResult::unchanged();
        };
        let git_name = self
            .tree
            .project_of(node)
            .and_then(|p| self.tree.get_node(p))
            .filter(|p| p.data.git)
            .and_then(|p| p.data.git_name.as_deref());
        let message = hub::open_editor(
            &n.data.resource_path(),
            n.text(),
            n.data.content_type.as_deref(),
            editor,
            git_name,
        );
        DispatchResult {
            effects: vec![Effect::post(message)],
            state_changed: false,
        }
    }

    pub(super) fn select_path(&mut self, path: &str) -> DispatchResult {
        let Some(node) = self.tree.find_by_path(path) else {
            return DispatchResult::unchanged();
        };
        self.tree.deselect_all();
        self.tree.select_node(node);
        DispatchResult {
            effects: Vec::new(),
            state_changed: true,
        }
    }

    pub(super) fn rename_node(&mut self, node: NodeId, name: &str) -> DispatchResult {
        let Some(old) = self.tree.get_node(node).map(|n| CompactString::from(n.text())) else {
            return DispatchResult::unchanged();
        };
        if self.tree.rename_node(node, name).is_err() {
            return DispatchResult::unchanged();
        }
        self.on_rename(node, &old, name)
    }

    fn on_rename(&mut self, node: NodeId, old: &str, new: &str) -> DispatchResult {
        if old == new {
            return DispatchResult::unchanged();
        }
        if !is_valid_name(new) {
            let _ = self.tree.rename_node(node, old);
            return DispatchResult {
                effects: vec![Effect::post(status_error(format!(
                    "Invalid name '{new}'. Reverted."
                )))],
                state_changed: true,
            };
        }
        let Some(n) = self.tree.get_node(node) else {
            return DispatchResult::unchanged();
        };
        let Some(parent) = n.parent() else {
            return DispatchResult::unchanged();
        };
        let path = n.data.path.clone();
        let workspace = n.data.workspace.clone();
        let Some(snapshot) = NodeSnapshot::capture(&self.tree, node) else {
            return DispatchResult::unchanged();
        };

        let op = self.ops.begin(
            &mut self.tree,
            OpKind::Rename,
            node,
            snapshot.with_text(old),
            parent,
        );
        let new_path = renamed_path(&path, old, new);
        let effect = self.request(
            BackendRequest::Rename {
                old_name: old.to_string(),
                new_name: new.to_string(),
                path,
                workspace,
            },
            Continuation::Rename {
                op,
                old_name: old.to_string(),
                new_path,
            },
        );
        DispatchResult {
            effects: vec![effect],
            state_changed: true,
        }
    }

    /// Message for a drop of `node` onto `parent` that must not reach the
    /// backend, if any.
    fn drop_rejection(&self, node: NodeId, parent: NodeId) -> Option<&'static str> {
        let target = self.tree.get_node(parent)?;
        if !matches!(target.kind(), NodeKind::Project | NodeKind::Folder) {
            return Some("Files can only be placed inside projects and folders.");
        }
        find_name_conflict(&self.tree, parent, node)
            .map(|_| "The destination contains a file with the same name.")
    }

    fn on_copy(&mut self, node: NodeId, original: NodeId, parent: NodeId) -> DispatchResult {
        if let Some(reason) = self.drop_rejection(node, parent) {
            let _ = self.tree.delete_node(node);
            tracing::info!(?original, "copy rejected before reaching the backend");
            return DispatchResult {
                effects: vec![Effect::post(hub::alert_error("Could not copy file", reason))],
                state_changed: true,
            };
        }
        let (Some(copy), Some(target)) = (self.tree.get_node(node), self.tree.get_node(parent))
        else {
            return DispatchResult::unchanged();
        };
        let name = copy.text().to_string();
        let source_path = copy.data.path.clone();
        let source_workspace = copy.data.workspace.clone();
        let target_dir = with_trailing_slash(&target.data.path);
        let target_workspace = target.data.workspace.clone();

        relocate(
            &mut self.tree,
            node,
            &format!("{target_dir}{name}"),
            &target_workspace,
        );
        let Some(snapshot) = NodeSnapshot::capture(&self.tree, node) else {
            return DispatchResult::unchanged();
        };
        let op = self
            .ops
            .begin(&mut self.tree, OpKind::Copy, node, snapshot, parent);
        let effect = self.request(
            BackendRequest::Copy {
                source_path,
                target_path: target_dir,
                source_workspace,
                target_workspace,
            },
            Continuation::Copy { op, name },
        );
        DispatchResult {
            effects: vec![effect],
            state_changed: true,
        }
    }

    fn on_move(
        &mut self,
        node: NodeId,
        parent: NodeId,
        old_parent: NodeId,
        old_position: usize,
    ) -> DispatchResult {
        // Reordering inside a parent is not persisted.
        if parent == old_parent {
            return DispatchResult::unchanged();
        }
        if let Some(reason) = self.drop_rejection(node, parent) {
            if let Err(e) = self.tree.move_node(node, old_parent, Some(old_position)) {
                tracing::warn!(error = %e, "cannot undo rejected move");
            }
            return DispatchResult {
                effects: vec![Effect::post(hub::alert_error("Could not move file", reason))],
                state_changed: true,
            };
        }
        let (Some(n), Some(target)) = (self.tree.get_node(node), self.tree.get_node(parent)) else {
            return DispatchResult::unchanged();
        };
        let name = n.text().to_string();
        let old_path = n.data.path.clone();
        let source_workspace = n.data.workspace.clone();
        let path = format!("{}{name}", with_trailing_slash(&target.data.path));
        let workspace = target.data.workspace.clone();

        let Some(snapshot) = NodeSnapshot::capture(&self.tree, node) else {
            return DispatchResult::unchanged();
        };
        let op = self.ops.begin(
            &mut self.tree,
            OpKind::Move,
            node,
            snapshot.with_location(old_parent, old_position),
            parent,
        );
        let effect = self.request(
            BackendRequest::Move {
                source_path: old_path.clone(),
                target_path: path.clone(),
                source_workspace,
                target_workspace: workspace.clone(),
            },
            Continuation::Move {
                op,
                name,
                old_path,
                path,
                workspace,
            },
        );
        DispatchResult {
            effects: vec![effect],
            state_changed: true,
        }
    }

    /// `content` is `Some` for files and `None` for folders.
    pub(super) fn create_node(
        &mut self,
        parent: NodeId,
        name: String,
        content: Option<String>,
    ) -> DispatchResult {
        let Some(target) = self
            .tree
            .get_node(parent)
            .filter(|n| matches!(n.kind(), NodeKind::Project | NodeKind::Folder))
        else {
            return DispatchResult::unchanged();
        };
        if !is_valid_name(&name) {
            return DispatchResult {
                effects: vec![Effect::post(status_error(format!("Invalid name '{name}'.")))],
                state_changed: false,
            };
        }
        let target_path = target.data.resource_path();
        let folder_path = format!("{}{name}", with_trailing_slash(&target.data.path));
        let Some(snapshot) = NodeSnapshot::capture(&self.tree, parent) else {
            return DispatchResult::unchanged();
        };
        let op = self
            .ops
            .begin(&mut self.tree, OpKind::Create, parent, snapshot, parent);

        let is_directory = content.is_none();
        let request = BackendRequest::CreateNode {
            name: name.clone(),
            target_path,
            is_directory,
            content: content.unwrap_or_default(),
        };
        let continuation = if is_directory {
            Continuation::CreateFolder {
                op,
                name,
                path: folder_path,
            }
        } else {
            Continuation::CreateFile { op, name }
        };
        let effect = self.request(request, continuation);
        DispatchResult {
            effects: vec![effect],
            state_changed: true,
        }
    }

    pub(super) fn delete_nodes(&mut self, nodes: &[NodeId], unpublish: bool) -> DispatchResult {
        let mut effects = Vec::new();
        for &node in nodes {
            if self.ops.is_pending(node) {
                continue;
            }
            let Some(n) = self.tree.get_node(node) else {
                continue;
            };
            let name = n.text().to_string();
            let resource_path = n.data.resource_path();
            let delete = match n.kind() {
                NodeKind::Project => BackendRequest::DeleteProject {
                    workspace: n.data.workspace.clone(),
                    project: name.clone(),
                },
                NodeKind::Folder | NodeKind::File => BackendRequest::Remove {
                    path: resource_path.clone(),
                },
                NodeKind::Root | NodeKind::Spinner => continue,
            };
            let Some(parent) = n.parent() else {
                continue;
            };
            let Some(snapshot) = NodeSnapshot::capture(&self.tree, node) else {
                continue;
            };
            let op = self
                .ops
                .begin(&mut self.tree, OpKind::Delete, node, snapshot, parent);

            let effect = if unpublish && self.state.features.publisher {
                self.request(
                    BackendRequest::Unpublish {
                        path: resource_path,
                    },
                    Continuation::UnpublishBeforeDelete { op, name, delete },
                )
            } else {
                self.request(
                    delete,
                    Continuation::Delete {
                        op,
                        name,
                        unpublished: false,
                    },
                )
            };
            effects.push(effect);
        }
        DispatchResult {
            state_changed: !effects.is_empty(),
            effects,
        }
    }
}

/// Path of a node renamed from `old` to `new`; the parent part is kept.
fn renamed_path(path: &str, old: &str, new: &str) -> String {
    match path.strip_suffix(old) {
        Some(parent) => format!("{parent}{new}"),
        None => match path.rfind('/') {
            Some(idx) => format!("{}{new}", &path[..=idx]),
            None => new.to_string(),
        },
    }
}

/// Points `node` and its subtree at `path` in `workspace`. Returns the old
/// resource paths of the files that moved.
pub(super) fn relocate<T: TreeView + ?Sized>(
    tree: &mut T,
    node: NodeId,
    path: &str,
    workspace: &str,
) -> Vec<String> {
    let Some(old_path) = tree.get_node(node).map(|n| n.data.path.clone()) else {
        return Vec::new();
    };
    let mut moved_files = Vec::new();
    let mut targets = tree.descendants(node);
    targets.push(node);
    for id in targets {
        let Some(n) = tree.get_node_mut(id) else {
            continue;
        };
        if n.is_spinner() {
            continue;
        }
        if n.is_file() {
            moved_files.push(n.data.resource_path());
        }
        if let Some(rebased) = rebase_path(&n.data.path, &old_path, path) {
            n.data.path = rebased;
        }
        n.data.workspace = workspace.to_string();
    }
    moved_files
}
