//! Explorer store.
//!
//! `dispatch` is the only entry point: user gestures, hub messages and
//! backend responses all arrive as [`Action`]s, and everything the store
//! wants done outside itself leaves as [`Effect`]s. Each backend request is
//! paired with a [`Continuation`] that says how to handle its response.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;

use super::context_menu::{build_menu, ContextTarget, Menu, MenuContext};
use super::effect::{BackendRequest, RequestId};
use super::hub::HubMessage;
use super::rollback::{OpId, PendingOps};
use super::{Action, Effect, ExplorerState};
use crate::models::{NodeId, NodeKind, ProjectTree, TreeView};

mod messages;
mod responses;
mod tree;
mod workspace;

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn posting(messages: impl IntoIterator<Item = HubMessage>) -> Self {
        Self {
            effects: messages.into_iter().map(Effect::post).collect(),
            state_changed: false,
        }
    }

    fn and(mut self, other: DispatchResult) -> Self {
        self.effects.extend(other.effects);
        self.state_changed |= other.state_changed;
        self
    }
}

#[derive(Debug, Clone)]
enum Continuation {
    LoadWorkspace {
        generation: u64,
    },
    ListWorkspaces,
    MenuTemplates,
    ListTemplates,
    Rename {
        op: OpId,
        old_name: String,
        new_path: String,
    },
    RenameMetadata {
        op: OpId,
        old_name: String,
    },
    Copy {
        op: OpId,
        name: String,
    },
    Move {
        op: OpId,
        name: String,
        old_path: String,
        path: String,
        workspace: String,
    },
    CreateFile {
        op: OpId,
        name: String,
    },
    CreateFileMetadata {
        op: OpId,
        name: String,
    },
    CreateFolder {
        op: OpId,
        name: String,
        path: String,
    },
    UnpublishBeforeDelete {
        op: OpId,
        name: String,
        delete: BackendRequest,
    },
    Delete {
        op: OpId,
        name: String,
        unpublished: bool,
    },
    CreateWorkspace {
        name: String,
    },
    DeleteWorkspace {
        name: String,
    },
    CreateProject {
        name: String,
    },
    LinkProject {
        name: String,
    },
    DuplicateProject {
        path: String,
        target_workspace: String,
    },
    Publish {
        path: String,
    },
    Unpublish {
        path: String,
    },
    PublishAll {
        workspace: String,
    },
    UnpublishAll {
        workspace: String,
    },
    PublishSaved {
        path: String,
    },
    GenerateFromTemplate {
        template: String,
    },
    GenerateFromModel {
        model: String,
    },
    Export {
        target: String,
    },
}

pub struct Store<T: TreeView = ProjectTree> {
    state: ExplorerState,
    tree: T,
    ops: PendingOps,
    continuations: FxHashMap<RequestId, Continuation>,
    next_request: u64,
    load_generation: u64,
}

impl<T: TreeView> Store<T> {
    pub fn new(state: ExplorerState, tree: T) -> Self {
        Self {
            state,
            tree,
            ops: PendingOps::new(),
            continuations: FxHashMap::default(),
            next_request: 0,
            load_generation: 0,
        }
    }

    pub fn state(&self) -> &ExplorerState {
        &self.state
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Direct access for gestures; events raised here come back through
    /// [`Action::Tree`].
    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    pub fn pending_ops(&self) -> &PendingOps {
        &self.ops
    }

    /// Requests issued whose response has not been dispatched yet.
    pub fn in_flight(&self) -> usize {
        self.continuations.len()
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::Init => self.init(),
            Action::Tree(event) => self.reduce_tree_event(event),
            Action::Hub(message) => self.reduce_hub_message(message),
            Action::Response { id, response } => self.reduce_response(id, response),
            Action::CreateFile {
                parent,
                name,
                content,
            } => self.create_node(parent, name, Some(content)),
            Action::CreateFolder { parent, name } => self.create_node(parent, name, None),
            Action::RenameNode { node, name } => self.rename_node(node, &name),
            Action::DeleteNodes { nodes, unpublish } => self.delete_nodes(&nodes, unpublish),
            Action::OpenFile { node, editor } => self.open_file(node, editor.as_deref()),
            Action::SelectPath { path } => self.select_path(&path),
            other => self.reduce_workspace_action(other),
        }
    }

    /// Menu for a right click on `target`. An unselected node becomes the
    /// only selection first.
    pub fn context_menu(&mut self, target: ContextTarget) -> Option<Menu> {
        if let ContextTarget::Node(id) = target {
            let selectable = self
                .tree
                .get_node(id)
                .is_some_and(|n| !matches!(n.kind(), NodeKind::Root | NodeKind::Spinner));
            if selectable && !self.tree.selected().contains(&id) {
                self.tree.deselect_all();
                self.tree.select_node(id);
            }
        }
        let selection = self.tree.selected();
        let ctx = MenuContext {
            templates: &self.state.templates,
            features: self.state.features,
            can_paste: self.tree.can_paste(),
            editors: &self.state.editors,
            selection: &selection,
        };
        build_menu(&self.tree, target, &ctx)
    }

    fn request(&mut self, request: BackendRequest, continuation: Continuation) -> Effect {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        tracing::debug!(id = id.0, request = request.name(), "backend request");
        self.continuations.insert(id, continuation);
        Effect::Request { id, request }
    }

    /// Resolves `{"node": ...}` payloads of menu items and dialogs.
    fn node_from(&self, data: &Value) -> Option<NodeId> {
        let id = NodeId::deserialize(data.get("node")?).ok()?;
        self.tree.get_node(id).is_some().then_some(id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
