//! 项目树数据模型
//!
//! Arena of workspace nodes (projects, folders, files and transient spinners)
//! plus the `TreeView` capability the explorer kernel drives. Siblings keep
//! insertion order and may share names until the backend rules on them.

use compact_str::CompactString;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::sync::mpsc::Sender;

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Invisible container holding the projects of the selected workspace.
    Root,
    Project,
    Folder,
    File,
    Spinner,
}

impl NodeKind {
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Project | NodeKind::Folder)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Project => "project",
            NodeKind::Folder => "folder",
            NodeKind::File => "file",
            NodeKind::Spinner => "spinner",
        }
    }

    pub fn from_backend(value: &str) -> Self {
        match value {
            "project" => NodeKind::Project,
            "folder" => NodeKind::Folder,
            _ => NodeKind::File,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Modified,
    Untracked,
    Clean,
}

impl FileStatus {
    pub fn from_backend(value: &str) -> Option<Self> {
        match value {
            "M" | "modified" => Some(FileStatus::Modified),
            "U" | "untracked" => Some(FileStatus::Untracked),
            "clean" => Some(FileStatus::Clean),
            _ => None,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            FileStatus::Modified => "M",
            FileStatus::Untracked => "U",
            FileStatus::Clean => "",
        }
    }
}

/// Backend-facing attributes of a node. `path` never contains the workspace
/// segment: `/demo/app.js`, not `/workspace/demo/app.js`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub path: String,
    pub workspace: String,
    #[serde(
        rename = "contentType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
    #[serde(default)]
    pub git: bool,
    #[serde(rename = "gitName", default, skip_serializing_if = "Option::is_none")]
    pub git_name: Option<String>,
}

impl NodeData {
    pub fn new(path: impl Into<String>, workspace: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            workspace: workspace.into(),
            ..Default::default()
        }
    }

    /// `/workspace/demo/app.js`, the form editors are keyed by.
    pub fn resource_path(&self) -> String {
        format!("/{}{}", self.workspace, self.path)
    }
}

/// Blueprint for inserting a node (and its subtree) into a tree.
#[derive(Clone, Debug, PartialEq)]
pub struct NewNode {
    pub text: CompactString,
    pub kind: NodeKind,
    pub data: NodeData,
    pub status: Option<FileStatus>,
    pub icon: Option<CompactString>,
    pub children: Vec<NewNode>,
}

impl NewNode {
    pub fn new(text: impl Into<CompactString>, kind: NodeKind, data: NodeData) -> Self {
        Self {
            text: text.into(),
            kind,
            data,
            status: None,
            icon: None,
            children: Vec::new(),
        }
    }

    pub fn spinner() -> Self {
        Self::new("Loading...", NodeKind::Spinner, NodeData::default())
    }

    pub fn with_children(mut self, children: Vec<NewNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_icon(mut self, icon: Option<CompactString>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_status(mut self, status: Option<FileStatus>) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    text: CompactString,
    kind: NodeKind,
    pub data: NodeData,
    pub status: Option<FileStatus>,
    pub icon: Option<CompactString>,
    pub disabled: bool,
    pub hidden: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    fn from_blueprint(node: &NewNode, parent: Option<NodeId>) -> Self {
        Self {
            text: node.text.clone(),
            kind: node.kind,
            data: node.data.clone(),
            status: node.status,
            icon: node.icon.clone(),
            disabled: false,
            hidden: false,
            parent,
            children: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_spinner(&self) -> bool {
        self.kind == NodeKind::Spinner
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    InvalidNodeId,
    ParentNotContainer,
    MoveIntoDescendant,
    RootImmutable,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::InvalidNodeId => write!(f, "invalid node id"),
            TreeError::ParentNotContainer => write!(f, "parent cannot hold children"),
            TreeError::MoveIntoDescendant => {
                write!(f, "cannot move node into its own subtree")
            }
            TreeError::RootImmutable => write!(f, "the tree root cannot be changed"),
        }
    }
}

impl std::error::Error for TreeError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TreeEventKind {
    Select,
    DoubleClick,
    Rename,
    Copy,
    Move,
}

/// Lifecycle events raised by user gestures. Programmatic mutations through
/// `TreeView` never raise events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeEvent {
    Selected {
        node: NodeId,
        by_click: bool,
    },
    DoubleClicked {
        node: NodeId,
    },
    Renamed {
        node: NodeId,
        old: CompactString,
        new: CompactString,
    },
    /// `node` is the freshly inserted copy of `original`.
    Copied {
        node: NodeId,
        original: NodeId,
        parent: NodeId,
        position: usize,
    },
    Moved {
        node: NodeId,
        parent: NodeId,
        position: usize,
        old_parent: NodeId,
        old_position: usize,
    },
}

impl TreeEvent {
    pub fn kind(&self) -> TreeEventKind {
        match self {
            TreeEvent::Selected { .. } => TreeEventKind::Select,
            TreeEvent::DoubleClicked { .. } => TreeEventKind::DoubleClick,
            TreeEvent::Renamed { .. } => TreeEventKind::Rename,
            TreeEvent::Copied { .. } => TreeEventKind::Copy,
            TreeEvent::Moved { .. } => TreeEventKind::Move,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipboardMode {
    Cut,
    Copy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub text: CompactString,
    pub kind: NodeKind,
    pub path: String,
    pub workspace: String,
    pub status: Option<FileStatus>,
    pub disabled: bool,
    pub hidden: bool,
}

/// Capability interface of a hierarchical tree widget.
pub trait TreeView {
    fn root(&self) -> NodeId;
    fn get_node(&self, id: NodeId) -> Option<&TreeNode>;
    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode>;
    /// Inserts `node` with its subtree under `parent`; `None` appends.
    fn create_node(
        &mut self,
        parent: NodeId,
        node: NewNode,
        position: Option<usize>,
    ) -> Result<NodeId, TreeError>;
    fn delete_node(&mut self, id: NodeId) -> Result<(), TreeError>;
    fn move_node(
        &mut self,
        id: NodeId,
        parent: NodeId,
        position: Option<usize>,
    ) -> Result<(), TreeError>;
    fn rename_node(&mut self, id: NodeId, text: &str) -> Result<(), TreeError>;
    fn on(&mut self, kind: TreeEventKind, handler: Sender<TreeEvent>);

    fn selected(&self) -> Vec<NodeId>;
    fn select_node(&mut self, id: NodeId);
    fn deselect_all(&mut self);

    fn cut(&mut self, nodes: &[NodeId]);
    fn copy(&mut self, nodes: &[NodeId]);
    fn can_paste(&self) -> bool;
    /// Replays the clipboard into `parent` as copy or move gestures.
    fn paste(&mut self, parent: NodeId);

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_node(id).map(|n| n.children()).unwrap_or(&[])
    }

    fn position_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.get_node(id)?.parent()?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Ancestors of `id` from its parent up to and including the root.
    fn parents(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.get_node(id).and_then(|n| n.parent());
        while let Some(p) = current {
            out.push(p);
            current = self.get_node(p).and_then(|n| n.parent());
        }
        out
    }

    fn project_of(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get_node(id)?;
        if node.kind() == NodeKind::Project {
            return Some(id);
        }
        self.parents(id)
            .into_iter()
            .find(|&p| self.get_node(p).is_some_and(|n| n.kind() == NodeKind::Project))
    }

    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    fn find_by_path(&self, path: &str) -> Option<NodeId> {
        self.descendants(self.root()).into_iter().find(|&id| {
            self.get_node(id)
                .is_some_and(|n| !n.is_spinner() && n.data.path == path)
        })
    }

    /// Depth-first rows in sibling order; the comparable shape of the tree.
    fn rows(&self) -> Vec<TreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = self
            .children(self.root())
            .iter()
            .rev()
            .map(|&id| (id, 0))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get_node(id) else {
                continue;
            };
            result.push(TreeRow {
                id,
                depth,
                text: node.text.clone(),
                kind: node.kind,
                path: node.data.path.clone(),
                workspace: node.data.workspace.clone(),
                status: node.status,
                disabled: node.disabled,
                hidden: node.hidden,
            });
            for &child in node.children().iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        result
    }

    /// Drops every project and inserts `projects` in order.
    fn replace_all(&mut self, projects: Vec<NewNode>) -> Result<(), TreeError> {
        let root = self.root();
        for id in self.children(root).to_vec() {
            self.delete_node(id)?;
        }
        for project in projects {
            self.create_node(root, project, None)?;
        }
        Ok(())
    }
}

pub struct ProjectTree {
    arena: SlotMap<NodeId, TreeNode>,
    root: NodeId,
    selected: Vec<NodeId>,
    clipboard: Option<(ClipboardMode, Vec<NodeId>)>,
    listeners: Vec<(TreeEventKind, Sender<TreeEvent>)>,
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectTree {
    pub fn new() -> Self {
        let mut arena = SlotMap::with_key();
        let root = arena.insert(TreeNode::from_blueprint(
            &NewNode::new("#", NodeKind::Root, NodeData::default()),
            None,
        ));
        Self {
            arena,
            root,
            selected: Vec::new(),
            clipboard: None,
            listeners: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn emit(&mut self, event: TreeEvent) {
        let kind = event.kind();
        self.listeners
            .retain(|(k, tx)| *k != kind || tx.send(event.clone()).is_ok());
    }

    fn is_ancestor(&self, ancestor: NodeId, mut descendant: NodeId) -> bool {
        while let Some(node) = self.arena.get(descendant) {
            match node.parent {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => descendant = parent,
                None => break,
            }
        }
        false
    }

    fn insert_subtree(
        &mut self,
        parent: NodeId,
        node: &NewNode,
        position: Option<usize>,
    ) -> Result<NodeId, TreeError> {
        let parent_node = self.arena.get(parent).ok_or(TreeError::InvalidNodeId)?;
        if !parent_node.kind.is_container() {
            return Err(TreeError::ParentNotContainer);
        }
        let len = parent_node.children.len();

        let id = self.arena.insert(TreeNode::from_blueprint(node, Some(parent)));
        let at = position.unwrap_or(len).min(len);
        if let Some(p) = self.arena.get_mut(parent) {
            p.children.insert(at, id);
        }

        for child in &node.children {
            self.insert_subtree(id, child, None)?;
        }
        Ok(id)
    }

    fn blueprint_of(&self, id: NodeId) -> Option<NewNode> {
        let node = self.arena.get(id)?;
        let children = node
            .children
            .iter()
            .filter_map(|&c| self.blueprint_of(c))
            .collect();
        Some(NewNode {
            text: node.text.clone(),
            kind: node.kind,
            data: node.data.clone(),
            status: node.status,
            icon: node.icon.clone(),
            children,
        })
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.arena.get(id).and_then(|n| n.parent);
        if let Some(children) = parent
            .and_then(|p| self.arena.get_mut(p))
            .map(|p| &mut p.children)
        {
            children.retain(|&c| c != id);
        }
    }

    fn recursive_remove(&mut self, id: NodeId) {
        if let Some(node) = self.arena.remove(id) {
            for child in node.children {
                self.recursive_remove(child);
            }
            self.selected.retain(|&s| s != id);
        }
    }

    /// Click on a node: exclusive selection, announced as a gesture.
    pub fn click(&mut self, id: NodeId) {
        if !self.arena.contains_key(id) {
            return;
        }
        self.selected = vec![id];
        self.emit(TreeEvent::Selected {
            node: id,
            by_click: true,
        });
    }

    pub fn double_click(&mut self, id: NodeId) {
        if self.arena.contains_key(id) {
            self.emit(TreeEvent::DoubleClicked { node: id });
        }
    }

    /// Inline edit committed by the user.
    pub fn user_rename(&mut self, id: NodeId, text: &str) -> Result<(), TreeError> {
        let old = self
            .arena
            .get(id)
            .map(|n| n.text.clone())
            .ok_or(TreeError::InvalidNodeId)?;
        self.rename_node(id, text)?;
        self.emit(TreeEvent::Renamed {
            node: id,
            old,
            new: text.into(),
        });
        Ok(())
    }

    /// Drag and drop of `id` onto `parent`.
    pub fn user_move(
        &mut self,
        id: NodeId,
        parent: NodeId,
        position: Option<usize>,
    ) -> Result<(), TreeError> {
        let old_parent = self
            .arena
            .get(id)
            .and_then(|n| n.parent)
            .ok_or(TreeError::RootImmutable)?;
        let old_position = self.position_of(id).unwrap_or(0);
        self.move_node(id, parent, position)?;
        let position = self.position_of(id).unwrap_or(0);
        self.emit(TreeEvent::Moved {
            node: id,
            parent,
            position,
            old_parent,
            old_position,
        });
        Ok(())
    }

    /// Ctrl-drag of `id` onto `parent`; returns the id of the copy.
    pub fn user_copy(
        &mut self,
        id: NodeId,
        parent: NodeId,
        position: Option<usize>,
    ) -> Result<NodeId, TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        let blueprint = self.blueprint_of(id).ok_or(TreeError::InvalidNodeId)?;
        let copy = self.insert_subtree(parent, &blueprint, position)?;
        let position = self.position_of(copy).unwrap_or(0);
        self.emit(TreeEvent::Copied {
            node: copy,
            original: id,
            parent,
            position,
        });
        Ok(copy)
    }
}

impl TreeView for ProjectTree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get(id)
    }

    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.arena.get_mut(id)
    }

    fn create_node(
        &mut self,
        parent: NodeId,
        node: NewNode,
        position: Option<usize>,
    ) -> Result<NodeId, TreeError> {
        self.insert_subtree(parent, &node, position)
    }

    fn delete_node(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        if !self.arena.contains_key(id) {
            return Err(TreeError::InvalidNodeId);
        }
        self.detach(id);
        self.recursive_remove(id);
        if let Some((_, nodes)) = self.clipboard.as_mut() {
            nodes.retain(|n| self.arena.contains_key(*n));
        }
        Ok(())
    }

    fn move_node(
        &mut self,
        id: NodeId,
        parent: NodeId,
        position: Option<usize>,
    ) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        if !self.arena.contains_key(id) {
            return Err(TreeError::InvalidNodeId);
        }
        if id == parent || self.is_ancestor(id, parent) {
            return Err(TreeError::MoveIntoDescendant);
        }
        let parent_node = self.arena.get(parent).ok_or(TreeError::InvalidNodeId)?;
        if !parent_node.kind.is_container() {
            return Err(TreeError::ParentNotContainer);
        }

        self.detach(id);
        let parent_node = self.arena.get_mut(parent).ok_or(TreeError::InvalidNodeId)?;
        let at = position
            .unwrap_or(parent_node.children.len())
            .min(parent_node.children.len());
        parent_node.children.insert(at, id);

        self.arena
            .get_mut(id)
            .ok_or(TreeError::InvalidNodeId)?
            .parent = Some(parent);
        Ok(())
    }

    fn rename_node(&mut self, id: NodeId, text: &str) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        self.arena.get_mut(id).ok_or(TreeError::InvalidNodeId)?.text = text.into();
        Ok(())
    }

    fn on(&mut self, kind: TreeEventKind, handler: Sender<TreeEvent>) {
        self.listeners.push((kind, handler));
    }

    fn selected(&self) -> Vec<NodeId> {
        self.selected.clone()
    }

    fn select_node(&mut self, id: NodeId) {
        if self.arena.contains_key(id) && !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    fn deselect_all(&mut self) {
        self.selected.clear();
    }

    fn cut(&mut self, nodes: &[NodeId]) {
        self.clipboard = Some((ClipboardMode::Cut, nodes.to_vec()));
    }

    fn copy(&mut self, nodes: &[NodeId]) {
        self.clipboard = Some((ClipboardMode::Copy, nodes.to_vec()));
    }

    fn can_paste(&self) -> bool {
        self.clipboard
            .as_ref()
            .is_some_and(|(_, nodes)| !nodes.is_empty())
    }

    fn paste(&mut self, parent: NodeId) {
        let Some((mode, nodes)) = self.clipboard.clone() else {
            return;
        };
        let mut seen = FxHashSet::default();
        for id in nodes {
            if !seen.insert(id) {
                continue;
            }
            let result = match mode {
                ClipboardMode::Cut => self.user_move(id, parent, None),
                ClipboardMode::Copy => self.user_copy(id, parent, None).map(|_| ()),
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, "paste skipped node");
            }
        }
        if mode == ClipboardMode::Cut {
            self.clipboard = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/tree.rs"]
mod tests;
