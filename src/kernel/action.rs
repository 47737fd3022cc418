use serde_json::Value;

use super::effect::RequestId;
use super::hub::HubMessage;
use super::services::ports::ApiResponse;
use crate::models::{NodeId, TreeEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// List workspaces, load the selected one and fetch templates.
    Init,
    Tree(TreeEvent),
    Hub(HubMessage),
    Response {
        id: RequestId,
        response: ApiResponse,
    },
    ReloadWorkspace,
    ReloadWorkspaceList,
    LoadTemplates,
    SwitchWorkspace {
        name: String,
    },
    CreateWorkspace {
        name: String,
    },
    /// Deletes the selected workspace; the default workspace is never deleted.
    DeleteWorkspace,
    CreateProject {
        name: String,
    },
    LinkProject {
        name: String,
        path: String,
    },
    DuplicateProject {
        source_path: String,
        source_workspace: String,
        target_workspace: String,
        name: String,
    },
    CreateFile {
        parent: NodeId,
        name: String,
        content: String,
    },
    CreateFolder {
        parent: NodeId,
        name: String,
    },
    /// Rename requested outside the tree widget (form dialog, CLI).
    RenameNode {
        node: NodeId,
        name: String,
    },
    DeleteNodes {
        nodes: Vec<NodeId>,
        unpublish: bool,
    },
    OpenFile {
        node: NodeId,
        editor: Option<String>,
    },
    SelectPath {
        path: String,
    },
    Publish {
        path: String,
    },
    Unpublish {
        path: String,
    },
    PublishAll,
    UnpublishAll,
    ExportProjects,
    ExportProject {
        node: NodeId,
    },
    SaveAll,
    GenerateFromTemplate {
        template_id: String,
        project: String,
        file_path: String,
    },
    GenerateFromModel {
        template_id: String,
        project: String,
        model: String,
        parameters: Value,
    },
}
