use serde_json::Value;

use super::hub::HubMessage;
use super::services::ports::{ApiFuture, Backend};

/// Correlates a backend request with the response action it produces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    Load {
        workspace: String,
    },
    ListWorkspaceNames,
    Rename {
        old_name: String,
        new_name: String,
        path: String,
        workspace: String,
    },
    Copy {
        source_path: String,
        target_path: String,
        source_workspace: String,
        target_workspace: String,
    },
    Move {
        source_path: String,
        target_path: String,
        source_workspace: String,
        target_workspace: String,
    },
    CreateNode {
        name: String,
        target_path: String,
        is_directory: bool,
        content: String,
    },
    DeleteProject {
        workspace: String,
        project: String,
    },
    Remove {
        path: String,
    },
    GetMetadata {
        url: String,
    },
    GetMetadataByPath {
        workspace: String,
        path: String,
    },
    CreateWorkspace {
        name: String,
    },
    DeleteWorkspace {
        name: String,
    },
    LinkProject {
        workspace: String,
        project: String,
        path: String,
    },
    CreateProject {
        workspace: String,
        project: String,
    },
    Publish {
        path: String,
    },
    Unpublish {
        path: String,
    },
    MenuTemplates,
    ListTemplates,
    GenerateFromTemplate {
        workspace: String,
        project: String,
        file_path: String,
        template_id: String,
        parameters: Value,
    },
    GenerateFromModel {
        workspace: String,
        project: String,
        model: String,
        template_id: String,
        parameters: Value,
    },
    ExportProject {
        workspace: String,
        project: String,
    },
}

impl BackendRequest {
    pub fn name(&self) -> &'static str {
        match self {
            BackendRequest::Load { .. } => "load",
            BackendRequest::ListWorkspaceNames => "listWorkspaceNames",
            BackendRequest::Rename { .. } => "rename",
            BackendRequest::Copy { .. } => "copy",
            BackendRequest::Move { .. } => "move",
            BackendRequest::CreateNode { .. } => "createNode",
            BackendRequest::DeleteProject { .. } => "deleteProject",
            BackendRequest::Remove { .. } => "remove",
            BackendRequest::GetMetadata { .. } => "getMetadata",
            BackendRequest::GetMetadataByPath { .. } => "getMetadataByPath",
            BackendRequest::CreateWorkspace { .. } => "createWorkspace",
            BackendRequest::DeleteWorkspace { .. } => "deleteWorkspace",
            BackendRequest::LinkProject { .. } => "linkProject",
            BackendRequest::CreateProject { .. } => "createProject",
            BackendRequest::Publish { .. } => "publish",
            BackendRequest::Unpublish { .. } => "unpublish",
            BackendRequest::MenuTemplates => "menuTemplates",
            BackendRequest::ListTemplates => "listTemplates",
            BackendRequest::GenerateFromTemplate { .. } => "generateFromTemplate",
            BackendRequest::GenerateFromModel { .. } => "generateFromModel",
            BackendRequest::ExportProject { .. } => "exportProject",
        }
    }

    /// Issues the call against the matching service.
    pub fn send(&self, backend: &Backend) -> ApiFuture {
        match self {
            BackendRequest::Load { workspace } => backend.workspace.load(workspace),
            BackendRequest::ListWorkspaceNames => backend.workspace.list_workspace_names(),
            BackendRequest::Rename {
                old_name,
                new_name,
                path,
                workspace,
            } => backend.workspace.rename(old_name, new_name, path, workspace),
            BackendRequest::Copy {
                source_path,
                target_path,
                source_workspace,
                target_workspace,
            } => backend.workspace.copy(
                source_path,
                target_path,
                source_workspace,
                target_workspace,
            ),
            BackendRequest::Move {
                source_path,
                target_path,
                source_workspace,
                target_workspace,
            } => backend.workspace.move_path(
                source_path,
                target_path,
                source_workspace,
                target_workspace,
            ),
            BackendRequest::CreateNode {
                name,
                target_path,
                is_directory,
                content,
            } => backend
                .workspace
                .create_node(name, target_path, *is_directory, content),
            BackendRequest::DeleteProject { workspace, project } => {
                backend.workspace.delete_project(workspace, project)
            }
            BackendRequest::Remove { path } => backend.workspace.remove(path),
            BackendRequest::GetMetadata { url } => backend.workspace.get_metadata(url),
            BackendRequest::GetMetadataByPath { workspace, path } => {
                backend.workspace.get_metadata_by_path(workspace, path)
            }
            BackendRequest::CreateWorkspace { name } => backend.workspace.create_workspace(name),
            BackendRequest::DeleteWorkspace { name } => backend.workspace.delete_workspace(name),
            BackendRequest::LinkProject {
                workspace,
                project,
                path,
            } => backend.workspace.link_project(workspace, project, path),
            BackendRequest::CreateProject { workspace, project } => {
                backend.workspace.create_project(workspace, project)
            }
            BackendRequest::Publish { path } => backend.publisher.publish(path),
            BackendRequest::Unpublish { path } => backend.publisher.unpublish(path),
            BackendRequest::MenuTemplates => backend.templates.menu_templates(),
            BackendRequest::ListTemplates => backend.templates.list_templates(),
            BackendRequest::GenerateFromTemplate {
                workspace,
                project,
                file_path,
                template_id,
                parameters,
            } => backend.generate.generate_from_template(
                workspace,
                project,
                file_path,
                template_id,
                parameters,
            ),
            BackendRequest::GenerateFromModel {
                workspace,
                project,
                model,
                template_id,
                parameters,
            } => backend
                .generate
                .generate_from_model(workspace, project, model, template_id, parameters),
            BackendRequest::ExportProject { workspace, project } => {
                backend.transport.export_project(workspace, project)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Request {
        id: RequestId,
        request: BackendRequest,
    },
    Post {
        message: HubMessage,
        global: bool,
    },
    PersistWorkspace {
        name: String,
    },
}

impl Effect {
    /// Explorer notifications always go out on global topics.
    pub fn post(message: HubMessage) -> Self {
        Effect::Post {
            message,
            global: true,
        }
    }
}
