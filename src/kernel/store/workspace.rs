//! 工作区级别的操作：加载、切换、项目管理、发布与生成。

use serde_json::{json, Value};

use super::{Continuation, DispatchResult};
use crate::kernel::effect::BackendRequest;
use crate::kernel::hub::{status_busy, status_error, topics, HubMessage};
use crate::kernel::{Action, Effect};
use crate::models::{is_valid_name, NodeId, NodeKind, TreeView};

impl<T: TreeView> super::Store<T> {
    pub(super) fn init(&mut self) -> DispatchResult {
        let mut effects = self.reload_workspace();
        effects.push(self.reload_workspace_list());
        effects.extend(self.load_templates());
        DispatchResult {
            effects,
            state_changed: true,
        }
    }

    /// Loads the selected workspace. Only the newest load may replace the
    /// tree; pending node operations survive until it does.
    pub(super) fn reload_workspace(&mut self) -> Vec<Effect> {
        self.load_generation += 1;
        let generation = self.load_generation;
        let workspace = self.state.selected_workspace.clone();
        tracing::info!(workspace = %workspace, generation, "reloading workspace");

        let message = "Loading projects...".to_string();
        self.state.busy = Some(message.clone());
        vec![
            Effect::post(status_busy(message)),
            self.request(
                BackendRequest::Load { workspace },
                Continuation::LoadWorkspace { generation },
            ),
        ]
    }

    pub(super) fn reload_workspace_list(&mut self) -> Effect {
        self.request(
            BackendRequest::ListWorkspaceNames,
            Continuation::ListWorkspaces,
        )
    }

    fn load_templates(&mut self) -> Vec<Effect> {
        vec![
            self.request(BackendRequest::MenuTemplates, Continuation::MenuTemplates),
            self.request(BackendRequest::ListTemplates, Continuation::ListTemplates),
        ]
    }

    pub(super) fn reduce_workspace_action(&mut self, action: Action) -> DispatchResult {
        let effects = match action {
            Action::ReloadWorkspace => self.reload_workspace(),
            Action::ReloadWorkspaceList => vec![self.reload_workspace_list()],
            Action::LoadTemplates => self.load_templates(),
            Action::SwitchWorkspace { name } => self.switch_workspace(name),
            Action::CreateWorkspace { name } => {
                if !is_valid_name(&name) {
                    return invalid_name(&name);
                }
                vec![self.request(
                    BackendRequest::CreateWorkspace { name: name.clone() },
                    Continuation::CreateWorkspace { name },
                )]
            }
            Action::DeleteWorkspace => {
                if self.state.is_default_workspace() {
                    tracing::warn!("refusing to delete the default workspace");
                    return DispatchResult::posting([status_error(
                        "The default workspace cannot be deleted",
                    )]);
                }
                let name = self.state.selected_workspace.clone();
                vec![self.request(
                    BackendRequest::DeleteWorkspace { name: name.clone() },
                    Continuation::DeleteWorkspace { name },
                )]
            }
            Action::CreateProject { name } => {
                if !is_valid_name(&name) {
                    return invalid_name(&name);
                }
                vec![self.request(
                    BackendRequest::CreateProject {
                        workspace: self.state.selected_workspace.clone(),
                        project: name.clone(),
                    },
                    Continuation::CreateProject { name },
                )]
            }
            Action::LinkProject { name, path } => {
                if !is_valid_name(&name) {
                    return invalid_name(&name);
                }
                vec![self.request(
                    BackendRequest::LinkProject {
                        workspace: self.state.selected_workspace.clone(),
                        project: name.clone(),
                        path,
                    },
                    Continuation::LinkProject { name },
                )]
            }
            Action::DuplicateProject {
                source_path,
                source_workspace,
                target_workspace,
                name,
            } => {
                if !is_valid_name(&name) {
                    return invalid_name(&name);
                }
                vec![self.request(
                    BackendRequest::Copy {
                        source_path: source_path.clone(),
                        target_path: format!("/{name}/"),
                        source_workspace,
                        target_workspace: target_workspace.clone(),
                    },
                    Continuation::DuplicateProject {
                        path: source_path,
                        target_workspace,
                    },
                )]
            }
            Action::Publish { path } => vec![self.request(
                BackendRequest::Publish { path: path.clone() },
                Continuation::Publish { path },
            )],
            Action::Unpublish { path } => vec![self.request(
                BackendRequest::Unpublish { path: path.clone() },
                Continuation::Unpublish { path },
            )],
            Action::PublishAll => self.publish_all(true),
            Action::UnpublishAll => self.publish_all(false),
            Action::ExportProjects => {
                let workspace = self.state.selected_workspace.clone();
                vec![self.request(
                    BackendRequest::ExportProject {
                        workspace: workspace.clone(),
                        project: "*".to_string(),
                    },
                    Continuation::Export { target: workspace },
                )]
            }
            Action::ExportProject { node } => self.export_project(node),
            Action::SaveAll => vec![Effect::post(HubMessage::new(topics::SAVE_ALL, json!(true)))],
            Action::GenerateFromTemplate {
                template_id,
                project,
                file_path,
            } => self.generate_from_template(&template_id, project, file_path),
            Action::GenerateFromModel {
                template_id,
                project,
                model,
                parameters,
            } => vec![self.request(
                BackendRequest::GenerateFromModel {
                    workspace: self.state.selected_workspace.clone(),
                    project,
                    model: model.clone(),
                    template_id,
                    parameters,
                },
                Continuation::GenerateFromModel { model },
            )],
            other => {
                tracing::debug!(?other, "action not handled by the workspace reducer");
                return DispatchResult::unchanged();
            }
        };
        DispatchResult {
            effects,
            state_changed: true,
        }
    }

    fn switch_workspace(&mut self, name: String) -> Vec<Effect> {
        if name == self.state.selected_workspace {
            return Vec::new();
        }
        tracing::info!(from = %self.state.selected_workspace, to = %name, "switching workspace");
        self.state.selected_workspace = name.clone();
        let mut effects = vec![Effect::PersistWorkspace { name }];
        effects.extend(self.reload_workspace());
        effects
    }

    fn publish_all(&mut self, publish: bool) -> Vec<Effect> {
        let workspace = self.state.selected_workspace.clone();
        let path = format!("/{workspace}/*");
        let (message, request, continuation) = if publish {
            (
                "Publishing projects...",
                BackendRequest::Publish { path },
                Continuation::PublishAll { workspace },
            )
        } else {
            (
                "Unpublishing projects...",
                BackendRequest::Unpublish { path },
                Continuation::UnpublishAll { workspace },
            )
        };
        self.state.busy = Some(message.to_string());
        vec![
            Effect::post(status_busy(message)),
            self.request(request, continuation),
        ]
    }

    fn export_project(&mut self, node: NodeId) -> Vec<Effect> {
        let Some(project) = self
            .tree
            .get_node(node)
            .filter(|n| n.kind() == NodeKind::Project)
        else {
            return Vec::new();
        };
        let workspace = project.data.workspace.clone();
        let name = project.text().to_string();
        vec![self.request(
            BackendRequest::ExportProject {
                workspace,
                project: name.clone(),
            },
            Continuation::Export { target: name },
        )]
    }

    fn generate_from_template(
        &mut self,
        template_id: &str,
        project: String,
        file_path: String,
    ) -> Vec<Effect> {
        let Some(template) = self
            .state
            .templates
            .generic
            .iter()
            .find(|t| t.id == template_id)
        else {
            return vec![Effect::post(status_error(format!(
                "Unknown template '{template_id}'"
            )))];
        };
        let name = template.name.clone();
        let parameters = serde_json::to_value(&template.parameters).unwrap_or(Value::Null);
        vec![self.request(
            BackendRequest::GenerateFromTemplate {
                workspace: self.state.selected_workspace.clone(),
                project,
                file_path,
                template_id: template_id.to_string(),
                parameters,
            },
            Continuation::GenerateFromTemplate { template: name },
        )]
    }
}

fn invalid_name(name: &str) -> DispatchResult {
    DispatchResult {
        effects: vec![Effect::post(status_error(format!("Invalid name '{name}'.")))],
        state_changed: false,
    }
}
