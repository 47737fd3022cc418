use compact_str::CompactString;
use serde_json::Value;

use super::tree::relocate;
use super::{Continuation, DispatchResult};
use crate::kernel::effect::{BackendRequest, RequestId};
use crate::kernel::hub::{self, status_error, status_message, RenamedFile};
use crate::kernel::rollback::{with_rollback, OpId, Outcome, PendingOperation};
use crate::kernel::services::ports::ApiResponse;
use crate::kernel::spinner::find_named_child;
use crate::kernel::state::{MenuTemplate, TemplateDescriptor};
use crate::kernel::Effect;
use crate::models::{
    build_projects, strip_workspace, FileMetadata, FileStatus, NewNode, NodeData, NodeKind,
    TreeView, WorkspaceDescriptor,
};

impl<T: TreeView> super::Store<T> {
    pub(super) fn reduce_response(&mut self, id: RequestId, response: ApiResponse) -> DispatchResult {
        let Some(continuation) = self.continuations.remove(&id) else {
            tracing::warn!(id = id.0, status = response.status, "response without a request");
            return DispatchResult::unchanged();
        };
        tracing::debug!(id = id.0, status = response.status, "backend response");

        match continuation {
            Continuation::LoadWorkspace { generation } => self.on_loaded(generation, &response),
            Continuation::ListWorkspaces => self.on_workspace_list(&response),
            Continuation::MenuTemplates => self.on_menu_templates(&response),
            Continuation::ListTemplates => self.on_templates(&response),
            Continuation::Rename {
                op,
                old_name,
                new_path,
            } => self.on_renamed(op, &response, old_name, &new_path),
            Continuation::RenameMetadata { op, old_name } => {
                self.on_rename_metadata(op, &response, &old_name)
            }
            Continuation::Copy { op, name } => self.on_copied(op, &response, &name),
            Continuation::Move {
                op,
                name,
                old_path,
                path,
                workspace,
            } => {
                if !response.is_created() {
                    self.settle(op, Outcome::Revert, |_, _| {});
                    return failure(format!("Unable to move '{name}'."));
                }
                let live = self.settle(op, Outcome::Commit, |tree, op| {
                    relocate(tree, op.target, &path, &workspace);
                });
                if !live {
                    return DispatchResult::unchanged();
                }
                DispatchResult {
                    effects: vec![Effect::post(hub::file_moved(
                        &name, &old_path, &path, &workspace,
                    ))],
                    state_changed: true,
                }
            }
            Continuation::CreateFile { op, name } => self.on_file_created(op, &response, name),
            Continuation::CreateFileMetadata { op, name } => {
                self.on_created_file_metadata(op, &response, &name)
            }
            Continuation::CreateFolder { op, name, path } => {
                if !response.is_created() {
                    self.settle(op, Outcome::Revert, |_, _| {});
                    return alert(
                        "Could not create folder",
                        format!("There was an error while creating '{name}'"),
                    );
                }
                self.settle(op, Outcome::Commit, |tree, op| {
                    let data = NodeData::new(path.as_str(), op.original.data.workspace.as_str());
                    let folder = NewNode::new(name.as_str(), NodeKind::Folder, data);
                    if let Err(e) = tree.create_node(op.target, folder, None) {
                        tracing::warn!(error = %e, "cannot insert created folder");
                    }
                });
                DispatchResult {
                    effects: Vec::new(),
                    state_changed: true,
                }
            }
            Continuation::UnpublishBeforeDelete { op, name, delete } => {
                if !published(&response) {
                    self.settle(op, Outcome::Revert, |_, _| {});
                    return failure(format!("Unable to unpublish '{name}'."));
                }
                let effect = self.request(
                    delete,
                    Continuation::Delete {
                        op,
                        name,
                        unpublished: true,
                    },
                );
                DispatchResult {
                    effects: vec![effect],
                    state_changed: false,
                }
            }
            Continuation::Delete {
                op,
                name,
                unpublished,
            } => {
                if !response.is_deleted() {
                    self.settle(op, Outcome::Revert, |_, _| {});
                    return failure(format!("Unable to delete '{name}'."));
                }
                self.settle(op, Outcome::Commit, |tree, op| {
                    let _ = tree.delete_node(op.target);
                });
                let message = if unpublished {
                    format!("Deleted and unpublished '{name}'.")
                } else {
                    format!("Deleted '{name}'.")
                };
                DispatchResult {
                    effects: vec![Effect::post(status_message(message))],
                    state_changed: true,
                }
            }
            Continuation::CreateWorkspace { name } => {
                if !response.is_created() {
                    return alert_with_status(
                        "Failed to create workspace",
                        format!("Unable to create workspace '{name}'"),
                    );
                }
                DispatchResult {
                    effects: vec![
                        self.reload_workspace_list(),
                        Effect::post(status_message(format!("Created workspace '{name}'"))),
                        Effect::post(hub::workspaces_modified()),
                    ],
                    state_changed: false,
                }
            }
            Continuation::DeleteWorkspace { name } => self.on_workspace_deleted(&response, &name),
            Continuation::CreateProject { name } => {
                if !response.is_created() {
                    return alert_with_status(
                        "Failed to create project",
                        format!("Unable to create project '{name}'"),
                    );
                }
                self.reload_with_message(format!("Created project '{name}'"))
            }
            Continuation::LinkProject { name } => {
                if !response.is_created() {
                    return alert_with_status(
                        "Failed to link project",
                        format!("Unable to link project '{name}'"),
                    );
                }
                self.reload_with_message(format!("Linked project '{name}'"))
            }
            Continuation::DuplicateProject {
                path,
                target_workspace,
            } => {
                if !response.is_created() {
                    return alert_with_status(
                        "Failed to duplicate project",
                        format!("Unable to duplicate '{path}'"),
                    );
                }
                let message = format!("Duplicated '{path}'");
                if target_workspace == self.state.selected_workspace {
                    self.reload_with_message(message)
                } else {
                    DispatchResult {
                        effects: vec![Effect::post(status_message(message))],
                        state_changed: false,
                    }
                }
            }
            Continuation::Publish { path } | Continuation::PublishSaved { path } => {
                if !published(&response) {
                    return failure(format!("Unable to publish '{path}'"));
                }
                DispatchResult {
                    effects: vec![Effect::post(hub::announce_publish())],
                    state_changed: false,
                }
            }
            Continuation::Unpublish { path } => {
                if !published(&response) {
                    return failure(format!("Unable to unpublish '{path}'"));
                }
                DispatchResult {
                    effects: vec![Effect::post(hub::announce_unpublish())],
                    state_changed: false,
                }
            }
            Continuation::PublishAll { workspace } => {
                self.state.busy = None;
                let (message, announce) = if published(&response) {
                    (
                        status_message(format!("Published all projects in '{workspace}'")),
                        Some(hub::announce_publish()),
                    )
                } else {
                    (
                        status_error(format!("Unable to publish projects in '{workspace}'")),
                        None,
                    )
                };
                let mut effects = vec![Effect::post(hub::hide_status_busy()), Effect::post(message)];
                effects.extend(announce.map(Effect::post));
                DispatchResult {
                    effects,
                    state_changed: true,
                }
            }
            Continuation::UnpublishAll { workspace } => {
                self.state.busy = None;
                let (message, announce) = if published(&response) {
                    (
                        status_message(format!("Unpublished all projects in '{workspace}'")),
                        Some(hub::announce_unpublish()),
                    )
                } else {
                    (
                        status_error(format!("Unable to unpublish projects in '{workspace}'")),
                        None,
                    )
                };
                let mut effects = vec![Effect::post(hub::hide_status_busy()), Effect::post(message)];
                effects.extend(announce.map(Effect::post));
                DispatchResult {
                    effects,
                    state_changed: true,
                }
            }
            Continuation::GenerateFromTemplate { template } => {
                if !response.is_created() {
                    return alert_with_status(
                        "Failed to generate from template",
                        format!("Unable to generate from template '{template}'"),
                    );
                }
                self.reload_with_message("Successfully generated from template.".to_string())
            }
            Continuation::GenerateFromModel { model } => {
                if response.is_created() {
                    return self.reload_with_message(format!("Generated from model '{model}'"));
                }
                let mut result = alert_with_status(
                    "Failed to generate from model",
                    format!("Unable to generate from model '{model}'"),
                );
                result.effects.extend(self.reload_workspace());
                result
            }
            Continuation::Export { target } => {
                let location = response.data.as_ref().and_then(Value::as_str);
                match location.filter(|_| response.is_ok()) {
                    Some(location) => DispatchResult {
                        effects: vec![Effect::post(status_message(format!(
                            "Exported '{target}' to {location}"
                        )))],
                        state_changed: false,
                    },
                    None => failure(format!("Unable to export '{target}'")),
                }
            }
        }
    }

    /// Commits or restores `op`. Returns false when the operation was
    /// cancelled meanwhile; the tree is not touched then.
    fn settle<C>(&mut self, op: OpId, outcome: Outcome, on_commit: C) -> bool
    where
        C: FnOnce(&mut T, &PendingOperation),
    {
        let Some(pending) = self.ops.take(op) else {
            tracing::debug!(?op, ?outcome, "response for a cancelled operation");
            return false;
        };
        with_rollback(&mut self.tree, pending, outcome, on_commit, |_, op| {
            tracing::info!(op = ?op.id, kind = ?op.kind, "operation reverted");
        });
        true
    }

    fn reload_with_message(&mut self, message: String) -> DispatchResult {
        let mut effects = self.reload_workspace();
        effects.push(Effect::post(status_message(message)));
        DispatchResult {
            effects,
            state_changed: true,
        }
    }

    fn on_loaded(&mut self, generation: u64, response: &ApiResponse) -> DispatchResult {
        if generation != self.load_generation {
            tracing::debug!(generation, current = self.load_generation, "stale workspace load");
            return DispatchResult::unchanged();
        }
        self.state.busy = None;
        let mut effects = vec![Effect::post(hub::hide_status_busy())];

        let descriptor = response
            .json::<WorkspaceDescriptor>()
            .filter(|_| response.is_ok());
        match descriptor {
            Some(descriptor) => {
                let projects = build_projects(&descriptor, &self.state.icons);
                self.ops.cancel_all(&mut self.tree);
                self.tree.deselect_all();
                if let Err(e) = self.tree.replace_all(projects) {
                    tracing::error!(error = %e, "cannot rebuild project tree");
                }
                self.state.load_error = None;
                tracing::info!(
                    workspace = %descriptor.name,
                    projects = descriptor.projects.len(),
                    "workspace loaded"
                );
            }
            None => {
                let message = "Unable to load workspace data";
                self.state.load_error = Some(message.to_string());
                effects.push(Effect::post(status_error(message)));
            }
        }
        DispatchResult {
            effects,
            state_changed: true,
        }
    }

    fn on_workspace_list(&mut self, response: &ApiResponse) -> DispatchResult {
        let names = response
            .json::<Vec<Value>>()
            .filter(|_| response.is_ok())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| match entry {
                        Value::String(name) => Some(name.clone()),
                        other => other.get("name")?.as_str().map(String::from),
                    })
                    .collect::<Vec<_>>()
            });
        let Some(names) = names else {
            return failure("Unable to load workspace list".to_string());
        };
        self.state.workspace_names = names;
        DispatchResult {
            effects: Vec::new(),
            state_changed: true,
        }
    }

    fn on_menu_templates(&mut self, response: &ApiResponse) -> DispatchResult {
        let Some(mut templates) = response
            .json::<Vec<MenuTemplate>>()
            .filter(|_| response.is_ok())
        else {
            return failure("Unable to load menu template list".to_string());
        };
        // Ordered templates first, by order; the rest keep their position.
        templates.sort_by_key(|t| (t.order.is_none(), t.order));
        for template in &templates {
            if template.is_model {
                self.state.icons.add_model_ext(&template.extension);
            }
            if template.is_image {
                self.state.icons.add_image_ext(&template.extension);
            }
        }
        self.state.templates.menu = templates;
        DispatchResult {
            effects: Vec::new(),
            state_changed: true,
        }
    }

    fn on_templates(&mut self, response: &ApiResponse) -> DispatchResult {
        let Some(templates) = response
            .json::<Vec<TemplateDescriptor>>()
            .filter(|_| response.is_ok())
        else {
            return failure("Unable to load template list".to_string());
        };
        self.state.templates.set_generation_templates(templates);
        DispatchResult {
            effects: Vec::new(),
            state_changed: true,
        }
    }

    fn on_renamed(
        &mut self,
        op: OpId,
        response: &ApiResponse,
        old_name: String,
        new_path: &str,
    ) -> DispatchResult {
        if !response.is_created() {
            self.settle(op, Outcome::Revert, |_, _| {});
            return failure(format!("Unable to rename '{old_name}'. Reverted."));
        }
        let Some(pending) = self.ops.get(op) else {
            return DispatchResult::unchanged();
        };
        let target = pending.target;
        let workspace = pending.original.data.workspace.clone();

        if self.tree.get_node(target).is_some_and(|n| n.is_file()) {
            let effect = self.request(
                BackendRequest::GetMetadataByPath {
                    workspace,
                    path: new_path.to_string(),
                },
                Continuation::RenameMetadata { op, old_name },
            );
            return DispatchResult {
                effects: vec![effect],
                state_changed: false,
            };
        }

        let mut moved_files = Vec::new();
        self.settle(op, Outcome::Commit, |tree, op| {
            moved_files = relocate(tree, op.target, new_path, &workspace);
        });
        DispatchResult {
            effects: moved_files
                .iter()
                .map(|path| Effect::post(hub::close_editor(path)))
                .collect(),
            state_changed: true,
        }
    }

    fn on_rename_metadata(
        &mut self,
        op: OpId,
        response: &ApiResponse,
        old_name: &str,
    ) -> DispatchResult {
        let metadata = response
            .json::<FileMetadata>()
            .filter(|_| response.is_ok());
        let Some(metadata) = metadata else {
            self.settle(op, Outcome::Revert, |_, _| {});
            return failure(format!("Unable to rename '{old_name}'. Reverted."));
        };
        let Some(pending) = self.ops.get(op) else {
            return DispatchResult::unchanged();
        };
        let old = pending.original.data.clone();
        let path = strip_workspace(&metadata.path, &old.workspace);
        let icon = CompactString::from(self.state.icons.icon_for(&metadata.name));
        let status = metadata
            .status
            .as_deref()
            .and_then(FileStatus::from_backend);

        self.settle(op, Outcome::Commit, |tree, op| {
            let _ = tree.rename_node(op.target, &metadata.name);
            if let Some(node) = tree.get_node_mut(op.target) {
                node.data.path = path.clone();
                node.data.content_type = metadata.content_type.clone();
                node.status = status;
                node.icon = Some(icon);
            }
        });
        let renamed = hub::file_renamed(RenamedFile {
            old_name,
            name: &metadata.name,
            old_path: &old.path,
            path: &path,
            content_type: metadata.content_type.as_deref(),
            workspace: &old.workspace,
        });
        DispatchResult {
            effects: vec![
                Effect::post(hub::close_editor(&old.resource_path())),
                Effect::post(renamed),
            ],
            state_changed: true,
        }
    }

    fn on_copied(&mut self, op: OpId, response: &ApiResponse, name: &str) -> DispatchResult {
        if !response.is_created() {
            self.settle(op, Outcome::Revert, |_, _| {});
            return failure(format!("Unable to copy '{name}'."));
        }
        let mut conflict = false;
        let live = self.settle(op, Outcome::Commit, |tree, op| {
            conflict = find_named_child(tree, op.original.parent, name, Some(op.target)).is_some();
        });
        if !live {
            return DispatchResult::unchanged();
        }
        // A same-named sibling appeared while the copy was in flight.
        let effects = if conflict {
            tracing::info!(name, "copy conflict detected after commit, reloading");
            self.reload_workspace()
        } else {
            Vec::new()
        };
        DispatchResult {
            effects,
            state_changed: true,
        }
    }

    fn on_file_created(&mut self, op: OpId, response: &ApiResponse, name: String) -> DispatchResult {
        if !response.is_created() {
            self.settle(op, Outcome::Revert, |_, _| {});
            return create_file_failed(&name);
        }
        let url = match response.data.as_ref().and_then(Value::as_str) {
            Some(url) => url.to_string(),
            None => match self.ops.get(op) {
                Some(pending) => format!("{}/{name}", pending.original.data.resource_path()),
                None => return DispatchResult::unchanged(),
            },
        };
        let effect = self.request(
            BackendRequest::GetMetadata { url },
            Continuation::CreateFileMetadata { op, name },
        );
        DispatchResult {
            effects: vec![effect],
            state_changed: false,
        }
    }

    fn on_created_file_metadata(
        &mut self,
        op: OpId,
        response: &ApiResponse,
        name: &str,
    ) -> DispatchResult {
        let Some(metadata) = response
            .json::<FileMetadata>()
            .filter(|_| response.is_ok())
        else {
            self.settle(op, Outcome::Revert, |_, _| {});
            return create_file_failed(name);
        };
        let icon = CompactString::from(self.state.icons.icon_for(&metadata.name));
        let status = metadata
            .status
            .as_deref()
            .and_then(FileStatus::from_backend);

        let mut created = None;
        self.settle(op, Outcome::Commit, |tree, op| {
            let workspace = op.original.data.workspace.as_str();
            let mut data = NodeData::new(strip_workspace(&metadata.path, workspace), workspace);
            data.content_type = metadata.content_type.clone();
            let file = NewNode::new(metadata.name.as_str(), NodeKind::File, data)
                .with_icon(Some(icon))
                .with_status(status);
            match tree.create_node(op.target, file, None) {
                Ok(id) => created = Some(id),
                Err(e) => tracing::warn!(error = %e, "cannot insert created file"),
            }
        });
        if let Some(id) = created {
            self.tree.deselect_all();
            self.tree.select_node(id);
        }
        DispatchResult {
            effects: Vec::new(),
            state_changed: true,
        }
    }

    fn on_workspace_deleted(&mut self, response: &ApiResponse, name: &str) -> DispatchResult {
        if !response.is_deleted() {
            return failure(format!("Unable to delete workspace '{name}'"));
        }
        let default = self.state.default_workspace.clone();
        self.state.selected_workspace = default.clone();

        let mut effects = vec![Effect::PersistWorkspace { name: default }];
        effects.extend(self.reload_workspace());
        effects.push(self.reload_workspace_list());
        effects.push(Effect::post(status_message(format!(
            "Deleted workspace '{name}'"
        ))));
        effects.push(Effect::post(hub::workspaces_modified()));
        DispatchResult {
            effects,
            state_changed: true,
        }
    }
}

/// The publisher answers 200 or 201 depending on the resource.
fn published(response: &ApiResponse) -> bool {
    response.is_ok() || response.is_created()
}

fn failure(message: String) -> DispatchResult {
    DispatchResult {
        effects: vec![Effect::post(status_error(message))],
        state_changed: true,
    }
}

fn alert(title: &str, message: String) -> DispatchResult {
    DispatchResult {
        effects: vec![Effect::post(hub::alert_error(title, message))],
        state_changed: true,
    }
}

fn alert_with_status(title: &str, message: String) -> DispatchResult {
    DispatchResult {
        effects: vec![
            Effect::post(hub::alert_error(title, message.as_str())),
            Effect::post(status_error(message)),
        ],
        state_changed: true,
    }
}

fn create_file_failed(name: &str) -> DispatchResult {
    alert(
        "Could not create file",
        format!("There was an error while creating '{name}'"),
    )
}
