//! Hub topics the explorer consumes: context menu picks, form and dialog
//! answers, and notifications from other panels.

use serde_json::{json, Map, Value};

use super::{Continuation, DispatchResult};
use crate::kernel::effect::BackendRequest;
use crate::kernel::hub::{self, topics, FormReply, HubMessage};
use crate::kernel::spinner::child_names;
use crate::kernel::state::{DuplicateSource, ModelGeneration, TemplateParameter};
use crate::kernel::Action;
use crate::models::{FileStatus, NodeId, NodeKind, TreeView};

const CREATE_PROJECT_FORM: &str = "createProjectForm";
const CREATE_WORKSPACE_FORM: &str = "createWorkspaceForm";
const LINK_PROJECT_FORM: &str = "linkProjectForm";
const DUPLICATE_PROJECT_FORM: &str = "duplicateProjectForm";
const NEW_FILE_FORM: &str = "projectsNewFileForm";
const NEW_FOLDER_FORM: &str = "projectsNewFolderForm";
const RENAME_FORM: &str = "projectsRenameForm";
const GENERATE_TEMPLATE_FORM: &str = "projectGenerateForm1";
const GENERATE_MODEL_FORM: &str = "projectGenerateForm2";

const NAME_PATTERN: &str = "^[^/]+$";

impl<T: TreeView> super::Store<T> {
    pub(super) fn reduce_hub_message(&mut self, message: HubMessage) -> DispatchResult {
        tracing::trace!(topic = %message.topic, "hub message");
        match message.topic.as_str() {
            topics::TREE_CONTEXT_MENU => self.on_menu_item(&message.data),
            topics::TREE_REFRESH => {
                if message.str_field("name") == Some(self.state.selected_workspace.as_str()) {
                    self.reduce_workspace_action(Action::ReloadWorkspace)
                } else {
                    DispatchResult::unchanged()
                }
            }
            topics::TREE_SELECT => match message.str_field("filePath") {
                Some(path) => self.select_path(path),
                None => DispatchResult::unchanged(),
            },
            topics::EXPORT_ALL => self.reduce_workspace_action(Action::ExportProjects),
            topics::CREATE_PROJECT => self.on_create_project(message.form_reply()),
            topics::CREATE_WORKSPACE => self.on_create_workspace(message.form_reply()),
            topics::LINK_PROJECT => self.on_link_project(message.form_reply()),
            topics::DUPLICATE_PROJECT => self.on_duplicate_project(message.form_reply()),
            topics::FORM_CREATE_FILE => {
                let reply = message.form_reply();
                let parent = self.state.dialogs.create_parent.take();
                let content = std::mem::take(&mut self.state.dialogs.create_content);
                let hide = DispatchResult::posting([hub::hide_form_dialog(NEW_FILE_FORM)]);
                match (parent, reply.value(0)) {
                    (Some(parent), Some(name)) if reply.pressed("b1") => {
                        hide.and(self.create_node(parent, name.to_string(), Some(content)))
                    }
                    _ => hide,
                }
            }
            topics::FORM_CREATE_FOLDER => {
                let reply = message.form_reply();
                let parent = self.state.dialogs.create_parent.take();
                let hide = DispatchResult::posting([hub::hide_form_dialog(NEW_FOLDER_FORM)]);
                match (parent, reply.value(0)) {
                    (Some(parent), Some(name)) if reply.pressed("b1") => {
                        hide.and(self.create_node(parent, name.to_string(), None))
                    }
                    _ => hide,
                }
            }
            topics::FORM_RENAME => {
                let reply = message.form_reply();
                let target = self.state.dialogs.rename_target.take();
                let hide = DispatchResult::posting([hub::hide_form_dialog(RENAME_FORM)]);
                match (target, reply.value(0)) {
                    (Some(node), Some(name)) if reply.pressed("b1") => {
                        hide.and(self.rename_node(node, name))
                    }
                    _ => hide,
                }
            }
            topics::DIALOG_DELETE => {
                let targets = std::mem::take(&mut self.state.dialogs.delete_targets);
                match dialog_button(&message.data) {
                    Some("b1") => self.delete_nodes(&targets, false),
                    Some("b2") => self.delete_nodes(&targets, true),
                    _ => DispatchResult::unchanged(),
                }
            }
            topics::DIALOG_DELETE_WORKSPACE => {
                if message.form_reply().is_menu {
                    return self.show_delete_workspace_dialog();
                }
                match dialog_button(&message.data) {
                    Some("b1") => self.reduce_workspace_action(Action::DeleteWorkspace),
                    _ => DispatchResult::unchanged(),
                }
            }
            topics::GENERATE_GENERIC => {
                let reply = message.form_reply();
                let hide = DispatchResult::posting([hub::hide_form_dialog(GENERATE_TEMPLATE_FORM)]);
                match (reply.value(0), reply.value(1), reply.value(2)) {
                    (Some(template_id), Some(project), Some(file_path)) if reply.pressed("b1") => {
                        let action = Action::GenerateFromTemplate {
                            template_id: template_id.to_string(),
                            project: project.to_string(),
                            file_path: file_path.to_string(),
                        };
                        hide.and(self.reduce_workspace_action(action))
                    }
                    _ => hide,
                }
            }
            topics::GENERATE_MODEL => self.on_generate_model(message.form_reply()),
            topics::FILE_SAVED => self.on_file_saved(&message.data),
            topics::WORKSPACE_CHANGED => self.on_workspace_changed(&message.data),
            other => {
                tracing::debug!(topic = other, "ignoring hub message");
                DispatchResult::unchanged()
            }
        }
    }

    fn on_menu_item(&mut self, data: &Value) -> DispatchResult {
        let item_id = data.get("itemId").and_then(Value::as_str).unwrap_or_default();
        let payload = data.get("data").unwrap_or(&Value::Null);
        let node = self.node_from(payload);
        tracing::debug!(item = item_id, ?node, "context menu item");

        match (item_id, node) {
            ("open", Some(node)) => self.open_file(node, None),
            ("openWith", Some(node)) => {
                let editor = payload.get("editorId").and_then(Value::as_str);
                self.open_file(node, editor)
            }
            ("file", Some(node)) => self.show_create_form(node, true, String::new(), String::new()),
            ("folder", Some(node)) => {
                self.show_create_form(node, false, String::new(), String::new())
            }
            ("rename", Some(node)) => self.show_rename_form(node),
            ("delete", Some(node)) => self.show_delete_dialog(node),
            ("cut", Some(node)) => {
                let targets = self.targets_of(node);
                self.tree.cut(&targets);
                DispatchResult::unchanged()
            }
            ("copy", Some(node)) => {
                let targets = self.targets_of(node);
                self.tree.copy(&targets);
                DispatchResult::unchanged()
            }
            ("paste", Some(node)) => {
                // Pasted nodes come back as copy and move events.
                self.tree.paste(node);
                DispatchResult {
                    effects: Vec::new(),
                    state_changed: true,
                }
            }
            ("duplicateProject", Some(node)) => self.show_duplicate_form(Some(node)),
            ("exportProject", Some(node)) => {
                self.reduce_workspace_action(Action::ExportProject { node })
            }
            ("import", Some(node)) => self.show_import_dialog(node, true),
            ("importZip", Some(node)) => self.show_import_dialog(node, false),
            ("generateGeneric", Some(node)) => self.show_generate_template_form(node),
            ("generateModel", Some(node)) => self.show_generate_model_form(node),
            ("newProject", _) => self.show_create_project_form(),
            ("exportProjects", _) => self.reduce_workspace_action(Action::ExportProjects),
            ("publishAll", _) => self.reduce_workspace_action(Action::PublishAll),
            ("unpublishAll", _) => self.reduce_workspace_action(Action::UnpublishAll),
            ("publish" | "unpublish", _) => {
                let Some(path) = payload.as_str().map(String::from) else {
                    return DispatchResult::unchanged();
                };
                let action = if item_id == "publish" {
                    Action::Publish { path }
                } else {
                    Action::Unpublish { path }
                };
                self.reduce_workspace_action(action)
            }
            (_, Some(node)) => self.on_template_item(node, payload),
            (_, None) => {
                tracing::warn!(item = item_id, "context menu item without a live node");
                DispatchResult::unchanged()
            }
        }
    }

    fn on_template_item(&mut self, parent: NodeId, payload: &Value) -> DispatchResult {
        let Some(name) = payload.get("name").and_then(Value::as_str) else {
            return DispatchResult::unchanged();
        };
        let content = payload
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let direct = payload
            .get("staticName")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if direct {
            self.create_node(parent, name.to_string(), Some(content))
        } else {
            self.show_create_form(parent, true, name.to_string(), content)
        }
    }

    /// The selection when it contains `node`, otherwise `node` alone.
    fn targets_of(&self, node: NodeId) -> Vec<NodeId> {
        let selection = self.tree.selected();
        if selection.contains(&node) {
            selection
        } else {
            vec![node]
        }
    }

    fn show_create_form(
        &mut self,
        parent: NodeId,
        file: bool,
        name: String,
        content: String,
    ) -> DispatchResult {
        self.state.dialogs.create_parent = Some(parent);
        self.state.dialogs.create_content = content;
        let excluded = child_names(&self.tree, parent);
        let (form_id, title, topic) = if file {
            (NEW_FILE_FORM, "Create a new file", topics::FORM_CREATE_FILE)
        } else {
            (NEW_FOLDER_FORM, "Create new folder", topics::FORM_CREATE_FOLDER)
        };
        DispatchResult::posting([hub::show_form_dialog(
            form_id,
            title,
            json!([name_input("fdti1", "Name", &name, &excluded)]),
            buttons("Create"),
            topic,
            "Creating...",
        )])
    }

    fn show_rename_form(&mut self, node: NodeId) -> DispatchResult {
        let Some(n) = self.tree.get_node(node) else {
            return DispatchResult::unchanged();
        };
        let title = format!("Rename {}", n.kind().as_str());
        let text = n.text().to_string();
        let excluded: Vec<String> = n
            .parent()
            .map(|p| child_names(&self.tree, p))
            .unwrap_or_default()
            .into_iter()
            .filter(|name| *name != text)
            .collect();
        self.state.dialogs.rename_target = Some(node);
        DispatchResult::posting([hub::show_form_dialog(
            RENAME_FORM,
            &title,
            json!([name_input("fdti1", "Name", &text, &excluded)]),
            buttons("Rename"),
            topics::FORM_RENAME,
            "Renaming...",
        )])
    }

    fn show_delete_dialog(&mut self, node: NodeId) -> DispatchResult {
        let targets = self.targets_of(node);
        let title = match targets.as_slice() {
            [single] => match self.tree.get_node(*single) {
                Some(n) => format!("Delete '{}'?", n.text()),
                None => return DispatchResult::unchanged(),
            },
            many => format!("Delete {} items?", many.len()),
        };
        self.state.dialogs.delete_targets = targets;

        let mut choices = vec![json!({ "id": "b1", "type": "negative", "label": "Delete" })];
        if self.state.features.publisher {
            choices.push(json!({ "id": "b2", "type": "emphasized", "label": "Delete & Unpublish" }));
        }
        choices.push(json!({ "id": "b3", "type": "transparent", "label": "Cancel" }));
        DispatchResult::posting([hub::show_dialog(
            &title,
            "This action cannot be undone. It is recommended that you unpublish and delete.",
            Value::Array(choices),
            topics::DIALOG_DELETE,
        )])
    }

    fn show_delete_workspace_dialog(&mut self) -> DispatchResult {
        if self.state.is_default_workspace() {
            return DispatchResult::posting([hub::status_error(
                "The default workspace cannot be deleted",
            )]);
        }
        let title = format!("Delete workspace '{}'?", self.state.selected_workspace);
        DispatchResult::posting([hub::show_dialog(
            &title,
            "This action cannot be undone.",
            json!([
                { "id": "b1", "type": "negative", "label": "Delete" },
                { "id": "b2", "type": "transparent", "label": "Cancel" },
            ]),
            topics::DIALOG_DELETE_WORKSPACE,
        )])
    }

    fn show_import_dialog(&mut self, node: NodeId, single_file: bool) -> DispatchResult {
        let Some(n) = self.tree.get_node(node) else {
            return DispatchResult::unchanged();
        };
        let mut params = json!({
            "uploadPath": n.data.path,
            "workspace": n.data.workspace,
        });
        if single_file {
            params["importType"] = json!("file");
        }
        DispatchResult::posting([hub::show_dialog_window("import", params)])
    }

    fn project_names(&self) -> Vec<Value> {
        let root = self.tree.root();
        child_names(&self.tree, root)
            .into_iter()
            .map(|name| json!({ "label": name, "value": name }))
            .collect()
    }

    fn show_create_project_form(&mut self) -> DispatchResult {
        let excluded = child_names(&self.tree, self.tree.root());
        DispatchResult::posting([hub::show_form_dialog(
            CREATE_PROJECT_FORM,
            "Create project",
            json!([name_input("pgfi1", "Name", "", &excluded)]),
            buttons("Create"),
            topics::CREATE_PROJECT,
            "Creating...",
        )])
    }

    fn on_create_project(&mut self, reply: FormReply) -> DispatchResult {
        if reply.is_menu {
            return self.show_create_project_form();
        }
        let hide = DispatchResult::posting([hub::hide_form_dialog(CREATE_PROJECT_FORM)]);
        match reply.value(0) {
            Some(name) if reply.pressed("b1") => {
                let action = Action::CreateProject {
                    name: name.to_string(),
                };
                hide.and(self.reduce_workspace_action(action))
            }
            _ => hide,
        }
    }

    fn on_create_workspace(&mut self, reply: FormReply) -> DispatchResult {
        if reply.is_menu {
            return DispatchResult::posting([hub::show_form_dialog(
                CREATE_WORKSPACE_FORM,
                "Create workspace",
                json!([name_input("pgfi1", "Name", "", &self.state.workspace_names)]),
                buttons("Create"),
                topics::CREATE_WORKSPACE,
                "Creating...",
            )]);
        }
        let hide = DispatchResult::posting([hub::hide_form_dialog(CREATE_WORKSPACE_FORM)]);
        match reply.value(0) {
            Some(name) if reply.pressed("b1") => {
                let action = Action::CreateWorkspace {
                    name: name.to_string(),
                };
                hide.and(self.reduce_workspace_action(action))
            }
            _ => hide,
        }
    }

    fn on_link_project(&mut self, reply: FormReply) -> DispatchResult {
        if reply.is_menu {
            let excluded = child_names(&self.tree, self.tree.root());
            return DispatchResult::posting([hub::show_form_dialog(
                LINK_PROJECT_FORM,
                "Link project",
                json!([
                    name_input("pgfi1", "Name", "", &excluded),
                    {
                        "id": "pgfi2",
                        "type": "input",
                        "label": "Path",
                        "required": true,
                        "placeholder": "/absolute/path/to/project",
                    },
                ]),
                buttons("Create"),
                topics::LINK_PROJECT,
                "Linking...",
            )]);
        }
        let hide = DispatchResult::posting([hub::hide_form_dialog(LINK_PROJECT_FORM)]);
        match (reply.value(0), reply.value(1)) {
            (Some(name), Some(path)) if reply.pressed("b1") => {
                let action = Action::LinkProject {
                    name: name.to_string(),
                    path: path.to_string(),
                };
                hide.and(self.reduce_workspace_action(action))
            }
            _ => hide,
        }
    }

    fn show_duplicate_form(&mut self, node: Option<NodeId>) -> DispatchResult {
        let workspaces: Vec<Value> = self
            .state
            .workspace_names
            .iter()
            .map(|name| json!({ "label": name, "value": name }))
            .collect();
        let mut items = vec![json!({
            "id": "pgfd1",
            "type": "dropdown",
            "label": "Duplicate in workspace",
            "required": true,
            "value": self.state.selected_workspace,
            "items": workspaces,
        })];

        let mut title = "Duplicate project".to_string();
        let mut default_name = String::new();
        match node.and_then(|id| self.tree.get_node(id)) {
            Some(project) => {
                default_name = format!("{} 2", project.text());
                title = format!("Duplicate project '{}'", project.text());
                self.state.dialogs.duplicate_source = Some(DuplicateSource {
                    path: project.data.path.clone(),
                    workspace: project.data.workspace.clone(),
                });
            }
            None => {
                self.state.dialogs.duplicate_source = None;
                items.push(json!({
                    "id": "pgfd2",
                    "type": "dropdown",
                    "label": "Project",
                    "required": true,
                    "value": "",
                    "items": self.project_names(),
                }));
            }
        }
        let excluded = child_names(&self.tree, self.tree.root());
        items.push(name_input(
            "pgfi1",
            "Duplicated project name",
            &default_name,
            &excluded,
        ));
        DispatchResult::posting([hub::show_form_dialog(
            DUPLICATE_PROJECT_FORM,
            &title,
            Value::Array(items),
            buttons("Duplicate"),
            topics::DUPLICATE_PROJECT,
            "Duplicating...",
        )])
    }

    fn on_duplicate_project(&mut self, reply: FormReply) -> DispatchResult {
        if reply.is_menu {
            return self.show_duplicate_form(None);
        }
        let stored = self.state.dialogs.duplicate_source.take();
        let hide = DispatchResult::posting([hub::hide_form_dialog(DUPLICATE_PROJECT_FORM)]);
        if !reply.pressed("b1") {
            return hide;
        }
        let Some(target_workspace) = reply.value(0) else {
            return hide;
        };

        let picked_project = reply
            .form_data
            .get(1)
            .is_some_and(|f| f.kind.as_deref() == Some("dropdown"));
        let (source, name) = if picked_project {
            let source = reply.value(1).and_then(|project| {
                let root = self.tree.root();
                self.tree
                    .children(root)
                    .iter()
                    .filter_map(|&c| self.tree.get_node(c))
                    .find(|n| n.text() == project)
                    .map(|n| DuplicateSource {
                        path: n.data.path.clone(),
                        workspace: n.data.workspace.clone(),
                    })
            });
            (source, reply.value(2))
        } else {
            (stored, reply.value(1))
        };
        let (Some(source), Some(name)) = (source, name) else {
            return hide;
        };
        let action = Action::DuplicateProject {
            source_path: source.path,
            source_workspace: source.workspace,
            target_workspace: target_workspace.to_string(),
            name: name.to_string(),
        };
        hide.and(self.reduce_workspace_action(action))
    }

    fn show_generate_template_form(&mut self, node: NodeId) -> DispatchResult {
        let Some(n) = self.tree.get_node(node) else {
            return DispatchResult::unchanged();
        };
        let (project, file_path) = if n.kind() == NodeKind::Project {
            (n.text().to_string(), "/filename".to_string())
        } else {
            let Some(project) = self
                .tree
                .project_of(node)
                .and_then(|p| self.tree.get_node(p))
            else {
                return DispatchResult::unchanged();
            };
            let inner = n
                .data
                .path
                .get(project.text().len() + 1..)
                .unwrap_or_default();
            let file_path = if inner.ends_with('/') {
                format!("{inner}filename")
            } else {
                format!("{inner}/filename")
            };
            (project.text().to_string(), file_path)
        };
        let templates: Vec<Value> = self
            .state
            .templates
            .generic
            .iter()
            .map(|t| json!({ "label": t.name, "value": t.id }))
            .collect();

        DispatchResult::posting([hub::show_form_dialog(
            GENERATE_TEMPLATE_FORM,
            "Generate from template",
            json!([
                {
                    "id": "pgfd1",
                    "type": "dropdown",
                    "label": "Choose template",
                    "required": true,
                    "value": "",
                    "items": templates,
                },
                {
                    "id": "pgfd2",
                    "type": "dropdown",
                    "label": "Choose project",
                    "required": true,
                    "value": project,
                    "items": self.project_names(),
                },
                {
                    "id": "pgfi1",
                    "type": "input",
                    "label": "File path in project",
                    "required": true,
                    "placeholder": "/path/file",
                    "value": file_path,
                },
            ]),
            buttons("OK"),
            topics::GENERATE_GENERIC,
            "Generating...",
        )])
    }

    fn show_generate_model_form(&mut self, node: NodeId) -> DispatchResult {
        let Some(n) = self.tree.get_node(node) else {
            return DispatchResult::unchanged();
        };
        let Some(project) = self
            .tree
            .project_of(node)
            .and_then(|p| self.tree.get_node(p))
        else {
            return DispatchResult::unchanged();
        };
        let model = n
            .data
            .path
            .get(project.text().len() + 2..)
            .unwrap_or_default();
        let templates: Vec<Value> = self
            .state
            .templates
            .model_templates_for(n.text())
            .into_iter()
            .map(|t| json!({ "label": t.name, "value": t.id }))
            .collect();
        let form = json!([
            {
                "id": "pgfd1",
                "type": "dropdown",
                "label": "Choose template",
                "required": true,
                "value": "",
                "items": templates,
            },
            {
                "id": "pgfd2",
                "type": "dropdown",
                "label": "Choose project",
                "required": true,
                "value": project.text(),
                "items": self.project_names(),
            },
            {
                "id": "pgfi1",
                "type": "input",
                "label": "Model (must be in the root of the project)",
                "required": true,
                "inputRules": { "patterns": [NAME_PATTERN] },
                "placeholder": "file.model",
                "value": model,
            },
        ]);
        self.state.dialogs.model_generation = None;
        DispatchResult::posting([hub::show_form_dialog(
            GENERATE_MODEL_FORM,
            "Generate from template",
            form,
            buttons("OK"),
            topics::GENERATE_MODEL,
            "Loading parameters...",
        )])
    }

    /// First answer picks template, project and model; when the template has
    /// parameters the form is swapped for them and the second answer runs
    /// the generation.
    fn on_generate_model(&mut self, reply: FormReply) -> DispatchResult {
        let hide = DispatchResult::posting([hub::hide_form_dialog(GENERATE_MODEL_FORM)]);
        if !reply.pressed("b1") {
            self.state.dialogs.model_generation = None;
            return hide;
        }

        if let Some(pending) = self.state.dialogs.model_generation.take() {
            let mut parameters = Map::new();
            for field in reply.form_data.iter().filter(|f| truthy(&f.value)) {
                parameters.insert(field.id.clone(), field.value.clone());
            }
            return hide.and(self.generate_model(pending, Value::Object(parameters)));
        }

        let (Some(template_id), Some(project), Some(model)) =
            (reply.value(0), reply.value(1), reply.value(2))
        else {
            return hide;
        };
        let pending = ModelGeneration {
            template_id: template_id.to_string(),
            project: project.to_string(),
            model: model.to_string(),
        };
        let form: Vec<Value> = self
            .state
            .templates
            .model
            .iter()
            .find(|t| t.id == pending.template_id)
            .map(|t| t.parameters.iter().map(parameter_input).collect())
            .unwrap_or_default();

        if form.is_empty() {
            return hide.and(self.generate_model(pending, json!({})));
        }
        self.state.dialogs.model_generation = Some(pending);
        DispatchResult::posting([hub::update_form_dialog(
            GENERATE_MODEL_FORM,
            Value::Array(form),
            "Generating...",
        )])
    }

    fn generate_model(&mut self, pending: ModelGeneration, parameters: Value) -> DispatchResult {
        self.reduce_workspace_action(Action::GenerateFromModel {
            template_id: pending.template_id,
            project: pending.project,
            model: pending.model,
            parameters,
        })
    }

    /// Publishes the saved file and mirrors its git status onto the node.
    fn on_file_saved(&mut self, data: &Value) -> DispatchResult {
        let (Some(path), Some(workspace)) = (
            data.get("path").and_then(Value::as_str),
            data.get("workspace").and_then(Value::as_str),
        ) else {
            return DispatchResult::unchanged();
        };
        let mut result = DispatchResult::unchanged();

        if let Some(status) = data.get("status").and_then(Value::as_str) {
            if let Some(node) = self.tree.find_by_path(path) {
                if let Some(n) = self.tree.get_node_mut(node) {
                    n.status = (status == "modified").then_some(FileStatus::Modified);
                    result.state_changed = true;
                }
            }
        }
        if self.state.features.publisher {
            let effect = self.request(
                BackendRequest::Publish {
                    path: format!("/{workspace}{path}"),
                },
                Continuation::PublishSaved {
                    path: path.to_string(),
                },
            );
            result.effects.push(effect);
        }
        result
    }

    fn on_workspace_changed(&mut self, data: &Value) -> DispatchResult {
        let Some(name) = data.get("name").and_then(Value::as_str) else {
            return DispatchResult::unchanged();
        };
        let mut result = if name == self.state.selected_workspace {
            self.reduce_workspace_action(Action::ReloadWorkspace)
        } else {
            DispatchResult::unchanged()
        };

        let publish = data.get("publish");
        let path = if publish
            .and_then(|p| p.get("workspace"))
            .is_some_and(truthy)
        {
            Some(format!("/{name}/*"))
        } else {
            publish
                .and_then(|p| p.get("path"))
                .and_then(Value::as_str)
                .map(String::from)
        };
        if let Some(path) = path {
            result = result.and(self.reduce_workspace_action(Action::Publish { path }));
        }
        result
    }
}

/// Button of a confirmation dialog: either the bare id or `{buttonId}`.
fn dialog_button(data: &Value) -> Option<&str> {
    data.as_str()
        .or_else(|| data.get("buttonId").and_then(Value::as_str))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn buttons(confirm: &str) -> Value {
    json!([
        { "id": "b1", "type": "emphasized", "label": confirm, "whenValid": true },
        { "id": "b2", "type": "transparent", "label": "Cancel" },
    ])
}

fn name_input(id: &str, label: &str, value: &str, excluded: &[String]) -> Value {
    json!({
        "id": id,
        "type": "input",
        "submitOnEnterId": "b1",
        "label": label,
        "required": true,
        "inputRules": { "excluded": excluded, "patterns": [NAME_PATTERN] },
        "value": value,
    })
}

fn parameter_input(parameter: &TemplateParameter) -> Value {
    let checkbox = parameter.kind.as_deref() == Some("checkbox");
    let default = if checkbox { json!(false) } else { json!("") };
    json!({
        "id": parameter.name,
        "type": if checkbox { "checkbox" } else { "input" },
        "label": parameter.label,
        "required": parameter.required.unwrap_or(true),
        "placeholder": parameter.placeholder,
        "value": parameter.value.clone().unwrap_or(default),
    })
}

