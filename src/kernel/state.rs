use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kernel::services::ports::{EditorRegistry, ExplorerConfig, FeatureFlags};
use crate::models::{file_extension, FileIcons, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuTemplate {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub extension: String,
    /// Base file name; `New File` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Initial content of files created from this template.
    #[serde(default)]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub once_per_folder: bool,
    #[serde(default)]
    pub static_name: bool,
    #[serde(default)]
    pub nameless: bool,
    #[serde(default)]
    pub is_model: bool,
    #[serde(default)]
    pub is_image: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateParameter {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Generation template; model templates carry the model file extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default)]
    pub parameters: Vec<TemplateParameter>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateCatalog {
    pub menu: Vec<MenuTemplate>,
    pub generic: Vec<TemplateDescriptor>,
    pub model: Vec<TemplateDescriptor>,
}

impl TemplateCatalog {
    pub fn set_generation_templates(&mut self, templates: Vec<TemplateDescriptor>) {
        self.generic.clear();
        self.model.clear();
        for template in templates {
            if template.extension.is_some() {
                self.model.push(template);
            } else {
                self.generic.push(template);
            }
        }
    }

    pub fn model_extensions(&self) -> impl Iterator<Item = &str> {
        self.model.iter().filter_map(|t| t.extension.as_deref())
    }

    pub fn has_model_templates_for(&self, file_name: &str) -> bool {
        let ext = file_extension(file_name);
        self.model_extensions().any(|e| e == ext)
    }

    pub fn model_templates_for(&self, file_name: &str) -> Vec<&TemplateDescriptor> {
        let ext = file_extension(file_name);
        self.model
            .iter()
            .filter(|t| t.extension.as_deref() == Some(ext.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSource {
    pub path: String,
    pub workspace: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelGeneration {
    pub template_id: String,
    pub project: String,
    pub model: String,
}

/// Targets remembered between showing a dialog and receiving its answer.
#[derive(Debug, Clone, Default)]
pub struct DialogState {
    pub create_parent: Option<NodeId>,
    /// Content of the file the create form is about to make.
    pub create_content: String,
    pub rename_target: Option<NodeId>,
    pub delete_targets: Vec<NodeId>,
    pub duplicate_source: Option<DuplicateSource>,
    pub model_generation: Option<ModelGeneration>,
}

#[derive(Debug, Clone)]
pub struct ExplorerState {
    pub selected_workspace: String,
    pub default_workspace: String,
    pub workspace_names: Vec<String>,
    pub busy: Option<String>,
    pub load_error: Option<String>,
    pub templates: TemplateCatalog,
    pub icons: FileIcons,
    pub features: FeatureFlags,
    pub editors: EditorRegistry,
    pub dialogs: DialogState,
}

impl ExplorerState {
    pub fn new(config: &ExplorerConfig, selected_workspace: String) -> Self {
        Self {
            selected_workspace,
            default_workspace: config.default_workspace.clone(),
            workspace_names: Vec::new(),
            busy: None,
            load_error: None,
            templates: TemplateCatalog::default(),
            icons: FileIcons::new(
                config.image_extensions.clone(),
                config.model_extensions.clone(),
            ),
            features: config.features,
            editors: config.editors.clone(),
            dialogs: DialogState::default(),
        }
    }

    pub fn is_default_workspace(&self) -> bool {
        self.selected_workspace == self.default_workspace
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
