use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_WORKSPACE: &str = "workspace";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default = "default_workspace")]
    pub default_workspace: String,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub editors: EditorRegistry,
    #[serde(default)]
    pub image_extensions: Vec<String>,
    #[serde(default)]
    pub model_extensions: Vec<String>,
    /// Prefix applied to non-global hub topics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_prefix: Option<String>,
}

fn default_workspace() -> String {
    DEFAULT_WORKSPACE.to_string()
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            default_workspace: default_workspace(),
            features: FeatureFlags::default(),
            editors: EditorRegistry::default(),
            image_extensions: ["png", "jpg", "jpeg", "gif", "svg", "ico", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            model_extensions: ["model", "edm", "dsm", "bpmn", "form", "schema"]
                .into_iter()
                .map(String::from)
                .collect(),
            hub_prefix: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub base_url: String,
    pub workspaces_path: String,
    pub workspace_manager_path: String,
    pub publisher_path: String,
    pub templates_menu_path: String,
    pub templates_list_path: String,
    pub generate_path: String,
    pub transport_path: String,
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            workspaces_path: "/services/v8/ide/workspaces".to_string(),
            workspace_manager_path: "/services/v8/ide/workspace".to_string(),
            publisher_path: "/services/v8/ide/publisher/request".to_string(),
            templates_menu_path: "/services/v8/ide/templates/menu".to_string(),
            templates_list_path: "/services/v8/ide/templates".to_string(),
            generate_path: "/services/v8/ide/generate".to_string(),
            transport_path: "/services/v8/transport/project".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub publisher: bool,
    pub generate: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            publisher: true,
            generate: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorDescriptor {
    pub id: String,
    pub label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorRegistry {
    pub default_editor: EditorDescriptor,
    pub by_content_type: BTreeMap<String, Vec<EditorDescriptor>>,
}

impl Default for EditorRegistry {
    fn default() -> Self {
        Self {
            default_editor: EditorDescriptor {
                id: "monaco".to_string(),
                label: "Code Editor".to_string(),
            },
            by_content_type: BTreeMap::new(),
        }
    }
}

impl EditorRegistry {
    /// Default editor first, then the registered editors for `content_type`.
    pub fn editors_for(&self, content_type: Option<&str>) -> Vec<&EditorDescriptor> {
        let mut editors = vec![&self.default_editor];
        if let Some(list) = content_type.and_then(|ct| self.by_content_type.get(ct)) {
            editors.extend(list.iter().filter(|e| e.id != self.default_editor.id));
        }
        editors
    }
}
