//! Backend workspace descriptors and their tree form.

use compact_str::CompactString;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::tree::{FileStatus, NewNode, NodeData, NodeKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub projects: Vec<ProjectDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub git: bool,
    #[serde(rename = "gitName", default, skip_serializing_if = "Option::is_none")]
    pub git_name: Option<String>,
    #[serde(default)]
    pub folders: Vec<ResourceDescriptor>,
    #[serde(default)]
    pub files: Vec<ResourceDescriptor>,
}

/// A folder or file as listed by the workspace service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub name: String,
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(
        rename = "contentType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub folders: Vec<ResourceDescriptor>,
    #[serde(default)]
    pub files: Vec<ResourceDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    pub path: String,
    #[serde(
        rename = "contentType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^/]+$").expect("name pattern compiles"));

/// Node names are non-empty and never contain `/`.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Lowercased text after the last `.`; the whole name when there is none.
pub fn file_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) => name[idx + 1..].to_ascii_lowercase(),
        None => name.to_ascii_lowercase(),
    }
}

/// `/workspace/demo/app.js` → `/demo/app.js`.
pub fn strip_workspace(path: &str, workspace: &str) -> String {
    let prefixed = format!("/{workspace}");
    match path.strip_prefix(&prefixed) {
        Some(rest) => rest.to_string(),
        None => path.get(workspace.len() + 1..).unwrap_or_default().to_string(),
    }
}

/// Replaces the leading `old_prefix` of `path` with `new_prefix`.
pub fn rebase_path(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    path.strip_prefix(old_prefix)
        .map(|rest| format!("{new_prefix}{rest}"))
}

/// Appends `/` unless already present.
pub fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIcons {
    pub image_exts: Vec<String>,
    pub model_exts: Vec<String>,
}

impl FileIcons {
    pub fn new(image_exts: Vec<String>, model_exts: Vec<String>) -> Self {
        Self {
            image_exts,
            model_exts,
        }
    }

    pub fn icon_for(&self, name: &str) -> &'static str {
        let ext = file_extension(name);
        match ext.as_str() {
            "js" | "mjs" | "xsjs" | "ts" | "json" => "syntax",
            "css" | "less" | "scss" => "number-sign",
            "txt" => "text",
            "pdf" => "pdf-attachment",
            _ if self.image_exts.iter().any(|e| *e == ext) => "picture",
            _ if self.model_exts.iter().any(|e| *e == ext) => "document-text",
            _ => "file",
        }
    }

    pub fn add_image_ext(&mut self, ext: &str) {
        if !self.image_exts.iter().any(|e| e == ext) {
            self.image_exts.push(ext.to_string());
        }
    }

    pub fn add_model_ext(&mut self, ext: &str) {
        if !self.model_exts.iter().any(|e| e == ext) {
            self.model_exts.push(ext.to_string());
        }
    }
}

/// Tree blueprints for every project of a loaded workspace.
pub fn build_projects(descriptor: &WorkspaceDescriptor, icons: &FileIcons) -> Vec<NewNode> {
    let workspace = descriptor.name.as_str();
    descriptor
        .projects
        .iter()
        .map(|project| {
            let mut data = NodeData::new(
                project
                    .path
                    .get(descriptor.path.len()..)
                    .unwrap_or(&project.path),
                workspace,
            );
            data.git = project.git;
            data.git_name = project.git_name.clone();

            let children = build_resources(
                project.folders.iter().chain(project.files.iter()),
                workspace,
                icons,
            );
            NewNode::new(project.name.as_str(), NodeKind::Project, data).with_children(children)
        })
        .collect()
}

fn build_resources<'a>(
    resources: impl Iterator<Item = &'a ResourceDescriptor>,
    workspace: &str,
    icons: &FileIcons,
) -> Vec<NewNode> {
    resources
        .map(|resource| {
            let kind = NodeKind::from_backend(&resource.kind);
            let mut data = NodeData::new(strip_workspace(&resource.path, workspace), workspace);
            let mut icon = None;
            if kind == NodeKind::File {
                data.content_type = resource.content_type.clone();
                icon = Some(CompactString::from(icons.icon_for(&resource.name)));
            }
            let children = build_resources(
                resource.folders.iter().chain(resource.files.iter()),
                workspace,
                icons,
            );
            NewNode::new(resource.name.as_str(), kind, data)
                .with_icon(icon)
                .with_status(resource.status.as_deref().and_then(FileStatus::from_backend))
                .with_children(children)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/models/workspace.rs"]
mod tests;
