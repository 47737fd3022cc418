//! HTTP implementation of the backend ports.
//!
//! Every call resolves to an [`ApiResponse`]; transport and decoding failures
//! are logged and surface as status `0`.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use crate::kernel::services::ports::{
    ApiFuture, ApiResponse, GenerateApi, PublisherApi, ServerSettings, TemplatesApi,
    TransportApi, WorkspaceApi,
};

const DESCRIBE: &str = "describe";
const EDITOR_HEADER: &str = "Dirigible-Editor";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("url cannot carry path segments: {0}")]
    NotABase(String),
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct HttpBackend {
    client: Client,
    base: Url,
    settings: ServerSettings,
}

impl HttpBackend {
    pub fn new(settings: &ServerSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::NotABase(settings.base_url.clone()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            base,
            settings: settings.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `service` and every entry of `parts` are split on `/`; each piece is
    /// percent-encoded as one path segment.
    fn url(&self, service: &str, parts: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::NotABase(self.base.to_string()))?;
            segments.pop_if_empty();
            let pieces = std::iter::once(service)
                .chain(parts.iter().copied())
                .flat_map(|part| part.split('/'))
                .filter(|s| !s.is_empty());
            segments.extend(pieces);
        }
        Ok(url)
    }

    fn workspaces_url(&self, parts: &[&str]) -> Result<Url, ApiError> {
        self.url(&self.settings.workspaces_path, parts)
    }

    fn manager_url(&self, workspace: &str, operation: &str) -> Result<Url, ApiError> {
        self.url(&self.settings.workspace_manager_path, &[workspace, operation])
    }

    /// Runs `build` now and the request later; a URL failure resolves to
    /// status `0` without touching the network.
    fn call(
        &self,
        op: &'static str,
        build: impl FnOnce(&Client) -> Result<RequestBuilder, ApiError>,
    ) -> ApiFuture {
        match build(&self.client) {
            Ok(request) => Box::pin(async move { execute(op, request).await }),
            Err(e) => {
                tracing::error!(op, error = %e, "cannot build backend request");
                Box::pin(async { ApiResponse::network_error() })
            }
        }
    }
}

async fn execute(op: &'static str, request: RequestBuilder) -> ApiResponse {
    match send(request).await {
        Ok(response) => {
            if !(200..300).contains(&response.status) {
                tracing::warn!(op, status = response.status, "backend call failed");
                return ApiResponse::status(response.status);
            }
            tracing::debug!(op, status = response.status, "backend call");
            response
        }
        Err(e) => {
            tracing::warn!(op, error = %e, "backend unreachable");
            ApiResponse::network_error()
        }
    }
}

async fn send(request: RequestBuilder) -> Result<ApiResponse, ApiError> {
    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    let data = if body.is_empty() {
        None
    } else {
        Some(
            serde_json::from_slice::<Value>(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned())),
        )
    };
    Ok(ApiResponse::new(status, data))
}

fn describe() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(DESCRIBE, HeaderValue::from_static("application/json"));
    headers
}

fn editor_workspace() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(EDITOR_HEADER, HeaderValue::from_static("Workspace"));
    headers
}

/// Parent part of a node path: `/demo/src/app.js` → `/demo/src`.
fn parent_of(path: &str) -> &str {
    match path.trim_end_matches('/').rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

impl WorkspaceApi for HttpBackend {
    fn load(&self, workspace: &str) -> ApiFuture {
        self.call("load", |client| {
            Ok(client
                .get(self.workspaces_url(&[workspace])?)
                .headers(describe()))
        })
    }

    fn rename(&self, old_name: &str, new_name: &str, path: &str, workspace: &str) -> ApiFuture {
        let parent = parent_of(path);
        let body = json!({
            "source": format!("{parent}/{old_name}"),
            "target": format!("{parent}/{new_name}"),
        });
        self.call("rename", |client| {
            Ok(client
                .post(self.manager_url(workspace, "rename")?)
                .json(&body))
        })
    }

    fn copy(
        &self,
        source_path: &str,
        target_path: &str,
        source_workspace: &str,
        target_workspace: &str,
    ) -> ApiFuture {
        let target = if target_path.ends_with('/') {
            target_path.to_string()
        } else {
            format!("{target_path}/")
        };
        let body = json!({
            "sourceWorkspace": source_workspace,
            "source": source_path,
            "targetWorkspace": target_workspace,
            "target": target,
        });
        self.call("copy", |client| {
            Ok(client
                .post(self.manager_url(target_workspace, "copy")?)
                .json(&body))
        })
    }

    fn move_path(
        &self,
        source_path: &str,
        target_path: &str,
        source_workspace: &str,
        _target_workspace: &str,
    ) -> ApiFuture {
        // The move service only works inside the source workspace.
        let body = json!({ "source": source_path, "target": target_path });
        self.call("move", |client| {
            Ok(client
                .post(self.manager_url(source_workspace, "move")?)
                .json(&body))
        })
    }

    fn create_node(
        &self,
        name: &str,
        target_path: &str,
        is_directory: bool,
        content: &str,
    ) -> ApiFuture {
        let url = match self.workspaces_url(&[target_path, name]) {
            Ok(mut url) => {
                if is_directory {
                    let path = format!("{}/", url.path());
                    url.set_path(&path);
                }
                url
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot build createNode url");
                return Box::pin(async { ApiResponse::network_error() });
            }
        };
        let mut headers = editor_workspace();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("plain/text"));
        let request = self
            .client
            .post(url.clone())
            .headers(headers)
            .body(content.to_string());
        Box::pin(async move {
            let response = execute("createNode", request).await;
            if response.is_success() {
                ApiResponse::new(response.status, Some(Value::String(url.to_string())))
            } else {
                response
            }
        })
    }

    fn delete_project(&self, workspace: &str, project: &str) -> ApiFuture {
        self.call("deleteProject", |client| {
            Ok(client
                .delete(self.workspaces_url(&[workspace, project])?)
                .headers(editor_workspace()))
        })
    }

    fn remove(&self, path: &str) -> ApiFuture {
        self.call("remove", |client| {
            Ok(client
                .delete(self.workspaces_url(&[path])?)
                .headers(editor_workspace()))
        })
    }

    fn get_metadata(&self, url: &str) -> ApiFuture {
        self.call("getMetadata", |client| {
            Ok(client.get(self.base.join(url)?).headers(describe()))
        })
    }

    fn get_metadata_by_path(&self, workspace: &str, path: &str) -> ApiFuture {
        self.call("getMetadataByPath", |client| {
            Ok(client
                .get(self.workspaces_url(&[workspace, path])?)
                .headers(describe()))
        })
    }

    fn list_workspace_names(&self) -> ApiFuture {
        self.call("listWorkspaceNames", |client| {
            Ok(client.get(self.workspaces_url(&[])?))
        })
    }

    fn create_workspace(&self, name: &str) -> ApiFuture {
        self.call("createWorkspace", |client| {
            Ok(client.post(self.workspaces_url(&[name])?).json(&json!({})))
        })
    }

    fn delete_workspace(&self, name: &str) -> ApiFuture {
        self.call("deleteWorkspace", |client| {
            Ok(client
                .delete(self.workspaces_url(&[name])?)
                .headers(editor_workspace()))
        })
    }

    fn link_project(&self, workspace: &str, project: &str, path: &str) -> ApiFuture {
        let body = json!({ "source": project, "target": path });
        self.call("linkProject", |client| {
            Ok(client
                .post(self.manager_url(workspace, "linkProject")?)
                .json(&body))
        })
    }

    fn create_project(&self, workspace: &str, project: &str) -> ApiFuture {
        self.call("createProject", |client| {
            Ok(client
                .post(self.workspaces_url(&[workspace, project])?)
                .json(&json!({})))
        })
    }
}

impl PublisherApi for HttpBackend {
    fn publish(&self, path: &str) -> ApiFuture {
        self.call("publish", |client| {
            Ok(client
                .post(self.url(&self.settings.publisher_path, &[path])?)
                .json(&json!({})))
        })
    }

    fn unpublish(&self, path: &str) -> ApiFuture {
        self.call("unpublish", |client| {
            Ok(client.delete(self.url(&self.settings.publisher_path, &[path])?))
        })
    }
}

impl TemplatesApi for HttpBackend {
    fn menu_templates(&self) -> ApiFuture {
        self.call("menuTemplates", |client| {
            Ok(client.get(self.url(&self.settings.templates_menu_path, &[])?))
        })
    }

    fn list_templates(&self) -> ApiFuture {
        self.call("listTemplates", |client| {
            Ok(client.get(self.url(&self.settings.templates_list_path, &[])?))
        })
    }
}

impl GenerateApi for HttpBackend {
    fn generate_from_template(
        &self,
        workspace: &str,
        project: &str,
        file_path: &str,
        template_id: &str,
        parameters: &Value,
    ) -> ApiFuture {
        let body = json!({ "template": template_id, "parameters": parameters });
        self.call("generateFromTemplate", |client| {
            Ok(client
                .post(self.url(
                    &self.settings.generate_path,
                    &["file", workspace, project, file_path],
                )?)
                .json(&body))
        })
    }

    fn generate_from_model(
        &self,
        workspace: &str,
        project: &str,
        model: &str,
        template_id: &str,
        parameters: &Value,
    ) -> ApiFuture {
        let body = json!({ "template": template_id, "parameters": parameters, "model": model });
        self.call("generateFromModel", |client| {
            Ok(client
                .post(self.url(
                    &self.settings.generate_path,
                    &["model", workspace, project, model],
                )?)
                .json(&body))
        })
    }
}

impl TransportApi for HttpBackend {
    /// Exports are downloads; the response carries the archive URL.
    fn export_project(&self, workspace: &str, project: &str) -> ApiFuture {
        let response = match self.url(&self.settings.transport_path, &[workspace, project]) {
            Ok(url) => ApiResponse::new(ApiResponse::OK, Some(Value::String(url.to_string()))),
            Err(e) => {
                tracing::error!(error = %e, "cannot build export url");
                ApiResponse::network_error()
            }
        };
        Box::pin(async move { response })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/http.rs"]
mod tests;
