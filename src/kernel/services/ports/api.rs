//! Backend service contracts.
//!
//! Every call resolves to an [`ApiResponse`]; callers branch on the status
//! code alone. Transport failures resolve to status `0` instead of erroring.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type ApiFuture = Pin<Box<dyn Future<Output = ApiResponse> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const NO_CONTENT: u16 = 204;
    pub const NETWORK_ERROR: u16 = 0;

    pub fn new(status: u16, data: Option<Value>) -> Self {
        Self { status, data }
    }

    pub fn status(status: u16) -> Self {
        Self { status, data: None }
    }

    pub fn network_error() -> Self {
        Self::status(Self::NETWORK_ERROR)
    }

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }

    pub fn is_created(&self) -> bool {
        self.status == Self::CREATED
    }

    pub fn is_deleted(&self) -> bool {
        self.status == Self::NO_CONTENT
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Self::OK | Self::CREATED | Self::NO_CONTENT)
    }

    /// Decodes `data`; `None` when absent or shaped differently.
    pub fn json<T: DeserializeOwned>(&self) -> Option<T> {
        self.data
            .as_ref()
            .and_then(|v| T::deserialize(v).ok())
    }
}

/// Workspace file-store service.
pub trait WorkspaceApi: Send + Sync {
    fn load(&self, workspace: &str) -> ApiFuture;
    /// `path` is the current path of the renamed node inside `workspace`.
    fn rename(&self, old_name: &str, new_name: &str, path: &str, workspace: &str) -> ApiFuture;
    /// `target_path` is the destination folder; it is sent with a trailing `/`.
    fn copy(
        &self,
        source_path: &str,
        target_path: &str,
        source_workspace: &str,
        target_workspace: &str,
    ) -> ApiFuture;
    /// `target_path` is the full new path of the moved node.
    fn move_path(
        &self,
        source_path: &str,
        target_path: &str,
        source_workspace: &str,
        target_workspace: &str,
    ) -> ApiFuture;
    /// `target_path` includes the workspace segment. A 201 carries the URL of
    /// the created resource as `data`.
    fn create_node(
        &self,
        name: &str,
        target_path: &str,
        is_directory: bool,
        content: &str,
    ) -> ApiFuture;
    fn delete_project(&self, workspace: &str, project: &str) -> ApiFuture;
    /// `path` includes the workspace segment.
    fn remove(&self, path: &str) -> ApiFuture;
    fn get_metadata(&self, url: &str) -> ApiFuture;
    fn get_metadata_by_path(&self, workspace: &str, path: &str) -> ApiFuture;
    fn list_workspace_names(&self) -> ApiFuture;
    fn create_workspace(&self, name: &str) -> ApiFuture;
    fn delete_workspace(&self, name: &str) -> ApiFuture;
    fn link_project(&self, workspace: &str, project: &str, path: &str) -> ApiFuture;
    fn create_project(&self, workspace: &str, project: &str) -> ApiFuture;
}

/// Publishes resources to the runtime. Success is 200 or 201.
pub trait PublisherApi: Send + Sync {
    fn publish(&self, path: &str) -> ApiFuture;
    fn unpublish(&self, path: &str) -> ApiFuture;
}

pub trait TemplatesApi: Send + Sync {
    fn menu_templates(&self) -> ApiFuture;
    fn list_templates(&self) -> ApiFuture;
}

pub trait GenerateApi: Send + Sync {
    fn generate_from_template(
        &self,
        workspace: &str,
        project: &str,
        file_path: &str,
        template_id: &str,
        parameters: &Value,
    ) -> ApiFuture;
    fn generate_from_model(
        &self,
        workspace: &str,
        project: &str,
        model: &str,
        template_id: &str,
        parameters: &Value,
    ) -> ApiFuture;
}

pub trait TransportApi: Send + Sync {
    /// `project` may be `*` for the whole workspace.
    fn export_project(&self, workspace: &str, project: &str) -> ApiFuture;
}

/// Every backend service the explorer talks to.
#[derive(Clone)]
pub struct Backend {
    pub workspace: Arc<dyn WorkspaceApi>,
    pub publisher: Arc<dyn PublisherApi>,
    pub templates: Arc<dyn TemplatesApi>,
    pub generate: Arc<dyn GenerateApi>,
    pub transport: Arc<dyn TransportApi>,
}

impl Backend {
    /// One service implementing every contract, shared behind all five handles.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: WorkspaceApi + PublisherApi + TemplatesApi + GenerateApi + TransportApi + 'static,
    {
        Self {
            workspace: service.clone(),
            publisher: service.clone(),
            templates: service.clone(),
            generate: service.clone(),
            transport: service,
        }
    }
}
