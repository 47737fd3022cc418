//! Service ports: traits + data contracts.

pub mod api;
pub mod config;
pub mod storage;

pub use api::{
    ApiFuture, ApiResponse, Backend, GenerateApi, PublisherApi, TemplatesApi, TransportApi,
    WorkspaceApi,
};
pub use config::{
    EditorDescriptor, EditorRegistry, ExplorerConfig, FeatureFlags, ServerSettings,
    DEFAULT_WORKSPACE,
};
pub use storage::{
    load_selected_workspace, save_selected_workspace, SelectedWorkspace, Storage,
    SELECTED_WORKSPACE_KEY,
};
