use super::*;
use crate::kernel::services::ports::{
    ApiFuture, ApiResponse, GenerateApi, PublisherApi, TemplatesApi, TransportApi, WorkspaceApi,
};
use serde_json::{json, Value};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// Answers every call with `201` and the call name as data.
struct NamedEcho;

fn echo(name: &str) -> ApiFuture {
    let response = ApiResponse::new(201, Some(json!(name)));
    Box::pin(async move { response })
}

impl WorkspaceApi for NamedEcho {
    fn load(&self, _: &str) -> ApiFuture {
        echo("load")
    }
    fn rename(&self, _: &str, _: &str, _: &str, _: &str) -> ApiFuture {
        echo("rename")
    }
    fn copy(&self, _: &str, _: &str, _: &str, _: &str) -> ApiFuture {
        echo("copy")
    }
    fn move_path(&self, _: &str, _: &str, _: &str, _: &str) -> ApiFuture {
        echo("move")
    }
    fn create_node(&self, _: &str, _: &str, _: bool, _: &str) -> ApiFuture {
        echo("createNode")
    }
    fn delete_project(&self, _: &str, _: &str) -> ApiFuture {
        echo("deleteProject")
    }
    fn remove(&self, _: &str) -> ApiFuture {
        echo("remove")
    }
    fn get_metadata(&self, _: &str) -> ApiFuture {
        echo("getMetadata")
    }
    fn get_metadata_by_path(&self, _: &str, _: &str) -> ApiFuture {
        echo("getMetadataByPath")
    }
    fn list_workspace_names(&self) -> ApiFuture {
        echo("listWorkspaceNames")
    }
    fn create_workspace(&self, _: &str) -> ApiFuture {
        echo("createWorkspace")
    }
    fn delete_workspace(&self, _: &str) -> ApiFuture {
        echo("deleteWorkspace")
    }
    fn link_project(&self, _: &str, _: &str, _: &str) -> ApiFuture {
        echo("linkProject")
    }
    fn create_project(&self, _: &str, _: &str) -> ApiFuture {
        echo("createProject")
    }
}

impl PublisherApi for NamedEcho {
    fn publish(&self, _: &str) -> ApiFuture {
        echo("publish")
    }
    fn unpublish(&self, _: &str) -> ApiFuture {
        echo("unpublish")
    }
}

impl TemplatesApi for NamedEcho {
    fn menu_templates(&self) -> ApiFuture {
        echo("menuTemplates")
    }
    fn list_templates(&self) -> ApiFuture {
        echo("listTemplates")
    }
}

impl GenerateApi for NamedEcho {
    fn generate_from_template(&self, _: &str, _: &str, _: &str, _: &str, _: &Value) -> ApiFuture {
        echo("generateFromTemplate")
    }
    fn generate_from_model(&self, _: &str, _: &str, _: &str, _: &str, _: &Value) -> ApiFuture {
        echo("generateFromModel")
    }
}

impl TransportApi for NamedEcho {
    fn export_project(&self, _: &str, _: &str) -> ApiFuture {
        echo("exportProject")
    }
}

#[test]
fn responses_come_back_tagged_with_their_request() {
    let (tx, rx) = mpsc::channel();
    let runtime = AsyncRuntime::new(Backend::from_service(Arc::new(NamedEcho)), tx).unwrap();

    runtime.execute(
        RequestId(7),
        BackendRequest::Remove {
            path: "/workspace/demo/app.js".to_string(),
        },
    );
    runtime.execute(RequestId(8), BackendRequest::ListTemplates);

    let mut received = Vec::new();
    for _ in 0..2 {
        let AppMessage::Response { id, response } =
            rx.recv_timeout(Duration::from_secs(5)).unwrap();
        received.push((id, response));
    }
    received.sort_by_key(|(id, _)| *id);

    assert_eq!(received[0].0, RequestId(7));
    assert_eq!(received[0].1.data, Some(json!("remove")));
    assert_eq!(received[1].0, RequestId(8));
    assert_eq!(received[1].1.data, Some(json!("listTemplates")));
}
